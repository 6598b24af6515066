//! Virtual-time scheduler and tick sources
//!
//! The simulation tick, the activity log and target respawn all run off timers
//! held here instead of wall-clock callbacks. A [`TickSource`] reports how much
//! time has passed; the controller then pops due timers one at a time with
//! [`Scheduler::pop_due`], so a firing may register or cancel timers before the
//! next one is considered.

use std::time::{Duration, Instant};

use ahash::AHashMap;

/// Minimum period for a repeating timer
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    SimulationTick,
    ActivityLog,
    Respawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer {
    kind: TimerKind,
    due: Duration,
    period: Option<Duration>,
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub id: TimerId,
    pub kind: TimerKind,
    pub at: Duration,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    timers: AHashMap<TimerId, Timer>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Repeat every `period`, first firing one period from now
    pub fn every(&mut self, kind: TimerKind, period: Duration) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.insert(Timer {
            kind,
            due: self.now + period,
            period: Some(period),
        })
    }

    /// Fire once after `delay`
    pub fn once(&mut self, kind: TimerKind, delay: Duration) -> TimerId {
        self.insert(Timer {
            kind,
            due: self.now + delay,
            period: None,
        })
    }

    /// Unregister a timer; false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_of(&self, kind: TimerKind) -> usize {
        self.timers.values().filter(|t| t.kind == kind).count()
    }

    /// Pop the earliest timer due at or before `until`
    ///
    /// Timers due at the same instant fire in registration order. Virtual
    /// time moves to the firing's due time; periodic timers are re-armed.
    pub fn pop_due(&mut self, until: Duration) -> Option<Firing> {
        let (id, kind, due, period) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(id, t)| (t.due, **id))
            .map(|(id, t)| (*id, t.kind, t.due, t.period))?;

        let firing = Firing { id, kind, at: due };
        self.now = self.now.max(due);

        match period {
            Some(period) => {
                if let Some(timer) = self.timers.get_mut(&id) {
                    timer.due += period;
                }
            }
            None => {
                self.timers.remove(&id);
            }
        }

        Some(firing)
    }

    /// Move virtual time forward to `until` once all due timers were popped
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn insert(&mut self, timer: Timer) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(id, timer);
        id
    }
}

/// Source of elapsed time between polls
pub trait TickSource {
    /// Time since the previous call (or since creation on the first call)
    fn elapsed(&mut self) -> Duration;
}

/// Real time, for the interactive front-end
#[derive(Debug)]
pub struct WallClock {
    last: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for WallClock {
    fn elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta
    }
}

/// Time advanced by hand, for tests and headless runs
#[derive(Debug, Default)]
pub struct ManualClock {
    pending: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.pending += by;
    }
}

impl TickSource for ManualClock {
    fn elapsed(&mut self) -> Duration {
        std::mem::take(&mut self.pending)
    }
}
