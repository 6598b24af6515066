//! Top-level owner of the demo state
//!
//! The controller holds the mod options, the simulation, the activity feed,
//! the scheduler and the random source, and is the only thing that mutates
//! them. Front-ends feed it elapsed time and option changes; it hands back
//! the latest [`Frame`] for drawing.

use std::time::Duration;

use crate::core::config::{ConfigChange, ConfigStore, ModConfig};
use crate::simulation::activity::{ActivityLog, LocalTime, Timestamp};
use crate::simulation::constants::{LOG_INTERVAL, MAX_TICKS_PER_PUMP, RESPAWN_DELAY, TICK_INTERVAL};
use crate::simulation::rng::{RandomSource, SeededRandom};
use crate::simulation::scheduler::{Firing, Scheduler, TickSource, TimerId, TimerKind};
use crate::simulation::tick::{Frame, Simulation};

/// Handles of the registered timers
#[derive(Debug, Default, Clone, Copy)]
struct Timers {
    tick: Option<TimerId>,
    log: Option<TimerId>,
    respawn: Option<TimerId>,
}

/// What happened during one [`Controller::advance`] call
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceSummary {
    pub ticks: u32,
    pub log_entries: u32,
    pub respawns: u32,
}

impl AdvanceSummary {
    pub fn is_empty(&self) -> bool {
        self.ticks == 0 && self.log_entries == 0 && self.respawns == 0
    }
}

pub struct Controller<R: RandomSource = SeededRandom> {
    config: ConfigStore,
    simulation: Simulation,
    activity: ActivityLog,
    scheduler: Scheduler,
    rng: R,
    clock: Box<dyn Timestamp>,
    timers: Timers,
    last_frame: Frame,
    running: bool,
    paused: bool,
}

impl Controller<SeededRandom> {
    pub fn seeded(config: ModConfig, seed: u64) -> Self {
        Self::new(config, SeededRandom::new(seed), Box::new(LocalTime))
    }
}

impl<R: RandomSource> Controller<R> {
    /// Build the squad and the first target batch. Timers start with [`start`].
    ///
    /// [`start`]: Controller::start
    pub fn new(config: ModConfig, mut rng: R, clock: Box<dyn Timestamp>) -> Self {
        let simulation = Simulation::new(&mut rng);
        let last_frame = simulation.snapshot();
        Self {
            config: ConfigStore::new(config),
            simulation,
            activity: ActivityLog::new(),
            scheduler: Scheduler::new(),
            rng,
            clock,
            timers: Timers::default(),
            last_frame,
            running: false,
            paused: false,
        }
    }

    /// Register the tick timer, and the log timer when AI is enabled
    ///
    /// A respawn cancelled by [`shutdown`] is registered again.
    ///
    /// [`shutdown`]: Controller::shutdown
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.paused = false;
        self.arm_tick();
        if self.config.get().ai_enabled {
            self.arm_log();
        }
        if self.simulation.respawn_pending() && !self.respawn_scheduled() {
            self.timers.respawn = Some(self.scheduler.once(TimerKind::Respawn, RESPAWN_DELAY));
        }
        tracing::info!(config = %self.config.get().summary(), "Controller started");
    }

    /// Unregister every timer; later calls to `advance` do nothing
    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
        self.timers = Timers::default();
        self.running = false;
        tracing::info!(
            tick = self.simulation.current_tick(),
            kills = self.simulation.stats().total_kills,
            "Controller shut down"
        );
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop the periodic timers; a pending respawn still fires
    pub fn pause(&mut self) {
        if !self.running || self.paused {
            return;
        }
        self.paused = true;
        self.disarm_tick();
        self.disarm_log();
        tracing::debug!("Simulation paused");
    }

    pub fn resume(&mut self) {
        if !self.running || !self.paused {
            return;
        }
        self.paused = false;
        self.arm_tick();
        if self.config.get().ai_enabled {
            self.arm_log();
        }
        tracing::debug!("Simulation resumed");
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Poll a tick source and dispatch whatever came due
    ///
    /// Catch-up is capped at `MAX_TICKS_PER_PUMP` tick intervals; time lost
    /// to a longer stall is dropped.
    pub fn pump(&mut self, source: &mut dyn TickSource) -> AdvanceSummary {
        let elapsed = source.elapsed();
        let cap = TICK_INTERVAL * MAX_TICKS_PER_PUMP;
        if elapsed > cap {
            tracing::debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                cap_ms = cap.as_millis() as u64,
                "Clamping stalled tick source"
            );
        }
        self.advance(elapsed.min(cap))
    }

    /// Dispatch every timer due within the next `elapsed` of virtual time
    pub fn advance(&mut self, elapsed: Duration) -> AdvanceSummary {
        let mut summary = AdvanceSummary::default();
        if !self.running {
            return summary;
        }
        let until = self.scheduler.now() + elapsed;
        while let Some(firing) = self.scheduler.pop_due(until) {
            self.dispatch(firing, &mut summary);
        }
        self.scheduler.settle(until);
        summary
    }

    /// Run exactly one tick now, outside the scheduler
    pub fn step_once(&mut self) -> &Frame {
        self.run_tick();
        &self.last_frame
    }

    fn dispatch(&mut self, firing: Firing, summary: &mut AdvanceSummary) {
        match firing.kind {
            TimerKind::SimulationTick => {
                self.run_tick();
                summary.ticks += 1;
            }
            TimerKind::ActivityLog => {
                if self.config.get().ai_enabled {
                    self.activity.generate(&mut self.rng, self.clock.as_ref());
                    summary.log_entries += 1;
                }
            }
            TimerKind::Respawn => {
                if self.timers.respawn == Some(firing.id) {
                    self.timers.respawn = None;
                }
                self.simulation.respawn(&mut self.rng);
                self.last_frame = self.simulation.snapshot();
                summary.respawns += 1;
            }
        }
    }

    fn run_tick(&mut self) {
        let report = self.simulation.step(self.config.get(), &mut self.rng);
        if report.respawn_requested {
            self.timers.respawn = Some(self.scheduler.once(TimerKind::Respawn, RESPAWN_DELAY));
        }
        self.last_frame = report.frame;
    }

    // === Mod options ===

    pub fn config(&self) -> &ModConfig {
        self.config.get()
    }

    /// Apply a mutation through `f` and react to the change, if any
    pub fn update_config(
        &mut self,
        f: impl FnOnce(&mut ConfigStore) -> Option<ConfigChange>,
    ) -> Option<ConfigChange> {
        let change = f(&mut self.config)?;
        self.apply(change);
        Some(change)
    }

    /// Re-arm timers after a change
    ///
    /// Any change restarts the tick cadence. An AI toggle also drops the log
    /// timer; disabling clears the feed, enabling registers a fresh timer.
    pub fn apply(&mut self, change: ConfigChange) {
        tracing::debug!(?change, "Applying mod option change");
        if !self.running || self.paused {
            if let ConfigChange::AiEnabled(false) = change {
                self.activity.clear();
            }
            return;
        }

        self.disarm_tick();
        self.arm_tick();

        if let ConfigChange::AiEnabled(enabled) = change {
            self.disarm_log();
            if enabled {
                self.arm_log();
            } else {
                self.activity.clear();
            }
        }
    }

    fn arm_tick(&mut self) {
        self.timers.tick = Some(self.scheduler.every(TimerKind::SimulationTick, TICK_INTERVAL));
    }

    fn disarm_tick(&mut self) {
        if let Some(id) = self.timers.tick.take() {
            self.scheduler.cancel(id);
        }
    }

    fn arm_log(&mut self) {
        self.timers.log = Some(self.scheduler.every(TimerKind::ActivityLog, LOG_INTERVAL));
    }

    fn disarm_log(&mut self) {
        if let Some(id) = self.timers.log.take() {
            self.scheduler.cancel(id);
        }
    }

    // === Read access for front-ends ===

    pub fn frame(&self) -> &Frame {
        &self.last_frame
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn respawn_scheduled(&self) -> bool {
        self.timers
            .respawn
            .map(|id| self.scheduler.is_scheduled(id))
            .unwrap_or(false)
    }
}
