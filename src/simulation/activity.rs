//! Synthetic "AI activity" feed
//!
//! Entries are random picks from a fixed phrase list and have no connection to
//! what the bots are actually doing. The feed is capped at
//! [`MAX_LOG_ENTRIES`], newest first.

use std::collections::VecDeque;

use serde::Serialize;

use crate::core::types::BotId;
use crate::simulation::constants::MAX_LOG_ENTRIES;
use crate::simulation::rng::RandomSource;

pub const ACTIVITY_PHRASES: [&str; 10] = [
    "Target acquired - engaging enemy",
    "Moving to tactical position",
    "Providing cover fire",
    "Enemy eliminated - searching for new target",
    "Ability ready - awaiting optimal use",
    "Coordinating with teammate",
    "Repositioning for better angle",
    "Analyzing threat level",
    "Executing flanking maneuver",
    "Priority target identified",
];

/// Number of bots an entry can be attributed to
const ATTRIBUTED_BOTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    /// Never generated
    Error,
}

impl Severity {
    /// The severities the generator draws from
    pub const GENERATED: [Severity; 3] = [Severity::Info, Severity::Success, Severity::Warning];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub bot: BotId,
    pub action: &'static str,
    pub severity: Severity,
}

/// Produces the wall-clock label attached to each entry
pub trait Timestamp {
    fn stamp(&self) -> String;
}

/// Local time as `HH:MM:SS`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTime;

impl Timestamp for LocalTime {
    fn stamp(&self) -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }
}

/// Always the same label
#[derive(Debug, Clone)]
pub struct FixedTime(pub String);

impl Timestamp for FixedTime {
    fn stamp(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    generated: u64,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_LOG_ENTRIES + 1),
            generated: 0,
        }
    }

    /// Insert at the front and evict the oldest beyond the cap
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(MAX_LOG_ENTRIES);
    }

    /// Draw bot, phrase and severity (in that order) and push the entry
    pub fn generate(&mut self, rng: &mut dyn RandomSource, clock: &dyn Timestamp) -> &LogEntry {
        let timestamp = clock.stamp();
        let bot = BotId(rng.index(ATTRIBUTED_BOTS) as u32 + 1);
        let action = ACTIVITY_PHRASES[rng.index(ACTIVITY_PHRASES.len())];
        let severity = Severity::GENERATED[rng.index(Severity::GENERATED.len())];

        self.generated += 1;
        tracing::trace!(bot = %bot, action, ?severity, "Activity entry");
        self.push(LogEntry {
            timestamp,
            bot,
            action,
            severity,
        });
        &self.entries[0]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest entry
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Entries newest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Entries ever generated, including evicted and cleared ones
    pub fn generated(&self) -> u64 {
        self.generated
    }
}
