pub mod activity;
pub mod combat;
pub mod constants;
pub mod controller;
pub mod registry;
pub mod rng;
pub mod scheduler;
pub mod tick;

pub use activity::{ActivityLog, LogEntry, Severity};
pub use combat::{classify_range, nearest_live_target, resolve_bot, Engagement, Shot, ShotKind, Tracer};
pub use controller::{AdvanceSummary, Controller};
pub use registry::{Bot, BotRegistry, BotStatus, Target, TargetRegistry};
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use scheduler::{ManualClock, Scheduler, TickSource, TimerKind, WallClock};
pub use tick::{Frame, Simulation, SimulationStats, TickReport};
