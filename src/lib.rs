//! SmartTeammates - AI teammate bot squad demo
//!
//! Three bots chase and shoot respawning targets on a 900x600 field, tuned by
//! three mod options: a damage multiplier, a movement speed tier and an AI
//! toggle. A decorative activity feed runs alongside.

pub mod core;
pub mod render;
pub mod simulation;
pub mod ui;
