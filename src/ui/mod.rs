//! UI module - ratatui front-end and headless reporting

pub mod report;
pub mod state;
pub mod terminal;

pub use report::{BotReport, HeadlessReport};
pub use state::GameUI;
pub use terminal::{run_headless, run_interactive, TerminalApp};
