pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigChange, ConfigStore, DamageMultiplier, ModConfig, RuntimeConfig, SpeedTier};
pub use error::{Result, TeammatesError};
pub use types::{BotId, TargetId, Tick, Vec2};
