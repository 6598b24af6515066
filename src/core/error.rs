use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeammatesError {
    #[error("Damage multiplier {0} must be within 1.0..=5.0 in steps of 0.5")]
    InvalidDamageMultiplier(f32),

    #[error("Unknown movement speed: {0} (expected standard, fast or very-fast)")]
    UnknownSpeedTier(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWriteError(#[from] toml::ser::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TeammatesError>;
