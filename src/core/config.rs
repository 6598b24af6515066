//! User-facing configuration: the three mod options and the startup file
//!
//! The mod options (damage multiplier, movement speed, AI toggle) are the only
//! values a player can change at runtime. They live in a [`ConfigStore`] owned
//! by the controller; every mutation reports a [`ConfigChange`] so the tick
//! and log cadences can be re-armed. Fixed tuning values are in
//! `simulation::constants`, not here.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TeammatesError};

pub const MIN_DAMAGE_MULTIPLIER: f32 = 1.0;
pub const MAX_DAMAGE_MULTIPLIER: f32 = 5.0;
pub const DAMAGE_MULTIPLIER_STEP: f32 = 0.5;

/// Footer label shown next to the live settings
pub const PRODUCT_LABEL: &str = "SmartTeammates v1.0";

/// Scales all bot damage. Bounded to 1.0..=5.0 on a 0.5 grid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct DamageMultiplier(f32);

impl DamageMultiplier {
    pub const MIN: Self = Self(MIN_DAMAGE_MULTIPLIER);
    pub const MAX: Self = Self(MAX_DAMAGE_MULTIPLIER);

    pub fn new(value: f32) -> Result<Self> {
        let on_grid = (value / DAMAGE_MULTIPLIER_STEP).fract() == 0.0;
        if (MIN_DAMAGE_MULTIPLIER..=MAX_DAMAGE_MULTIPLIER).contains(&value) && on_grid {
            Ok(Self(value))
        } else {
            Err(TeammatesError::InvalidDamageMultiplier(value))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// One step up, saturating at the maximum
    pub fn raised(self) -> Self {
        Self((self.0 + DAMAGE_MULTIPLIER_STEP).min(MAX_DAMAGE_MULTIPLIER))
    }

    /// One step down, saturating at the minimum
    pub fn lowered(self) -> Self {
        Self((self.0 - DAMAGE_MULTIPLIER_STEP).max(MIN_DAMAGE_MULTIPLIER))
    }
}

impl Default for DamageMultiplier {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<f32> for DamageMultiplier {
    type Error = TeammatesError;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DamageMultiplier> for f32 {
    fn from(multiplier: DamageMultiplier) -> Self {
        multiplier.0
    }
}

impl FromStr for DamageMultiplier {
    type Err = TeammatesError;

    fn from_str(s: &str) -> Result<Self> {
        let value: f32 = s
            .trim()
            .trim_end_matches('x')
            .parse()
            .map_err(|_| TeammatesError::InvalidDamageMultiplier(f32::NAN))?;
        Self::new(value)
    }
}

impl fmt::Display for DamageMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Movement speed tier selected in the options panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeedTier {
    #[default]
    Standard,
    Fast,
    VeryFast,
}

impl SpeedTier {
    pub const ALL: [SpeedTier; 3] = [SpeedTier::Standard, SpeedTier::Fast, SpeedTier::VeryFast];

    /// Scalar applied to the base movement step
    pub fn multiplier(self) -> f32 {
        match self {
            SpeedTier::Standard => 1.0,
            SpeedTier::Fast => 1.5,
            SpeedTier::VeryFast => 2.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpeedTier::Standard => "standard",
            SpeedTier::Fast => "fast",
            SpeedTier::VeryFast => "very-fast",
        }
    }

    /// Upper-case label for the options panel ("VERY FAST")
    pub fn label(self) -> String {
        self.as_str().replace('-', " ").to_uppercase()
    }

    pub fn next(self) -> Self {
        match self {
            SpeedTier::Standard => SpeedTier::Fast,
            SpeedTier::Fast => SpeedTier::VeryFast,
            SpeedTier::VeryFast => SpeedTier::Standard,
        }
    }
}

impl FromStr for SpeedTier {
    type Err = TeammatesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(SpeedTier::Standard),
            "fast" => Ok(SpeedTier::Fast),
            "very-fast" | "very_fast" | "veryfast" => Ok(SpeedTier::VeryFast),
            other => Err(TeammatesError::UnknownSpeedTier(other.to_string())),
        }
    }
}

impl fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three player-adjustable mod options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModConfig {
    pub damage_multiplier: DamageMultiplier,
    pub movement_speed: SpeedTier,
    pub ai_enabled: bool,
}

impl Default for ModConfig {
    fn default() -> Self {
        Self {
            damage_multiplier: DamageMultiplier::default(),
            movement_speed: SpeedTier::default(),
            ai_enabled: true,
        }
    }
}

impl ModConfig {
    pub fn speed_multiplier(&self) -> f32 {
        self.movement_speed.multiplier()
    }

    /// Footer line, e.g. `SmartTeammates v1.0 | Damage: 1.5x | Speed: fast | AI: Active`
    pub fn summary(&self) -> String {
        format!(
            "{} | Damage: {} | Speed: {} | AI: {}",
            PRODUCT_LABEL,
            self.damage_multiplier,
            self.movement_speed,
            if self.ai_enabled { "Active" } else { "Disabled" }
        )
    }
}

/// A single applied mutation of the mod options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigChange {
    DamageMultiplier(DamageMultiplier),
    MovementSpeed(SpeedTier),
    AiEnabled(bool),
}

/// Holds the live mod options. Written only by player input.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    current: ModConfig,
    revision: u64,
}

impl ConfigStore {
    pub fn new(config: ModConfig) -> Self {
        Self {
            current: config,
            revision: 0,
        }
    }

    pub fn get(&self) -> &ModConfig {
        &self.current
    }

    /// Number of applied changes since creation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_damage_multiplier(&mut self, value: DamageMultiplier) -> Option<ConfigChange> {
        if self.current.damage_multiplier == value {
            return None;
        }
        self.current.damage_multiplier = value;
        Some(self.bump(ConfigChange::DamageMultiplier(value)))
    }

    pub fn raise_damage(&mut self) -> Option<ConfigChange> {
        self.set_damage_multiplier(self.current.damage_multiplier.raised())
    }

    pub fn lower_damage(&mut self) -> Option<ConfigChange> {
        self.set_damage_multiplier(self.current.damage_multiplier.lowered())
    }

    pub fn set_speed(&mut self, tier: SpeedTier) -> Option<ConfigChange> {
        if self.current.movement_speed == tier {
            return None;
        }
        self.current.movement_speed = tier;
        Some(self.bump(ConfigChange::MovementSpeed(tier)))
    }

    pub fn cycle_speed(&mut self) -> Option<ConfigChange> {
        self.set_speed(self.current.movement_speed.next())
    }

    pub fn set_ai_enabled(&mut self, enabled: bool) -> Option<ConfigChange> {
        if self.current.ai_enabled == enabled {
            return None;
        }
        self.current.ai_enabled = enabled;
        Some(self.bump(ConfigChange::AiEnabled(enabled)))
    }

    pub fn toggle_ai(&mut self) -> Option<ConfigChange> {
        self.set_ai_enabled(!self.current.ai_enabled)
    }

    fn bump(&mut self, change: ConfigChange) -> ConfigChange {
        self.revision += 1;
        tracing::debug!(?change, revision = self.revision, "Mod options changed");
        change
    }
}

/// Logging settings for the binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive string
    pub filter: String,
    /// Where to write logs while the terminal UI owns the screen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smart_teammates=info".to_string(),
            file: None,
        }
    }
}

/// Startup configuration loaded from TOML
///
/// ```toml
/// seed = 42
///
/// [mod]
/// damage_multiplier = 2.5
/// movement_speed = "very-fast"
/// ai_enabled = true
///
/// [logging]
/// filter = "smart_teammates=debug"
/// file = "smart-teammates.log"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Seed for the random source; a random seed is drawn when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(rename = "mod")]
    pub mods: ModConfig,
    pub logging: LoggingConfig,
}

impl RuntimeConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(path = %path.display(), "Loaded runtime config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
