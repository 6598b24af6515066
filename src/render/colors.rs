//! Color definitions for bot states and scene elements

use serde::Serialize;

use crate::simulation::activity::Severity;
use crate::simulation::registry::BotStatus;

/// Color from 8-bit channels and an alpha, usable in consts
macro_rules! rgba {
    ($r:expr, $g:expr, $b:expr, $a:expr) => {
        Color::new($r as f32 / 255.0, $g as f32 / 255.0, $b as f32 / 255.0, $a)
    };
}

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 8-bit channels with alpha premultiplied against black
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let channel = |c: f32| (c * self.a * 255.0).round().clamp(0.0, 255.0) as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }
}

pub const BACKGROUND: Color = rgba!(10, 14, 39, 0.95);
pub const GRID: Color = rgba!(100, 200, 255, 0.1);
pub const TARGET: Color = rgba!(255, 50, 50, 0.8);
pub const HEALTH_BAR_BACK: Color = rgba!(0, 0, 0, 0.5);
pub const HEALTH_BAR_FILL: Color = rgba!(255, 0, 0, 0.8);
pub const TRACER: Color = rgba!(0, 212, 255, 0.8);
pub const BOT_OUTLINE: Color = rgba!(0, 212, 255, 1.0);
pub const LABEL: Color = rgba!(255, 255, 255, 1.0);
pub const ACCENT: Color = rgba!(0, 212, 255, 1.0);
pub const AI_ACTIVE: Color = rgba!(0, 255, 136, 1.0);
pub const AI_DISABLED: Color = rgba!(255, 0, 68, 1.0);
pub const MUTED: Color = rgba!(160, 160, 160, 1.0);

/// Marker fill for a bot in the given state
pub fn status_color(status: BotStatus) -> Color {
    match status {
        BotStatus::Idle => rgba!(100, 200, 255, 0.8),
        BotStatus::Moving => rgba!(100, 255, 200, 0.8),
        BotStatus::Attacking => rgba!(255, 200, 0, 0.8),
        BotStatus::Covering => rgba!(200, 100, 255, 0.8),
    }
}

/// Left border color of an activity log entry
pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => AI_ACTIVE,
        Severity::Warning => rgba!(255, 200, 0, 1.0),
        Severity::Error => AI_DISABLED,
        Severity::Info => ACCENT,
    }
}
