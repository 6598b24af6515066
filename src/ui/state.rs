//! UI state for the terminal front-end

use crate::core::config::ModConfig;
use crate::render::colors::{self, Color};

/// One entry of the static AI feature list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiFeature {
    pub name: &'static str,
    pub description: &'static str,
}

pub const AI_FEATURES: [AiFeature; 6] = [
    AiFeature {
        name: "Target Prioritization",
        description: "Bots identify and prioritize threats based on distance, health, and danger level.",
    },
    AiFeature {
        name: "Smart Navigation",
        description: "Advanced pathfinding to navigate obstacles and reach objectives efficiently.",
    },
    AiFeature {
        name: "Cover Fire",
        description: "Bots provide suppressing fire while maintaining tactical positioning.",
    },
    AiFeature {
        name: "Ability Management",
        description: "Strategic use of abilities based on situation analysis and cooldowns.",
    },
    AiFeature {
        name: "Team Coordination",
        description: "Bots coordinate attacks and movements for maximum effectiveness.",
    },
    AiFeature {
        name: "Adaptive Behavior",
        description: "AI adapts tactics based on enemy behavior and environmental factors.",
    },
];

/// Squad commands shown in the panel; informational only
pub const COMMANDS: [(&str, &str); 4] = [
    ("FOLLOW", "Bot follows player"),
    ("ATTACK", "Engage nearest enemy"),
    ("DEFEND", "Hold position"),
    ("REGROUP", "Return to team"),
];

pub const LOG_PLACEHOLDER_ACTIVE: &str = "Initializing AI systems...";
pub const LOG_PLACEHOLDER_DISABLED: &str = "AI disabled - no activity";

/// Overlay and panel toggles
#[derive(Debug, Default)]
pub struct GameUI {
    /// Whether the mod options overlay is open
    pub show_options: bool,
    /// Whether the key help overlay is open
    pub show_help: bool,
    /// Last option change, shown in the footer until replaced
    pub notice: Option<String>,
}

impl GameUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_options(&mut self) {
        self.show_options = !self.show_options;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }
}

/// Badge text and colour for the AI status
pub fn ai_badge(config: &ModConfig) -> (&'static str, Color) {
    if config.ai_enabled {
        ("AI Active", colors::AI_ACTIVE)
    } else {
        ("AI Disabled", colors::AI_DISABLED)
    }
}

/// Check or cross for each feature entry
pub fn feature_mark(config: &ModConfig) -> &'static str {
    if config.ai_enabled {
        "✓"
    } else {
        "✕"
    }
}

/// Text shown in place of an empty activity log
pub fn log_placeholder(config: &ModConfig) -> &'static str {
    if config.ai_enabled {
        LOG_PLACEHOLDER_ACTIVE
    } else {
        LOG_PLACEHOLDER_DISABLED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles() {
        let mut ui = GameUI::new();
        assert!(!ui.show_options);
        ui.toggle_options();
        ui.toggle_help();
        assert!(ui.show_options && ui.show_help);
        ui.toggle_options();
        assert!(!ui.show_options);
    }

    #[test]
    fn test_ai_dependent_text() {
        let mut config = ModConfig::default();
        assert_eq!(ai_badge(&config).0, "AI Active");
        assert_eq!(feature_mark(&config), "✓");
        assert_eq!(log_placeholder(&config), LOG_PLACEHOLDER_ACTIVE);

        config.ai_enabled = false;
        assert_eq!(ai_badge(&config).1, colors::AI_DISABLED);
        assert_eq!(feature_mark(&config), "✕");
        assert_eq!(log_placeholder(&config), LOG_PLACEHOLDER_DISABLED);
    }
}
