//! Simulation constants - all fixed tuning values in one place
//!
//! None of these are player-adjustable. The mod options in `core::config`
//! scale damage and speed on top of them.

use std::time::Duration;

use crate::core::types::Vec2;

// Canvas (logical units)
pub const CANVAS_WIDTH: f32 = 900.0;
pub const CANVAS_HEIGHT: f32 = 600.0;
pub const GRID_SPACING: f32 = 50.0;

// Cadence
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);
pub const LOG_INTERVAL: Duration = Duration::from_millis(2000);
pub const RESPAWN_DELAY: Duration = Duration::from_millis(1000);
/// Most ticks a single wall-clock poll may replay after a stall
pub const MAX_TICKS_PER_PUMP: u32 = 20;

// Bots
pub const BOT_START_POSITIONS: [Vec2; 3] = [
    Vec2 { x: 50.0, y: 250.0 },
    Vec2 { x: 50.0, y: 350.0 },
    Vec2 { x: 150.0, y: 300.0 },
];
pub const BOT_MAX_HEALTH: u8 = 100;
pub const BASE_MOVE_STEP: f32 = 2.0; // units per tick before the speed tier

// Targets
pub const TARGET_BATCH_SIZE: usize = 5;
pub const TARGET_MAX_HEALTH: f32 = 100.0;
pub const TARGET_SPAWN_X: (f32, f32) = (600.0, 800.0); // [min, max)
pub const TARGET_SPAWN_Y: (f32, f32) = (100.0, 500.0); // [min, max)

// Engagement ranges - a bot farther than MOVE_RANGE closes in, between the
// two ranges it lays cover fire, inside ATTACK_RANGE it attacks
pub const MOVE_RANGE: f32 = 200.0;
pub const ATTACK_RANGE: f32 = 150.0;

// Fire rolls (per tick)
pub const COVER_FIRE_CHANCE: f64 = 0.10;
pub const COVER_FIRE_DAMAGE: f32 = 10.0;
pub const ATTACK_CHANCE: f64 = 0.15;
pub const ATTACK_DAMAGE: f32 = 15.0;

// Activity log
pub const MAX_LOG_ENTRIES: usize = 15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_ordered() {
        assert!(ATTACK_RANGE < MOVE_RANGE);
    }

    #[test]
    fn test_attack_beats_cover_fire() {
        assert!(ATTACK_CHANCE > COVER_FIRE_CHANCE);
        assert!(ATTACK_DAMAGE > COVER_FIRE_DAMAGE);
    }

    #[test]
    fn test_spawn_area_inside_canvas() {
        assert!(TARGET_SPAWN_X.1 <= CANVAS_WIDTH);
        assert!(TARGET_SPAWN_Y.1 <= CANVAS_HEIGHT);
        for start in BOT_START_POSITIONS {
            assert!(start.x < TARGET_SPAWN_X.0);
        }
    }

    #[test]
    fn test_log_cadence_slower_than_ticks() {
        assert!(LOG_INTERVAL > TICK_INTERVAL);
        assert!(RESPAWN_DELAY > TICK_INTERVAL);
    }
}
