//! Bot and target registries
//!
//! The three teammate bots are created once and live for the whole run.
//! Targets arrive in batches of five and are dropped as soon as their health
//! reaches zero.

use serde::Serialize;

use crate::core::types::{BotId, TargetId, Vec2};
use crate::simulation::constants::{
    BOT_MAX_HEALTH, BOT_START_POSITIONS, TARGET_BATCH_SIZE, TARGET_MAX_HEALTH, TARGET_SPAWN_X,
    TARGET_SPAWN_Y,
};
use crate::simulation::rng::RandomSource;

/// What a bot did on its most recent tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    #[default]
    Idle,
    Moving,
    Attacking,
    Covering,
}

impl BotStatus {
    pub fn label(self) -> &'static str {
        match self {
            BotStatus::Idle => "Idle",
            BotStatus::Moving => "Moving",
            BotStatus::Attacking => "Attacking",
            BotStatus::Covering => "Cover Fire",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bot {
    pub id: BotId,
    pub position: Vec2,
    pub status: BotStatus,
    /// Always full: nothing damages bots
    pub health: u8,
    pub kills: u32,
}

impl Bot {
    pub fn new(id: BotId, position: Vec2) -> Self {
        Self {
            id,
            position,
            status: BotStatus::Idle,
            health: BOT_MAX_HEALTH,
            kills: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub id: TargetId,
    pub position: Vec2,
    /// May dip below zero on the tick it is killed
    pub health: f32,
}

impl Target {
    pub fn new(id: TargetId, position: Vec2) -> Self {
        Self {
            id,
            position,
            health: TARGET_MAX_HEALTH,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Remaining health as a fraction of full, clamped to `0.0..=1.0`
    pub fn health_fraction(&self) -> f32 {
        (self.health / TARGET_MAX_HEALTH).clamp(0.0, 1.0)
    }
}

/// The fixed squad of teammate bots
#[derive(Debug, Clone)]
pub struct BotRegistry {
    bots: Vec<Bot>,
}

impl BotRegistry {
    /// Three bots at their fixed starting coordinates, ids 1..=3
    pub fn spawn_squad() -> Self {
        let bots = BOT_START_POSITIONS
            .iter()
            .enumerate()
            .map(|(i, pos)| Bot::new(BotId(i as u32 + 1), *pos))
            .collect();
        Self { bots }
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }

    pub fn get(&self, id: BotId) -> Option<&Bot> {
        self.bots.iter().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bot> {
        self.bots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bot> {
        self.bots.iter_mut()
    }

    pub fn as_slice(&self) -> &[Bot] {
        &self.bots
    }

    pub fn total_kills(&self) -> u64 {
        self.bots.iter().map(|b| b.kills as u64).sum()
    }
}

/// Live targets plus the id counter that keeps ids unique across batches
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: Vec<Target>,
    next_id: u64,
    batches_spawned: u32,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pool with a fresh batch of five full-health targets
    ///
    /// Positions are uniform over the spawn rectangle, x drawn before y.
    pub fn spawn_batch(&mut self, rng: &mut dyn RandomSource) -> &[Target] {
        self.targets.clear();
        for _ in 0..TARGET_BATCH_SIZE {
            let x = rng.range(TARGET_SPAWN_X.0, TARGET_SPAWN_X.1);
            let y = rng.range(TARGET_SPAWN_Y.0, TARGET_SPAWN_Y.1);
            let id = TargetId(self.next_id);
            self.next_id += 1;
            self.targets.push(Target::new(id, Vec2::new(x, y)));
        }
        self.batches_spawned += 1;
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_alive()).count()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn as_slice(&self) -> &[Target] {
        &self.targets
    }

    pub fn as_mut_slice(&mut self) -> &mut [Target] {
        &mut self.targets
    }

    /// Drop every target at or below zero health; returns how many were removed
    pub fn retain_alive(&mut self) -> usize {
        let before = self.targets.len();
        self.targets.retain(Target::is_alive);
        before - self.targets.len()
    }

    pub fn batches_spawned(&self) -> u32 {
        self.batches_spawned
    }
}
