//! JSON summary of a headless run

use std::path::Path;

use serde::Serialize;

use crate::core::error::Result;
use crate::core::types::BotId;
use crate::simulation::controller::Controller;
use crate::simulation::registry::BotStatus;
use crate::simulation::rng::RandomSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotReport {
    pub id: BotId,
    pub x: f32,
    pub y: f32,
    pub state: BotStatus,
    pub kills: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlessReport {
    pub ticks: u64,
    pub seed: Option<u64>,
    pub config: String,
    pub total_kills: u64,
    pub shots: u64,
    pub hits: u64,
    pub accuracy: f32,
    pub respawns: u32,
    pub live_targets: usize,
    pub bots: Vec<BotReport>,
    pub log_length: usize,
}

impl HeadlessReport {
    pub fn capture<R: RandomSource>(controller: &Controller<R>, seed: Option<u64>) -> Self {
        let frame = controller.frame();
        Self {
            ticks: frame.tick,
            seed,
            config: controller.config().summary(),
            total_kills: frame.stats.total_kills,
            shots: frame.stats.shots,
            hits: frame.stats.hits,
            accuracy: frame.stats.accuracy(),
            respawns: frame.stats.respawns,
            live_targets: frame.live_targets,
            bots: frame
                .bots
                .iter()
                .map(|bot| BotReport {
                    id: bot.id,
                    x: bot.position.x,
                    y: bot.position.y,
                    state: bot.status,
                    kills: bot.kills,
                })
                .collect(),
            log_length: controller.activity().len(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
