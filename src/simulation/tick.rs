//! Tick system - advances the squad one frame
//!
//! Per tick:
//! snapshot live targets -> resolve every bot in id order -> collect tracers
//! -> drop dead targets -> request a respawn if the pool emptied
//!
//! The result is an immutable [`Frame`] for the renderer; nothing here draws.

use serde::Serialize;

use crate::core::config::ModConfig;
use crate::core::types::Tick;
use crate::simulation::combat::{resolve_bot, Engagement, Tracer};
use crate::simulation::registry::{Bot, BotRegistry, Target, TargetRegistry};
use crate::simulation::rng::RandomSource;

/// Running totals shown in the stats header
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimulationStats {
    pub total_kills: u64,
    /// Every cover-fire or attack roll
    pub shots: u64,
    /// Rolls that dealt damage
    pub hits: u64,
    pub respawns: u32,
}

impl SimulationStats {
    /// Hit rate in percent, 0 before the first shot
    pub fn accuracy(&self) -> f32 {
        if self.shots == 0 {
            0.0
        } else {
            self.hits as f32 / self.shots as f32 * 100.0
        }
    }
}

/// Everything the renderer needs for one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub tick: Tick,
    /// Live targets as they stood when the tick began
    pub targets: Vec<Target>,
    /// Bots after this tick's resolution
    pub bots: Vec<Bot>,
    pub tracers: Vec<Tracer>,
    pub stats: SimulationStats,
    /// Targets still alive after filtering
    pub live_targets: usize,
}

/// Result of [`Simulation::step`]
#[derive(Debug, Clone)]
pub struct TickReport {
    pub frame: Frame,
    pub engagements: Vec<Engagement>,
    /// Targets removed this tick
    pub eliminated: usize,
    /// The pool emptied and no respawn was pending; the caller should
    /// schedule one
    pub respawn_requested: bool,
}

/// The bot squad, the target pool and their totals
#[derive(Debug, Clone)]
pub struct Simulation {
    pub bots: BotRegistry,
    pub targets: TargetRegistry,
    stats: SimulationStats,
    current_tick: Tick,
    respawn_pending: bool,
}

impl Simulation {
    /// Fresh squad with the first target batch already spawned
    pub fn new(rng: &mut dyn RandomSource) -> Self {
        let mut targets = TargetRegistry::new();
        targets.spawn_batch(rng);
        Self {
            bots: BotRegistry::spawn_squad(),
            targets,
            stats: SimulationStats::default(),
            current_tick: 0,
            respawn_pending: false,
        }
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn respawn_pending(&self) -> bool {
        self.respawn_pending
    }

    /// Advance one tick
    pub fn step(&mut self, config: &ModConfig, rng: &mut dyn RandomSource) -> TickReport {
        self.current_tick += 1;

        let drawn_targets: Vec<Target> = self
            .targets
            .iter()
            .filter(|t| t.is_alive())
            .cloned()
            .collect();

        let targets = self.targets.as_mut_slice();
        let mut engagements = Vec::with_capacity(self.bots.len());
        for bot in self.bots.iter_mut() {
            let engagement = resolve_bot(bot, targets, config, rng);
            if let Some(shot) = engagement.shot {
                self.stats.shots += 1;
                if shot.hit {
                    self.stats.hits += 1;
                }
                if shot.killed {
                    self.stats.total_kills += 1;
                }
            }
            engagements.push(engagement);
        }

        let tracers: Vec<Tracer> = engagements.iter().filter_map(|e| e.tracer).collect();
        let eliminated = self.targets.retain_alive();
        let live_targets = self.targets.len();

        let respawn_requested = live_targets == 0 && !self.respawn_pending;
        if respawn_requested {
            self.respawn_pending = true;
            tracing::info!(tick = self.current_tick, "All targets eliminated, respawn requested");
        }

        tracing::trace!(
            tick = self.current_tick,
            live_targets,
            eliminated,
            tracers = tracers.len(),
            "Tick complete"
        );

        TickReport {
            frame: Frame {
                tick: self.current_tick,
                targets: drawn_targets,
                bots: self.bots.as_slice().to_vec(),
                tracers,
                stats: self.stats,
                live_targets,
            },
            engagements,
            eliminated,
            respawn_requested,
        }
    }

    /// Spawn a fresh batch of five and clear the pending flag
    pub fn respawn(&mut self, rng: &mut dyn RandomSource) {
        self.targets.spawn_batch(rng);
        self.respawn_pending = false;
        self.stats.respawns += 1;
        tracing::info!(
            tick = self.current_tick,
            batch = self.targets.batches_spawned(),
            "Targets respawned"
        );
    }

    /// Frame of the current state without advancing
    pub fn snapshot(&self) -> Frame {
        Frame {
            tick: self.current_tick,
            targets: self.targets.iter().filter(|t| t.is_alive()).cloned().collect(),
            bots: self.bots.as_slice().to_vec(),
            tracers: Vec::new(),
            stats: self.stats,
            live_targets: self.targets.live_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::simulation::registry::BotStatus;
    use crate::simulation::rng::{ScriptedRandom, SeededRandom};

    #[test]
    fn test_new_spawns_first_batch() {
        let mut rng = SeededRandom::new(1);
        let sim = Simulation::new(&mut rng);
        assert_eq!(sim.targets.len(), 5);
        assert_eq!(sim.bots.len(), 3);
        assert_eq!(sim.current_tick(), 0);
    }

    #[test]
    fn test_opening_tick_moves_every_bot() {
        let mut rng = SeededRandom::new(1);
        let mut sim = Simulation::new(&mut rng);
        let report = sim.step(&ModConfig::default(), &mut rng);
        assert_eq!(report.frame.tick, 1);
        assert!(report.frame.bots.iter().all(|b| b.status == BotStatus::Moving));
        assert_eq!(report.frame.targets.len(), 5);
        assert_eq!(report.frame.live_targets, 5);
        assert!(!report.respawn_requested);
    }

    #[test]
    fn test_wiping_pool_requests_single_respawn() {
        let mut rng = SeededRandom::new(4);
        let mut sim = Simulation::new(&mut rng);
        for target in sim.targets.as_mut_slice() {
            target.health = 1.0;
        }
        // Park bots next to the first target and make every roll hit
        let anchor = sim.targets.as_slice()[0].position;
        for bot in sim.bots.iter_mut() {
            bot.position = anchor;
        }
        let mut hits = ScriptedRandom::constant(0.0);
        let mut reports = Vec::new();
        for _ in 0..2000 {
            reports.push(sim.step(&ModConfig::default(), &mut hits));
            if sim.targets.is_empty() {
                break;
            }
        }
        let last = reports.last().unwrap();
        assert_eq!(last.frame.live_targets, 0);
        assert!(last.respawn_requested);
        assert!(sim.respawn_pending());
        assert_eq!(sim.stats().total_kills, 5);
        assert_eq!(sim.bots.total_kills(), 5);

        let idle = sim.step(&ModConfig::default(), &mut hits);
        assert!(!idle.respawn_requested);
        assert!(idle.frame.bots.iter().all(|b| b.status == BotStatus::Idle));

        sim.respawn(&mut rng);
        assert_eq!(sim.targets.len(), 5);
        assert!(!sim.respawn_pending());
        assert_eq!(sim.stats().respawns, 1);
    }

    #[test]
    fn test_target_killed_earlier_in_tick_is_skipped() {
        let mut rng = SeededRandom::new(6);
        let mut sim = Simulation::new(&mut rng);
        let anchor = Vec2::new(500.0, 300.0);
        for (i, target) in sim.targets.as_mut_slice().iter_mut().enumerate() {
            target.position = anchor.offset(i as f32 * 10.0, 0.0);
        }
        sim.targets.as_mut_slice()[0].health = 1.0;
        for bot in sim.bots.iter_mut() {
            bot.position = anchor;
        }
        let first = sim.targets.as_slice()[0].id;
        let second = sim.targets.as_slice()[1].id;

        let mut hits = ScriptedRandom::constant(0.0);
        let report = sim.step(&ModConfig::default(), &mut hits);

        let bot1 = &report.engagements[0];
        assert_eq!(bot1.target, Some(first));
        assert!(bot1.killed());
        let bot2 = &report.engagements[1];
        assert_eq!(bot2.target, Some(second));
        assert!(!bot2.killed());

        assert_eq!(report.eliminated, 1);
        assert_eq!(sim.stats().total_kills, 1);
        assert_eq!(report.frame.bots[0].kills, 1);
        assert_eq!(report.frame.bots[1].kills, 0);
        assert_eq!(sim.targets.get(second).map(|t| t.health), Some(70.0));
    }

    #[test]
    fn test_frame_draws_start_of_tick_health() {
        let mut rng = SeededRandom::new(8);
        let mut sim = Simulation::new(&mut rng);
        let target_pos = sim.targets.as_slice()[0].position;
        for bot in sim.bots.iter_mut() {
            bot.position = target_pos;
        }
        let mut hits = ScriptedRandom::constant(0.0);
        let report = sim.step(&ModConfig::default(), &mut hits);
        assert_eq!(report.frame.targets[0].health, 100.0);
        assert!(sim.targets.as_slice()[0].health < 100.0);
        assert_eq!(report.frame.tracers.len(), report.engagements.len());
    }

    #[test]
    fn test_accuracy() {
        let stats = SimulationStats {
            shots: 8,
            hits: 2,
            ..SimulationStats::default()
        };
        assert_eq!(stats.accuracy(), 25.0);
        assert_eq!(SimulationStats::default().accuracy(), 0.0);
    }
}
