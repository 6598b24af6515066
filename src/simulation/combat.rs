//! Combat resolution - one bot, one tick
//!
//! Each bot locks onto the nearest live target and picks a behavior by range:
//! close the distance, lay cover fire, or attack. Fire is a single roll per
//! tick. Nothing here can fail; an empty target set simply idles the bot.

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::core::config::ModConfig;
use crate::core::types::{BotId, TargetId, Vec2};
use crate::simulation::constants::{
    ATTACK_CHANCE, ATTACK_DAMAGE, ATTACK_RANGE, BASE_MOVE_STEP, COVER_FIRE_CHANCE,
    COVER_FIRE_DAMAGE, MOVE_RANGE,
};
use crate::simulation::registry::{Bot, BotStatus, Target};
use crate::simulation::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShotKind {
    CoverFire,
    Attack,
}

impl ShotKind {
    pub fn chance(self) -> f64 {
        match self {
            ShotKind::CoverFire => COVER_FIRE_CHANCE,
            ShotKind::Attack => ATTACK_CHANCE,
        }
    }

    /// Damage of a successful roll at the given multiplier
    pub fn damage(self, multiplier: f32) -> f32 {
        match self {
            ShotKind::CoverFire => COVER_FIRE_DAMAGE * multiplier,
            ShotKind::Attack => ATTACK_DAMAGE * multiplier,
        }
    }
}

/// One fire roll and its effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shot {
    pub kind: ShotKind,
    pub target: TargetId,
    pub hit: bool,
    /// Zero on a miss
    pub damage: f32,
    pub killed: bool,
}

/// Beam drawn for a successful attack, visible for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tracer {
    pub bot: BotId,
    pub from: Vec2,
    pub to: Vec2,
}

/// Outcome of resolving a single bot for a single tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Engagement {
    pub bot: BotId,
    pub status: BotStatus,
    pub target: Option<TargetId>,
    pub distance: Option<f32>,
    pub shot: Option<Shot>,
    pub tracer: Option<Tracer>,
}

impl Engagement {
    fn idle(bot: BotId) -> Self {
        Self {
            bot,
            status: BotStatus::Idle,
            target: None,
            distance: None,
            shot: None,
            tracer: None,
        }
    }

    pub fn killed(&self) -> bool {
        self.shot.map(|s| s.killed).unwrap_or(false)
    }
}

/// Behavior for a target at `distance`
///
/// Moving is strictly beyond `MOVE_RANGE`; cover fire covers
/// `(ATTACK_RANGE, MOVE_RANGE]`; attack is anything at or inside `ATTACK_RANGE`.
pub fn classify_range(distance: f32) -> BotStatus {
    if distance > MOVE_RANGE {
        BotStatus::Moving
    } else if distance > ATTACK_RANGE {
        BotStatus::Covering
    } else {
        BotStatus::Attacking
    }
}

/// Index and distance of the closest target with health above zero
///
/// Ties go to the target that comes first in `targets`.
pub fn nearest_live_target(from: Vec2, targets: &[Target]) -> Option<(usize, f32)> {
    targets
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_alive())
        .map(|(i, t)| (i, from.distance(&t.position)))
        .min_by_key(|(_, d)| OrderedFloat(*d))
}

/// Advance one bot by one tick against the shared target set
///
/// Damage is applied to `targets` in place so later bots in the same tick see
/// it. Dead targets are not removed here; the tick loop filters them.
pub fn resolve_bot(
    bot: &mut Bot,
    targets: &mut [Target],
    config: &ModConfig,
    rng: &mut dyn RandomSource,
) -> Engagement {
    if !config.ai_enabled {
        bot.status = BotStatus::Idle;
        return Engagement::idle(bot.id);
    }

    let Some((idx, distance)) = nearest_live_target(bot.position, targets) else {
        bot.status = BotStatus::Idle;
        return Engagement::idle(bot.id);
    };

    let target = &mut targets[idx];
    let status = classify_range(distance);
    bot.status = status;

    let mut engagement = Engagement {
        bot: bot.id,
        status,
        target: Some(target.id),
        distance: Some(distance),
        shot: None,
        tracer: None,
    };

    let kind = match status {
        BotStatus::Moving => {
            let heading = bot.position.heading_to(&target.position);
            let step = BASE_MOVE_STEP * config.speed_multiplier();
            bot.position = bot.position.offset(heading.cos() * step, heading.sin() * step);
            return engagement;
        }
        BotStatus::Covering => ShotKind::CoverFire,
        BotStatus::Attacking => ShotKind::Attack,
        BotStatus::Idle => return engagement,
    };

    let hit = rng.chance(kind.chance());
    let mut shot = Shot {
        kind,
        target: target.id,
        hit,
        damage: 0.0,
        killed: false,
    };

    if hit {
        shot.damage = kind.damage(config.damage_multiplier.value());
        target.health -= shot.damage;
        if target.health <= 0.0 {
            shot.killed = true;
            bot.kills += 1;
            tracing::debug!(bot = %bot.id, target = %target.id, ?kind, "Target eliminated");
        }
        if kind == ShotKind::Attack {
            engagement.tracer = Some(Tracer {
                bot: bot.id,
                from: bot.position,
                to: target.position,
            });
        }
    }

    engagement.shot = Some(shot);
    engagement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{DamageMultiplier, SpeedTier};
    use crate::simulation::rng::ScriptedRandom;

    fn target_at(id: u64, x: f32, y: f32) -> Target {
        Target::new(TargetId(id), Vec2::new(x, y))
    }

    fn bot_at(x: f32, y: f32) -> Bot {
        Bot::new(BotId(1), Vec2::new(x, y))
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify_range(200.01), BotStatus::Moving);
        assert_eq!(classify_range(200.0), BotStatus::Covering);
        assert_eq!(classify_range(150.01), BotStatus::Covering);
        assert_eq!(classify_range(150.0), BotStatus::Attacking);
        assert_eq!(classify_range(0.0), BotStatus::Attacking);
    }

    #[test]
    fn test_nearest_tie_goes_to_first() {
        let targets = vec![target_at(1, 10.0, 0.0), target_at(2, -10.0, 0.0)];
        let (idx, d) = nearest_live_target(Vec2::default(), &targets).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(d, 10.0);
    }

    #[test]
    fn test_nearest_skips_dead() {
        let mut targets = vec![target_at(1, 5.0, 0.0), target_at(2, 50.0, 0.0)];
        targets[0].health = 0.0;
        let (idx, _) = nearest_live_target(Vec2::default(), &targets).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_no_targets_idles() {
        let mut bot = bot_at(0.0, 0.0);
        bot.status = BotStatus::Attacking;
        let mut rng = ScriptedRandom::constant(0.0);
        let result = resolve_bot(&mut bot, &mut [], &ModConfig::default(), &mut rng);
        assert_eq!(result.status, BotStatus::Idle);
        assert_eq!(bot.status, BotStatus::Idle);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_ai_disabled_idles_without_moving() {
        let mut bot = bot_at(0.0, 0.0);
        let mut targets = vec![target_at(1, 500.0, 0.0)];
        let config = ModConfig {
            ai_enabled: false,
            ..ModConfig::default()
        };
        let mut rng = ScriptedRandom::constant(0.0);
        let result = resolve_bot(&mut bot, &mut targets, &config, &mut rng);
        assert_eq!(result.status, BotStatus::Idle);
        assert_eq!(bot.position, Vec2::new(0.0, 0.0));
        assert_eq!(targets[0].health, 100.0);
    }

    #[test]
    fn test_moving_steps_toward_target() {
        let mut bot = bot_at(0.0, 0.0);
        let mut targets = vec![target_at(1, 500.0, 0.0)];
        let config = ModConfig {
            movement_speed: SpeedTier::VeryFast,
            ..ModConfig::default()
        };
        let mut rng = ScriptedRandom::constant(0.0);
        let result = resolve_bot(&mut bot, &mut targets, &config, &mut rng);
        assert_eq!(result.status, BotStatus::Moving);
        assert!((bot.position.x - 5.0).abs() < 1e-5);
        assert!(bot.position.y.abs() < 1e-5);
        assert!(result.shot.is_none());
    }

    #[test]
    fn test_cover_fire_hit_deals_ten_times_multiplier() {
        let mut bot = bot_at(0.0, 0.0);
        let mut targets = vec![target_at(1, 180.0, 0.0)];
        let mut rng = ScriptedRandom::new([0.05]);
        let result = resolve_bot(&mut bot, &mut targets, &ModConfig::default(), &mut rng);
        assert_eq!(result.status, BotStatus::Covering);
        assert_eq!(result.shot.unwrap().damage, 10.0);
        assert_eq!(targets[0].health, 90.0);
        assert!(result.tracer.is_none());
    }

    #[test]
    fn test_cover_fire_miss_leaves_health() {
        let mut bot = bot_at(0.0, 0.0);
        let mut targets = vec![target_at(1, 180.0, 0.0)];
        let mut rng = ScriptedRandom::new([0.10]);
        let result = resolve_bot(&mut bot, &mut targets, &ModConfig::default(), &mut rng);
        let shot = result.shot.unwrap();
        assert!(!shot.hit);
        assert_eq!(shot.damage, 0.0);
        assert_eq!(targets[0].health, 100.0);
    }

    #[test]
    fn test_attack_hit_scales_and_emits_tracer() {
        let mut bot = bot_at(0.0, 0.0);
        let mut targets = vec![target_at(1, 100.0, 0.0)];
        let config = ModConfig {
            damage_multiplier: DamageMultiplier::new(2.5).unwrap(),
            ..ModConfig::default()
        };
        let mut rng = ScriptedRandom::new([0.14]);
        let result = resolve_bot(&mut bot, &mut targets, &config, &mut rng);
        assert_eq!(result.status, BotStatus::Attacking);
        assert_eq!(result.shot.unwrap().damage, 37.5);
        assert_eq!(targets[0].health, 62.5);
        let tracer = result.tracer.unwrap();
        assert_eq!(tracer.from, Vec2::new(0.0, 0.0));
        assert_eq!(tracer.to, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_attack_miss_has_no_tracer() {
        let mut bot = bot_at(0.0, 0.0);
        let mut targets = vec![target_at(1, 100.0, 0.0)];
        let mut rng = ScriptedRandom::new([0.5]);
        let result = resolve_bot(&mut bot, &mut targets, &ModConfig::default(), &mut rng);
        assert_eq!(result.status, BotStatus::Attacking);
        assert!(result.tracer.is_none());
    }

    #[test]
    fn test_kill_credits_bot_and_leaves_negative_health() {
        let mut bot = bot_at(0.0, 0.0);
        let mut targets = vec![target_at(1, 100.0, 0.0)];
        targets[0].health = 10.0;
        let mut rng = ScriptedRandom::new([0.0]);
        let result = resolve_bot(&mut bot, &mut targets, &ModConfig::default(), &mut rng);
        assert!(result.killed());
        assert_eq!(bot.kills, 1);
        assert_eq!(targets[0].health, -5.0);
    }
}
