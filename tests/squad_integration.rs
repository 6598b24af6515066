//! Squad simulation integration tests
//!
//! Drive the controller through virtual time and check the observable
//! behaviour: cadences, combat outcomes, respawns and mod option changes.

use std::time::Duration;

use smart_teammates::core::config::{DamageMultiplier, ModConfig, RuntimeConfig, SpeedTier};
use smart_teammates::core::types::Vec2;
use smart_teammates::render::{paint, DrawCommand, DrawSurface, RecordingSurface, Scene};
use smart_teammates::simulation::activity::FixedTime;
use smart_teammates::simulation::constants::{
    BOT_START_POSITIONS, MAX_LOG_ENTRIES, TARGET_BATCH_SIZE, TARGET_SPAWN_X, TARGET_SPAWN_Y,
};
use smart_teammates::simulation::{
    BotStatus, Controller, ManualClock, ScriptedRandom, SeededRandom, Simulation, TimerKind,
};

fn fixed_controller(config: ModConfig, seed: u64) -> Controller<SeededRandom> {
    Controller::new(
        config,
        SeededRandom::new(seed),
        Box::new(FixedTime("00:00:00".to_string())),
    )
}

#[test]
fn test_initial_layout() {
    let controller = fixed_controller(ModConfig::default(), 1);
    let frame = controller.frame();
    assert_eq!(frame.tick, 0);
    assert_eq!(frame.bots.len(), 3);
    for (bot, start) in frame.bots.iter().zip(BOT_START_POSITIONS) {
        assert_eq!(bot.position, start);
        assert_eq!(bot.status, BotStatus::Idle);
        assert_eq!(bot.health, 100);
        assert_eq!(bot.kills, 0);
    }
    assert_eq!(frame.targets.len(), TARGET_BATCH_SIZE);
    for target in &frame.targets {
        assert_eq!(target.health, 100.0);
        assert!(target.position.x >= TARGET_SPAWN_X.0 && target.position.x < TARGET_SPAWN_X.1);
        assert!(target.position.y >= TARGET_SPAWN_Y.0 && target.position.y < TARGET_SPAWN_Y.1);
    }
}

#[test]
fn test_bots_close_in_on_targets() {
    let mut controller = fixed_controller(ModConfig::default(), 2);
    controller.start();
    let before: Vec<Vec2> = controller.frame().bots.iter().map(|b| b.position).collect();
    controller.advance(Duration::from_millis(1000));
    let frame = controller.frame();
    for (bot, start) in frame.bots.iter().zip(before) {
        assert!(bot.position.x > start.x, "{} did not advance", bot.id);
    }
}

#[test]
fn test_speed_tier_scales_step() {
    let mut distances = Vec::new();
    for tier in SpeedTier::ALL {
        let config = ModConfig {
            movement_speed: tier,
            ..ModConfig::default()
        };
        let mut controller = fixed_controller(config, 3);
        controller.start();
        let start = controller.frame().bots[0].position;
        let frame = controller.step_once().clone();
        distances.push(start.distance(&frame.bots[0].position));
    }
    assert!((distances[0] - 2.0).abs() < 1e-4);
    assert!((distances[1] - 3.0).abs() < 1e-4);
    assert!((distances[2] - 5.0).abs() < 1e-4);
}

#[test]
fn test_squad_eventually_clears_and_respawns() {
    let config = ModConfig {
        damage_multiplier: DamageMultiplier::MAX,
        movement_speed: SpeedTier::VeryFast,
        ai_enabled: true,
    };
    let mut controller = fixed_controller(config, 11);
    controller.start();

    let mut respawned = false;
    for _ in 0..6000 {
        let summary = controller.advance(Duration::from_millis(50));
        if summary.respawns > 0 {
            respawned = true;
            break;
        }
    }
    assert!(respawned, "the squad never cleared a batch");
    let frame = controller.frame();
    assert_eq!(frame.live_targets, TARGET_BATCH_SIZE);
    assert!(frame.stats.total_kills >= TARGET_BATCH_SIZE as u64);
    assert!(!controller.respawn_scheduled());
}

#[test]
fn test_respawn_waits_for_delay() {
    let mut controller = Controller::new(
        ModConfig::default(),
        ScriptedRandom::constant(0.0),
        Box::new(FixedTime("t".into())),
    );
    // Constant zero draws put every target on the same spawn corner and make
    // every roll hit, so the squad just needs to walk over.
    controller.start();
    let mut cleared_at = None;
    for step in 0..4000u32 {
        controller.advance(Duration::from_millis(50));
        if controller.frame().live_targets == 0 {
            cleared_at = Some(step);
            break;
        }
    }
    assert!(cleared_at.is_some());
    assert!(controller.respawn_scheduled());
    assert_eq!(controller.scheduler().pending_of(TimerKind::Respawn), 1);

    // 950 ms later: still empty, every bot idle
    let summary = controller.advance(Duration::from_millis(950));
    assert_eq!(summary.respawns, 0);
    assert_eq!(controller.frame().live_targets, 0);
    assert!(controller
        .frame()
        .bots
        .iter()
        .all(|b| b.status == BotStatus::Idle));

    let summary = controller.advance(Duration::from_millis(50));
    assert_eq!(summary.respawns, 1);
    assert_eq!(controller.frame().live_targets, TARGET_BATCH_SIZE);
}

#[test]
fn test_restart_reschedules_cancelled_respawn() {
    let mut controller = Controller::new(
        ModConfig::default(),
        ScriptedRandom::constant(0.0),
        Box::new(FixedTime("t".into())),
    );
    controller.start();
    for _ in 0..4000 {
        controller.advance(Duration::from_millis(50));
        if controller.frame().live_targets == 0 {
            break;
        }
    }
    assert_eq!(controller.frame().live_targets, 0);
    assert!(controller.respawn_scheduled());

    controller.shutdown();
    assert!(!controller.respawn_scheduled());
    controller.start();
    assert!(controller.respawn_scheduled());

    let summary = controller.advance(Duration::from_millis(1000));
    assert_eq!(summary.respawns, 1);
    assert_eq!(controller.frame().live_targets, TARGET_BATCH_SIZE);
    assert!(!controller.simulation().respawn_pending());
}

#[test]
fn test_disabling_ai_freezes_bots() {
    let mut controller = fixed_controller(ModConfig::default(), 4);
    controller.start();
    controller.advance(Duration::from_millis(4100));
    assert_eq!(controller.activity().len(), 2);

    controller.update_config(|s| s.set_ai_enabled(false));
    assert!(controller.activity().is_empty());

    let before: Vec<Vec2> = controller.frame().bots.iter().map(|b| b.position).collect();
    let summary = controller.advance(Duration::from_secs(5));
    assert_eq!(summary.ticks, 100);
    assert_eq!(summary.log_entries, 0);
    let frame = controller.frame();
    for (bot, position) in frame.bots.iter().zip(before) {
        assert_eq!(bot.status, BotStatus::Idle);
        assert_eq!(bot.position, position);
    }
    assert!(frame.tracers.is_empty());
}

#[test]
fn test_log_caps_after_long_run() {
    let mut controller = fixed_controller(ModConfig::default(), 5);
    controller.start();
    let summary = controller.advance(Duration::from_secs(60));
    assert_eq!(summary.log_entries, 30);
    assert_eq!(controller.activity().len(), MAX_LOG_ENTRIES);
    assert_eq!(controller.activity().generated(), 30);
}

#[test]
fn test_manual_clock_pump_matches_advance() {
    let mut pumped = fixed_controller(ModConfig::default(), 6);
    let mut advanced = fixed_controller(ModConfig::default(), 6);
    pumped.start();
    advanced.start();

    let mut clock = ManualClock::new();
    for _ in 0..40 {
        clock.advance(Duration::from_millis(50));
        pumped.pump(&mut clock);
    }
    advanced.advance(Duration::from_millis(2000));

    assert_eq!(pumped.frame(), advanced.frame());
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let mut controller = fixed_controller(ModConfig::default(), seed);
        controller.start();
        controller.advance(Duration::from_secs(20));
        controller.frame().clone()
    };
    assert_eq!(run(9), run(9));
}

#[test]
fn test_frame_renders_to_surface() {
    let mut rng = SeededRandom::new(12);
    let mut sim = Simulation::new(&mut rng);
    let frame = sim.step(&ModConfig::default(), &mut rng).frame;
    let scene = Scene::compose(&frame);

    let mut surface = RecordingSurface::default();
    assert!(paint(Some(&mut surface as &mut dyn DrawSurface), &scene));
    let circles = surface
        .commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Circle { .. }))
        .count();
    assert_eq!(circles, frame.targets.len() + frame.bots.len());
    assert!(!paint(None, &scene));
}

#[test]
fn test_sample_config_file_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/mod_config.toml");
    let config = RuntimeConfig::load(&path).unwrap();
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.mods.damage_multiplier.value(), 1.5);
    assert_eq!(config.mods.movement_speed, SpeedTier::Fast);
    assert!(config.mods.ai_enabled);
}
