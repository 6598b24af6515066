//! 2D scene composition for the squad view
//!
//! Turns a simulation [`Frame`] into an ordered list of draw commands in
//! canvas coordinates (900x600, y grows downward). This module is READ-ONLY -
//! it never modifies simulation state.

pub mod colors;

use serde::Serialize;

use crate::core::types::Vec2;
use crate::simulation::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, GRID_SPACING};
use crate::simulation::tick::Frame;
use colors::Color;

pub const TARGET_RADIUS: f32 = 15.0;
pub const BOT_RADIUS: f32 = 12.0;
pub const HEALTH_BAR_WIDTH: f32 = 40.0;
pub const HEALTH_BAR_HEIGHT: f32 = 5.0;
/// Health bar top-left relative to the target centre
pub const HEALTH_BAR_OFFSET: (f32, f32) = (-20.0, -30.0);
/// Vertical offsets of the id and kill labels relative to the bot centre
pub const BOT_ID_LABEL_OFFSET: f32 = -20.0;
pub const BOT_KILLS_LABEL_OFFSET: f32 = 30.0;
pub const TRACER_WIDTH: f32 = 2.0;

/// A single primitive, in painter's order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// Flood the whole canvas
    Fill(Color),
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Color>,
    },
    Rect {
        origin: Vec2,
        width: f32,
        height: f32,
        color: Color,
    },
    /// Text centred on `at`
    Text {
        at: Vec2,
        text: String,
        color: Color,
    },
}

/// Ordered draw commands for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn compose(frame: &Frame) -> Self {
        let mut commands = Vec::new();
        commands.push(DrawCommand::Fill(colors::BACKGROUND));
        push_grid(&mut commands);

        for target in &frame.targets {
            commands.push(DrawCommand::Circle {
                center: target.position,
                radius: TARGET_RADIUS,
                fill: Some(colors::TARGET),
                stroke: None,
            });
            let origin = target
                .position
                .offset(HEALTH_BAR_OFFSET.0, HEALTH_BAR_OFFSET.1);
            commands.push(DrawCommand::Rect {
                origin,
                width: HEALTH_BAR_WIDTH,
                height: HEALTH_BAR_HEIGHT,
                color: colors::HEALTH_BAR_BACK,
            });
            commands.push(DrawCommand::Rect {
                origin,
                width: HEALTH_BAR_WIDTH * target.health_fraction(),
                height: HEALTH_BAR_HEIGHT,
                color: colors::HEALTH_BAR_FILL,
            });
        }

        for bot in &frame.bots {
            if let Some(tracer) = frame.tracers.iter().find(|t| t.bot == bot.id) {
                commands.push(DrawCommand::Line {
                    from: tracer.from,
                    to: tracer.to,
                    color: colors::TRACER,
                    width: TRACER_WIDTH,
                });
            }
            commands.push(DrawCommand::Circle {
                center: bot.position,
                radius: BOT_RADIUS,
                fill: Some(colors::status_color(bot.status)),
                stroke: Some(colors::BOT_OUTLINE),
            });
            commands.push(DrawCommand::Text {
                at: bot.position.offset(0.0, BOT_ID_LABEL_OFFSET),
                text: bot.id.to_string(),
                color: colors::LABEL,
            });
            commands.push(DrawCommand::Text {
                at: bot.position.offset(0.0, BOT_KILLS_LABEL_OFFSET),
                text: format!("K:{}", bot.kills),
                color: colors::LABEL,
            });
        }

        Self { commands }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }
}

fn push_grid(commands: &mut Vec<DrawCommand>) {
    let mut x = 0.0;
    while x <= CANVAS_WIDTH {
        commands.push(DrawCommand::Line {
            from: Vec2::new(x, 0.0),
            to: Vec2::new(x, CANVAS_HEIGHT),
            color: colors::GRID,
            width: 1.0,
        });
        x += GRID_SPACING;
    }
    let mut y = 0.0;
    while y <= CANVAS_HEIGHT {
        commands.push(DrawCommand::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(CANVAS_WIDTH, y),
            color: colors::GRID,
            width: 1.0,
        });
        y += GRID_SPACING;
    }
}

/// Anything that can rasterise draw commands
pub trait DrawSurface {
    fn draw(&mut self, command: &DrawCommand);
}

/// Collects commands instead of drawing them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl DrawSurface for RecordingSurface {
    fn draw(&mut self, command: &DrawCommand) {
        self.commands.push(command.clone());
    }
}

/// Replay a scene onto a surface. Returns false when there is none.
pub fn paint(surface: Option<&mut dyn DrawSurface>, scene: &Scene) -> bool {
    let Some(surface) = surface else {
        tracing::trace!(commands = scene.len(), "No drawing surface, skipping paint");
        return false;
    };
    for command in scene.iter() {
        surface.draw(command);
    }
    true
}
