//! ratatui front-end: squad canvas, AI panel, legend and mod options overlay

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend, TestBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color as TermColor, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Rectangle},
        Block, Borders, Clear, List, ListItem, Paragraph, Wrap,
    },
    Frame, Terminal,
};

use crate::core::config::{ConfigChange, SpeedTier};
use crate::core::error::Result;
use crate::render::colors::{self, Color};
use crate::render::{paint, DrawCommand, DrawSurface, Scene};
use crate::simulation::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, TICK_INTERVAL};
use crate::simulation::controller::Controller;
use crate::simulation::registry::BotStatus;
use crate::simulation::rng::RandomSource;
use crate::simulation::scheduler::{ManualClock, WallClock};
use crate::ui::report::HeadlessReport;
use crate::ui::state::{self, GameUI, AI_FEATURES, COMMANDS};

const DRAW_INTERVAL: Duration = Duration::from_millis(50);
const HEADLESS_SIZE: (u16, u16) = (140, 48);
/// Headless runs render one frame in this many ticks
const HEADLESS_DRAW_EVERY: u64 = 20;

fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.to_rgb8();
    TermColor::Rgb(r, g, b)
}

fn fg(color: Color) -> Style {
    Style::default().fg(term_color(color))
}

/// Replays draw commands onto a ratatui canvas, flipping y
pub struct CanvasSurface<'a, 'b> {
    ctx: &'a mut Context<'b>,
}

impl<'a, 'b> CanvasSurface<'a, 'b> {
    pub fn new(ctx: &'a mut Context<'b>) -> Self {
        Self { ctx }
    }

    fn flip(y: f32) -> f64 {
        (CANVAS_HEIGHT - y) as f64
    }
}

impl DrawSurface for CanvasSurface<'_, '_> {
    fn draw(&mut self, command: &DrawCommand) {
        match command {
            // The canvas widget paints its own background
            DrawCommand::Fill(_) => {}
            DrawCommand::Line {
                from, to, color, ..
            } => self.ctx.draw(&CanvasLine {
                x1: from.x as f64,
                y1: Self::flip(from.y),
                x2: to.x as f64,
                y2: Self::flip(to.y),
                color: term_color(*color),
            }),
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                if let Some(color) = stroke.or(*fill) {
                    self.ctx.draw(&Circle {
                        x: center.x as f64,
                        y: Self::flip(center.y),
                        radius: *radius as f64,
                        color: term_color(color),
                    });
                }
                if let (Some(fill), Some(_)) = (fill, stroke) {
                    self.ctx.draw(&Circle {
                        x: center.x as f64,
                        y: Self::flip(center.y),
                        radius: (*radius * 0.5) as f64,
                        color: term_color(*fill),
                    });
                }
            }
            DrawCommand::Rect {
                origin,
                width,
                height,
                color,
            } => {
                if *width <= 0.0 {
                    return;
                }
                self.ctx.draw(&Rectangle {
                    x: origin.x as f64,
                    y: Self::flip(origin.y + height),
                    width: *width as f64,
                    height: *height as f64,
                    color: term_color(*color),
                });
            }
            DrawCommand::Text { at, text, color } => {
                let x = at.x as f64 - text.chars().count() as f64 * 2.5;
                self.ctx.print(
                    x,
                    Self::flip(at.y),
                    Line::styled(text.clone(), fg(*color)),
                );
            }
        }
    }
}

/// Controller plus the overlay state, drawable on any backend
pub struct TerminalApp<R: RandomSource> {
    controller: Controller<R>,
    ui: GameUI,
}

impl<R: RandomSource> TerminalApp<R> {
    pub fn new(controller: Controller<R>) -> Self {
        Self {
            controller,
            ui: GameUI::new(),
        }
    }

    pub fn controller(&self) -> &Controller<R> {
        &self.controller
    }

    pub fn ui(&self) -> &GameUI {
        &self.ui
    }

    pub fn into_controller(self) -> Controller<R> {
        self.controller
    }

    /// Returns true when the app should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let change = match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('q'), _) | (KeyCode::Char('Q'), _) => return true,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Char('o'), _) => {
                self.ui.toggle_options();
                None
            }
            (KeyCode::Char('?'), _) => {
                self.ui.toggle_help();
                None
            }
            (KeyCode::Char(' '), _) => {
                self.controller.toggle_pause();
                self.ui.set_notice(if self.controller.is_paused() {
                    "Simulation paused"
                } else {
                    "Simulation resumed"
                });
                None
            }
            (KeyCode::Char(']'), _) => self.controller.update_config(|s| s.raise_damage()),
            (KeyCode::Char('['), _) => self.controller.update_config(|s| s.lower_damage()),
            (KeyCode::Char('1'), _) => self.set_speed(SpeedTier::Standard),
            (KeyCode::Char('2'), _) => self.set_speed(SpeedTier::Fast),
            (KeyCode::Char('3'), _) => self.set_speed(SpeedTier::VeryFast),
            (KeyCode::Char('s'), _) => self.controller.update_config(|s| s.cycle_speed()),
            (KeyCode::Char('a'), _) => self.controller.update_config(|s| s.toggle_ai()),
            _ => None,
        };
        if let Some(change) = change {
            self.ui.set_notice(describe_change(change));
        }
        false
    }

    fn set_speed(&mut self, tier: SpeedTier) -> Option<ConfigChange> {
        self.controller.update_config(|s| s.set_speed(tier))
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(frame.size());

        self.draw_header(frame, outer[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(outer[1]);

        self.draw_canvas(frame, body[0]);
        self.draw_ai_panel(frame, body[1]);
        self.draw_legend(frame, outer[2]);
        self.draw_footer(frame, outer[3]);

        if self.ui.show_options {
            self.draw_options(frame);
        }
        if self.ui.show_help {
            self.draw_help(frame);
        }
    }

    fn draw_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let snapshot = self.controller.frame();
        let accent = fg(colors::ACCENT).add_modifier(Modifier::BOLD);
        let mut status = vec![
            Span::styled("Total Kills: ", fg(colors::MUTED)),
            Span::styled(snapshot.stats.total_kills.to_string(), accent),
            Span::raw("   "),
            Span::styled("Active Bots: ", fg(colors::MUTED)),
            Span::styled(snapshot.bots.len().to_string(), accent),
            Span::raw("   "),
            Span::styled("Enemies: ", fg(colors::MUTED)),
            Span::styled(snapshot.live_targets.to_string(), accent),
            Span::raw("   "),
            Span::styled("Accuracy: ", fg(colors::MUTED)),
            Span::styled(format!("{:.1}%", snapshot.stats.accuracy()), accent),
        ];
        if self.controller.is_paused() {
            status.push(Span::styled("   PAUSED", fg(colors::AI_DISABLED)));
        }

        let lines = vec![
            Line::from(vec![
                Span::styled("SmartTeammates", accent),
                Span::styled("  Advanced AI Teammate Bot System", fg(colors::MUTED)),
            ]),
            Line::from(status),
        ];
        let block = Block::default()
            .title(" Live Bot Simulation ")
            .borders(Borders::ALL);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_canvas(&self, frame: &mut Frame<'_>, area: Rect) {
        let snapshot = self.controller.frame();
        let scene = Scene::compose(snapshot);
        let block = Block::default()
            .title(format!(" Tick {} ", snapshot.tick))
            .borders(Borders::ALL);
        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .background_color(term_color(colors::BACKGROUND))
            .x_bounds([0.0, CANVAS_WIDTH as f64])
            .y_bounds([0.0, CANVAS_HEIGHT as f64])
            .paint(|ctx| {
                let mut surface = CanvasSurface::new(ctx);
                let surface: &mut dyn DrawSurface = &mut surface;
                paint(Some(surface), &scene);
            });
        frame.render_widget(canvas, area);
    }

    fn draw_ai_panel(&self, frame: &mut Frame<'_>, area: Rect) {
        let config = self.controller.config();
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(AI_FEATURES.len() as u16 + 3),
                Constraint::Min(3),
                Constraint::Length(COMMANDS.len() as u16 + 2),
            ])
            .split(area);

        let (badge, badge_color) = state::ai_badge(config);
        let mark = state::feature_mark(config);
        let mark_color = if config.ai_enabled {
            colors::AI_ACTIVE
        } else {
            colors::AI_DISABLED
        };
        let mut features = vec![Line::from(Span::styled(
            format!("● {badge}"),
            fg(badge_color).add_modifier(Modifier::BOLD),
        ))];
        features.extend(AI_FEATURES.iter().map(|feature| {
            Line::from(vec![
                Span::styled(format!("{mark} "), fg(mark_color)),
                Span::raw(feature.name),
            ])
        }));
        frame.render_widget(
            Paragraph::new(features).block(
                Block::default()
                    .title(" AI Logic System ")
                    .borders(Borders::ALL),
            ),
            sections[0],
        );

        let activity = self.controller.activity();
        let items: Vec<ListItem> = if activity.is_empty() {
            vec![ListItem::new(Span::styled(
                state::log_placeholder(config),
                fg(colors::MUTED).add_modifier(Modifier::ITALIC),
            ))]
        } else {
            activity
                .iter()
                .map(|entry| {
                    ListItem::new(Line::from(vec![
                        Span::styled("▌", fg(colors::severity_color(entry.severity))),
                        Span::styled(format!("{} ", entry.timestamp), fg(colors::MUTED)),
                        Span::styled(format!("Bot {} ", entry.bot), fg(colors::ACCENT)),
                        Span::raw(entry.action),
                    ]))
                })
                .collect()
        };
        frame.render_widget(
            List::new(items).block(Block::default().title(" Activity Log ").borders(Borders::ALL)),
            sections[1],
        );

        let commands: Vec<Line> = COMMANDS
            .iter()
            .map(|(code, desc)| {
                Line::from(vec![
                    Span::styled(format!("{code:<8}"), fg(colors::ACCENT)),
                    Span::styled(*desc, fg(colors::MUTED)),
                ])
            })
            .collect();
        frame.render_widget(
            Paragraph::new(commands).block(
                Block::default()
                    .title(" Available Commands ")
                    .borders(Borders::ALL),
            ),
            sections[2],
        );
    }

    fn draw_legend(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut spans = Vec::new();
        for status in [
            BotStatus::Idle,
            BotStatus::Moving,
            BotStatus::Attacking,
            BotStatus::Covering,
        ] {
            spans.push(Span::styled("● ", fg(colors::status_color(status))));
            spans.push(Span::raw(format!("{}   ", status.label())));
        }
        spans.push(Span::styled("● ", fg(colors::TARGET)));
        spans.push(Span::raw("Enemy"));
        frame.render_widget(
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }

    fn draw_footer(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut text = self.controller.config().summary();
        if let Some(notice) = &self.ui.notice {
            text.push_str("  ·  ");
            text.push_str(notice);
        }
        text.push_str("  ·  o options  ? help  q quit");
        frame.render_widget(Paragraph::new(Span::styled(text, fg(colors::MUTED))), area);
    }

    fn draw_options(&self, frame: &mut Frame<'_>) {
        let config = self.controller.config();
        let area = centered(frame.size(), 60, 16);
        let title = fg(colors::ACCENT).add_modifier(Modifier::BOLD);
        let speed_buttons: Vec<Span> = SpeedTier::ALL
            .iter()
            .enumerate()
            .map(|(i, tier)| {
                let label = format!(" {} {} ", i + 1, tier.label());
                if *tier == config.movement_speed {
                    Span::styled(label, Style::default().fg(TermColor::Black).bg(term_color(colors::ACCENT)))
                } else {
                    Span::raw(label)
                }
            })
            .collect();
        let ai_state = if config.ai_enabled { "ON" } else { "OFF" };

        let lines = vec![
            Line::from(vec![
                Span::styled("Damage Multiplier  ", title),
                Span::raw(format!("{}  ", config.damage_multiplier)),
                Span::styled("[ / ]", fg(colors::MUTED)),
            ]),
            Line::from(Span::styled(
                "Controls the damage output of bot attacks. Higher values make bots more lethal.",
                fg(colors::MUTED),
            )),
            Line::raw(""),
            Line::from(vec![
                Span::styled("Movement Speed  ", title),
                Span::raw(config.movement_speed.label()),
            ]),
            Line::from(speed_buttons),
            Line::from(Span::styled(
                "Adjusts bot movement and navigation speed across the battlefield.",
                fg(colors::MUTED),
            )),
            Line::raw(""),
            Line::from(vec![
                Span::styled("AI Logic System  ", title),
                Span::styled(ai_state, fg(state::ai_badge(config).1)),
                Span::styled("  a", fg(colors::MUTED)),
            ]),
            Line::from(Span::styled(
                "Enable advanced AI for intelligent targeting, navigation, and tactical decision-making.",
                fg(colors::MUTED),
            )),
        ];

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(
                Block::default()
                    .title(" Mod Configuration ")
                    .borders(Borders::ALL)
                    .style(Style::default().bg(TermColor::Black)),
            ),
            area,
        );
    }

    fn draw_help(&self, frame: &mut Frame<'_>) {
        let area = centered(frame.size(), 40, 12);
        let lines = vec![
            Line::from(Span::styled(
                "Controls",
                fg(colors::ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::raw(" o      Mod options"),
            Line::raw(" [ / ]  Damage multiplier"),
            Line::raw(" 1 2 3  Speed tier (s cycles)"),
            Line::raw(" a      Toggle AI"),
            Line::raw(" space  Pause / resume"),
            Line::raw(" ?      Toggle this help"),
            Line::raw(" q      Quit"),
        ];
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .style(Style::default().bg(TermColor::Black).fg(TermColor::White)),
            ),
            area,
        );
    }
}

fn describe_change(change: ConfigChange) -> String {
    match change {
        ConfigChange::DamageMultiplier(value) => format!("Damage set to {value}"),
        ConfigChange::MovementSpeed(tier) => format!("Speed set to {}", tier.label()),
        ConfigChange::AiEnabled(true) => "AI enabled".to_string(),
        ConfigChange::AiEnabled(false) => "AI disabled".to_string(),
    }
}

fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect::new(
        outer.x + (outer.width - width) / 2,
        outer.y + (outer.height - height) / 2,
        width,
        height,
    )
}

/// Restores the terminal when dropped, including on early error returns
struct TerminalCleanup;

impl Drop for TerminalCleanup {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            tracing::error!(?err, "Failed to disable raw mode");
        }
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, LeaveAlternateScreen, Show) {
            tracing::error!(?err, "Failed to leave alternate screen");
        }
    }
}

/// Run the interactive front-end until the user quits
pub fn run_interactive<R: RandomSource>(controller: Controller<R>) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    let _cleanup = TerminalCleanup;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor().ok();

    let mut app = TerminalApp::new(controller);
    let result = run_event_loop(&mut terminal, &mut app);

    let mut controller = app.into_controller();
    controller.shutdown();
    result
}

fn run_event_loop<R: RandomSource>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut TerminalApp<R>,
) -> Result<()> {
    let mut clock = WallClock::new();
    app.controller.start();

    loop {
        app.controller.pump(&mut clock);
        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(DRAW_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Drive the controller for `ticks` tick intervals of virtual time,
/// rendering into an off-screen buffer along the way
pub fn run_headless<R: RandomSource>(
    controller: Controller<R>,
    ticks: u64,
    seed: Option<u64>,
) -> Result<HeadlessReport> {
    let backend = TestBackend::new(HEADLESS_SIZE.0, HEADLESS_SIZE.1);
    let mut terminal = Terminal::new(backend)?;
    let mut app = TerminalApp::new(controller);
    let mut clock = ManualClock::new();
    app.controller.start();

    for tick in 1..=ticks {
        clock.advance(TICK_INTERVAL);
        app.controller.pump(&mut clock);
        if tick % HEADLESS_DRAW_EVERY == 0 || tick == ticks {
            draw_to(&mut terminal, &app)?;
        }
    }

    let report = HeadlessReport::capture(&app.controller, seed);
    app.controller.shutdown();
    tracing::info!(
        ticks = report.ticks,
        kills = report.total_kills,
        respawns = report.respawns,
        "Headless run completed"
    );
    Ok(report)
}

fn draw_to<B: Backend, R: RandomSource>(
    terminal: &mut Terminal<B>,
    app: &TerminalApp<R>,
) -> Result<()> {
    terminal.draw(|frame| app.draw(frame))?;
    Ok(())
}
