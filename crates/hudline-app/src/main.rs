//! Terminal front-end for the hudline status HUD.
//!
//! Renders a demo sidebar from embedded widget configuration against an
//! animated avatar snapshot. `HUDLINE_HEADLESS=1` renders a fixed number
//! of frames into a cell grid and exits without touching the terminal.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use hudline_core::{
    AvatarSnapshot, BodyPart, BodyPartStatus, CellGrid, Widget, WidgetColor, WidgetRegistry, markup,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use tracing::info;

const SIDEBAR_WIDTH: u16 = 32;
const UI_TICK_MILLIS: u64 = 100;
const DEFAULT_HEADLESS_FRAMES: u64 = 12;
const MAX_HEADLESS_FRAMES: u64 = 360;

const SIDEBAR_CONFIG: &str = r#"[
    {"id": "hp_torso", "style": "graph", "label": "Torso", "var": "bp_hp",
     "bodypart": "torso", "width": 10, "symbols": ".:|#",
     "colors": ["red", "light_red", "yellow", "light_green", "green"]},
    {"id": "hp_head", "style": "graph", "label": "Head", "var": "bp_hp",
     "bodypart": "head", "width": 10, "symbols": ".:|#",
     "colors": ["red", "light_red", "yellow", "light_green", "green"]},
    {"id": "stamina_bar", "style": "graph", "label": "Stamina", "var": "stamina",
     "var_max": 10000, "width": 12, "symbols": "-=#", "fill": "pool",
     "colors": ["red", "yellow", "light_green"]},
    {"id": "mana_bar", "style": "graph", "label": "Mana", "var": "mana",
     "width": 12, "symbols": "-=#",
     "colors": ["blue", "light_blue", "light_cyan"]},
    {"id": "focus_num", "style": "numeric", "label": "Focus", "var": "focus",
     "var_max": 200, "colors": ["dark_gray", "light_gray", "white"]},
    {"id": "speed_num", "style": "numeric", "label": "Speed", "var": "speed"},
    {"id": "pain_lvl", "style": "text", "label": "Pain", "var": "pain", "var_max": 80,
     "strings": ["none", "minor", "distracting", "severe"],
     "colors": ["light_gray", "yellow", "light_red", "red"]},
    {"id": "mood", "style": "text", "label": "Mood", "var": "morale",
     "var_min": -100, "var_max": 100,
     "strings": ["despairing", "grim", "neutral", "content", "elated"],
     "colors": ["red", "light_red", "light_gray", "light_green", "green"]},
    {"id": "weather", "style": "text", "label": "Weather", "var": "weather_text"},
    {"id": "clock", "style": "text", "label": "Time", "var": "time_text"},
    {"id": "compass_n", "style": "text", "label": "N", "var": "compass_text",
     "direction": "north"},
    {"id": "compass_e", "style": "text", "label": "E", "var": "compass_text",
     "direction": "east"},
    {"id": "compass_s", "style": "text", "label": "S", "var": "compass_text",
     "direction": "south"},
    {"id": "compass_w", "style": "text", "label": "W", "var": "compass_text",
     "direction": "west"},
    {"id": "vitals", "style": "layout", "arrange": "rows",
     "widgets": ["hp_torso", "hp_head", "stamina_bar", "mana_bar"]},
    {"id": "status_row", "style": "layout", "arrange": "columns",
     "widgets": ["focus_num", "speed_num"]},
    {"id": "compass_row", "style": "layout", "arrange": "columns",
     "widgets": ["compass_n", "compass_e", "compass_s", "compass_w"]},
    {"id": "sidebar", "style": "layout", "arrange": "rows", "height": 10,
     "widgets": ["vitals", "status_row", "pain_lvl", "mood", "weather",
                 "clock", "compass_row"]}
]"#;

fn main() -> Result<()> {
    init_tracing();
    let registry = load_registry()?;
    info!(widgets = registry.len(), "Starting hudline sidebar demo");

    if std::env::var_os("HUDLINE_HEADLESS").is_some() {
        return run_headless(&registry);
    }
    run_terminal(&registry)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_registry() -> Result<WidgetRegistry> {
    let mut registry = WidgetRegistry::new();
    registry
        .load_from_json(SIDEBAR_CONFIG)
        .context("failed to load sidebar widget config")?;
    registry
        .finalize()
        .context("failed to finalize sidebar widgets")?;
    Ok(registry)
}

/// Triangle wave over `0..=max` with the given tick period.
fn wave(tick: u64, period: u64, max: i32) -> i32 {
    let half = (period / 2).max(1) as i64;
    let phase = (tick % period.max(1)) as i64;
    let level = half - (phase - half).abs();
    (level * i64::from(max) / half) as i32
}

/// Deterministic demo snapshot for one animation tick.
fn demo_snapshot(tick: u64) -> AvatarSnapshot {
    let mut ava = AvatarSnapshot::default();
    ava.body.insert(
        BodyPart::Torso,
        BodyPartStatus {
            hp: wave(tick, 180, 84),
            hp_max: 84,
            ..BodyPartStatus::default()
        },
    );
    ava.body.insert(
        BodyPart::Head,
        BodyPartStatus {
            hp: wave(tick.wrapping_add(60), 140, 72),
            hp_max: 72,
            ..BodyPartStatus::default()
        },
    );
    ava.stamina = wave(tick, 90, 10000);
    ava.stamina_max = 10000;
    ava.mana = wave(tick.wrapping_add(20), 200, 25);
    ava.mana_max = 25;
    ava.focus = 60 + wave(tick, 70, 120);
    ava.speed = 100;
    ava.pain = wave(tick.wrapping_add(100), 220, 80);
    ava.morale = wave(tick, 160, 200) - 100;
    ava.weather_text = markup::colorize("light drizzle", WidgetColor::LightBlue);
    ava.time_text = format!("Day 14, {:02}:{:02}", (tick / 60) % 24, tick % 60);
    ava.compass[0] = markup::colorize("ZZ", WidgetColor::Red);
    ava.compass[2] = markup::colorize("d", WidgetColor::Brown);
    ava.compass[4] = "-".to_string();
    ava.compass[6] = markup::colorize("Z", WidgetColor::Red);
    ava
}

fn run_headless(registry: &WidgetRegistry) -> Result<()> {
    let frames = std::env::var("HUDLINE_HEADLESS_FRAMES")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(DEFAULT_HEADLESS_FRAMES)
        .min(MAX_HEADLESS_FRAMES);

    let sidebar = registry.get("sidebar").context("missing sidebar widget")?;
    let panel = sidebar.window_panel(SIDEBAR_WIDTH, 1);
    let mut rows_written = 0;
    for frame in 0..frames {
        let ava = demo_snapshot(frame * 5);
        let mut grid = CellGrid::new(panel.width(), panel.height());
        rows_written = panel.draw_into(&ava, registry, &mut grid, 0, 0);
    }
    info!(
        frames,
        rows = rows_written,
        width = SIDEBAR_WIDTH,
        "Headless sidebar run completed"
    );
    Ok(())
}

fn run_terminal(registry: &WidgetRegistry) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to build terminal backend")?;
    terminal.hide_cursor().ok();

    let result = run_event_loop(&mut terminal, registry);

    terminal.show_cursor().ok();
    if let Err(err) = disable_raw_mode() {
        tracing::error!(?err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
        tracing::error!(?err, "failed to leave alternate screen");
    }

    result
}

struct SidebarApp<'a> {
    registry: &'a WidgetRegistry,
    sidebar: &'a Widget,
    tick: u64,
    paused: bool,
    last_step: Instant,
    step_interval: Duration,
}

impl<'a> SidebarApp<'a> {
    fn new(registry: &'a WidgetRegistry, sidebar: &'a Widget) -> Self {
        Self {
            registry,
            sidebar,
            tick: 0,
            paused: false,
            last_step: Instant::now(),
            step_interval: Duration::from_millis(UI_TICK_MILLIS),
        }
    }

    fn maybe_step(&mut self, now: Instant) {
        if !self.paused && now.duration_since(self.last_step) >= self.step_interval {
            self.tick = self.tick.wrapping_add(1);
            self.last_step = now;
        }
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH + 2), Constraint::Min(0)])
            .split(frame.area());

        let ava = demo_snapshot(self.tick);
        let rendered = self.sidebar.layout(&ava, SIDEBAR_WIDTH, self.registry);

        let block = Block::default().title("Status").borders(Borders::ALL);
        frame.render_widget(Paragraph::new(styled_text(&rendered)).block(block), chunks[0]);

        let help = vec![
            Line::raw(""),
            Line::raw(" q      Quit"),
            Line::raw(" space  Toggle pause"),
            Line::raw(" s      Single step"),
            Line::raw(""),
            Line::raw(if self.paused { " paused" } else { " running" }),
        ];
        let block = Block::default().title("hudline demo").borders(Borders::ALL);
        frame.render_widget(Paragraph::new(help).block(block), chunks[1]);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _)
            | (KeyCode::Char('q'), _)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Char(' '), _) => self.paused = !self.paused,
            (KeyCode::Char('s'), _) => {
                self.tick = self.tick.wrapping_add(1);
                self.paused = true;
            }
            _ => {}
        }
        false
    }
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    registry: &WidgetRegistry,
) -> Result<()> {
    let sidebar = registry.get("sidebar").context("missing sidebar widget")?;
    let mut app = SidebarApp::new(registry, sidebar);
    loop {
        app.maybe_step(Instant::now());
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if event::poll(Duration::from_millis(UI_TICK_MILLIS)).context("failed to poll events")? {
            if let Event::Key(key) = event::read().context("failed to read event")? {
                if app.handle_key(key) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Convert a marked-up widget string into styled ratatui lines.
fn styled_text(rendered: &str) -> Text<'static> {
    let lines: Vec<Line<'static>> = rendered
        .split('\n')
        .map(|line| {
            let spans: Vec<Span<'static>> = markup::segments(line)
                .map(|(color, run)| match color {
                    Some(color) => {
                        Span::styled(run.to_string(), Style::default().fg(terminal_color(color)))
                    }
                    None => Span::raw(run.to_string()),
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    Text::from(lines)
}

fn terminal_color(color: WidgetColor) -> Color {
    match color {
        WidgetColor::White => Color::White,
        WidgetColor::LightGray => Color::Gray,
        WidgetColor::DarkGray => Color::DarkGray,
        WidgetColor::Red => Color::Red,
        WidgetColor::LightRed => Color::LightRed,
        WidgetColor::Green => Color::Green,
        WidgetColor::LightGreen => Color::LightGreen,
        // Classic curses brown is dim yellow.
        WidgetColor::Brown => Color::Yellow,
        WidgetColor::Yellow => Color::LightYellow,
        WidgetColor::Blue => Color::Blue,
        WidgetColor::LightBlue => Color::LightBlue,
        WidgetColor::Magenta => Color::Magenta,
        WidgetColor::Pink => Color::LightMagenta,
        WidgetColor::Cyan => Color::Cyan,
        WidgetColor::LightCyan => Color::LightCyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_loads_and_finalizes() {
        let registry = load_registry().expect("demo config is valid");
        assert!(registry.is_finalized());
        assert!(registry.get("sidebar").expect("sidebar").is_layout());
    }

    #[test]
    fn demo_sidebar_renders_ten_rows_at_width() {
        let registry = load_registry().expect("demo config is valid");
        let sidebar = registry.get("sidebar").expect("sidebar");
        let rendered = sidebar.layout(&demo_snapshot(42), SIDEBAR_WIDTH, &registry);
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(lines.len(), 10);
        for line in &lines {
            assert_eq!(markup::display_width(line), usize::from(SIDEBAR_WIDTH));
        }
    }

    #[test]
    fn wave_stays_in_range_and_peaks() {
        for tick in 0..400 {
            let level = wave(tick, 180, 84);
            assert!((0..=84).contains(&level));
        }
        assert_eq!(wave(0, 180, 84), 0);
        assert_eq!(wave(90, 180, 84), 84);
    }
}
