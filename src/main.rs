//! Terminal match-3 runner (default binary).
//!
//! Uses crossterm for input and a framebuffer-based renderer. Logging goes to
//! a file (`--log`) because the terminal is in raw mode while playing.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tui_match3::core::{Engine, EngineConfigExt, SwapResult, TurnOutcome};
use tui_match3::input::{handle_key_event, should_quit, Cursor, CursorEvent};
use tui_match3::term::{BoardOverlay, FrameBuffer, GameView, RenderThrottle, TerminalRenderer, Viewport};
use tui_match3::types::{EngineConfig, Pos, TICK_MS};

/// Redraw interval while nothing is moving.
const STATIC_FRAME_MS: u64 = 250;

/// Match-3 puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(name = "tui-match3", version, about)]
struct Args {
    /// JSON engine configuration; omitted fields keep their defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Board width in columns.
    #[arg(long, value_name = "COLS")]
    width: Option<usize>,

    /// Board height in rows.
    #[arg(long, value_name = "ROWS")]
    height: Option<usize>,

    /// Number of tile colors in play.
    #[arg(long, value_name = "N")]
    colors: Option<usize>,

    /// RNG seed; the same seed deals the same game.
    #[arg(long)]
    seed: Option<u32>,

    /// Write logs to this file (filter with RUST_LOG, default `info`).
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log {
        init_logging(path)?;
    }
    let config = load_config(&args)?;
    let engine = Engine::new(config)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, engine);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_json_str(&text)?
        }
        None => EngineConfig::default(),
    };
    config.width = args.width.unwrap_or(config.width);
    config.height = args.height.unwrap_or(config.height);
    config.color_count = args.colors.unwrap_or(config.color_count);
    config.seed = args.seed.unwrap_or(config.seed);
    config.validate()?;
    Ok(config)
}

fn run(term: &mut TerminalRenderer, mut engine: Engine) -> Result<()> {
    info!(seed = engine.config().seed, "session started");

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut throttle = RenderThrottle::new(STATIC_FRAME_MS);
    let mut cursor = Cursor::new(engine.config().width, engine.config().height);
    let mut hint: Option<(Pos, Pos)> = None;
    let mut message: Option<String> = None;

    let started = Instant::now();
    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let snap = engine.snapshot();
        let now_ms = started.elapsed().as_millis() as u64;
        if throttle.should_render(now_ms, snap.board_hash as u64, !snap.is_settled()) {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            let overlay = BoardOverlay {
                cursor: Some(cursor.pos()),
                selected: cursor.selected(),
                hint,
                message: message.as_deref(),
            };
            view.render_into(&snap, &overlay, Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
        }

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        info!(score = engine.score(), turns = engine.turn(), "quit");
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        match cursor.apply(action) {
                            CursorEvent::Swap { from, to } => {
                                let outcome = engine.request_swap(from, to);
                                message = Some(describe(&outcome));
                                hint = None;
                            }
                            CursorEvent::HintRequested => {
                                hint = engine.hint();
                                if let Some((from, to)) = hint {
                                    cursor.show_move(from, to);
                                }
                            }
                            CursorEvent::NewGameRequested => {
                                let c = engine.config().clone();
                                engine.new_game(c.width, c.height, c.color_count)?;
                                cursor.resize(c.width, c.height);
                                hint = None;
                                message = None;
                            }
                            CursorEvent::Moved(_)
                            | CursorEvent::Selected(_)
                            | CursorEvent::Deselected
                            | CursorEvent::Ignored => {}
                        }
                    }
                    throttle.reset();
                }
                Event::Resize(_, _) => {
                    term.invalidate();
                    throttle.reset();
                }
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            engine.tick(TICK_MS);
        }
    }
}

fn describe(outcome: &TurnOutcome) -> String {
    match outcome.swap {
        SwapResult::Rejected(reason) => reason.to_string(),
        SwapResult::Applied if outcome.shuffled => format!("+{} SHUFFLED", outcome.score_delta),
        SwapResult::Applied if outcome.combo > 0 => {
            format!("+{} combo x{}", outcome.score_delta, outcome.combo + 1)
        }
        SwapResult::Applied => format!("+{}", outcome.score_delta),
    }
}
