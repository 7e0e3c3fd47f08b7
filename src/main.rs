//! Terminal block-puzzle runner (default binary).
//!
//! It uses crossterm for input and a custom framebuffer-based renderer.
//! Logs go to a file (`--log-file`) because the terminal belongs to the game.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tracing::{debug, info, trace};

use blockfall::core::{parse_pieces, EngineConfig, GameSnapshot, GameState};
use blockfall::input::{should_quit, InputHandler};
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockfall::types::{
    GameAction, GameEvent, BASE_DROP_MS, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH,
    DROP_FLOOR_MS, DROP_STEP_MS, PREVIEW_LEN, TICK_MS,
};

#[derive(Debug, Parser)]
#[command(name = "blockfall", version)]
#[command(about = "Falling-block puzzle game for the terminal")]
struct Cli {
    /// Board width in cells
    #[arg(long, default_value_t = DEFAULT_BOARD_WIDTH)]
    width: u16,

    /// Board height in cells
    #[arg(long, default_value_t = DEFAULT_BOARD_HEIGHT)]
    height: u16,

    /// RNG seed for the piece supply (random when omitted)
    #[arg(long)]
    seed: Option<u32>,

    /// Initial gravity interval in milliseconds
    #[arg(long, default_value_t = BASE_DROP_MS)]
    drop_ms: u32,

    /// Gravity speed-up per cleared row in milliseconds
    #[arg(long, default_value_t = DROP_STEP_MS)]
    drop_step_ms: u32,

    /// Fastest gravity interval in milliseconds
    #[arg(long, default_value_t = DROP_FLOOR_MS)]
    min_drop_ms: u32,

    /// Number of upcoming pieces shown
    #[arg(long, default_value_t = PREVIEW_LEN)]
    preview: usize,

    /// Piece set as letters, e.g. "IOT" (default: all seven)
    #[arg(long)]
    pieces: Option<String>,

    /// Write logs to this file (RUST_LOG filters, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Hide the ghost piece
    #[arg(long, default_value_t = false)]
    no_ghost: bool,
}

impl Cli {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = EngineConfig {
            width: self.width,
            height: self.height,
            initial_drop_ms: self.drop_ms,
            drop_step_ms: self.drop_step_ms,
            min_drop_ms: self.min_drop_ms,
            preview_len: self.preview,
            seed: self.seed.unwrap_or_else(rand::random),
            ..EngineConfig::default()
        };
        if let Some(pieces) = &self.pieces {
            config.pieces = parse_pieces(pieces).context("invalid --pieces")?;
        }
        Ok(config)
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Restore terminal state - called on panic
fn restore_terminal() {
    use crossterm::{
        cursor, execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };
    let _ = disable_raw_mode();
    let _ = execute!(std::io::stdout(), cursor::Show, LeaveAlternateScreen);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    // Configuration errors are reported before the terminal is taken over.
    let config = cli.engine_config()?;
    let mut game = GameState::new(config).context("invalid game configuration")?;
    info!(
        width = game.board().width(),
        height = game.board().height(),
        seed = game.seed(),
        "session started"
    );

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let view = GameView::default().with_ghost(!cli.no_ghost);
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &view, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();
    info!(score = game.score(), lines = game.lines(), "session ended");
    result
}

fn run(term: &mut TerminalRenderer, view: &GameView, game: &mut GameState) -> Result<()> {
    let mut input = InputHandler::new();
    let mut snapshot = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        game.snapshot_into(&mut snapshot);
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snapshot, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = input.handle_key(key) {
                        apply(game, action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);

            for action in input.update(elapsed_ms) {
                apply(game, action);
            }
            game.tick(elapsed_ms);
        }

        for event in game.drain_events() {
            match event {
                GameEvent::Restarted | GameEvent::GameOver => input.reset(),
                _ => {}
            }
            debug!(?event, "game event");
        }
    }
}

fn apply(game: &mut GameState, action: GameAction) {
    let changed = game.apply_action(action);
    trace!(action = action.as_str(), changed, "input");
}
