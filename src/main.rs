// What you SEE:
// • Your grayscale picture rebuilt from dice: dark pixels = one pip, bright = six.
// • Drag with the left mouse button (or use the arrow keys) to move the board.
// • Mouse wheel zooms in / out.
// • S saves the board as currently zoomed to ./target.png. ESC quits.
// • Top-left: the source picture, the six faces, and how many dice / how big / how long.

mod config;
mod dice;
mod draw;
mod error;
mod hud;
mod types;
mod viewport;

use std::process::ExitCode;

use clap::Parser;
use config::Config;
use dice::{build_mosaic, load_source, TileSet};
use draw::Drawer;
use error::Error;
use hud::{DiceStats, Hud, DEFAULT_REAL_TILE_SIZE, DEFAULT_SECONDS_PER_TILE};
use types::{rgb, FrameBuffer};
use viewport::{Command, Viewport};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = Config::parse();
    exit_code(run(&cfg))
}

/// Report a fatal error once, through the logger, and turn it into the process status.
fn exit_code(outcome: Result<(), Error>) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cfg: &Config) -> Result<(), Error> {
    /* --- Startup ---
       Anything missing or unreadable stops us here, before a window appears. */
    let source = load_source(&cfg.source)?;
    let tiles = TileSet::load(&cfg.tiles, cfg.tile_size)?;

    let raw = build_mosaic(&source, &tiles)?;
    log::info!(
        "{}: {}x{} pixels -> {}x{} board",
        cfg.source.display(),
        source.width(),
        source.height(),
        raw.width(),
        raw.height()
    );

    let stats = DiceStats::new(
        source.width(),
        source.height(),
        DEFAULT_REAL_TILE_SIZE,
        DEFAULT_SECONDS_PER_TILE,
    );
    let hud = Hud::new(&source, &tiles, stats);
    let mut viewport = Viewport::new(raw);

    /* --- Window + reusable screen buffer ---
       Visual: the window opens; `screen` is what you see each frame. */
    let mut drawer = Drawer::new(&cfg.title, cfg.width, cfg.height, cfg.fps)?;
    let mut screen = FrameBuffer::new(cfg.width, cfg.height);
    let background = rgb(150, 150, 150);

    /* ------------------------------ Main loop ------------------------------ */
    'frames: while drawer.is_open() {
        /* 1) Inputs: pan / zoom / export / quit */
        for event in drawer.poll_events() {
            match viewport.handle(event) {
                Command::Continue => {}
                Command::Export => {
                    // A failed save is reported; the viewer keeps going.
                    if let Err(e) = viewport.export(&cfg.output) {
                        log::error!("{e}");
                    }
                }
                Command::Quit => break 'frames,
            }
        }

        /* 2) Redraw: background, board at its panned position, HUD on top */
        screen.clear(background);
        viewport.render(&mut screen);
        hud.render(&mut screen);

        /* 3) Present (blocks until the next tick) */
        drawer.present(&screen)?;
    }

    Ok(())
}
