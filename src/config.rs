// Command-line settings. Every flag defaults to the value the tool always used,
// so running with no arguments reproduces the classic setup.

use std::path::PathBuf;

use clap::Parser;

use crate::dice::{DEFAULT_TILE_SIZE, MAX_TILE_SIZE};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Turn a grayscale picture into a mosaic of dice")]
pub struct Config {
    /// Grayscale source picture (one die per pixel; keep it under ~100x100)
    #[arg(short, long, default_value = "./1.bmp")]
    pub source: PathBuf,

    /// Directory holding the six dice faces 0.png .. 5.png (one pip .. six pips)
    #[arg(short, long, default_value = "./dice")]
    pub tiles: PathBuf,

    /// Where the S key writes the displayed mosaic (format from extension)
    #[arg(short, long, default_value = "./target.png")]
    pub output: PathBuf,

    /// Edge of one die on the board, in pixels
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, value_parser = clap::value_parser!(u32).range(1..=MAX_TILE_SIZE as i64))]
    pub tile_size: u32,

    /// Window width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: usize,

    /// Window height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: usize,

    /// Window title
    #[arg(long, default_value = "Dice Mosaic Simulator")]
    pub title: String,

    /// Frames per second of the render loop
    #[arg(long, default_value_t = 30)]
    pub fps: usize,
}
