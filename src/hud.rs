// On-screen overlay: source thumbnail, the six reference faces, and the
// "how many dice / how big / how long" readout.

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::dice::TileSet;
use crate::draw::{blit_rgba, draw_text};
use crate::types::{FrameBuffer, Point};

/// Edge length of one physical die, in metres.
pub const DEFAULT_REAL_TILE_SIZE: f64 = 0.01;
/// Time to place one die by hand, in seconds.
pub const DEFAULT_SECONDS_PER_TILE: f64 = 8.0;

const COUNT_COLOR: u32 = 0x0014_FF14;
const REAL_COLOR: u32 = 0x00FF_FF00;
const TEXT_SCALE: i32 = 2;
const TEXT_X: i32 = 30;
const TEXT_TOP: i32 = 150;
const LINE_STEP: i32 = 50;
const THUMBNAIL_AT: Point = Point::new(10, 10);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiceStats {
    pub cols: u32,
    pub rows: u32,
    pub real_tile_size: f64,
    pub seconds_per_tile: f64,
}

impl DiceStats {
    pub fn new(cols: u32, rows: u32, real_tile_size: f64, seconds_per_tile: f64) -> Self {
        Self { cols, rows, real_tile_size, seconds_per_tile }
    }

    pub fn total(&self) -> u64 {
        self.cols as u64 * self.rows as u64
    }

    pub fn real_width(&self) -> f64 {
        self.cols as f64 * self.real_tile_size
    }

    pub fn real_height(&self) -> f64 {
        self.rows as f64 * self.real_tile_size
    }

    pub fn area(&self) -> f64 {
        self.real_width() * self.real_height()
    }

    /// Estimated hands-on time to lay every die.
    pub fn minutes(&self) -> f64 {
        self.total() as f64 * self.seconds_per_tile / 60.0
    }

    /// HUD lines top to bottom, with their colors.
    pub fn lines(&self) -> Vec<(String, u32)> {
        vec![
            (format!("WIDTH: {} DICE", self.cols), COUNT_COLOR),
            (format!("HEIGHT: {} DICE", self.rows), COUNT_COLOR),
            (format!("TOTAL: {} DICE", self.total()), COUNT_COLOR),
            (format!("REAL WIDTH: {:.2} M", self.real_width()), REAL_COLOR),
            (format!("REAL HEIGHT: {:.2} M", self.real_height()), REAL_COLOR),
            (format!("AREA: {:.4} M2", self.area()), REAL_COLOR),
            (format!("EST. TIME: {:.1} MIN", self.minutes()), REAL_COLOR),
        ]
    }
}

pub struct Hud {
    thumbnail: RgbaImage,
    faces: Vec<RgbaImage>,
    tile_size: i32,
    lines: Vec<(String, u32)>,
}

impl Hud {
    pub fn new(source: &RgbImage, tiles: &TileSet, stats: DiceStats) -> Self {
        Self {
            thumbnail: DynamicImage::ImageRgb8(source.clone()).to_rgba8(),
            faces: tiles.faces().to_vec(),
            tile_size: tiles.tile_size() as i32,
            lines: stats.lines(),
        }
    }

    /// Draw on top of whatever is already on screen.
    pub fn render(&self, screen: &mut FrameBuffer) {
        blit_rgba(screen, &self.thumbnail, THUMBNAIL_AT);

        // Reference faces in a strip along the top, one tile in from the left.
        for (i, face) in self.faces.iter().enumerate() {
            let x = self.tile_size + self.tile_size * i as i32;
            blit_rgba(screen, face, Point::new(x, 0));
        }

        for (i, (text, color)) in self.lines.iter().enumerate() {
            let y = TEXT_TOP + LINE_STEP * i as i32;
            draw_text(screen, TEXT_X, y, text, TEXT_SCALE, *color);
        }
    }
}
