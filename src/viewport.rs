// Pan / zoom camera over the dice mosaic.
// The whole interactive state lives in `Viewport`; input arrives as `InputEvent`s
// and `Viewport::handle` is the only place that mutates it.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::draw::blit_rgba;
use crate::error::Error;
use crate::types::{FrameBuffer, Point};

/// Arrow keys move the mosaic by this many pixels per press.
pub const PAN_STEP: i32 = 10;
pub const ZOOM_IN_FACTOR: f64 = 1.05;
pub const ZOOM_OUT_FACTOR: f64 = 0.95;
/// Upper bound on either side of the resampled mosaic.
pub const MAX_SCALED_SIDE: u32 = 16_384;
/// The mosaic's top-left corner sits here when the pan offset is (0,0).
pub const MOSAIC_ORIGIN: Point = Point::new(100, 100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Left,
    Right,
    Up,
    Down,
    Export,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelDirection {
    ZoomIn,
    ZoomOut,
}

/// One discrete input, in window pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyPressed(KeyCode),
    PointerMoved { x: i32, y: i32 },
    PointerDown { x: i32, y: i32 },
    PointerUp { x: i32, y: i32 },
    Wheel(WheelDirection),
}

/// What the main loop should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Continue,
    Export,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragState {
    Idle,
    /// Pointer position and pan offset captured at button-down.
    Dragging { origin: Point, offset_at_press: Point },
}

pub struct Viewport {
    raw: RgbaImage,    // full-resolution mosaic, never modified
    scaled: RgbaImage, // what is on screen right now
    offset: Point,
    drag: DragState,
}

impl Viewport {
    /// Start at 100% zoom with no pan.
    pub fn new(raw: RgbaImage) -> Self {
        let scaled = raw.clone();
        Self { raw, scaled, offset: Point::default(), drag: DragState::Idle }
    }

    #[cfg(test)]
    pub fn offset(&self) -> Point {
        self.offset
    }

    #[cfg(test)]
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    #[cfg(test)]
    pub fn scaled(&self) -> &RgbaImage {
        &self.scaled
    }

    /// Displayed width relative to the raw mosaic (1.0 = not zoomed).
    pub fn scale(&self) -> f64 {
        self.scaled.width() as f64 / self.raw.width() as f64
    }

    /// Apply one input event.
    pub fn handle(&mut self, event: InputEvent) -> Command {
        match event {
            InputEvent::Quit | InputEvent::KeyPressed(KeyCode::Quit) => return Command::Quit,
            InputEvent::KeyPressed(KeyCode::Export) => return Command::Export,
            InputEvent::KeyPressed(KeyCode::Left) => self.offset.x -= PAN_STEP,
            InputEvent::KeyPressed(KeyCode::Right) => self.offset.x += PAN_STEP,
            InputEvent::KeyPressed(KeyCode::Up) => self.offset.y -= PAN_STEP,
            InputEvent::KeyPressed(KeyCode::Down) => self.offset.y += PAN_STEP,
            InputEvent::PointerDown { x, y } => {
                self.drag = DragState::Dragging {
                    origin: Point::new(x, y),
                    offset_at_press: self.offset,
                };
            }
            InputEvent::PointerUp { .. } => self.drag = DragState::Idle,
            InputEvent::PointerMoved { x, y } => {
                if let DragState::Dragging { origin, offset_at_press } = self.drag {
                    // The mosaic moves rigidly with the pointer.
                    self.offset = Point::new(x, y) - (origin - offset_at_press);
                }
            }
            InputEvent::Wheel(WheelDirection::ZoomIn) => self.zoom(ZOOM_IN_FACTOR),
            InputEvent::Wheel(WheelDirection::ZoomOut) => self.zoom(ZOOM_OUT_FACTOR),
        }
        Command::Continue
    }

    /// Resample the raw mosaic to `factor` times the currently displayed size.
    /// Sizes compound: in-then-out lands at floor(floor(w*1.05)*0.95), not w.
    /// A step that would push either side past `MAX_SCALED_SIDE` or down to 0 is ignored,
    /// so both sides always move together.
    fn zoom(&mut self, factor: f64) {
        let (cur_w, cur_h) = self.scaled.dimensions();
        let Some((w, h)) = zoom_target(cur_w, cur_h, factor) else {
            log::debug!("zoom x{factor}: {cur_w}x{cur_h} is at the limit, ignored");
            return;
        };
        if (w, h) == (cur_w, cur_h) {
            return;
        }
        self.scaled = imageops::resize(&self.raw, w, h, FilterType::Triangle);
        log::debug!("zoom x{factor}: mosaic now {w}x{h} (k = {:.3})", self.scale());
    }

    /// Write the displayed mosaic; the format follows the file extension.
    pub fn export(&self, path: &Path) -> Result<(), Error> {
        self.scaled
            .save(path)
            .map_err(|source| Error::Export { path: path.to_path_buf(), source })?;
        log::info!(
            "exported {}x{} mosaic to {}",
            self.scaled.width(),
            self.scaled.height(),
            path.display()
        );
        Ok(())
    }

    /// Blit the displayed mosaic at its panned position.
    pub fn render(&self, screen: &mut FrameBuffer) {
        blit_rgba(screen, &self.scaled, MOSAIC_ORIGIN + self.offset);
    }
}

/// Next displayed size, or `None` when it leaves `1..=MAX_SCALED_SIDE` on either side.
fn zoom_target(w: u32, h: u32, factor: f64) -> Option<(u32, u32)> {
    let side = |s: u32| {
        let next = (s as f64 * factor) as u64;
        (1..=MAX_SCALED_SIDE as u64).contains(&next).then_some(next as u32)
    };
    Some((side(w)?, side(h)?))
}
