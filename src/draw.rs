// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the dice mosaic and the HUD.
// 2) Input polling turned into explicit `InputEvent`s for the viewport.
// 3) Clipped alpha blits of RGBA images onto the screen or the dice board.
// 4) A tiny 5x7 bitmap font (integer-scaled) for HUD text and mosaic labels.

use crate::error::Error;
use crate::types::{rgb, unpack, FrameBuffer, Point};
use crate::viewport::{InputEvent, KeyCode, WheelDirection};
use image::{Rgba, RgbaImage};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,            // the on-screen window you see
    last_mouse: Option<Point>, // last pointer position we reported
    left_was_down: bool,       // left button state at the previous poll
}

impl Drawer {
    /// Create the window and cap its refresh rate.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self, Error> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions { resize: false, ..WindowOptions::default() },
        )
        .map_err(|e| Error::WindowInit(e.to_string()))?;

        // `update_with_buffer` sleeps until the next tick; this is our frame limiter.
        window.set_target_fps(fps);

        Ok(Self { window, last_mouse: None, left_was_down: false })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Translate the window state gathered by the last `present` into events.
    /// Button edges are reported before motion so a press records the pre-move position.
    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if !self.window.is_open() {
            events.push(InputEvent::Quit);
            return events;
        }

        for key in self.window.get_keys_pressed(KeyRepeat::Yes) {
            if let Some(code) = key_code(key) {
                events.push(InputEvent::KeyPressed(code));
            }
        }

        let pointer = self
            .window
            .get_mouse_pos(MouseMode::Pass)
            .map(|(x, y)| Point::new(x as i32, y as i32));

        let left_down = self.window.get_mouse_down(MouseButton::Left);
        if left_down != self.left_was_down {
            let at = self.last_mouse.or(pointer).unwrap_or_default();
            events.push(if left_down {
                InputEvent::PointerDown { x: at.x, y: at.y }
            } else {
                InputEvent::PointerUp { x: at.x, y: at.y }
            });
            self.left_was_down = left_down;
        }

        if let Some(p) = pointer {
            if self.last_mouse != Some(p) {
                events.push(InputEvent::PointerMoved { x: p.x, y: p.y });
                self.last_mouse = Some(p);
            }
        }

        if let Some((_, dy)) = self.window.get_scroll_wheel() {
            if dy > 0.0 {
                events.push(InputEvent::Wheel(WheelDirection::ZoomIn));
            } else if dy < 0.0 {
                events.push(InputEvent::Wheel(WheelDirection::ZoomOut));
            }
        }

        events
    }
}

/// Keys the viewer reacts to. Everything else is ignored.
pub fn key_code(key: Key) -> Option<KeyCode> {
    match key {
        Key::Left => Some(KeyCode::Left),
        Key::Right => Some(KeyCode::Right),
        Key::Up => Some(KeyCode::Up),
        Key::Down => Some(KeyCode::Down),
        Key::S => Some(KeyCode::Export),
        Key::Escape => Some(KeyCode::Quit),
        _ => None,
    }
}

/* ---------- Canvas: anything we can plot 0x00RRGGBB pixels into ---------- */

/// A pixel target for the bitmap font: the screen buffer or the mosaic surface.
pub trait Canvas {
    fn extent(&self) -> (usize, usize);
    fn read_pixel(&self, x: usize, y: usize) -> u32;
    fn write_pixel(&mut self, x: usize, y: usize, color: u32);

    /// Put a pixel if (x,y) is inside bounds.
    /// Visual: the exact pixel at (x,y) changes color.
    #[inline]
    fn plot(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let (w, h) = self.extent();
        if x >= w || y >= h {
            return;
        }
        self.write_pixel(x, y, color);
    }
}

impl Canvas for FrameBuffer {
    fn extent(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn read_pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    fn write_pixel(&mut self, x: usize, y: usize, color: u32) {
        let idx = y * self.width + x;
        self.pixels[idx] = color;
    }
}

impl Canvas for RgbaImage {
    fn extent(&self) -> (usize, usize) {
        (self.width() as usize, self.height() as usize)
    }

    // The board is always opaque, so alpha is dropped on read and forced to 255 on write.
    #[inline]
    fn read_pixel(&self, x: usize, y: usize) -> u32 {
        let Rgba([r, g, b, _]) = *self.get_pixel(x as u32, y as u32);
        rgb(r, g, b)
    }

    #[inline]
    fn write_pixel(&mut self, x: usize, y: usize, color: u32) {
        let (r, g, b) = unpack(color);
        self.put_pixel(x as u32, y as u32, Rgba([r, g, b, 255]));
    }
}

/// Alpha-blend `img` onto `c` with its top-left corner at `at`.
/// Only the part that overlaps the canvas is touched.
pub fn blit_rgba<C: Canvas>(c: &mut C, img: &RgbaImage, at: Point) {
    let (cw, ch) = c.extent();
    let x0 = at.x.max(0);
    let y0 = at.y.max(0);
    let x1 = (at.x + img.width() as i32).min(cw as i32);
    let y1 = (at.y + img.height() as i32).min(ch as i32);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for y in y0..y1 {
        let sy = (y - at.y) as u32;
        for x in x0..x1 {
            let Rgba([r, g, b, a]) = *img.get_pixel((x - at.x) as u32, sy);
            let (dx, dy) = (x as usize, y as usize);
            let color = match a {
                255 => rgb(r, g, b),
                0 => continue,
                _ => {
                    let (dr, dg, db) = unpack(c.read_pixel(dx, dy));
                    rgb(mix(r, dr, a), mix(g, dg, a), mix(b, db, a))
                }
            };
            c.write_pixel(dx, dy, color);
        }
    }
}

#[inline]
fn mix(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((src as u32 * a + dst as u32 * (255 - a) + 127) / 255) as u8
}

/* ---------- 5x7 bitmap font (digits, A-Z, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Lowercase letters share the uppercase shapes.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '/' => g!(0b00001,0b00001,0b00010,0b00100,0b01000,0b10000,0b10000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),

        _ => None,
    }
}

/// Pixel width of `text` at `scale` (glyphs are 5 wide with 1 column of spacing).
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * 6 - 1) * scale }
}

pub fn text_height(scale: i32) -> i32 {
    7 * scale
}

/// Fill one scaled font cell.
fn plot_cell<C: Canvas>(c: &mut C, x: i32, y: i32, scale: i32, color: u32) {
    for dy in 0..scale {
        for dx in 0..scale {
            c.plot(x + dx, y + dy, color);
        }
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel `scale` screen pixels wide.
/// Visual: a glyph appears with a black drop shadow for contrast.
fn draw_char_5x7<C: Canvas>(c: &mut C, x: i32, y: i32, ch: char, scale: i32, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        // Shadow pass first, foreground pass on top
        for (offset, ink) in [(scale, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (*rowbits >> (4 - rx)) & 1 == 1 {
                        let px = x + rx * scale + offset;
                        let py = y + ry as i32 * scale + offset;
                        plot_cell(c, px, py, scale, ink);
                    }
                }
            }
        }
    }
}

/// Draw a text string with its top-left corner at (x,y).
pub fn draw_text<C: Canvas>(c: &mut C, mut x: i32, y: i32, text: &str, scale: i32, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(c, x, y, ch, scale, color);
        x += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
    }
}

/// Draw a text string centred on (cx,cy).
pub fn draw_text_centered<C: Canvas>(c: &mut C, cx: i32, cy: i32, text: &str, scale: i32, color: u32) {
    let x = cx - text_width(text, scale) / 2;
    let y = cy - text_height(scale) / 2;
    draw_text(c, x, y, text, scale, color);
}
