// Mosaic builder: one dice face per source pixel.
// Visual expectation: dark pixels become 1-pip faces, bright pixels 6-pip faces,
// laid out on a dark gray board with row/column numbers in the margins.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, Rgba, RgbaImage};

use crate::draw::{blit_rgba, draw_text_centered};
use crate::error::Error;
use crate::types::Point;

/// Number of faces on a die; also the number of intensity buckets.
pub const FACES: usize = 6;
pub const DEFAULT_TILE_SIZE: u32 = 100;
/// Largest die edge the CLI accepts, in pixels.
pub const MAX_TILE_SIZE: u32 = 1024;
pub const BOARD_COLOR: Rgba<u8> = Rgba([30, 30, 30, 255]);
pub const LABEL_COLOR: u32 = 0x00FF_FFFF;

/// Map a blue-channel value to a face index: floor(blue / (256/6)), in [0, 5].
#[inline]
pub fn bucket(blue: u8) -> usize {
    (blue as usize * FACES / 256).min(FACES - 1)
}

/// The channel the bucket is computed from (low byte of 0xRRGGBB).
#[inline]
pub fn blue_channel(pixel: &Rgb<u8>) -> u8 {
    pixel[2]
}

/// Geometry of the board: a one-tile margin on the top and left, then one tile per pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MosaicLayout {
    pub tile_size: u32,
}

impl MosaicLayout {
    pub fn new(tile_size: u32) -> Self {
        Self { tile_size }
    }

    /// (T*W + T) x (T*H + T), or `None` when a side does not fit in an i32.
    pub fn surface_size(&self, cols: u32, rows: u32) -> Option<(u32, u32)> {
        let side = |n: u32| {
            n.checked_add(1)
                .and_then(|n| n.checked_mul(self.tile_size))
                .filter(|&s| s <= i32::MAX as u32)
        };
        Some((side(cols)?, side(rows)?))
    }

    /// Top-left corner of the tile for source pixel (x,y).
    /// Only valid inside a board whose `surface_size` is `Some`.
    pub fn tile_origin(&self, x: u32, y: u32) -> (u32, u32) {
        (self.tile_size + self.tile_size * x, self.tile_size + self.tile_size * y)
    }

    /// Centre of the label for 1-based column `i`, inside the top margin.
    pub fn column_label_center(&self, i: u32) -> (i32, i32) {
        let t = self.tile_size as i32;
        (t * i as i32 + t / 2, t / 2)
    }

    /// Centre of the label for 1-based row `i`, inside the left margin.
    pub fn row_label_center(&self, i: u32) -> (i32, i32) {
        let t = self.tile_size as i32;
        (t / 2, t * i as i32 + t / 2)
    }

    /// Font scale that keeps labels readable at this tile size (3 at 100 px).
    pub fn label_scale(&self) -> i32 {
        (self.tile_size as i32 / 33).max(1)
    }
}

/// The six dice faces, index 0 = one pip.
pub struct TileSet {
    faces: Vec<RgbaImage>,
    tile_size: u32,
}

impl TileSet {
    /// Load `<dir>/0.png` .. `<dir>/5.png`.
    /// Faces of the wrong size are resampled to `tile_size` square.
    pub fn load(dir: &Path, tile_size: u32) -> Result<Self, Error> {
        let mut faces = Vec::with_capacity(FACES);
        for i in 0..FACES {
            let path = dir.join(format!("{i}.png"));
            let face = image::open(&path)
                .map_err(|source| Error::TileImage { path: path.clone(), source })?
                .to_rgba8();
            faces.push(fit_face(face, tile_size, &path));
        }
        Ok(Self { faces, tile_size })
    }

    #[cfg(test)]
    /// Build from already-decoded faces (same resampling rule as `load`).
    pub fn from_faces(faces: [RgbaImage; FACES], tile_size: u32) -> Self {
        let faces = faces
            .into_iter()
            .enumerate()
            .map(|(i, f)| fit_face(f, tile_size, Path::new(&format!("face {i}"))))
            .collect();
        Self { faces, tile_size }
    }

    pub fn face(&self, index: usize) -> &RgbaImage {
        &self.faces[index]
    }

    pub fn faces(&self) -> &[RgbaImage] {
        &self.faces
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn layout(&self) -> MosaicLayout {
        MosaicLayout::new(self.tile_size)
    }
}

fn fit_face(face: RgbaImage, tile_size: u32, origin: &Path) -> RgbaImage {
    if face.dimensions() == (tile_size, tile_size) {
        return face;
    }
    log::warn!(
        "{} is {}x{}, resampling to {tile_size}x{tile_size}",
        origin.display(),
        face.width(),
        face.height()
    );
    imageops::resize(&face, tile_size, tile_size, FilterType::Triangle)
}

/// Decode the picture to turn into dice.
pub fn load_source(path: &Path) -> Result<RgbImage, Error> {
    let img = image::open(path)
        .map_err(|source| Error::SourceImage { path: path.to_path_buf(), source })?;
    Ok(img.to_rgb8())
}

/// Compose the full-resolution board. Deterministic: same inputs, same pixels.
/// Fails only when the board geometry overflows.
pub fn build_mosaic(source: &RgbImage, tiles: &TileSet) -> Result<RgbaImage, Error> {
    let layout = tiles.layout();
    let (cols, rows) = source.dimensions();
    let (w, h) = layout.surface_size(cols, rows).ok_or(Error::BoardTooLarge {
        cols,
        rows,
        tile_size: layout.tile_size,
    })?;
    let mut board = RgbaImage::from_pixel(w, h, BOARD_COLOR);

    for (x, y, pixel) in source.enumerate_pixels() {
        let face = tiles.face(bucket(blue_channel(pixel)));
        let (tx, ty) = layout.tile_origin(x, y);
        blit_rgba(&mut board, face, Point::new(tx as i32, ty as i32));
    }

    let scale = layout.label_scale();
    for i in 1..=source.width() {
        let (cx, cy) = layout.column_label_center(i);
        draw_text_centered(&mut board, cx, cy, &i.to_string(), scale, LABEL_COLOR);
    }
    for i in 1..=source.height() {
        let (cx, cy) = layout.row_label_center(i);
        draw_text_centered(&mut board, cx, cy, &i.to_string(), scale, LABEL_COLOR);
    }

    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Each face is a flat, distinct color so we can tell which one was placed.
    fn face_color(i: usize) -> Rgba<u8> {
        Rgba([40 * i as u8 + 10, 200 - 30 * i as u8, 7 * i as u8, 255])
    }

    fn flat_tiles(tile_size: u32) -> TileSet {
        TileSet::from_faces(
            std::array::from_fn(|i| RgbaImage::from_pixel(tile_size, tile_size, face_color(i))),
            tile_size,
        )
    }

    fn gray(w: u32, h: u32, v: u8) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([v, v, v]))
    }

    fn block_is(board: &RgbaImage, x0: u32, y0: u32, size: u32, color: Rgba<u8>) -> bool {
        (y0..y0 + size).all(|y| (x0..x0 + size).all(|x| *board.get_pixel(x, y) == color))
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dice-mosaic-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(bucket(0), 0);
        assert_eq!(bucket(42), 0);
        assert_eq!(bucket(43), 1);
        assert_eq!(bucket(85), 1);
        assert_eq!(bucket(86), 2);
        assert_eq!(bucket(128), 3);
        assert_eq!(bucket(255), 5);
    }

    #[test]
    fn bucket_matches_floor_division_for_every_value() {
        for b in 0..=255u8 {
            let expected = (b as f64 / (256.0 / 6.0)).floor() as usize;
            assert_eq!(bucket(b), expected, "blue = {b}");
            assert!(bucket(b) < FACES);
        }
    }

    #[test]
    fn only_blue_is_sampled() {
        assert_eq!(bucket(blue_channel(&Rgb([255, 255, 0]))), 0);
        assert_eq!(bucket(blue_channel(&Rgb([0, 0, 255]))), 5);
    }

    #[test]
    fn layout_geometry() {
        let layout = MosaicLayout::new(100);
        assert_eq!(layout.surface_size(7, 3), Some((800, 400)));
        assert_eq!(layout.tile_origin(0, 0), (100, 100));
        assert_eq!(layout.tile_origin(2, 1), (300, 200));
        assert_eq!(layout.column_label_center(1), (150, 50));
        assert_eq!(layout.row_label_center(3), (50, 350));
        assert_eq!(layout.label_scale(), 3);
        assert_eq!(MosaicLayout::new(20).label_scale(), 1);
    }

    #[test]
    fn mosaic_dimensions() {
        let board = build_mosaic(&gray(5, 3, 128), &flat_tiles(100)).unwrap();
        assert_eq!(board.dimensions(), (600, 400));
    }

    #[test]
    fn two_by_two_black_uses_face_zero_everywhere() {
        let board = build_mosaic(&gray(2, 2, 0), &flat_tiles(100)).unwrap();
        assert_eq!(board.dimensions(), (300, 300));
        for (x, y) in [(100, 100), (200, 100), (100, 200), (200, 200)] {
            assert!(block_is(&board, x, y, 100, face_color(0)), "block at ({x},{y})");
        }
        // Corner of the margin keeps the board color.
        assert_eq!(*board.get_pixel(0, 0), BOARD_COLOR);
    }

    #[test]
    fn single_white_pixel_uses_face_five() {
        let board = build_mosaic(&gray(1, 1, 255), &flat_tiles(100)).unwrap();
        assert_eq!(board.dimensions(), (200, 200));
        assert!(block_is(&board, 100, 100, 100, face_color(5)));
    }

    #[test]
    fn faces_follow_intensity() {
        let mut src = RgbImage::new(6, 1);
        for i in 0..6u32 {
            let v = (i * 51) as u8; // 0, 51, 102, 153, 204, 255
            src.put_pixel(i, 0, Rgb([v, v, v]));
        }
        let board = build_mosaic(&src, &flat_tiles(10)).unwrap();
        for i in 0..6u32 {
            let expected = bucket((i * 51) as u8);
            assert_eq!(*board.get_pixel(10 + 10 * i + 5, 15), face_color(expected));
        }
    }

    #[test]
    fn build_is_deterministic() {
        let src = RgbImage::from_fn(4, 3, |x, y| {
            let v = (x * 60 + y * 20) as u8;
            Rgb([v, v, v])
        });
        let tiles = flat_tiles(100);
        assert_eq!(build_mosaic(&src, &tiles).unwrap(), build_mosaic(&src, &tiles).unwrap());
    }

    #[test]
    fn labels_are_drawn_in_the_margins() {
        let board = build_mosaic(&gray(2, 2, 0), &flat_tiles(100)).unwrap();
        let white = Rgba([255, 255, 255, 255]);
        let top = (100..300).any(|x| (0..100).any(|y| *board.get_pixel(x, y) == white));
        let left = (100..300).any(|y| (0..100).any(|x| *board.get_pixel(x, y) == white));
        assert!(top && left);
        // Tiles themselves stay untouched.
        assert!(block_is(&board, 100, 100, 200, face_color(0)));
    }

    #[test]
    fn translucent_faces_are_composited_over_the_board() {
        let mut faces: [RgbaImage; FACES] = std::array::from_fn(|_| RgbaImage::new(10, 10));
        faces[0] = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 0]));
        let board = build_mosaic(&gray(1, 1, 0), &TileSet::from_faces(faces, 10)).unwrap();
        assert_eq!(*board.get_pixel(15, 15), BOARD_COLOR);
    }

    #[test]
    fn oversized_faces_are_resampled() {
        let tiles = TileSet::from_faces(
            std::array::from_fn(|i| RgbaImage::from_pixel(64, 64, face_color(i))),
            100,
        );
        assert!(tiles.faces().iter().all(|f| f.dimensions() == (100, 100)));
        assert_eq!(*tiles.face(2).get_pixel(50, 50), face_color(2));
    }

    #[test]
    fn load_reads_six_faces_from_disk() {
        let dir = temp_dir("tiles-ok");
        for i in 0..FACES {
            RgbaImage::from_pixel(100, 100, face_color(i)).save(dir.join(format!("{i}.png"))).unwrap();
        }
        let tiles = TileSet::load(&dir, 100).unwrap();
        assert_eq!(tiles.faces().len(), FACES);
        assert_eq!(*tiles.face(4).get_pixel(0, 0), face_color(4));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_face_names_its_path() {
        let dir = temp_dir("tiles-missing");
        for i in 0..3 {
            RgbaImage::from_pixel(100, 100, face_color(i)).save(dir.join(format!("{i}.png"))).unwrap();
        }
        match TileSet::load(&dir, 100) {
            Err(Error::TileImage { path, .. }) => assert_eq!(path, dir.join("3.png")),
            other => panic!("expected tile error, got {:?}", other.err()),
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn corrupt_source_names_its_path() {
        let dir = temp_dir("source-corrupt");
        let path = dir.join("1.bmp");
        std::fs::write(&path, b"not a bitmap").unwrap();
        match load_source(&path) {
            Err(Error::SourceImage { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected source error, got {:?}", other.err()),
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn oversized_geometry_is_refused() {
        let layout = MosaicLayout::new(3_000_000_000);
        assert_eq!(layout.surface_size(1, 1), None);
        assert_eq!(MosaicLayout::new(100).surface_size(u32::MAX, 1), None);
        // Largest accepted tile with a modest picture still fits.
        assert_eq!(MosaicLayout::new(MAX_TILE_SIZE).surface_size(99, 9), Some((102_400, 10_240)));

        let tiles = TileSet { faces: Vec::new(), tile_size: 3_000_000_000 };
        match build_mosaic(&gray(1, 1, 0), &tiles) {
            Err(Error::BoardTooLarge { cols, rows, tile_size }) => {
                assert_eq!((cols, rows, tile_size), (1, 1, 3_000_000_000));
            }
            other => panic!("expected geometry error, got {:?}", other.map(|b| b.dimensions())),
        }
    }

    #[test]
    fn exported_two_by_two_black_board_has_face_zero_blocks() {
        let dir = temp_dir("export-2x2");
        let path = dir.join("target.png");

        let board = build_mosaic(&gray(2, 2, 0), &flat_tiles(DEFAULT_TILE_SIZE)).unwrap();
        crate::viewport::Viewport::new(board).export(&path).unwrap();

        let saved = image::open(&path).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (300, 300));
        for (x, y) in [(100, 100), (200, 100), (100, 200), (200, 200)] {
            assert!(block_is(&saved, x, y, 100, face_color(0)), "block at ({x},{y})");
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bmp_source_round_trips_through_the_builder() {
        let dir = temp_dir("source-bmp");
        let path = dir.join("1.bmp");
        gray(1, 1, 255).save(&path).unwrap();
        let src = load_source(&path).unwrap();
        let board = build_mosaic(&src, &flat_tiles(100)).unwrap();
        assert!(block_is(&board, 100, 100, 100, face_color(5)));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
