// One error type for the whole tool.
// Every variant states *where* things went wrong (which file, which window call).
use std::path::PathBuf;

use image::ImageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The source bitmap is missing or cannot be decoded (fatal at startup).
    #[error("cannot load source image {}: {source}", path.display())]
    SourceImage { path: PathBuf, source: ImageError },

    /// One of the six dice faces is missing or cannot be decoded (fatal at startup).
    #[error("cannot load dice tile {}: {source}", path.display())]
    TileImage { path: PathBuf, source: ImageError },

    /// The board for this picture and die size does not fit in memory coordinates.
    #[error("board too large: {cols}x{rows} dice at {tile_size} px per die")]
    BoardTooLarge { cols: u32, rows: u32, tile_size: u32 },

    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// Writing the mosaic PNG failed. Not fatal: the viewer keeps running.
    #[error("cannot export mosaic to {}: {source}", path.display())]
    Export { path: PathBuf, source: ImageError },
}
