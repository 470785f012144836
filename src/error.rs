use thiserror::Error;

/// Malformed binary input handed to the tile or palette codecs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("tile data is {actual} bytes, expected at least 32")]
    InvalidSize { actual: usize },
    #[error("tile file is {len} bytes, which is not a multiple of 32")]
    SheetSize { len: usize },
    #[error("tile file contains no tiles")]
    EmptySheet,
    #[error("palette data is {actual} bytes, expected {expected}")]
    PaletteSize { expected: usize, actual: usize },
}
