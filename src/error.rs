use thiserror::Error;

pub type Result<T> = std::result::Result<T, TileGridError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileGridError {
    /// The tileset image is unknown or not loaded (yet).
    /// Nothing is cached in this case, so a later `resolve` may succeed.
    #[error("tileset image '{tileset}' could not be resolved")]
    ResourceNotFound { tileset: String },

    #[error("cell ({row}, {col}) is outside of the {rows}x{cols} grid")]
    IndexOutOfRange {
        row: i32,
        col: i32,
        rows: usize,
        cols: usize,
    },

    #[error("tile size must be positive, got {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },
}
