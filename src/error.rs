use thiserror::Error;

/// Errors produced while building or querying a region analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("size mismatch: expected {expected} tiles, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("dimension mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },

    #[error("{count} labels do not fit in the label raster")]
    LabelOverflow { count: usize },

    #[error("label {label} is outside of 1..={num_labels}")]
    LabelOutOfRange { label: u32, num_labels: u32 },

    #[error("graph covers {graph_labels} labels but the raster has {raster_labels}")]
    GraphMismatch { graph_labels: u32, raster_labels: u32 },

    #[error("structuring element must be non-empty, got {width}x{height}")]
    InvalidStructuringElement { width: usize, height: usize },

    #[error("unexpected character {ch:?} in mask at line {line}, column {column}")]
    InvalidMaskChar { ch: char, line: usize, column: usize },
}
