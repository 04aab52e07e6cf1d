//! Error type for grid access and map file parsing

use thiserror::Error;

/// Errors raised by grid access and map parsing
#[derive(Debug, Error)]
pub enum MapError {
    /// A coordinate outside the grid was passed to an operation that requires
    /// callers to clamp first
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    BoundaryViolation {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    #[error("line {line}, column {column}: unknown terrain code '{code}'")]
    UnknownTerrainCode {
        line: usize,
        column: usize,
        code: char,
    },
    #[error("line {line}, column {column}: '{found}' is not a hex partial-bits digit")]
    InvalidPartialBits {
        line: usize,
        column: usize,
        found: char,
    },
    #[error("missing '{0}' section")]
    MissingSection(&'static str),
    #[error("line {line}: invalid map dimensions '{text}'")]
    InvalidDimensions { line: usize, text: String },
    #[error("line {line}: expected {expected} cells, found {found}")]
    RowLength {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("'{section}' section has {found} rows, expected {expected}")]
    RowCount {
        section: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("failed to read or write map file: {0}")]
    Io(#[from] std::io::Error),
}
