use thiserror::Error;

/// Errors raised by the fireworks engine and its terminal host.
#[derive(Debug, Error)]
pub enum Error {
    /// A vector operand carried a value that cannot take part in arithmetic
    #[error("invalid operand: ({x}, {y}) is not a finite vector")]
    InvalidOperand { x: f64, y: f64 },

    /// Geometry that cannot produce a burst (zero length, all samples at the origin)
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// SVG path data that could not be parsed
    #[error("invalid path '{id}': {reason}")]
    InvalidPath { id: String, reason: String },

    #[error("unknown shape: {0}")]
    UnknownShape(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
