/// Errors raised by grid access and by the response transform boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Coordinate outside `[0, width) x [0, height)`.
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// A response transform returned a grid whose shape differs from its input.
    DimensionMismatch {
        /// Input dimensions `(width, height)`.
        expected: (usize, usize),
        /// Dimensions actually produced by the transform.
        got: (usize, usize),
    },
    /// Backing buffer length does not equal `width * height`.
    BufferSize { expected: usize, got: usize },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange {
                x,
                y,
                width,
                height,
            } => write!(f, "pixel ({x}, {y}) is outside a {width}x{height} grid"),
            Self::DimensionMismatch { expected, got } => write!(
                f,
                "response transform produced a {}x{} grid for a {}x{} input",
                got.0, got.1, expected.0, expected.1
            ),
            Self::BufferSize { expected, got } => {
                write!(f, "grid buffer holds {got} cells, expected {expected}")
            }
        }
    }
}

impl std::error::Error for GridError {}
