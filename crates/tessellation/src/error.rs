#[derive(Debug, Clone, PartialEq)]
pub enum TessellationError {
    /// Screen tolerance must be a positive finite number of pixels.
    InvalidPrecision { precision_px: f64 },
    /// At least one interpolated node per segment must be allowed.
    ZeroMaxNodes,
}

impl std::fmt::Display for TessellationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TessellationError::InvalidPrecision { precision_px } => {
                write!(f, "invalid tessellation precision: {precision_px} px")
            }
            TessellationError::ZeroMaxNodes => write!(f, "max_nodes must be at least 1"),
        }
    }
}

impl std::error::Error for TessellationError {}
