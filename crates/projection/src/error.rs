use crate::ProjectionKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Horizontal repetition requested on a projection that cannot repeat.
    InvalidConfiguration { projection: ProjectionKind },
    /// Zero-sized screen or a radius that is not a positive finite number.
    InvalidViewport { width: u32, height: u32, radius: f64 },
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionError::InvalidConfiguration { projection } => {
                write!(f, "{projection} projection does not support horizontal repetition")
            }
            ProjectionError::InvalidViewport {
                width,
                height,
                radius,
            } => write!(
                f,
                "invalid viewport: width={width} height={height} radius={radius}"
            ),
        }
    }
}

impl std::error::Error for ProjectionError {}
