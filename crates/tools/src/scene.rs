use std::fs;
use std::path::Path;

use foundation::{Coordinate, LineString, TessellationFlags};
use projection::{ProjectionError, Viewport, ViewportDescriptor};
use serde::{Deserialize, Serialize};
use tessellation::{TessellationConfig, TessellationError};

/// On-disk scene: a viewport and the line strings to draw, angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub viewport: ViewportDescriptor,
    #[serde(default)]
    pub tessellation: TessellationConfig,
    #[serde(default)]
    pub lines: Vec<LineDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    /// `[lon, lat]` or `[lon, lat, alt]` per node.
    pub coords: Vec<Vec<f64>>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default = "default_true")]
    pub tessellate: bool,
    #[serde(default)]
    pub follow_ground: bool,
    #[serde(default)]
    pub respect_latitude_circle: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug)]
pub enum SceneError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Viewport(ProjectionError),
    Tessellation(TessellationError),
    BadCoordinate { line: usize, node: usize },
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "io: {e}"),
            SceneError::Json(e) => write!(f, "json: {e}"),
            SceneError::Viewport(e) => write!(f, "viewport: {e}"),
            SceneError::Tessellation(e) => write!(f, "tessellation: {e}"),
            SceneError::BadCoordinate { line, node } => write!(
                f,
                "line {line} node {node}: expected [lon, lat] or [lon, lat, alt] with finite values"
            ),
        }
    }
}

impl std::error::Error for SceneError {}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::Io(e)
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        SceneError::Json(e)
    }
}

impl From<ProjectionError> for SceneError {
    fn from(e: ProjectionError) -> Self {
        SceneError::Viewport(e)
    }
}

impl From<TessellationError> for SceneError {
    fn from(e: TessellationError) -> Self {
        SceneError::Tessellation(e)
    }
}

/// A validated scene, ready to project.
#[derive(Debug, Clone)]
pub struct Scene {
    pub viewport: Viewport,
    pub config: TessellationConfig,
    pub lines: Vec<NamedLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedLine {
    pub name: Option<String>,
    pub line: LineString,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let file: SceneFile = serde_json::from_str(text)?;
        Self::try_from(file)
    }
}

impl TryFrom<SceneFile> for Scene {
    type Error = SceneError;

    fn try_from(file: SceneFile) -> Result<Self, Self::Error> {
        let viewport = Viewport::try_from(&file.viewport)?;
        file.tessellation.validate()?;

        let lines = file
            .lines
            .into_iter()
            .enumerate()
            .map(|(i, d)| d.to_line(i))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(lines = lines.len(), projection = %viewport.kind(), "scene loaded");

        Ok(Self {
            viewport,
            config: file.tessellation,
            lines,
        })
    }
}

impl LineDescriptor {
    fn to_line(&self, index: usize) -> Result<NamedLine, SceneError> {
        let coords = self
            .coords
            .iter()
            .enumerate()
            .map(|(node, values)| match values.as_slice() {
                [lon, lat] if lon.is_finite() && lat.is_finite() => {
                    Ok(Coordinate::from_degrees(*lon, *lat))
                }
                [lon, lat, alt] if lon.is_finite() && lat.is_finite() && alt.is_finite() => {
                    Ok(Coordinate::from_degrees(*lon, *lat).with_altitude(*alt))
                }
                _ => Err(SceneError::BadCoordinate { line: index, node }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let flags = TessellationFlags {
            tessellate: self.tessellate,
            follow_ground: self.follow_ground,
            respect_latitude_circle: self.respect_latitude_circle,
        };
        let line = if self.closed {
            LineString::ring(coords)
        } else {
            LineString::new(coords)
        };
        Ok(NamedLine {
            name: self.name.clone(),
            line: line.with_flags(flags),
        })
    }
}
