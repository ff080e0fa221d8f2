use serde::{Deserialize, Serialize};

use crate::{EQUIRECTANGULAR, MERCATOR, Projection, SPHERICAL};

/// Selector for the projection a viewport renders with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    #[default]
    Spherical,
    Equirectangular,
    Mercator,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 3] = [
        ProjectionKind::Spherical,
        ProjectionKind::Equirectangular,
        ProjectionKind::Mercator,
    ];

    /// The stateless strategy implementing this projection.
    pub fn projection(self) -> &'static dyn Projection {
        match self {
            ProjectionKind::Spherical => &SPHERICAL,
            ProjectionKind::Equirectangular => &EQUIRECTANGULAR,
            ProjectionKind::Mercator => &MERCATOR,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProjectionKind::Spherical => "spherical",
            ProjectionKind::Equirectangular => "equirectangular",
            ProjectionKind::Mercator => "mercator",
        }
    }

    pub fn repeatable_x(self) -> bool {
        self.projection().repeatable_x()
    }
}

impl std::fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
