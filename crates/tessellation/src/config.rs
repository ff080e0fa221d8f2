use serde::{Deserialize, Serialize};

use crate::TessellationError;

/// Screen distance (pixels) above which a segment gets intermediate nodes.
pub const DEFAULT_PRECISION_PX: f64 = 10.0;
/// Upper bound on nodes inserted between two input nodes.
pub const DEFAULT_MAX_NODES: usize = 200;

/// Output device class. Constrained displays trade accuracy for speed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayProfile {
    #[default]
    Default,
    Constrained,
}

impl DisplayProfile {
    fn precision_factor(self) -> f64 {
        match self {
            DisplayProfile::Default => 1.0,
            DisplayProfile::Constrained => 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    pub precision_px: f64,
    pub max_nodes: usize,
    pub profile: DisplayProfile,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            precision_px: DEFAULT_PRECISION_PX,
            max_nodes: DEFAULT_MAX_NODES,
            profile: DisplayProfile::Default,
        }
    }
}

impl TessellationConfig {
    pub fn new(precision_px: f64, max_nodes: usize) -> Result<Self, TessellationError> {
        let config = Self {
            precision_px,
            max_nodes,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_profile(mut self, profile: DisplayProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Checks values that may come from a deserialized scene.
    pub fn validate(&self) -> Result<(), TessellationError> {
        if !(self.precision_px.is_finite() && self.precision_px > 0.0) {
            return Err(TessellationError::InvalidPrecision {
                precision_px: self.precision_px,
            });
        }
        if self.max_nodes == 0 {
            return Err(TessellationError::ZeroMaxNodes);
        }
        Ok(())
    }

    /// Tolerance in pixels after applying the display profile.
    pub fn effective_precision(&self) -> f64 {
        self.precision_px * self.profile.precision_factor()
    }

    /// Number of nodes to insert on a segment `distance` pixels long.
    pub fn node_count(&self, distance: f64) -> usize {
        let precision = self.effective_precision();
        if distance <= precision {
            return 0;
        }
        ((distance / precision) as usize).min(self.max_nodes)
    }
}
