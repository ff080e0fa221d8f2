use crate::bounds::{LatLonAltBox, LatLonBox};
use crate::math::Coordinate;

/// How a path is sampled between its nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct TessellationFlags {
    /// Insert intermediate points so the projected path follows the globe.
    pub tessellate: bool,
    /// Interpolated points get altitude 0 instead of a linear blend.
    pub follow_ground: bool,
    /// Segments whose endpoints share a latitude follow the latitude circle
    /// instead of the great circle.
    pub respect_latitude_circle: bool,
}

impl TessellationFlags {
    pub fn tessellated() -> Self {
        Self {
            tessellate: true,
            ..Self::default()
        }
    }
}

/// Ordered path of coordinates. A closed line string is a linear ring.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LineString {
    pub coords: Vec<Coordinate>,
    pub flags: TessellationFlags,
    pub closed: bool,
}

impl LineString {
    pub fn new(coords: Vec<Coordinate>) -> Self {
        Self {
            coords,
            flags: TessellationFlags::default(),
            closed: false,
        }
    }

    pub fn ring(coords: Vec<Coordinate>) -> Self {
        Self {
            closed: true,
            ..Self::new(coords)
        }
    }

    pub fn with_flags(mut self, flags: TessellationFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// True when any node carries a level-of-detail tag.
    pub fn has_detail_tags(&self) -> bool {
        self.coords.iter().any(|c| c.detail() > 0)
    }

    pub fn lat_lon_box(&self) -> Option<LatLonBox> {
        LatLonBox::from_line_string(&self.coords, self.closed)
    }

    pub fn lat_lon_alt_box(&self) -> Option<LatLonAltBox> {
        let bbox = self.lat_lon_box()?;
        let (min_alt, max_alt) = self
            .coords
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.alt()), hi.max(c.alt()))
            });
        Some(LatLonAltBox::new(bbox, min_alt, max_alt))
    }
}
