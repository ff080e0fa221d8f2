use foundation::{Coordinate, LatLonAltBox, LatLonBox, ScreenRect, Vec2};

use crate::{ProjectionKind, Silhouette, Viewport};

/// Result of projecting a single point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenPosition {
    pub x: f64,
    pub y: f64,
    /// The point lands on screen and nothing hides it.
    pub visible: bool,
    /// The globe itself hides the point (spherical only).
    pub occluded: bool,
}

impl ScreenPosition {
    pub fn point(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Every horizontal screen position at which a point has to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatedPosition {
    pub xs: Vec<f64>,
    pub y: f64,
    pub visible: bool,
    pub occluded: bool,
}

impl RepeatedPosition {
    pub fn repeat_count(&self) -> usize {
        self.xs.len()
    }
}

/// A map projection.
///
/// Implementations hold no state: everything view-dependent comes from the
/// [`Viewport`] argument, so one value serves every caller and thread.
pub trait Projection: Send + Sync {
    fn kind(&self) -> ProjectionKind;

    /// Northernmost latitude the projection can show (radians).
    fn max_lat(&self) -> f64;

    fn min_lat(&self) -> f64 {
        -self.max_lat()
    }

    /// Whether the map may be repeated horizontally.
    fn repeatable_x(&self) -> bool;

    /// Whether the projection has a far side hidden by the globe.
    fn occludes(&self) -> bool {
        false
    }

    fn forward(&self, coord: &Coordinate, viewport: &Viewport) -> ScreenPosition;

    /// All positions of `coord` on screen for a glyph of size `glyph`.
    ///
    /// Non-repeating projections always return exactly one position.
    fn forward_repeated(&self, coord: &Coordinate, viewport: &Viewport, glyph: Vec2)
    -> RepeatedPosition;

    /// Geographic coordinate under screen pixel (`x`, `y`), or `None` when the
    /// pixel lies outside the map.
    fn inverse(&self, x: f64, y: f64, viewport: &Viewport) -> Option<Coordinate>;

    /// Whether the map fills the whole screen.
    fn map_covers_viewport(&self, viewport: &Viewport) -> bool;

    /// Screen region covered by the map.
    fn silhouette(&self, viewport: &Viewport) -> Silhouette;

    /// Pixel width of one full 360° wrap, for projections that can repeat.
    fn repeat_period(&self, _viewport: &Viewport) -> Option<f64> {
        None
    }

    /// Analytic bounds of everything visible when the whole map fits on
    /// screen, where the projection can compute them directly.
    fn visible_hemisphere(&self, _viewport: &Viewport) -> Option<LatLonBox> {
        None
    }

    /// Geographic box visible inside `rect`.
    fn bounding_box(&self, rect: &ScreenRect, viewport: &Viewport) -> Option<LatLonAltBox> {
        crate::bounding_box::bounding_box(self, rect, viewport)
    }

    fn exceeds_latitude_range(&self, coord: &Coordinate) -> bool {
        coord.lat() > self.max_lat() || coord.lat() < self.min_lat()
    }
}
