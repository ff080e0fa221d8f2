use std::f64::consts::{FRAC_PI_2, PI, TAU};

use foundation::{Coordinate, ScreenRect, Vec2, wrap_lon};

use crate::{Projection, ProjectionKind, RepeatedPosition, ScreenPosition, Silhouette, Viewport};

/// Vertical scale function of a cylindrical projection.
pub trait LatitudeScale: Send + Sync + 'static {
    const KIND: ProjectionKind;
    /// Northernmost latitude the scale is defined for (radians).
    const MAX_LAT: f64;

    /// Map a latitude to the projection's vertical axis (radians at the
    /// equator's scale).
    fn project(lat: f64) -> f64;

    fn unproject(y: f64) -> f64;
}

/// Plate carrée: latitude maps linearly.
#[derive(Debug, Copy, Clone, Default)]
pub struct Linear;

impl LatitudeScale for Linear {
    const KIND: ProjectionKind = ProjectionKind::Equirectangular;
    const MAX_LAT: f64 = FRAC_PI_2;

    fn project(lat: f64) -> f64 {
        lat
    }

    fn unproject(y: f64) -> f64 {
        y
    }
}

/// Conformal Mercator scale, cut off where the map becomes square.
#[derive(Debug, Copy, Clone, Default)]
pub struct MercatorScale;

impl LatitudeScale for MercatorScale {
    const KIND: ProjectionKind = ProjectionKind::Mercator;
    const MAX_LAT: f64 = 85.051_13 * (PI / 180.0);

    fn project(lat: f64) -> f64 {
        lat.tan().asinh()
    }

    fn unproject(y: f64) -> f64 {
        y.sinh().atan()
    }
}

/// Cylindrical projection family: longitude maps linearly to `x`, latitude
/// through `S` to `y`. Supports horizontal repetition.
#[derive(Debug, Copy, Clone, Default)]
pub struct Cylindrical<S: LatitudeScale>(pub S);

pub type Equirectangular = Cylindrical<Linear>;
pub type Mercator = Cylindrical<MercatorScale>;

pub const EQUIRECTANGULAR: Equirectangular = Cylindrical(Linear);
pub const MERCATOR: Mercator = Cylindrical(MercatorScale);

impl<S: LatitudeScale> Cylindrical<S> {
    /// Projected `y` of the view center on the scale's axis.
    fn center_y(viewport: &Viewport) -> f64 {
        S::project(viewport.center_lat().clamp(-S::MAX_LAT, S::MAX_LAT))
    }

    /// Unclamped screen position of (`lon`, `lat`).
    fn screen_xy(lon: f64, lat: f64, viewport: &Viewport) -> (f64, f64) {
        let k = viewport.pixels_per_radian();
        let half = viewport.screen_center();
        let x = half.x + k * (lon - viewport.center_lon());
        let y = half.y - k * (S::project(lat) - Self::center_y(viewport));
        (x, y)
    }

    /// Screen `y` of the top and bottom map edges.
    fn map_y_range(viewport: &Viewport) -> (f64, f64) {
        let (_, top) = Self::screen_xy(0.0, S::MAX_LAT, viewport);
        let (_, bottom) = Self::screen_xy(0.0, -S::MAX_LAT, viewport);
        (top, bottom)
    }

    /// Screen `x` of the west and east map edges of the base copy.
    fn map_x_range(viewport: &Viewport) -> (f64, f64) {
        let (west, _) = Self::screen_xy(-PI, 0.0, viewport);
        let (east, _) = Self::screen_xy(PI, 0.0, viewport);
        (west, east)
    }

    fn period(viewport: &Viewport) -> f64 {
        TAU * viewport.pixels_per_radian()
    }
}

fn on_screen_x(x: f64, width: f64) -> bool {
    (0.0..width).contains(&x)
}

impl<S: LatitudeScale> Projection for Cylindrical<S> {
    fn kind(&self) -> ProjectionKind {
        S::KIND
    }

    fn max_lat(&self) -> f64 {
        S::MAX_LAT
    }

    fn repeatable_x(&self) -> bool {
        true
    }

    fn forward(&self, coord: &Coordinate, viewport: &Viewport) -> ScreenPosition {
        let lat = coord.lat().clamp(-S::MAX_LAT, S::MAX_LAT);
        let in_range = lat == coord.lat();
        let (x, y) = Self::screen_xy(coord.lon(), lat, viewport);

        let size = viewport.size();
        let x_visible = if viewport.repeat_x() {
            let period = Self::period(viewport);
            on_screen_x(x, size.x)
                || on_screen_x(x - period, size.x)
                || on_screen_x(x + period, size.x)
        } else {
            on_screen_x(x, size.x)
        };
        let visible = in_range && (0.0..size.y).contains(&y) && x_visible;

        ScreenPosition {
            x,
            y,
            visible,
            occluded: false,
        }
    }

    fn forward_repeated(
        &self,
        coord: &Coordinate,
        viewport: &Viewport,
        glyph: Vec2,
    ) -> RepeatedPosition {
        let pos = self.forward(coord, viewport);
        let size = viewport.size();
        let half_w = 0.5 * glyph.x;
        let half_h = 0.5 * glyph.y;
        let y_visible = pos.y + half_h >= 0.0 && pos.y - half_h < size.y;

        if !viewport.repeat_x() {
            let x_visible = pos.x + half_w >= 0.0 && pos.x - half_w < size.x;
            return RepeatedPosition {
                xs: vec![pos.x],
                y: pos.y,
                visible: y_visible && x_visible && !self.exceeds_latitude_range(coord),
                occluded: false,
            };
        }

        let mut xs = Vec::new();
        if y_visible {
            let period = Self::period(viewport);
            // Leftmost copy whose glyph still reaches the screen.
            let mut it_x = pos.x;
            if it_x + half_w >= period {
                it_x -= ((it_x + half_w) / period).floor() * period;
            }
            while it_x + half_w < 0.0 {
                it_x += period;
            }
            while it_x - half_w < size.x {
                xs.push(it_x);
                it_x += period;
            }
        }

        RepeatedPosition {
            visible: !xs.is_empty() && !self.exceeds_latitude_range(coord),
            xs,
            y: pos.y,
            occluded: false,
        }
    }

    fn inverse(&self, x: f64, y: f64, viewport: &Viewport) -> Option<Coordinate> {
        let k = viewport.pixels_per_radian();
        let half = viewport.screen_center();

        let raw_lon = viewport.center_lon() + (x - half.x) / k;
        let lon = if viewport.repeat_x() {
            wrap_lon(raw_lon)
        } else if (-PI..=PI).contains(&raw_lon) {
            raw_lon
        } else {
            return None;
        };

        let projected = Self::center_y(viewport) + (half.y - y) / k;
        if projected.abs() > S::project(S::MAX_LAT) {
            return None;
        }
        Some(Coordinate::new(lon, S::unproject(projected)))
    }

    fn map_covers_viewport(&self, viewport: &Viewport) -> bool {
        let size = viewport.size();
        let (top, bottom) = Self::map_y_range(viewport);
        let vertical = top <= 0.0 && bottom >= size.y;
        if viewport.repeat_x() {
            return vertical;
        }
        let (west, east) = Self::map_x_range(viewport);
        vertical && west <= 0.0 && east >= size.x
    }

    fn silhouette(&self, viewport: &Viewport) -> Silhouette {
        let size = viewport.size();
        let (top, bottom) = Self::map_y_range(viewport);
        let (left, right) = if viewport.repeat_x() {
            (0.0, size.x)
        } else {
            let (west, east) = Self::map_x_range(viewport);
            (west.clamp(0.0, size.x), east.clamp(0.0, size.x))
        };
        let top = top.clamp(0.0, size.y);
        let bottom = bottom.clamp(0.0, size.y);
        Silhouette::Band(ScreenRect::from_edges(left, top, right, bottom))
    }

    fn repeat_period(&self, viewport: &Viewport) -> Option<f64> {
        Some(Self::period(viewport))
    }
}
