use std::f64::consts::PI;

use foundation::{Coordinate, LatLonAltBox, LatLonBox, Quaternion, ScreenRect, Vec2, wrap_lon};
use serde::{Deserialize, Serialize};

use crate::{MAX_ALTITUDE, MIN_ALTITUDE, Projection, ProjectionError, ProjectionKind};

/// Default pixel threshold for [`Viewport::resolves`].
pub const RESOLVE_PIXELS: f64 = 2.0;
/// Altitude span (meters) that makes a box worth drawing regardless of its
/// footprint.
pub const RESOLVE_ALTITUDE: f64 = 10_000.0;

/// Upper bounds of angular resolution (radians per pixel) for detail levels
/// 17 down to 2. Anything coarser is level 1.
const DETAIL_LEVEL_RESOLUTIONS: [f64; 16] = [
    0.000_000_5,
    0.000_001_0,
    0.000_002_0,
    0.000_004_0,
    0.000_008_0,
    0.000_016_0,
    0.000_032_0,
    0.000_064_0,
    0.000_128_0,
    0.000_256_0,
    0.000_512_0,
    0.001_024_0,
    0.002_048_0,
    0.004_096_0,
    0.008_192_0,
    0.016_384_0,
];

/// Snapshot of the view state every projection call reads.
///
/// Built by the camera layer; projection and tessellation only ever borrow
/// it. `radius` is the zoom: the spherical projection draws the globe with
/// that pixel radius, the cylindrical ones use `radius / π` pixels per radian
/// so one 360° wrap spans `2 · radius` pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    kind: ProjectionKind,
    width: u32,
    height: u32,
    radius: f64,
    center_lon: f64,
    center_lat: f64,
    orientation: Quaternion,
    repeat_x: bool,
}

impl Viewport {
    pub fn new(
        kind: ProjectionKind,
        width: u32,
        height: u32,
        radius: f64,
    ) -> Result<Self, ProjectionError> {
        if width == 0 || height == 0 || !radius.is_finite() || radius <= 0.0 {
            return Err(ProjectionError::InvalidViewport {
                width,
                height,
                radius,
            });
        }
        Ok(Self {
            kind,
            width,
            height,
            radius,
            center_lon: 0.0,
            center_lat: 0.0,
            orientation: Quaternion::IDENTITY,
            repeat_x: false,
        })
    }

    /// Center the view on (`lon`, `lat`) radians.
    ///
    /// Latitude is clamped to what the projection can show, longitude wrapped
    /// into `[-π, π]`. The globe orientation follows the new center.
    pub fn centered_on(mut self, lon: f64, lat: f64) -> Self {
        self.center_on(lon, lat);
        self
    }

    pub fn center_on(&mut self, lon: f64, lat: f64) {
        let projection = self.projection();
        let lat = lat.clamp(projection.min_lat(), projection.max_lat());
        let lon = wrap_lon(lon);
        self.center_lon = lon;
        self.center_lat = lat;
        self.orientation = Quaternion::from_center(lon, lat);
    }

    /// Set an arbitrary globe orientation (including roll). The center is
    /// derived from the point the orientation brings to the middle of the view.
    pub fn with_orientation(mut self, orientation: Quaternion) -> Self {
        let orientation = orientation.normalize();
        let projection = self.projection();
        self.center_lon = orientation.yaw();
        self.center_lat = orientation
            .pitch()
            .clamp(projection.min_lat(), projection.max_lat());
        self.orientation = orientation;
        self
    }

    /// Enable or disable horizontal repetition.
    ///
    /// Fails for projections that cannot repeat; the viewport is left
    /// unchanged in that case.
    pub fn set_repeat_x(&mut self, repeat_x: bool) -> Result<(), ProjectionError> {
        if repeat_x && !self.kind.repeatable_x() {
            tracing::debug!(projection = %self.kind, "rejected horizontal repetition");
            return Err(ProjectionError::InvalidConfiguration {
                projection: self.kind,
            });
        }
        self.repeat_x = repeat_x;
        Ok(())
    }

    pub fn with_repeat_x(mut self, repeat_x: bool) -> Result<Self, ProjectionError> {
        self.set_repeat_x(repeat_x)?;
        Ok(self)
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn projection(&self) -> &'static dyn Projection {
        self.kind.projection()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn center_lon(&self) -> f64 {
        self.center_lon
    }

    pub fn center_lat(&self) -> f64 {
        self.center_lat
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.center_lon, self.center_lat)
    }

    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    pub fn repeat_x(&self) -> bool {
        self.repeat_x
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(f64::from(self.width), f64::from(self.height))
    }

    /// Screen position of the view center.
    pub fn screen_center(&self) -> Vec2 {
        Vec2::new(0.5 * f64::from(self.width), 0.5 * f64::from(self.height))
    }

    pub fn screen_rect(&self) -> ScreenRect {
        ScreenRect::from_size(f64::from(self.width), f64::from(self.height))
    }

    /// Pixels per radian for the cylindrical projections.
    pub fn pixels_per_radian(&self) -> f64 {
        self.radius / PI
    }

    /// Rough angle covered by one screen pixel.
    pub fn angular_resolution(&self) -> f64 {
        4.0 / self.radius
    }

    /// Whether `bbox` is large enough to be seen (more than two pixels).
    pub fn resolves(&self, bbox: &LatLonBox) -> bool {
        self.resolves_with_pixels(bbox, RESOLVE_PIXELS)
    }

    pub fn resolves_with_pixels(&self, bbox: &LatLonBox, pixels: f64) -> bool {
        bbox.width() + bbox.height() > pixels * self.angular_resolution()
    }

    /// Like [`Self::resolves`], but a large enough altitude span also counts.
    pub fn resolves_with_altitude(&self, bbox: &LatLonAltBox) -> bool {
        self.resolves(&bbox.bbox) || bbox.max_alt - bbox.min_alt > RESOLVE_ALTITUDE
    }

    /// Whether the two points are further apart than one resolvable unit
    /// (Manhattan distance in radians).
    pub fn resolves_segment(&self, a: &Coordinate, b: &Coordinate) -> bool {
        (b.lon() - a.lon()).abs() + (b.lat() - a.lat()).abs() > self.angular_resolution()
    }

    /// Level of detail for the current zoom, from 1 (whole world) to 17.
    pub fn detail_level(&self) -> u8 {
        let resolution = self.angular_resolution();
        DETAIL_LEVEL_RESOLUTIONS
            .iter()
            .position(|&limit| resolution < limit)
            .map_or(1, |i| 17 - i as u8)
    }

    pub fn map_covers_viewport(&self) -> bool {
        self.projection().map_covers_viewport(self)
    }

    /// Geographic box visible on the whole screen.
    pub fn view_lat_lon_alt_box(&self) -> LatLonAltBox {
        self.projection()
            .bounding_box(&self.screen_rect(), self)
            .unwrap_or(LatLonAltBox::new(LatLonBox::GLOBAL, MIN_ALTITUDE, MAX_ALTITUDE))
    }
}

/// Serializable description of a viewport, angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportDescriptor {
    #[serde(default)]
    pub projection: ProjectionKind,
    pub width: u32,
    pub height: u32,
    pub radius: f64,
    #[serde(default)]
    pub center_lon: f64,
    #[serde(default)]
    pub center_lat: f64,
    #[serde(default)]
    pub repeat_x: bool,
}

impl TryFrom<&ViewportDescriptor> for Viewport {
    type Error = ProjectionError;

    fn try_from(d: &ViewportDescriptor) -> Result<Self, Self::Error> {
        Viewport::new(d.projection, d.width, d.height, d.radius)?
            .centered_on(d.center_lon.to_radians(), d.center_lat.to_radians())
            .with_repeat_x(d.repeat_x)
    }
}

impl From<&Viewport> for ViewportDescriptor {
    fn from(vp: &Viewport) -> Self {
        Self {
            projection: vp.kind(),
            width: vp.width(),
            height: vp.height(),
            radius: vp.radius(),
            center_lon: vp.center_lon().to_degrees(),
            center_lat: vp.center_lat().to_degrees(),
            repeat_x: vp.repeat_x(),
        }
    }
}
