use std::f64::consts::PI;

use foundation::{Coordinate, LatLonAltBox, LatLonBox, ScreenRect};

use crate::{Projection, Viewport};

/// Poles closer than this to the globe limb (pixels) count as hidden.
const POLE_LIMB_MARGIN_PX: f64 = 0.5;

/// Spacing of border samples (pixels).
pub const SAMPLING_STRIDE_PX: f64 = 4.0;
/// Altitude envelope attached to view boxes (meters).
pub const MIN_ALTITUDE: f64 = -100_000_000.0;
pub const MAX_ALTITUDE: f64 = 100_000_000_000_000.0;

/// Derives the geographic box visible inside a screen rectangle.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBoxCalculator<'a> {
    viewport: &'a Viewport,
    stride: f64,
}

impl<'a> BoundingBoxCalculator<'a> {
    pub fn new(viewport: &'a Viewport) -> Self {
        Self {
            viewport,
            stride: SAMPLING_STRIDE_PX,
        }
    }

    pub fn with_stride(mut self, stride: f64) -> Self {
        self.stride = stride.max(0.5);
        self
    }

    pub fn bounding_box(&self, rect: &ScreenRect) -> Option<LatLonAltBox> {
        compute(self.viewport.projection(), rect, self.viewport, self.stride)
    }
}

/// Geographic box visible inside `rect` under `projection`, sampled at the
/// default stride. `None` when `rect` does not touch the map.
pub fn bounding_box<P: Projection + ?Sized>(
    projection: &P,
    rect: &ScreenRect,
    viewport: &Viewport,
) -> Option<LatLonAltBox> {
    compute(projection, rect, viewport, SAMPLING_STRIDE_PX)
}

fn compute<P: Projection + ?Sized>(
    projection: &P,
    rect: &ScreenRect,
    viewport: &Viewport,
    stride: f64,
) -> Option<LatLonAltBox> {
    let area = rect.intersect(&viewport.screen_rect())?;
    let silhouette = projection.silhouette(viewport);

    let ring: Vec<Coordinate> = silhouette
        .border_samples(&area, stride)
        .into_iter()
        .filter_map(|p| projection.inverse(p.x, p.y, viewport))
        .collect();
    let Some(mut bbox) = LatLonBox::from_line_string(&ring, true) else {
        tracing::debug!(?rect, "screen rectangle does not touch the map");
        return None;
    };

    // The whole disk inside the rectangle: the visible hemisphere is known
    // analytically.
    let covers_map = silhouette
        .bounding_rect()
        .is_some_and(|b| area.intersect(&b) == Some(b));
    if covers_map {
        if let Some(hemisphere) = projection.visible_hemisphere(viewport) {
            bbox = hemisphere;
        }
    }

    // Pole visibility at the box's mid longitude.
    let mid_lon = bbox.center().lon();
    let pole_visible = |lat: f64| {
        let p = projection.forward(&Coordinate::new(mid_lon, lat), viewport);
        p.visible
            && area.contains(p.x, p.y)
            && silhouette.contains_inset(p.x, p.y, POLE_LIMB_MARGIN_PX)
    };
    let north_visible = pole_visible(projection.max_lat());
    let south_visible = pole_visible(projection.min_lat());
    if north_visible {
        bbox.north = projection.max_lat();
    }
    if south_visible {
        bbox.south = projection.min_lat();
    }
    if projection.occludes() && (north_visible || south_visible) {
        bbox.west = -PI;
        bbox.east = PI;
    }

    if viewport.repeat_x()
        && projection
            .repeat_period(viewport)
            .is_some_and(|period| period <= f64::from(viewport.width()))
    {
        bbox.west = -PI;
        bbox.east = PI;
    }

    bbox.north = bbox.north.min(projection.max_lat());
    bbox.south = bbox.south.max(projection.min_lat());

    Some(LatLonAltBox::new(bbox, MIN_ALTITUDE, MAX_ALTITUDE))
}

#[cfg(test)]
mod tests {
    use super::{BoundingBoxCalculator, MAX_ALTITUDE, MIN_ALTITUDE};
    use crate::{Projection, ProjectionKind, Viewport};
    use foundation::ScreenRect;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    /// Every pixel of `rect` that inverse-projects lands inside `bbox`,
    /// up to `slack` radians of sampling error.
    fn assert_contains_all_pixels(vp: &Viewport, rect: &ScreenRect, slack: f64) {
        let bbox = vp
            .projection()
            .bounding_box(rect, vp)
            .expect("rect touches the map")
            .bbox;
        let mut y = rect.top + 0.5;
        while y < rect.bottom() {
            let mut x = rect.left + 0.5;
            while x < rect.right() {
                if let Some(c) = vp.projection().inverse(x, y, vp) {
                    assert!(c.lat() <= bbox.north + slack, "{c:?} north of {bbox:?}");
                    assert!(c.lat() >= bbox.south - slack, "{c:?} south of {bbox:?}");
                    let grown = foundation::LatLonBox::new(
                        bbox.north + slack,
                        bbox.south - slack,
                        bbox.east + slack,
                        bbox.west - slack,
                    );
                    assert!(
                        bbox.is_global_lon() || grown.contains(&c),
                        "{c:?} outside {bbox:?}"
                    );
                }
                x += 7.0;
            }
            y += 7.0;
        }
    }

    #[test]
    fn whole_equirectangular_world() {
        let vp = Viewport::new(ProjectionKind::Equirectangular, 720, 360, 180.0).expect("viewport");
        let b = vp.view_lat_lon_alt_box();
        assert_close(b.bbox.north, FRAC_PI_2, 1e-6);
        assert_close(b.bbox.south, -FRAC_PI_2, 1e-6);
        assert_close(b.bbox.west, -PI, 1e-6);
        assert_close(b.bbox.east, PI, 1e-6);
        assert_eq!(b.min_alt, MIN_ALTITUDE);
        assert_eq!(b.max_alt, MAX_ALTITUDE);
    }

    #[test]
    fn zoomed_equirectangular_window() {
        let vp = Viewport::new(ProjectionKind::Equirectangular, 400, 200, 1800.0)
            .expect("viewport")
            .centered_on(10.0_f64.to_radians(), 20.0_f64.to_radians());
        // 10 px per degree: the screen spans 40° x 20°.
        let b = vp.view_lat_lon_alt_box().bbox;
        assert_close(b.west.to_degrees(), -10.0, 1e-3);
        assert_close(b.east.to_degrees(), 30.0, 1e-3);
        assert_close(b.north.to_degrees(), 30.0, 1e-3);
        assert_close(b.south.to_degrees(), 10.0, 1e-3);
        assert_contains_all_pixels(&vp, &vp.screen_rect(), 1e-9);
    }

    #[test]
    fn date_line_window_wraps() {
        let vp = Viewport::new(ProjectionKind::Mercator, 400, 200, 1800.0)
            .expect("viewport")
            .centered_on(PI, 0.0)
            .with_repeat_x(true)
            .expect("repeat");
        let b = vp.view_lat_lon_alt_box().bbox;
        assert!(b.crosses_date_line(), "{b:?}");
        assert_close(b.west.to_degrees(), 160.0, 1e-3);
        assert_close(b.east.to_degrees(), -160.0, 1e-3);
        assert_contains_all_pixels(&vp, &vp.screen_rect(), 1e-9);
    }

    #[test]
    fn repeated_small_world_spans_all_longitudes() {
        let vp = Viewport::new(ProjectionKind::Equirectangular, 1000, 400, 100.0)
            .expect("viewport")
            .with_repeat_x(true)
            .expect("repeat");
        let b = vp.view_lat_lon_alt_box().bbox;
        assert!(b.is_global_lon());
    }

    #[test]
    fn whole_globe_uses_visible_hemisphere() {
        let vp = Viewport::new(ProjectionKind::Spherical, 800, 600, 200.0)
            .expect("viewport")
            .centered_on(0.3, 0.0);
        let b = vp.view_lat_lon_alt_box().bbox;
        // Both poles sit on the limb, hidden; the box is the front hemisphere.
        assert_close(b.west, 0.3 - FRAC_PI_2, 1e-9);
        assert_close(b.east, 0.3 + FRAC_PI_2, 1e-9);
        assert_contains_all_pixels(&vp, &vp.screen_rect(), 1e-9);
    }

    #[test]
    fn tilted_globe_with_visible_pole() {
        let vp = Viewport::new(ProjectionKind::Spherical, 800, 600, 250.0)
            .expect("viewport")
            .centered_on(0.0, 1.0);
        let b = vp.view_lat_lon_alt_box().bbox;
        assert_close(b.north, FRAC_PI_2, 1e-12);
        assert!(b.is_global_lon());
        assert!(b.south < 1.0 - FRAC_PI_2 + 0.05);
        assert_contains_all_pixels(&vp, &vp.screen_rect(), 1e-9);
    }

    #[test]
    fn partial_rect_on_globe() {
        let vp = Viewport::new(ProjectionKind::Spherical, 800, 600, 400.0)
            .expect("viewport")
            .centered_on(2.0, -0.4);
        let rect = ScreenRect::new(450.0, 200.0, 200.0, 150.0);
        let b = BoundingBoxCalculator::new(&vp)
            .bounding_box(&rect)
            .expect("box")
            .bbox;
        assert!(b.width() < PI);
        assert_contains_all_pixels(&vp, &rect, 2e-3);
        // The box is not global and contains the rectangle's center.
        let center = vp
            .projection()
            .inverse(550.0, 275.0, &vp)
            .expect("center on globe");
        assert!(b.contains(&center));
    }

    #[test]
    fn off_map_rect_is_none() {
        let vp = Viewport::new(ProjectionKind::Spherical, 800, 600, 100.0).expect("viewport");
        let rect = ScreenRect::new(0.0, 0.0, 50.0, 50.0);
        assert!(vp.projection().bounding_box(&rect, &vp).is_none());
        assert!(
            BoundingBoxCalculator::new(&vp)
                .with_stride(1.0)
                .bounding_box(&ScreenRect::new(-100.0, -100.0, 50.0, 50.0))
                .is_none()
        );
    }
}
