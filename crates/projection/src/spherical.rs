use std::f64::consts::{FRAC_PI_2, PI};

use foundation::{Coordinate, EARTH_RADIUS, LatLonBox, Quaternion, Vec2, Vec3, wrap_lon};

use crate::{Projection, ProjectionKind, RepeatedPosition, ScreenPosition, Silhouette, Viewport};

/// Below this altitude (meters) a point is hidden exactly when it lies on the
/// far hemisphere.
pub const HIGH_ALTITUDE: f64 = 10_000.0;

/// Orthographic view of the globe, drawn as a disk of `radius` pixels.
#[derive(Debug, Copy, Clone, Default)]
pub struct Spherical;

pub const SPHERICAL: Spherical = Spherical;

impl Spherical {
    /// Unit vector of `coord` in view space: `+z` towards the viewer, `+y` up.
    pub fn view_vector(coord: &Coordinate, viewport: &Viewport) -> Vec3 {
        viewport.orientation().conjugate().rotate(coord.unit_vector())
    }

    /// Whether the globe hides `coord`.
    ///
    /// High points (satellites) stay visible behind the limb as long as they
    /// project outside the disk.
    pub fn hides(coord: &Coordinate, viewport: &Viewport) -> bool {
        let v = Self::view_vector(coord, viewport);
        Self::hides_view_vector(v, coord.alt(), viewport.radius())
    }

    fn pixel_altitude(alt: f64, radius: f64) -> f64 {
        radius * (alt + EARTH_RADIUS) / EARTH_RADIUS
    }

    fn hides_view_vector(v: Vec3, alt: f64, radius: f64) -> bool {
        if v.z >= 0.0 {
            return false;
        }
        if alt < HIGH_ALTITUDE {
            return true;
        }
        let r = Self::pixel_altitude(alt, radius);
        let (ex, ey) = (r * v.x, r * v.y);
        ex * ex + ey * ey < radius * radius
    }
}

impl Projection for Spherical {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Spherical
    }

    fn max_lat(&self) -> f64 {
        FRAC_PI_2
    }

    fn repeatable_x(&self) -> bool {
        false
    }

    fn occludes(&self) -> bool {
        true
    }

    fn forward(&self, coord: &Coordinate, viewport: &Viewport) -> ScreenPosition {
        let v = Self::view_vector(coord, viewport);
        let occluded = Self::hides_view_vector(v, coord.alt(), viewport.radius());
        let r = Self::pixel_altitude(coord.alt(), viewport.radius());
        let center = viewport.screen_center();
        let x = center.x + r * v.x;
        let y = center.y - r * v.y;
        let size = viewport.size();
        let on_screen = (0.0..size.x).contains(&x) && (0.0..size.y).contains(&y);
        ScreenPosition {
            x,
            y,
            visible: on_screen && !occluded,
            occluded,
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
        let (half_w, half_h) = (0.5 * glyph.x, 0.5 * glyph.y);
        let on_screen = pos.x + half_w >= 0.0
            && pos.x - half_w < size.x
            && pos.y + half_h >= 0.0
            && pos.y - half_h < size.y;
        RepeatedPosition {
            xs: vec![pos.x],
            y: pos.y,
            visible: on_screen && !pos.occluded,
            occluded: pos.occluded,
        }
    }

    fn inverse(&self, x: f64, y: f64, viewport: &Viewport) -> Option<Coordinate> {
        let radius = viewport.radius();
        let center = viewport.screen_center();
        let (dx, dy) = (x - center.x, y - center.y);
        if dx * dx + dy * dy >= radius * radius {
            return None;
        }
        let qx = dx / radius;
        let qy = -dy / radius;
        let qz = (1.0 - qx * qx - qy * qy).max(0.0).sqrt();
        let v = viewport.orientation().rotate(Vec3::new(qx, qy, qz));
        Some(Coordinate::from_quaternion(Quaternion::from_vector(v)))
    }

    fn map_covers_viewport(&self, viewport: &Viewport) -> bool {
        let radius = viewport.radius();
        let size = viewport.size();
        4.0 * radius * radius >= size.x * size.x + size.y * size.y
    }

    fn silhouette(&self, viewport: &Viewport) -> Silhouette {
        if self.map_covers_viewport(viewport) {
            Silhouette::Full(viewport.screen_rect())
        } else {
            Silhouette::Disk {
                center: viewport.screen_center(),
                radius: viewport.radius(),
                clip: viewport.screen_rect(),
            }
        }
    }

    /// When the whole disk fits on screen, the visible area is the hemisphere
    /// facing the viewer.
    fn visible_hemisphere(&self, viewport: &Viewport) -> Option<LatLonBox> {
        let diameter = 2.0 * viewport.radius();
        let size = viewport.size();
        if diameter > size.x || diameter > size.y {
            return None;
        }
        let center_lat = viewport.orientation().pitch();
        let hemisphere = if center_lat > f64::EPSILON {
            LatLonBox::new(FRAC_PI_2, center_lat - FRAC_PI_2, PI, -PI)
        } else if center_lat < -f64::EPSILON {
            LatLonBox::new(center_lat + FRAC_PI_2, -FRAC_PI_2, PI, -PI)
        } else {
            let center_lon = viewport.orientation().yaw();
            LatLonBox::new(
                FRAC_PI_2,
                -FRAC_PI_2,
                wrap_lon(center_lon + FRAC_PI_2),
                wrap_lon(center_lon - FRAC_PI_2),
            )
        };
        Some(hemisphere)
    }
}

#[cfg(test)]
mod tests {
    use super::{SPHERICAL, Spherical};
    use crate::{Projection, ProjectionKind, Silhouette, Viewport};
    use foundation::{Coordinate, Vec2};
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn globe(width: u32, height: u32, radius: f64) -> Viewport {
        Viewport::new(ProjectionKind::Spherical, width, height, radius).expect("viewport")
    }

    #[test]
    fn center_and_antipode() {
        let vp = globe(800, 600, 200.0);
        let p = SPHERICAL.forward(&Coordinate::from_degrees(0.0, 0.0), &vp);
        assert_close(p.x, 400.0, 1e-9);
        assert_close(p.y, 300.0, 1e-9);
        assert!(p.visible);
        assert!(!p.occluded);

        let p = SPHERICAL.forward(&Coordinate::from_degrees(180.0, 0.0), &vp);
        assert!(p.occluded);
        assert!(!p.visible);
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let vp = globe(800, 600, 200.0);
        let east = SPHERICAL.forward(&Coordinate::from_degrees(90.0, 0.0), &vp);
        assert_close(east.x, 600.0, 1e-9);
        let north = SPHERICAL.forward(&Coordinate::from_degrees(0.0, 90.0), &vp);
        assert_close(north.y, 100.0, 1e-9);
    }

    #[test]
    fn high_points_behind_the_limb_stay_visible() {
        let vp = globe(800, 600, 200.0);
        // Slightly behind the limb, far up: projects outside the disk.
        let satellite = Coordinate::from_degrees(95.0, 0.0).with_altitude(20_000_000.0);
        let p = SPHERICAL.forward(&satellite, &vp);
        assert!(!p.occluded);

        // Directly behind the globe: hidden whatever the altitude.
        let hidden = Coordinate::from_degrees(180.0, 0.0).with_altitude(20_000_000.0);
        assert!(Spherical::hides(&hidden, &vp));

        // Low points hide as soon as they leave the near side.
        let low = Coordinate::from_degrees(95.0, 0.0).with_altitude(5_000.0);
        assert!(Spherical::hides(&low, &vp));
    }

    #[test]
    fn never_repeats() {
        let vp = globe(800, 600, 200.0);
        let r = SPHERICAL.forward_repeated(&Coordinate::from_degrees(10.0, 10.0), &vp, Vec2::new(8.0, 8.0));
        assert_eq!(r.xs.len(), 1);
        assert!(r.visible);
        assert!(SPHERICAL.repeat_period(&vp).is_none());
    }

    #[test]
    fn inverse_outside_disk_is_none() {
        let vp = globe(800, 600, 200.0);
        assert!(SPHERICAL.inverse(10.0, 10.0, &vp).is_none());
        assert!(SPHERICAL.inverse(600.0, 300.0, &vp).is_none());
        let c = SPHERICAL.inverse(400.0, 300.0, &vp).expect("center");
        assert_close(c.lon(), 0.0, 1e-12);
        assert_close(c.lat(), 0.0, 1e-12);
    }

    #[test]
    fn silhouette_switches_to_full_screen() {
        let small = globe(800, 600, 200.0);
        assert!(!SPHERICAL.map_covers_viewport(&small));
        assert!(matches!(SPHERICAL.silhouette(&small), Silhouette::Disk { radius, .. } if radius == 200.0));

        let big = globe(800, 600, 500.0);
        assert!(SPHERICAL.map_covers_viewport(&big));
        assert!(matches!(SPHERICAL.silhouette(&big), Silhouette::Full(_)));
    }

    #[test]
    fn visible_hemisphere_follows_center_latitude() {
        let vp = globe(800, 600, 200.0).centered_on(0.0, 0.5);
        let b = SPHERICAL.visible_hemisphere(&vp).expect("whole globe on screen");
        assert_close(b.north, FRAC_PI_2, 1e-12);
        assert_close(b.south, 0.5 - FRAC_PI_2, 1e-9);
        assert!(b.is_global_lon());

        let vp = globe(800, 600, 200.0).centered_on(1.0, 0.0);
        let b = SPHERICAL.visible_hemisphere(&vp).expect("whole globe on screen");
        assert_close(b.west, 1.0 - FRAC_PI_2, 1e-9);
        assert_close(b.east, 1.0 + FRAC_PI_2, 1e-9);

        assert!(SPHERICAL.visible_hemisphere(&globe(800, 600, 350.0)).is_none());
    }

    proptest! {
        #[test]
        fn forward_inverse_round_trip(
            lon in -60.0f64..60.0,
            lat in -60.0f64..60.0,
            center_lon in -3.0f64..3.0,
            center_lat in -1.2f64..1.2,
        ) {
            let vp = globe(1000, 1000, 400.0).centered_on(center_lon, center_lat);
            let coord = Coordinate::new(center_lon + lon.to_radians() * 0.5, center_lat + lat.to_radians() * 0.5);
            let p = SPHERICAL.forward(&coord, &vp);
            prop_assume!(!p.occluded);
            let back = SPHERICAL.inverse(p.x, p.y, &vp).expect("on the disk");
            let v = coord.unit_vector();
            let w = back.unit_vector();
            prop_assert!((v - w).length() < 1e-6);
        }
    }
}
