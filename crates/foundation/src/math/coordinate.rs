use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::{Quaternion, Vec3};

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// Globe radius used to scale altitude into view space (meters).
pub const EARTH_RADIUS: f64 = WGS84_A;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pole {
    North,
    South,
    Any,
}

/// Geographic point: longitude/latitude in radians, altitude in meters.
///
/// Always normalized: longitude in `[-π, π]`, latitude in `[-π/2, π/2]`.
/// `detail` is an optional level-of-detail tag (0 = untagged) used to skip
/// nodes of pre-generalized paths at low zoom.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Coordinate {
    lon: f64,
    lat: f64,
    alt: f64,
    detail: u8,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        let (lon, lat) = normalize_lon_lat(lon, lat);
        Self {
            lon,
            lat,
            alt: 0.0,
            detail: 0,
        }
    }

    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self::new(lon_deg.to_radians(), lat_deg.to_radians())
    }

    /// Point on the unit sphere given by the vector part of `q`.
    pub fn from_quaternion(q: Quaternion) -> Self {
        let (lon, lat) = q.to_spherical();
        Self::new(lon, lat)
    }

    pub fn with_altitude(mut self, alt: f64) -> Self {
        self.alt = alt;
        self
    }

    pub fn with_detail(mut self, detail: u8) -> Self {
        self.detail = detail;
        self
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn alt(&self) -> f64 {
        self.alt
    }

    pub fn detail(&self) -> u8 {
        self.detail
    }

    pub fn lon_deg(&self) -> f64 {
        self.lon.to_degrees()
    }

    pub fn lat_deg(&self) -> f64 {
        self.lat.to_degrees()
    }

    pub fn quaternion(&self) -> Quaternion {
        Quaternion::from_spherical(self.lon, self.lat)
    }

    pub fn unit_vector(&self) -> Vec3 {
        self.quaternion().vector()
    }

    pub fn is_pole(&self, pole: Pole) -> bool {
        match pole {
            Pole::North => self.lat >= FRAC_PI_2,
            Pole::South => self.lat <= -FRAC_PI_2,
            Pole::Any => self.lat.abs() >= FRAC_PI_2,
        }
    }

    /// Point at fraction `t` along the great-circle arc from `a` to `b`.
    ///
    /// Altitude is interpolated linearly; the detail tag is dropped.
    pub fn nlerp(a: &Self, b: &Self, t: f64) -> Self {
        let q = Quaternion::nlerp(a.quaternion(), b.quaternion(), t);
        Self::from_quaternion(q).with_altitude(lerp(a.alt, b.alt, t))
    }

    /// Point at fraction `t` along the constant-latitude arc from `self` to
    /// `other`, taking the shorter way around (across the date line if
    /// needed). Latitude is taken from `self`.
    pub fn interpolate_latitude_circle(&self, other: &Self, t: f64) -> Self {
        let mut lon_diff = other.lon - self.lon;
        if lon_diff > PI {
            lon_diff -= TAU;
        } else if lon_diff < -PI {
            lon_diff += TAU;
        }
        Self::new(self.lon + t * lon_diff, self.lat).with_altitude(lerp(self.alt, other.alt, t))
    }

    /// Apply `orientation` to the unit-sphere position. Altitude and detail
    /// are preserved.
    pub fn rotate(&self, orientation: Quaternion) -> Self {
        let v = orientation.rotate(self.unit_vector());
        let (lon, lat) = Quaternion::from_vector(v).to_spherical();
        Self {
            detail: self.detail,
            ..Self::new(lon, lat).with_altitude(self.alt)
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Wrap `lon` into `[-π, π]`. Values already in range are returned unchanged
/// so that both `-π` and `π` survive.
pub fn wrap_lon(lon: f64) -> f64 {
    if (-PI..=PI).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + PI).rem_euclid(TAU) - PI;
    // rem_euclid maps +π-aligned inputs to -π; keep the sign of the input.
    if wrapped == -PI && lon > 0.0 { PI } else { wrapped }
}

/// Fold a latitude running over a pole back into `[-π/2, π/2]`, moving the
/// longitude to the opposite meridian when a pole is crossed.
pub fn normalize_lon_lat(lon: f64, lat: f64) -> (f64, f64) {
    let mut lon = lon;
    let mut lat = wrap_lon(lat);
    if lat > FRAC_PI_2 {
        lat = PI - lat;
        lon += PI;
    } else if lat < -FRAC_PI_2 {
        lat = -PI - lat;
        lon += PI;
    }
    (wrap_lon(lon), lat)
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, Pole, normalize_lon_lat, wrap_lon};
    use crate::math::Quaternion;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn longitude_wraps_into_range() {
        assert_close(wrap_lon(3.0 * PI / 2.0), -FRAC_PI_2, 1e-12);
        assert_close(wrap_lon(-3.0 * PI / 2.0), FRAC_PI_2, 1e-12);
        assert_close(wrap_lon(2.0 * PI + 0.5), 0.5, 1e-12);
        assert_eq!(wrap_lon(-PI), -PI);
        assert_eq!(wrap_lon(PI), PI);
    }

    #[test]
    fn latitude_folds_over_pole() {
        let (lon, lat) = normalize_lon_lat(0.5, FRAC_PI_2 + 0.1);
        assert_close(lat, FRAC_PI_2 - 0.1, 1e-12);
        assert_close(lon, 0.5 - PI, 1e-12);

        let (lon, lat) = normalize_lon_lat(-0.5, -FRAC_PI_2 - 0.2);
        assert_close(lat, -FRAC_PI_2 + 0.2, 1e-12);
        assert_close(lon, PI - 0.5, 1e-12);
    }

    #[test]
    fn degrees_constructor_normalizes() {
        let c = Coordinate::from_degrees(190.0, 45.0);
        assert_close(c.lon_deg(), -170.0, 1e-9);
        assert_close(c.lat_deg(), 45.0, 1e-9);
        assert_eq!(c.alt(), 0.0);
        assert_eq!(c.detail(), 0);
    }

    #[test]
    fn poles_are_recognized() {
        assert!(Coordinate::new(0.3, FRAC_PI_2).is_pole(Pole::North));
        assert!(!Coordinate::new(0.3, FRAC_PI_2).is_pole(Pole::South));
        assert!(Coordinate::new(0.3, -FRAC_PI_2).is_pole(Pole::Any));
        assert!(!Coordinate::new(0.3, 1.0).is_pole(Pole::Any));
    }

    #[test]
    fn nlerp_follows_great_circle_and_lerps_altitude() {
        let a = Coordinate::new(0.0, 0.0).with_altitude(100.0);
        let b = Coordinate::new(FRAC_PI_2, 0.0).with_altitude(300.0);
        let mid = Coordinate::nlerp(&a, &b, 0.5);
        assert_close(mid.lon(), FRAC_PI_4, 1e-12);
        assert_close(mid.lat(), 0.0, 1e-12);
        assert_close(mid.alt(), 200.0, 1e-9);

        let start = Coordinate::nlerp(&a, &b, 0.0);
        assert_close(start.lon(), 0.0, 1e-12);
    }

    #[test]
    fn latitude_circle_takes_short_way_across_date_line() {
        let a = Coordinate::from_degrees(170.0, 40.0);
        let b = Coordinate::from_degrees(-170.0, 40.0);
        let mid = a.interpolate_latitude_circle(&b, 0.5);
        assert_close(mid.lon().abs(), PI, 1e-12);
        assert_close(mid.lat_deg(), 40.0, 1e-9);

        let quarter = a.interpolate_latitude_circle(&b, 0.25);
        assert_close(quarter.lon_deg(), 175.0, 1e-9);
    }

    #[test]
    fn rotate_by_center_orientation_round_trips() {
        let center = Quaternion::from_center(0.4, 0.2);
        let c = Coordinate::new(-1.0, 0.7).with_altitude(42.0).with_detail(3);
        let back = c.rotate(center.inverse()).rotate(center);
        assert_close(back.lon(), c.lon(), 1e-12);
        assert_close(back.lat(), c.lat(), 1e-12);
        assert_eq!(back.alt(), 42.0);
        assert_eq!(back.detail(), 3);
    }
}
