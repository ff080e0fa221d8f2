//! Quaternions for globe orientation and great-circle interpolation.
//!
//! A point on the unit sphere is stored as a pure quaternion (`w == 0`), so
//! the same type serves as a position and as a rotation.

use super::Vec3;

/// Below this squared distance from the polar axis the longitude is undefined
/// and reported as 0.
const POLAR_AXIS_EPSILON: f64 = 1e-24;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn from_vector(v: Vec3) -> Self {
        Self::new(0.0, v.x, v.y, v.z)
    }

    /// Pure quaternion for the unit-sphere point at (`lon`, `lat`) radians.
    pub fn from_spherical(lon: f64, lat: f64) -> Self {
        let cos_lat = lat.cos();
        Self::new(0.0, cos_lat * lon.sin(), lat.sin(), cos_lat * lon.cos())
    }

    /// Rotation by `angle` radians (right-handed) around `axis`.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let axis = axis.normalize();
        let half = 0.5 * angle;
        let s = half.sin();
        Self::new(half.cos(), axis.x * s, axis.y * s, axis.z * s)
    }

    /// Globe orientation that brings (`lon`, `lat`) to the centre of the view.
    ///
    /// Rotating the view axis `+Z` by the result yields the unit vector of
    /// (`lon`, `lat`); rotating by its inverse does the opposite.
    pub fn from_center(lon: f64, lat: f64) -> Self {
        let yaw = Self::from_axis_angle(Vec3::Y, lon);
        let pitch = Self::from_axis_angle(Vec3::X, -lat);
        (yaw * pitch).normalize()
    }

    /// Longitude of the point an orientation brings to the view centre.
    pub fn yaw(self) -> f64 {
        Self::from_vector(self.rotate(Vec3::Z)).to_spherical().0
    }

    /// Latitude of the point an orientation brings to the view centre.
    pub fn pitch(self) -> f64 {
        Self::from_vector(self.rotate(Vec3::Z)).to_spherical().1
    }

    pub fn vector(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn norm(self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn normalize(self) -> Self {
        let n = self.norm();
        if n <= 0.0 {
            return self;
        }
        let inv = 1.0 / n;
        Self::new(self.w * inv, self.x * inv, self.y * inv, self.z * inv)
    }

    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Inverse rotation. Only valid for unit quaternions.
    pub fn inverse(self) -> Self {
        self.conjugate()
    }

    pub fn dot(self, other: Self) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Rotate `v` by this (unit) quaternion: `q v q*`.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        (self * Self::from_vector(v) * self.conjugate()).vector()
    }

    /// Spherical (`lon`, `lat`) of the vector part, in radians.
    pub fn to_spherical(self) -> (f64, f64) {
        let v = self.vector().normalize();
        let lat = v.y.clamp(-1.0, 1.0).asin();
        let lon = if v.x * v.x + v.z * v.z > POLAR_AXIS_EPSILON {
            v.x.atan2(v.z)
        } else {
            0.0
        };
        (lon, lat)
    }

    /// Normalized linear interpolation between `a` and `b`.
    ///
    /// For points on the sphere the result lies on the great-circle arc from
    /// `a` to `b`; the angular spacing is not uniform in `t`.
    pub fn nlerp(a: Self, b: Self, t: f64) -> Self {
        let p = 1.0 - t;
        Self::new(
            p * a.w + t * b.w,
            p * a.x + t * b.x,
            p * a.y + t * b.y,
            p * a.z + t * b.z,
        )
        .normalize()
    }

    /// Spherical linear interpolation with uniform angular spacing.
    pub fn slerp(a: Self, b: Self, t: f64) -> Self {
        let cos_omega = a.dot(b).clamp(-1.0, 1.0);
        let omega = cos_omega.acos();
        let sin_omega = omega.sin();
        if sin_omega.abs() < 1e-9 {
            return Self::nlerp(a, b, t);
        }
        let wa = ((1.0 - t) * omega).sin() / sin_omega;
        let wb = (t * omega).sin() / sin_omega;
        Self::new(
            wa * a.w + wb * b.w,
            wa * a.x + wb * b.x,
            wa * a.y + wb * b.y,
            wa * a.z + wb * b.z,
        )
    }
}

impl std::ops::Mul for Quaternion {
    type Output = Self;

    fn mul(self, q: Self) -> Self::Output {
        Self::new(
            self.w * q.w - self.x * q.x - self.y * q.y - self.z * q.z,
            self.w * q.x + self.x * q.w + self.y * q.z - self.z * q.y,
            self.w * q.y - self.x * q.z + self.y * q.w + self.z * q.x,
            self.w * q.z + self.x * q.y - self.y * q.x + self.z * q.w,
        )
    }
}
