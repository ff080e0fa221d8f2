use foundation::{Coordinate, TessellationFlags};

use crate::date_line;

/// Curve followed between two consecutive nodes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Path {
    /// Great circle, sampled by normalized quaternion interpolation.
    GreatCircle,
    /// Constant latitude, longitude stepping by `lon_diff` over the segment.
    LatitudeCircle { lon_diff: f64 },
}

impl Path {
    /// Curve from `a` to `b` under `flags`. `None` when the segment is a
    /// full turn around a latitude circle and has no well-defined samples.
    pub fn between(a: &Coordinate, b: &Coordinate, flags: TessellationFlags) -> Option<Self> {
        if !(flags.respect_latitude_circle && a.lat() == b.lat()) {
            return Some(Path::GreatCircle);
        }
        let lon_diff = date_line::lon_diff(a.lon(), b.lon());
        if lon_diff.abs() == std::f64::consts::TAU {
            return None;
        }
        Some(Path::LatitudeCircle { lon_diff })
    }

    /// Point at fraction `t` from `a` to `b`. Altitude is blended linearly,
    /// or pinned to the ground with `follow_ground`.
    pub fn point(&self, a: &Coordinate, b: &Coordinate, t: f64, follow_ground: bool) -> Coordinate {
        let alt = if follow_ground {
            0.0
        } else {
            a.alt() + t * (b.alt() - a.alt())
        };
        match self {
            Path::GreatCircle => Coordinate::nlerp(a, b, t).with_altitude(alt),
            Path::LatitudeCircle { lon_diff } => {
                Coordinate::new(a.lon() + t * lon_diff, a.lat()).with_altitude(alt)
            }
        }
    }
}

/// The `count` evenly spaced interior points of the segment, excluding
/// both ends (`t = i / (count + 1)`).
pub fn interior_points(
    a: &Coordinate,
    b: &Coordinate,
    count: usize,
    flags: TessellationFlags,
) -> Vec<Coordinate> {
    let Some(path) = Path::between(a, b, flags) else {
        return Vec::new();
    };
    let n = count as f64 + 1.0;
    (1..=count)
        .map(|i| path.point(a, b, i as f64 / n, flags.follow_ground))
        .collect()
}
