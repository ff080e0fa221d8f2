//! Date-line bookkeeping shared by interpolation and polygon assembly.

use std::f64::consts::{PI, TAU};

use foundation::Coordinate;

/// `1` for eastern longitudes, `-1` for western ones and zero.
pub fn lon_sign(lon: f64) -> i32 {
    if lon > 0.0 { 1 } else { -1 }
}

/// Direction in which the step from `a_lon` to `b_lon` crosses the date
/// line: `1` eastwards, `-1` westwards, `0` when it does not.
pub fn crossing(a_lon: f64, b_lon: f64) -> i32 {
    let (a_sign, b_sign) = (lon_sign(a_lon), lon_sign(b_lon));
    if a_sign != b_sign && a_lon.abs() + b_lon.abs() > PI {
        if a_sign > b_sign { 1 } else { -1 }
    } else {
        0
    }
}

/// Longitude difference from `a_lon` to `b_lon` going the way that does not
/// wrap around the map, i.e. across the date line when the step crosses it.
pub fn lon_diff(a_lon: f64, b_lon: f64) -> f64 {
    (b_lon - a_lon) + f64::from(crossing(a_lon, b_lon)) * TAU
}

/// Latitude at which the step from `a` to `b`, taken linearly in
/// longitude across the date line, meets ±180°.
pub fn crossing_latitude(a: &Coordinate, b: &Coordinate) -> f64 {
    let edge = f64::from(lon_sign(a.lon())) * PI;
    let diff = lon_diff(a.lon(), b.lon());
    if diff == 0.0 {
        return a.lat();
    }
    let t = ((edge - a.lon()) / diff).clamp(0.0, 1.0);
    a.lat() + t * (b.lat() - a.lat())
}
