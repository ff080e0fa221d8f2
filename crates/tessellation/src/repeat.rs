//! Horizontal copies of the base polygons for repeating cylindrical maps.

use std::f64::consts::PI;

use foundation::Coordinate;
use projection::{Projection, Viewport};

use crate::Polygon;

/// Number of map copies needed left and right of the base image.
pub fn repeat_counts(viewport: &Viewport) -> (usize, usize) {
    let projection = viewport.projection();
    let lat = viewport.center_lat();
    let x_west = projection.forward(&Coordinate::new(-PI, lat), viewport).x;
    let x_east = projection.forward(&Coordinate::new(PI, lat), viewport).x;
    let width = f64::from(viewport.width());

    if x_west <= 0.0 && x_east >= width - 1.0 {
        return (0, 0);
    }
    let interval = x_east - x_west;
    if interval <= 0.0 {
        return (0, 0);
    }

    let left = if x_west > 0.0 {
        (x_west / interval) as usize + 1
    } else {
        0
    };
    let right = if x_east < width {
        ((width - x_east) / interval) as usize + 1
    } else {
        0
    };
    (left, right)
}

/// Base polygons surrounded by translated copies, left to right.
pub fn repeat_polygons(polygons: Vec<Polygon>, viewport: &Viewport) -> Vec<Polygon> {
    if !viewport.repeat_x() {
        return polygons;
    }
    let Some(interval) = viewport.projection().repeat_period(viewport) else {
        return polygons;
    };
    let (left, right) = repeat_counts(viewport);
    if left == 0 && right == 0 {
        return polygons;
    }
    tracing::trace!(left, right, interval, "repeating polygons");

    let mut repeated = Vec::with_capacity(polygons.len() * (left + right + 1));
    for i in (1..=left).rev() {
        let dx = -(i as f64) * interval;
        repeated.extend(polygons.iter().map(|p| p.translated(dx, 0.0)));
    }
    for i in 1..=right {
        let dx = i as f64 * interval;
        repeated.extend(polygons.iter().map(|p| p.translated(dx, 0.0)));
    }
    repeated.splice(left * polygons.len()..left * polygons.len(), polygons);
    repeated
}
