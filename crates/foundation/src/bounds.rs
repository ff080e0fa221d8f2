use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::math::{Coordinate, Pole};

/// Geographic bounding box in radians.
///
/// A box with `east < west` wraps across the date line. `east == π` with
/// `west == -π` spans the full longitude range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLonBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Default for LatLonBox {
    fn default() -> Self {
        Self::GLOBAL
    }
}

impl LatLonBox {
    pub const GLOBAL: Self = Self {
        north: FRAC_PI_2,
        south: -FRAC_PI_2,
        east: PI,
        west: -PI,
    };

    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    pub fn crosses_date_line(&self) -> bool {
        self.east < self.west || (self.east == PI && self.west == -PI)
    }

    /// Longitude span in radians, at most a full turn.
    pub fn width(&self) -> f64 {
        let w = if self.east < self.west {
            self.east - self.west + TAU
        } else {
            self.east - self.west
        };
        w.clamp(0.0, TAU)
    }

    pub fn height(&self) -> f64 {
        (self.north - self.south).max(0.0)
    }

    pub fn is_global_lon(&self) -> bool {
        self.width() >= TAU
    }

    pub fn center(&self) -> Coordinate {
        let lat = 0.5 * (self.north + self.south);
        let lon = if self.east < self.west {
            self.west + 0.5 * self.width()
        } else {
            0.5 * (self.east + self.west)
        };
        Coordinate::new(lon, lat)
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        let (lon, lat) = (coord.lon(), coord.lat());
        if lat < self.south || lat > self.north {
            return false;
        }
        if self.is_global_lon() {
            return true;
        }
        if self.east < self.west {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        }
    }

    pub fn contains_pole(&self, pole: Pole) -> bool {
        match pole {
            Pole::North => self.north >= FRAC_PI_2,
            Pole::South => self.south <= -FRAC_PI_2,
            Pole::Any => self.north >= FRAC_PI_2 || self.south <= -FRAC_PI_2,
        }
    }

    /// Smallest box around `coords`, taking date-line crossings into
    /// account. `closed` also considers the segment from the last node back to
    /// the first.
    ///
    /// A path crossing the date line several times in the same direction, or
    /// in both directions around a pole, yields a box spanning all longitudes
    /// and reaching the pole of its hemisphere.
    pub fn from_line_string(coords: &[Coordinate], closed: bool) -> Option<Self> {
        let first = coords.first()?;
        let (mut north, mut south) = (first.lat(), first.lat());
        let (mut east, mut west) = (first.lon(), first.lon());
        if coords.len() == 1 {
            return Some(Self::new(north, south, east, west));
        }

        let mut crossed = false;
        let mut cross_state = 0i32;
        let mut max_cross_state = 0i32;
        let mut min_cross_state = 0i32;
        let (mut other_east, mut other_west) = (east, west);
        let mut previous_lon = first.lon();

        let ring_tail = if closed { Some(first) } else { None };
        for coord in coords.iter().chain(ring_tail) {
            let (lon, lat) = (coord.lon(), coord.lat());
            north = north.max(lat);
            south = south.min(lat);

            if (previous_lon < 0.0) != (lon < 0.0) && previous_lon.abs() + lon.abs() > PI {
                if !crossed {
                    other_east = lon;
                    other_west = lon;
                    crossed = true;
                }
                if previous_lon < 0.0 {
                    cross_state += 1;
                    max_cross_state = max_cross_state.max(cross_state);
                } else {
                    cross_state -= 1;
                    min_cross_state = min_cross_state.min(cross_state);
                }
            }

            if cross_state == 0 {
                east = east.max(lon);
                west = west.min(lon);
            } else {
                other_east = other_east.max(lon);
                other_west = other_west.min(lon);
            }
            previous_lon = lon;
        }

        if crossed {
            if min_cross_state < 0 {
                east = other_east;
            }
            if max_cross_state > 0 {
                west = other_west;
            }
            if (min_cross_state < 0 && max_cross_state > 0)
                || min_cross_state < -1
                || max_cross_state > 1
                || west <= east
            {
                east = PI;
                west = -PI;
                if north < 0.0 {
                    south = -FRAC_PI_2;
                } else {
                    north = FRAC_PI_2;
                }
            }
        }

        Some(Self::new(north, south, east, west))
    }
}

/// Geographic box with an altitude range in meters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLonAltBox {
    pub bbox: LatLonBox,
    pub min_alt: f64,
    pub max_alt: f64,
}

impl LatLonAltBox {
    pub fn new(bbox: LatLonBox, min_alt: f64, max_alt: f64) -> Self {
        Self {
            bbox,
            min_alt,
            max_alt,
        }
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        self.bbox.contains(coord) && coord.alt() >= self.min_alt && coord.alt() <= self.max_alt
    }
}

/// Axis-aligned screen rectangle in pixels, `y` growing downwards.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        let rect = Self::from_edges(left, top, right, bottom);
        (!rect.is_empty()).then_some(rect)
    }
}
