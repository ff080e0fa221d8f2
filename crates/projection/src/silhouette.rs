use std::f64::consts::TAU;

use foundation::{ScreenRect, Vec2};

/// Keeps border samples strictly inside the region so inverse projection of
/// the outermost pixels does not fall off the map through rounding.
const INSET_PX: f64 = 1e-6;

/// Angular step of limb samples.
const LIMB_STEP: f64 = TAU / 360.0;

/// Screen region covered by the map.
///
/// All predicates use plain `f64` geometry, for every projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Silhouette {
    /// Horizontal band of a cylindrical map, clamped to the screen.
    Band(ScreenRect),
    /// The map covers the whole screen rectangle.
    Full(ScreenRect),
    /// Globe disk intersected with the screen rectangle `clip`.
    Disk {
        center: Vec2,
        radius: f64,
        clip: ScreenRect,
    },
}

impl Silhouette {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Silhouette::Band(rect) | Silhouette::Full(rect) => rect.contains(x, y),
            Silhouette::Disk {
                center,
                radius,
                clip,
            } => {
                let d = Vec2::new(x, y) - *center;
                clip.contains(x, y) && d.x * d.x + d.y * d.y < radius * radius
            }
        }
    }

    /// Like [`Silhouette::contains`], but points within `margin` pixels of the
    /// globe limb count as outside.
    pub fn contains_inset(&self, x: f64, y: f64, margin: f64) -> bool {
        match self {
            Silhouette::Band(rect) | Silhouette::Full(rect) => rect.contains(x, y),
            Silhouette::Disk {
                center,
                radius,
                clip,
            } => {
                let inner = (radius - margin).max(0.0);
                let d = Vec2::new(x, y) - *center;
                clip.contains(x, y) && d.x * d.x + d.y * d.y < inner * inner
            }
        }
    }

    /// Smallest screen rectangle around the region, `None` if it is empty.
    pub fn bounding_rect(&self) -> Option<ScreenRect> {
        match self {
            Silhouette::Band(rect) | Silhouette::Full(rect) => (!rect.is_empty()).then_some(*rect),
            Silhouette::Disk {
                center,
                radius,
                clip,
            } => ScreenRect::new(
                center.x - radius,
                center.y - radius,
                2.0 * radius,
                2.0 * radius,
            )
            .intersect(clip),
        }
    }

    /// Points along the border of the region inside `rect`, in ring order,
    /// spaced about `stride` pixels apart.
    pub fn border_samples(&self, rect: &ScreenRect, stride: f64) -> Vec<Vec2> {
        let Some(bounds) = self.bounding_rect() else {
            return Vec::new();
        };
        let Some(area) = bounds.intersect(rect) else {
            return Vec::new();
        };

        match self {
            Silhouette::Band(_) | Silhouette::Full(_) => rect_ring(&area, stride),
            Silhouette::Disk { center, radius, .. } => {
                disk_ring(&area, *center, *radius, stride)
            }
        }
    }
}

/// Rectangle border walked clockwise from the top-left corner.
fn rect_ring(rect: &ScreenRect, stride: f64) -> Vec<Vec2> {
    let left = rect.left + INSET_PX;
    let right = rect.right() - INSET_PX;
    let top = rect.top + INSET_PX;
    let bottom = rect.bottom() - INSET_PX;
    if right < left || bottom < top {
        return vec![Vec2::new(0.5 * (left + right), 0.5 * (top + bottom))];
    }

    let mut ring = Vec::new();
    walk(&mut ring, Vec2::new(left, top), Vec2::new(right, top), stride);
    walk(&mut ring, Vec2::new(right, top), Vec2::new(right, bottom), stride);
    walk(&mut ring, Vec2::new(right, bottom), Vec2::new(left, bottom), stride);
    walk(&mut ring, Vec2::new(left, bottom), Vec2::new(left, top), stride);
    ring
}

/// Samples from `from` (inclusive) towards `to` (exclusive).
fn walk(ring: &mut Vec<Vec2>, from: Vec2, to: Vec2, stride: f64) {
    let d = to - from;
    let steps = (d.length() / stride).ceil().max(1.0) as usize;
    for i in 0..steps {
        let t = i as f64 / steps as f64;
        ring.push(Vec2::new(from.x + d.x * t, from.y + d.y * t));
    }
}

/// Border of `rect ∩ disk`. The region is convex, so ordering rectangle and
/// limb samples by angle around their centroid yields the ring.
fn disk_ring(rect: &ScreenRect, center: Vec2, radius: f64, stride: f64) -> Vec<Vec2> {
    let inside_disk = |p: &Vec2| {
        let d = *p - center;
        d.x * d.x + d.y * d.y < radius * radius
    };

    let mut samples: Vec<Vec2> = rect_ring(rect, stride)
        .into_iter()
        .filter(inside_disk)
        .collect();

    let limb = radius * (1.0 - 1e-9);
    let steps = (TAU / LIMB_STEP).round() as usize;
    samples.extend((0..steps).filter_map(|i| {
        let angle = i as f64 * LIMB_STEP;
        let p = Vec2::new(center.x + limb * angle.cos(), center.y + limb * angle.sin());
        rect.contains(p.x, p.y).then_some(p)
    }));

    if samples.len() < 3 {
        return samples;
    }

    let n = samples.len() as f64;
    let centroid = samples
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + *p);
    let centroid = Vec2::new(centroid.x / n, centroid.y / n);
    samples.sort_by(|a, b| {
        let ta = (a.y - centroid.y).atan2(a.x - centroid.x);
        let tb = (b.y - centroid.y).atan2(b.x - centroid.x);
        ta.total_cmp(&tb)
    });
    samples
}
