use foundation::{LatLonAltBox, ScreenRect};
use projection::Projection;
use serde::Serialize;
use tessellation::{Polygon, Tessellator};

use crate::Scene;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineReport {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub mirror_count: i32,
    pub horizon_crossings: usize,
    pub approximate_horizons: usize,
    pub polygons: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TessellationReport {
    pub projection: String,
    pub lines: Vec<LineReport>,
}

/// Geographic box in degrees, altitudes in meters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBoxReport {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub crosses_date_line: bool,
    pub min_alt: f64,
    pub max_alt: f64,
}

impl From<&LatLonAltBox> for BoundingBoxReport {
    fn from(b: &LatLonAltBox) -> Self {
        Self {
            north: b.bbox.north.to_degrees(),
            south: b.bbox.south.to_degrees(),
            east: b.bbox.east.to_degrees(),
            west: b.bbox.west.to_degrees(),
            crosses_date_line: b.bbox.crosses_date_line(),
            min_alt: b.min_alt,
            max_alt: b.max_alt,
        }
    }
}

fn points(polygon: &Polygon) -> Vec<[f64; 2]> {
    polygon.points.iter().map(|p| [p.x, p.y]).collect()
}

pub fn tessellate_scene(scene: &Scene) -> TessellationReport {
    let tessellator = Tessellator::new(&scene.viewport).with_config(scene.config.clone());
    let lines = scene
        .lines
        .iter()
        .enumerate()
        .map(|(index, named)| {
            let t = tessellator.tessellate_detailed(&named.line);
            LineReport {
                index,
                name: named.name.clone(),
                mirror_count: t.mirror_count,
                horizon_crossings: t.horizon_crossings,
                approximate_horizons: t.approximate_horizons,
                polygons: t.polygons.iter().map(points).collect(),
            }
        })
        .collect();
    TessellationReport {
        projection: scene.viewport.kind().to_string(),
        lines,
    }
}

/// Box visible in `rect`, or on the whole screen. `None` when the
/// rectangle misses the map.
pub fn scene_bounding_box(scene: &Scene, rect: Option<ScreenRect>) -> Option<BoundingBoxReport> {
    let vp = &scene.viewport;
    let rect = rect.unwrap_or_else(|| vp.screen_rect());
    vp.projection()
        .bounding_box(&rect, vp)
        .map(|b| BoundingBoxReport::from(&b))
}

/// Parses `left,top,width,height`.
pub fn parse_rect(s: &str) -> Result<ScreenRect, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .map_err(|e| format!("bad rect component {p:?}: {e}"))
        })
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [left, top, width, height] if *width >= 0.0 && *height >= 0.0 => {
            Ok(ScreenRect::new(*left, *top, *width, *height))
        }
        _ => Err(format!("expected left,top,width,height, got {s:?}")),
    }
}
