use std::f64::consts::PI;

use foundation::{Coordinate, LatLonBox, LineString, Pole, TessellationFlags, Vec2, wrap_lon};
use projection::{Projection, Viewport};

use crate::date_line;
use crate::horizon::find_horizon;
use crate::interpolate::Path;
use crate::repeat::repeat_polygons;
use crate::{Polygon, TessellationConfig};

/// Outcome of tessellating one line string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tessellation {
    pub polygons: Vec<Polygon>,
    /// Net date-line crossings, eastwards positive.
    pub mirror_count: i32,
    pub horizon_crossings: usize,
    /// Horizon crossings whose search stopped at the iteration cap.
    pub approximate_horizons: usize,
}

/// Projects line strings onto the screen of one viewport.
#[derive(Debug, Clone)]
pub struct Tessellator<'a> {
    viewport: &'a Viewport,
    config: TessellationConfig,
}

impl<'a> Tessellator<'a> {
    pub fn new(viewport: &'a Viewport) -> Self {
        Self {
            viewport,
            config: TessellationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TessellationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TessellationConfig {
        &self.config
    }

    pub fn tessellate(&self, line: &LineString) -> Vec<Polygon> {
        self.tessellate_detailed(line).polygons
    }

    /// Polygons of all `lines`, in input order.
    pub fn tessellate_all<'l, I>(&self, lines: I) -> Vec<Polygon>
    where
        I: IntoIterator<Item = &'l LineString>,
    {
        lines
            .into_iter()
            .flat_map(|line| self.tessellate(line))
            .collect()
    }

    pub fn tessellate_detailed(&self, line: &LineString) -> Tessellation {
        let Some(bbox) = line.lat_lon_alt_box() else {
            return Tessellation::default();
        };
        if !self.viewport.resolves_with_altitude(&bbox) {
            tracing::debug!(nodes = line.len(), "line string below viewport resolution");
            return Tessellation::default();
        }

        let nodes = self.kept_nodes(line);
        let mut walk = Walk::new(self.viewport, &self.config, line);

        let straight = bbox.bbox.height() == 0.0 || bbox.bbox.width() == 0.0;
        let tessellate = line.flags.tessellate && (walk.occludes || !straight);

        let mut previous: Option<(Coordinate, bool)> = None;
        let mut disappear: Option<Coordinate> = None;
        let mut orphan: Option<Coordinate> = None;
        let mut last_horizon: Option<Coordinate> = None;

        for node in nodes {
            let hidden = walk.hides(&node);
            let (prev, prev_hidden) = previous.unwrap_or((node, hidden));

            if walk.occludes && hidden != prev_hidden {
                let crossing = find_horizon(&prev, &node, self.viewport, line.flags);
                walk.horizon_crossings += 1;
                if !crossing.converged {
                    walk.approximate_horizons += 1;
                }
                let horizon = crossing.coord;

                if line.closed {
                    if let Some(gone) = disappear.take() {
                        walk.horizon_arc(&gone, &horizon);
                    } else if hidden {
                        disappear = Some(horizon);
                    } else {
                        orphan = Some(horizon);
                    }
                }
                last_horizon = Some(horizon);

                if prev_hidden {
                    let p = walk.screen(&horizon);
                    walk.current().push(p);
                    walk.connect(&horizon, &node, tessellate);
                } else {
                    walk.connect(&prev, &horizon, tessellate);
                }
            } else {
                walk.connect(&prev, &node, tessellate);
            }

            if hidden && !prev_hidden && !line.closed {
                walk.start_polygon();
            }
            previous = Some((node, hidden));
        }

        if line.closed {
            if let (Some(reappear), Some(last)) = (orphan, last_horizon) {
                walk.horizon_arc(&last, &reappear);
            }
        }

        walk.finish(line, &bbox.bbox)
    }

    /// Input nodes minus those too fine for the current zoom. The end nodes of
    /// untagged paths are always kept; rings get their first node appended
    /// again.
    fn kept_nodes(&self, line: &LineString) -> Vec<Coordinate> {
        let max_detail = self.viewport.detail_level();
        let has_detail = line.has_detail_tags();
        let is_long = line.len() > 10;

        let last = line.len().saturating_sub(1);
        let mut kept: Vec<Coordinate> = Vec::with_capacity(line.len() + 1);
        for (i, coord) in line.coords.iter().enumerate() {
            let skip = if has_detail {
                coord.detail() > max_detail
            } else {
                is_long
                    && i < last
                    && kept
                        .last()
                        .is_some_and(|prev| !self.viewport.resolves_segment(prev, coord))
            };
            if !skip {
                kept.push(*coord);
            }
        }

        if line.closed {
            if let Some(first) = line.coords.first() {
                if !(has_detail && first.detail() > max_detail) {
                    kept.push(*first);
                }
            }
        }
        kept
    }
}

/// Polygon assembly state for one line string.
struct Walk<'a> {
    viewport: &'a Viewport,
    projection: &'static dyn Projection,
    config: &'a TessellationConfig,
    flags: TessellationFlags,
    occludes: bool,
    /// Offset per date-line crossing, when the map repeats.
    period: Option<f64>,
    /// Open paths start a new polygon when they vanish behind the globe.
    late_cut: bool,
    polygons: Vec<Polygon>,
    mirror_count: i32,
    date_line_splits: usize,
    horizon_crossings: usize,
    approximate_horizons: usize,
}

impl<'a> Walk<'a> {
    fn new(viewport: &'a Viewport, config: &'a TessellationConfig, line: &LineString) -> Self {
        let projection = viewport.projection();
        let period = if viewport.repeat_x() {
            projection.repeat_period(viewport)
        } else {
            None
        };
        Self {
            viewport,
            projection,
            config,
            flags: line.flags,
            occludes: projection.occludes(),
            period,
            late_cut: !line.closed,
            polygons: vec![Polygon::new()],
            mirror_count: 0,
            date_line_splits: 0,
            horizon_crossings: 0,
            approximate_horizons: 0,
        }
    }

    fn screen(&self, coord: &Coordinate) -> Vec2 {
        self.projection.forward(coord, self.viewport).point()
    }

    fn hides(&self, coord: &Coordinate) -> bool {
        self.occludes && self.projection.forward(coord, self.viewport).occluded
    }

    fn current(&mut self) -> &mut Polygon {
        if self.polygons.is_empty() {
            self.polygons.push(Polygon::new());
        }
        let last = self.polygons.len() - 1;
        &mut self.polygons[last]
    }

    fn start_polygon(&mut self) {
        if !self.current().is_empty() {
            self.polygons.push(Polygon::new());
        }
    }

    fn connect(&mut self, a: &Coordinate, b: &Coordinate, tessellate: bool) {
        if tessellate {
            self.segment(a, b);
        } else {
            self.step(a, b);
        }
    }

    /// Emits `b`, densifying the segment from `a` when its screen image is
    /// longer than the tolerance.
    fn segment(&mut self, a: &Coordinate, b: &Coordinate) {
        let distance = (self.screen(b) - self.screen(a)).manhattan();
        let count = self.config.node_count(distance);
        if count == 0 {
            self.step(a, b);
            return;
        }
        let Some(path) = Path::between(a, b, self.flags) else {
            return;
        };

        let n = count as f64 + 1.0;
        let mut prev = *a;
        for i in 1..=count {
            let next = path.point(a, b, i as f64 / n, self.flags.follow_ground);
            self.step(&prev, &next);
            prev = next;
        }
        let end = if self.flags.follow_ground {
            b.with_altitude(0.0)
        } else {
            *b
        };
        self.step(&prev, &end);
    }

    /// Emits `b` after `a` without interpolation.
    fn step(&mut self, a: &Coordinate, b: &Coordinate) {
        let pos = self.projection.forward(b, self.viewport);
        if self.occludes {
            if !pos.occluded {
                self.current().push(pos.point());
            } else if self.late_cut {
                self.start_polygon();
            }
            return;
        }

        let crossing = date_line::crossing(a.lon(), b.lon());
        self.mirror_count += crossing;
        match self.period {
            Some(period) => {
                let dx = period * f64::from(self.mirror_count);
                self.current().push(Vec2::new(pos.x + dx, pos.y));
            }
            None => {
                if crossing != 0 {
                    self.split_at_date_line(a, b);
                }
                self.current().push(pos.point());
            }
        }
    }

    /// Ends the current polygon on the date line and starts the next one on
    /// the opposite map edge.
    fn split_at_date_line(&mut self, a: &Coordinate, b: &Coordinate) {
        let lat = date_line::crossing_latitude(a, b);
        let edge = f64::from(date_line::lon_sign(a.lon())) * PI;
        let exit = self.screen(&Coordinate::new(edge, lat));
        let entry = self.screen(&Coordinate::new(-edge, lat));
        self.current().push(exit);
        self.polygons.push(Polygon::new());
        self.current().push(entry);
        self.date_line_splits += 1;
    }

    /// Follows the globe limb from where the path disappeared to where it
    /// reappears, one degree per point.
    fn horizon_arc(&mut self, disappear: &Coordinate, reappear: &Coordinate) {
        let center = self.viewport.screen_center();
        let radius = self.viewport.radius();
        let angle_of = |p: Vec2| (p.y - center.y).atan2(p.x - center.x);

        let alpha = angle_of(self.screen(disappear));
        let beta = angle_of(self.screen(reappear));
        let diff = wrap_lon(beta - alpha);
        let sign = if diff < 0.0 { -1.0 } else { 1.0 };
        let steps = diff.abs().to_degrees() as usize;

        for i in 1..=steps {
            let angle = alpha + sign * (i as f64).to_radians();
            let p = Vec2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin());
            self.current().push(p);
        }
    }

    fn finish(mut self, line: &LineString, bbox: &LatLonBox) -> Tessellation {
        // A ring split at the date line continues from its last piece into
        // its first.
        if line.closed && self.date_line_splits > 0 && self.polygons.len() > 1 {
            if let Some(mut tail) = self.polygons.pop() {
                tail.extend_from(&self.polygons[0]);
                self.polygons[0] = tail;
            }
        }

        if line.closed && !self.occludes && bbox.is_global_lon() {
            self.close_over_pole(bbox);
        }

        self.polygons.retain(|p| p.len() > 1);
        let polygons = if self.occludes {
            self.polygons
        } else {
            repeat_polygons(self.polygons, self.viewport)
        };

        Tessellation {
            polygons,
            mirror_count: self.mirror_count,
            horizon_crossings: self.horizon_crossings,
            approximate_horizons: self.approximate_horizons,
        }
    }

    /// Pins a ring around a pole to the map edge on that pole's side.
    fn close_over_pole(&mut self, bbox: &LatLonBox) {
        let lat = if bbox.contains_pole(Pole::North) {
            self.projection.max_lat()
        } else if bbox.contains_pole(Pole::South) {
            self.projection.min_lat()
        } else {
            return;
        };
        let edge_y = self.screen(&Coordinate::new(0.0, lat)).y;

        let polygon = self.current();
        let (Some(first), Some(last)) = (polygon.first(), polygon.last()) else {
            return;
        };
        polygon.push(Vec2::new(last.x, edge_y));
        polygon.push(Vec2::new(first.x, edge_y));
        polygon.push(first);
    }
}

#[cfg(test)]
mod tests {
    use super::Tessellator;
    use crate::{DisplayProfile, TessellationConfig};
    use foundation::{Coordinate, LineString, TessellationFlags};
    use pretty_assertions::assert_eq;
    use projection::{ProjectionKind, Viewport};
    use std::f64::consts::PI;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn path(points: &[(f64, f64)]) -> Vec<Coordinate> {
        points
            .iter()
            .map(|&(lon, lat)| Coordinate::from_degrees(lon, lat))
            .collect()
    }

    fn tessellated(points: &[(f64, f64)]) -> LineString {
        LineString::new(path(points)).with_flags(TessellationFlags::tessellated())
    }

    /// 10 px per degree, date line in the middle of the screen.
    fn date_line_view(repeat: bool) -> Viewport {
        Viewport::new(ProjectionKind::Equirectangular, 720, 360, 1800.0)
            .expect("viewport")
            .centered_on(PI, 0.0)
            .with_repeat_x(repeat)
            .expect("repeat")
    }

    fn globe() -> Viewport {
        Viewport::new(ProjectionKind::Spherical, 800, 600, 200.0).expect("viewport")
    }

    #[test]
    fn interpolated_nodes_are_capped() {
        // 6.67 px per degree: the segment spans about 1000 px across.
        let vp = Viewport::new(ProjectionKind::Equirectangular, 1200, 600, 1200.0).expect("viewport");
        let line = tessellated(&[(-75.0, 0.0), (75.0, 10.0)]);

        let fine = TessellationConfig::new(1.0, 200).expect("config");
        let polygons = Tessellator::new(&vp).with_config(fine).tessellate(&line);
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].len() - 2, 200);

        let polygons = Tessellator::new(&vp).tessellate(&line);
        let interpolated = polygons[0].len() - 2;
        assert!(interpolated <= 200);
        assert!(interpolated >= 100, "{interpolated}");
    }

    #[test]
    fn constrained_profile_interpolates_less() {
        let vp = Viewport::new(ProjectionKind::Mercator, 1200, 600, 1200.0).expect("viewport");
        let line = tessellated(&[(-60.0, -20.0), (60.0, 30.0)]);
        let normal = Tessellator::new(&vp).tessellate(&line);
        let constrained = Tessellator::new(&vp)
            .with_config(TessellationConfig::default().with_profile(DisplayProfile::Constrained))
            .tessellate(&line);
        assert!(constrained[0].len() < normal[0].len());
    }

    #[test]
    fn eastward_date_line_crossing_stays_continuous() {
        let vp = date_line_view(true);
        let line = tessellated(&[(179.0, 0.0), (-179.0, 0.0)]);
        let t = Tessellator::new(&vp).tessellate_detailed(&line);
        assert_eq!(t.mirror_count, 1);
        let base = &t.polygons[0];
        assert_eq!(base.len(), 2);
        assert_close(base.points[0].x, 350.0, 1e-6);
        assert_close(base.points[1].x, 370.0, 1e-6);
    }

    #[test]
    fn tessellated_crossing_is_monotonic() {
        let vp = date_line_view(true);
        let line = tessellated(&[(179.0, 10.0), (-179.0, 12.0)]);
        let t = Tessellator::new(&vp).tessellate_detailed(&line);
        assert_eq!(t.mirror_count, 1);
        let base = &t.polygons[0];
        assert!(base.len() > 10);
        assert!(base.points.windows(2).all(|w| w[1].x > w[0].x));
        assert_close(base.last().expect("points").x, 370.0, 1e-6);
    }

    #[test]
    fn westward_crossing_counts_down() {
        let vp = date_line_view(true);
        let line = tessellated(&[(-179.0, 0.0), (179.0, 0.0)]);
        let t = Tessellator::new(&vp).tessellate_detailed(&line);
        assert_eq!(t.mirror_count, -1);
        let base = &t.polygons[0];
        assert!(base.points[1].x < base.points[0].x);
        assert!(base.points[0].x - base.points[1].x < 30.0);
    }

    #[test]
    fn crossing_without_repeat_splits_at_map_edge() {
        let vp = date_line_view(false);
        let line = tessellated(&[(179.0, 0.0), (-179.0, 0.0)]);
        let polygons = Tessellator::new(&vp).tessellate(&line);
        assert_eq!(polygons.len(), 2);
        assert_close(polygons[0].last().expect("exit").x, 360.0, 1e-6);
        assert_close(polygons[1].first().expect("entry").x, 360.0 - 3600.0, 1e-6);
    }

    #[test]
    fn open_path_ends_at_the_horizon() {
        let vp = globe();
        let line = tessellated(&[(0.0, 0.0), (150.0, 0.0)]);
        let t = Tessellator::new(&vp).tessellate_detailed(&line);
        assert_eq!(t.horizon_crossings, 1);
        assert_eq!(t.polygons.len(), 1);
        let end = t.polygons[0].last().expect("points");
        assert_close(end.x, 600.0, 1.0);
        assert!(t.polygons[0].points.iter().all(|p| p.x <= 600.0 + 1e-6));
    }

    #[test]
    fn open_path_behind_the_globe_splits() {
        let vp = globe();
        let line = tessellated(&[(-45.0, 0.0), (-135.0, 0.0), (135.0, 0.0), (45.0, 0.0)]);
        let t = Tessellator::new(&vp).tessellate_detailed(&line);
        assert_eq!(t.horizon_crossings, 2);
        assert_eq!(t.polygons.len(), 2);
        assert_close(t.polygons[0].last().expect("points").x, 200.0, 1.0);
        assert_close(t.polygons[1].first().expect("points").x, 600.0, 1.0);
    }

    #[test]
    fn ring_behind_the_globe_follows_the_limb() {
        let vp = globe();
        let ring = LineString::ring(path(&[(-45.0, 30.0), (-135.0, 30.0), (135.0, 30.0), (45.0, 30.0)]))
            .with_flags(TessellationFlags::tessellated());
        let t = Tessellator::new(&vp).tessellate_detailed(&ring);
        assert_eq!(t.polygons.len(), 1);
        let center = vp.screen_center();
        let distances: Vec<f64> = t.polygons[0]
            .points
            .iter()
            .map(|p| (*p - center).length())
            .collect();
        assert!(distances.iter().all(|&d| d <= 200.0 + 1e-6));
        let on_limb = distances.iter().filter(|&&d| d > 199.0).count();
        assert!(on_limb > 10, "{on_limb}");
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let vp = globe().centered_on(0.4, 0.2);
        let line = tessellated(&[(-80.0, 10.0), (20.0, 50.0), (120.0, -10.0), (170.0, 40.0)]);
        let tessellator = Tessellator::new(&vp);
        assert_eq!(tessellator.tessellate(&line), tessellator.tessellate(&line));
    }

    #[test]
    fn ring_around_the_south_pole_closes_along_the_bottom() {
        // One pixel per degree, whole world on screen.
        let vp = Viewport::new(ProjectionKind::Equirectangular, 720, 360, 180.0).expect("viewport");
        let lons = (0..=12).map(|i| -180.0 + 30.0 * f64::from(i));
        let ring = LineString::ring(lons.map(|lon| Coordinate::from_degrees(lon, -70.0)).collect());
        let polygons = Tessellator::new(&vp).tessellate(&ring);
        assert_eq!(polygons.len(), 1);
        let points = &polygons[0].points;
        assert_eq!(points.len(), 16);
        let n = points.len();
        assert_close(points[n - 3].x, 540.0, 1e-6);
        assert_close(points[n - 3].y, 270.0, 1e-6);
        assert_close(points[n - 2].x, 180.0, 1e-6);
        assert_close(points[n - 2].y, 270.0, 1e-6);
        assert_eq!(points[n - 1], points[0]);
    }

    #[test]
    fn repeating_map_copies_polygons() {
        let vp = Viewport::new(ProjectionKind::Equirectangular, 1100, 400, 100.0)
            .expect("viewport")
            .with_repeat_x(true)
            .expect("repeat");
        let line = tessellated(&[(-60.0, 0.0), (60.0, 30.0)]);
        let polygons = Tessellator::new(&vp).tessellate(&line);
        assert_eq!(polygons.len(), 7);
        for pair in polygons.windows(2) {
            assert_close(pair[1].points[0].x - pair[0].points[0].x, 200.0, 1e-6);
        }
    }

    #[test]
    fn detail_tags_drop_fine_nodes() {
        let vp = Viewport::new(ProjectionKind::Equirectangular, 720, 360, 180.0).expect("viewport");
        let coords = vec![
            Coordinate::from_degrees(0.0, 0.0).with_detail(1),
            Coordinate::from_degrees(10.0, 10.0).with_detail(17),
            Coordinate::from_degrees(20.0, 0.0).with_detail(1),
        ];
        let polygons = Tessellator::new(&vp).tessellate(&LineString::new(coords));
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].len(), 2);
    }

    #[test]
    fn unresolved_paths_produce_nothing() {
        let vp = Viewport::new(ProjectionKind::Equirectangular, 720, 360, 180.0).expect("viewport");
        let tiny = tessellated(&[(10.0, 10.0), (10.001, 10.001)]);
        assert!(Tessellator::new(&vp).tessellate(&tiny).is_empty());
        assert!(Tessellator::new(&vp).tessellate(&LineString::default()).is_empty());
    }

    #[test]
    fn tessellate_all_keeps_input_order() {
        let vp = Viewport::new(ProjectionKind::Equirectangular, 720, 360, 180.0).expect("viewport");
        let a = tessellated(&[(-100.0, 0.0), (-90.0, 0.0)]);
        let b = tessellated(&[(90.0, 0.0), (100.0, 0.0)]);
        let polygons = Tessellator::new(&vp).tessellate_all([&a, &b]);
        assert_eq!(polygons.len(), 2);
        assert!(polygons[0].points[0].x < polygons[1].points[0].x);
    }
}
