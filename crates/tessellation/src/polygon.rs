use foundation::Vec2;

/// Screen-space point chain produced by tessellation. Open line strings
/// yield open chains; rings yield chains that return to their start.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub points: Vec<Vec2>,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Appends `p` unless it repeats the last point exactly.
    pub fn push(&mut self, p: Vec2) {
        if self.points.last() != Some(&p) {
            self.points.push(p);
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Vec2> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Vec2> {
        self.points.last().copied()
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let mut copy = self.clone();
        copy.translate(dx, dy);
        copy
    }

    /// Appends the points of `other`, skipping a duplicated joint.
    pub fn extend_from(&mut self, other: &Polygon) {
        for p in &other.points {
            self.push(*p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Polygon;
    use foundation::Vec2;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_skips_exact_repeats() {
        let mut p = Polygon::new();
        p.push(Vec2::new(1.0, 2.0));
        p.push(Vec2::new(1.0, 2.0));
        p.push(Vec2::new(3.0, 2.0));
        p.push(Vec2::new(1.0, 2.0));
        assert_eq!(p.len(), 3);
    }

    #[test]
    fn translate_moves_every_point() {
        let p = Polygon::from_points(vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 1.0)]);
        let q = p.translated(10.0, -1.0);
        assert_eq!(q.points, vec![Vec2::new(10.0, -1.0), Vec2::new(15.0, 0.0)]);
        assert_eq!(p.first(), Some(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn extend_joins_chains() {
        let mut a = Polygon::from_points(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]);
        let b = Polygon::from_points(vec![Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)]);
        a.extend_from(&b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.last(), Some(Vec2::new(2.0, 0.0)));
    }
}
