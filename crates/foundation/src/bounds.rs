/// Axis-aligned bounding box in (lon, lat) degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Tight box around `points`, or `None` when there are none.
    pub fn from_points(points: &[[f64; 2]]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in points.iter().skip(1) {
            min[0] = min[0].min(p[0]);
            min[1] = min[1].min(p[1]);
            max[0] = max[0].max(p[0]);
            max[1] = max[1].max(p[1]);
        }
        Some(Aabb2 { min, max })
    }

    /// Inclusive on all edges.
    pub fn contains(&self, p: [f64; 2]) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use pretty_assertions::assert_eq;

    #[test]
    fn from_points_spans_all_points() {
        let b = Aabb2::from_points(&[[0.0, 5.0], [10.0, -2.0], [3.0, 8.0]]).expect("bounds");
        assert_eq!(b, Aabb2::new([0.0, -2.0], [10.0, 8.0]));
        assert!(b.contains([10.0, 8.0]));
        assert!(!b.contains([10.5, 0.0]));
        assert!(Aabb2::from_points(&[]).is_none());
    }
}
