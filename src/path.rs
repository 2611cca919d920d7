/// Single point of a solved [Path].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub position: f64,
    pub value: f64,
}

impl PathPoint {
    pub fn new(position: f64, value: f64) -> Self {
        PathPoint { position, value }
    }
}

/// Ordered sequence of points, one per position, together with the cost the search
/// accumulated to reach the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    points: Vec<PathPoint>,
    cost: f64,
}

impl Path {
    pub(crate) fn new(points: Vec<PathPoint>, cost: f64) -> Self {
        Path { points, cost }
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn positions(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Cost reported by the search for the terminal state.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Sum of absolute differences between consecutive values.
    pub fn total_variation(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].value - w[0].value).abs())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn accessors() {
        let path = Path::new(
            vec![
                PathPoint::new(0.5, 0.75),
                PathPoint::new(1.5, 1.05),
                PathPoint::new(2.5, 0.95),
            ],
            0.4,
        );

        assert_eq!(3, path.len());
        assert!(!path.is_empty());
        assert_eq!(vec![0.5, 1.5, 2.5], path.positions());
        assert_eq!(vec![0.75, 1.05, 0.95], path.values());
        assert_eq!(0.4, path.cost());
        assert_approx_eq!(0.4, path.total_variation(), 1e-12);
    }

    #[test]
    fn single_point_has_no_variation() {
        let path = Path::new(vec![PathPoint::new(0.0, 3.0)], 0.0);

        assert_eq!(0.0, path.total_variation());
    }
}
