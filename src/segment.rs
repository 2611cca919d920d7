/// Cubic piece of a spline, `S(t) = a + b(t - x) + c(t - x)^2 + d(t - x)^3`, valid
/// from its left edge `x` to the left edge of the next segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineSegment {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub x: f64,
}

impl SplineSegment {
    pub fn new(a: f64, b: f64, c: f64, d: f64, x: f64) -> Self {
        SplineSegment { a, b, c, d, x }
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let dx = t - self.x;
        self.a + dx * (self.b + dx * (self.c + dx * self.d))
    }

    pub fn derivative(&self, t: f64) -> f64 {
        let dx = t - self.x;
        self.b + dx * (2.0 * self.c + dx * 3.0 * self.d)
    }

    pub fn second_derivative(&self, t: f64) -> f64 {
        2.0 * self.c + 6.0 * self.d * (t - self.x)
    }

    /// Coefficients in the order `(a, b, c, d, x)`.
    pub fn coefficients(&self) -> (f64, f64, f64, f64, f64) {
        (self.a, self.b, self.c, self.d, self.x)
    }
}
