use log::debug;
use nalgebra::DVector;
use thiserror::Error;

use crate::{path::Path, segment::SplineSegment};

#[derive(Debug, Error, PartialEq)]
pub enum SplineError {
    #[error("spline needs at least 2 points, got {0}")]
    InsufficientPoints(usize),

    #[error("{xs} x values given for {ys} y values")]
    LengthMismatch { xs: usize, ys: usize },

    #[error("x values must be finite and strictly increasing, violated at index {index}")]
    NonMonotonicInput { index: usize },

    #[error("y value at index {index} is not finite")]
    NonFiniteValue { index: usize },

    #[error("segment {index} has zero width")]
    DegenerateSegment { index: usize },

    #[error("x = {x} is out of range [{min}, {max}]")]
    OutOfRange { x: f64, min: f64, max: f64 },
}

/// Natural cubic spline fitting: second derivative is zero at both end points and
/// value, first and second derivative are continuous at interior points.
pub struct SplineFitter;

impl SplineFitter {
    /// Segments of the natural cubic spline through `(xs[i], ys[i])`, one per pair of
    /// consecutive points.
    /// # Errors
    /// Input is validated before the tridiagonal system is solved:
    /// [SplineError::InsufficientPoints], [SplineError::LengthMismatch],
    /// [SplineError::DegenerateSegment] for repeated x values and
    /// [SplineError::NonMonotonicInput] for decreasing ones,
    /// [SplineError::NonFiniteValue] for NaN or infinite y values.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Vec<SplineSegment>, SplineError> {
        if xs.len() != ys.len() {
            return Err(SplineError::LengthMismatch { xs: xs.len(), ys: ys.len() });
        }
        if xs.len() < 2 {
            return Err(SplineError::InsufficientPoints(xs.len()));
        }
        let h = segment_widths(xs)?;
        if let Some(index) = ys.iter().position(|y| !y.is_finite()) {
            return Err(SplineError::NonFiniteValue { index });
        }

        let n = xs.len() - 1;
        let a = DVector::from_column_slice(ys);

        let mut alpha = DVector::<f64>::zeros(n + 1);
        for i in 1..n {
            alpha[i] = 3.0 * (a[i + 1] - a[i]) / h[i] - 3.0 * (a[i] - a[i - 1]) / h[i - 1];
        }

        // forward sweep of the tridiagonal system
        let mut l = DVector::<f64>::zeros(n + 1);
        let mut mu = DVector::<f64>::zeros(n + 1);
        let mut z = DVector::<f64>::zeros(n + 1);
        l[0] = 1.0;
        for i in 1..n {
            l[i] = 2.0 * (xs[i + 1] - xs[i - 1]) - h[i - 1] * mu[i - 1];
            mu[i] = h[i] / l[i];
            z[i] = (alpha[i] - h[i - 1] * z[i - 1]) / l[i];
        }
        l[n] = 1.0;

        // back substitution, c[n] = 0 is the natural boundary
        let mut b = DVector::<f64>::zeros(n);
        let mut c = DVector::<f64>::zeros(n + 1);
        let mut d = DVector::<f64>::zeros(n);
        for j in (0..n).rev() {
            c[j] = z[j] - mu[j] * c[j + 1];
            b[j] = (a[j + 1] - a[j]) / h[j] - h[j] * (c[j + 1] + 2.0 * c[j]) / 3.0;
            d[j] = (c[j + 1] - c[j]) / (3.0 * h[j]);
        }

        let segments: Vec<SplineSegment> = (0..n)
            .map(|i| SplineSegment::new(a[i], b[i], c[i], d[i], xs[i]))
            .collect();
        debug!("fitted natural cubic spline with {} segments", segments.len());
        Ok(segments)
    }

    /// Fits the positions and values of a solved [Path].
    pub fn fit_path(path: &Path) -> Result<Vec<SplineSegment>, SplineError> {
        SplineFitter::fit(&path.positions(), &path.values())
    }
}

fn segment_widths(xs: &[f64]) -> Result<DVector<f64>, SplineError> {
    if let Some(index) = xs.iter().position(|x| !x.is_finite()) {
        return Err(SplineError::NonMonotonicInput { index });
    }

    let widths: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    for (index, width) in widths.iter().enumerate() {
        if *width == 0.0 {
            return Err(SplineError::DegenerateSegment { index });
        }
        if *width < 0.0 {
            return Err(SplineError::NonMonotonicInput { index: index + 1 });
        }
    }
    Ok(DVector::from_vec(widths))
}

/// Natural cubic spline ready for evaluation.
pub struct NaturalSpline {
    segments: Vec<SplineSegment>,
    knots_x: Vec<f64>,
    min_x: f64,
    max_x: f64,
    is_knot_spacing_uniform: bool,
}

impl NaturalSpline {
    /// # Example
    /// ```
    /// use interval_path::NaturalSpline;
    /// use assert_approx_eq::assert_approx_eq;
    ///
    /// let spline = NaturalSpline::fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
    ///
    /// assert_approx_eq!(1.0, spline.interpolate(1.0).unwrap(), 1e-9);
    /// assert_approx_eq!(0.6875, spline.interpolate(0.5).unwrap(), 1e-9);
    /// assert!(spline.interpolate(2.5).is_err());
    /// ```
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, SplineError> {
        let segments = SplineFitter::fit(xs, ys)?;

        let min_x = xs[0];
        let max_x = xs[xs.len() - 1];
        let is_knot_spacing_uniform = xs
            .windows(3)
            .all(|w| ((w[2] - w[1]) - (w[1] - w[0])).abs() < 1e-12 * (max_x - min_x));

        Ok(NaturalSpline {
            segments,
            knots_x: xs.to_vec(),
            min_x,
            max_x,
            is_knot_spacing_uniform,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, SplineError> {
        NaturalSpline::fit(&path.positions(), &path.values())
    }

    pub fn segments(&self) -> &[SplineSegment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<SplineSegment> {
        self.segments
    }

    pub fn interpolate(&self, x: f64) -> Result<f64, SplineError> {
        if self.is_in_range(x) {
            let index = self.find_interval_index(x);
            Ok(self.segments[index].evaluate(x))
        } else {
            Err(self.out_of_range(x))
        }
    }

    pub fn batch_interpolate(&self, x_vector: &[f64]) -> Result<Vec<f64>, SplineError> {
        if let Some(x) = x_vector.iter().find(|x| !self.is_in_range(**x)) {
            return Err(self.out_of_range(*x));
        }

        let mut results = Vec::with_capacity(x_vector.len());
        let mut index = 0;
        for x in x_vector {
            index = self.find_interval_index_with_hint(index, *x);
            results.push(self.segments[index].evaluate(*x));
        }
        Ok(results)
    }

    /// Evaluates anywhere, continuing the first and last segment beyond the knots.
    pub fn extrapolate(&self, x: f64) -> f64 {
        match self.evaluate_on_boundaries(x) {
            Some(result) => result,
            None => self.segments[self.find_interval_index(x)].evaluate(x),
        }
    }

    pub fn batch_extrapolate(&self, x_vector: &[f64]) -> Vec<f64> {
        let mut results = Vec::with_capacity(x_vector.len());
        let mut index = 0;

        for x in x_vector {
            match self.evaluate_on_boundaries(*x) {
                Some(result) => results.push(result),
                None => {
                    index = self.find_interval_index_with_hint(index, *x);
                    results.push(self.segments[index].evaluate(*x));
                }
            }
        }
        results
    }

    fn is_in_range(&self, x: f64) -> bool {
        self.min_x <= x && x <= self.max_x
    }

    fn out_of_range(&self, x: f64) -> SplineError {
        SplineError::OutOfRange {
            x,
            min: self.min_x,
            max: self.max_x,
        }
    }

    fn find_interval_index(&self, x: f64) -> usize {
        if self.is_knot_spacing_uniform {
            self.find_interval_index_uniform(x)
        } else {
            self.find_interval_index_bisect(x)
        }
    }

    fn find_interval_index_bisect(&self, x: f64) -> usize {
        let mut min = 0;
        let mut max = self.knots_x.len() - 1;

        while max - min > 1 {
            let mid = (min + max) / 2;
            if x < self.knots_x[mid] {
                max = mid;
            } else {
                min = mid;
            }
        }
        min
    }

    fn find_interval_index_uniform(&self, x: f64) -> usize {
        let last = self.segments.len() - 1;
        let relative_x = ((x - self.min_x) / (self.max_x - self.min_x)).clamp(0.0, 1.0);
        let index = (relative_x * self.segments.len() as f64).floor() as usize;
        index.min(last)
    }

    fn find_interval_index_with_hint(&self, index_hint: usize, x: f64) -> usize {
        if self.is_in_interval_range(index_hint, x) {
            index_hint
        } else if index_hint + 1 < self.segments.len() && self.is_in_interval_range(index_hint + 1, x) {
            index_hint + 1
        } else {
            self.find_interval_index(x)
        }
    }

    fn is_in_interval_range(&self, interval_index: usize, x: f64) -> bool {
        self.knots_x[interval_index] <= x && x <= self.knots_x[interval_index + 1]
    }

    fn evaluate_on_boundaries(&self, x: f64) -> Option<f64> {
        let size = self.knots_x.len();
        if x < self.knots_x[1] {
            Some(self.segments[0].evaluate(x))
        } else if x > self.knots_x[size - 2] {
            Some(self.segments[size - 2].evaluate(x))
        } else {
            None
        }
    }
}
