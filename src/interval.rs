use crate::solver::SolveError;

/// Interval represents the permitted range of values at a single position.
/// - `low` - smallest permitted value,
/// - `high` - largest permitted value.
///
/// Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    low: f64,
    high: f64,
}

impl Interval {
    /// Creates [Interval] from its bounds.
    /// # Example
    /// ```
    /// use interval_path::Interval;
    ///
    /// let interval = Interval::new(0.5, 1.0).unwrap();
    /// assert_eq!(0.75, interval.midpoint());
    /// ```
    /// # Errors
    /// Error is returned when `low` is greater than `high` or either bound is not finite.
    /// ```
    /// use interval_path::Interval;
    ///
    /// assert!(Interval::new(1.0, 0.5).is_err());
    /// assert!(Interval::new(f64::NAN, 0.5).is_err());
    /// ```
    pub fn new(low: f64, high: f64) -> Result<Self, SolveError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(SolveError::InvalidInterval(format!(
                "bounds must be finite, got [{}, {}]",
                low, high
            )));
        }
        if low > high {
            return Err(SolveError::InvalidInterval(format!(
                "low bound {} is greater than high bound {}",
                low, high
            )));
        }
        Ok(Interval { low, high })
    }

    /// Interval containing a single value.
    pub fn point(value: f64) -> Result<Self, SolveError> {
        Interval::new(value, value)
    }

    /// Builds intervals from `(low, high)` pairs, failing on the first malformed pair.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Vec<Self>, SolveError> {
        pairs
            .iter()
            .map(|(low, high)| Interval::new(*low, *high))
            .collect()
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Smallest interval covering every interval of the slice, `None` for an empty slice.
    pub fn hull(intervals: &[Interval]) -> Option<Interval> {
        let first = intervals.first()?;
        let (low, high) = intervals
            .iter()
            .fold((first.low, first.high), |(low, high), interval| {
                (low.min(interval.low), high.max(interval.high))
            });
        Some(Interval { low, high })
    }
}
