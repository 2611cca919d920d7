//! Rules deciding which lattice values a search node advances to.

use crate::interval::Interval;

/// Picks the value(s) a node at value `current` advances to, out of the candidates
/// of the next position's `interval`.
pub trait SelectionStrategy {
    /// Single preferred successor, `None` only when `candidates` is empty.
    fn choose_next(&self, candidates: &[f64], current: f64, interval: &Interval) -> Option<f64>;

    /// Every successor the search relaxes. Defaults to the single preferred one.
    fn successors(&self, candidates: &[f64], current: f64, interval: &Interval) -> Vec<f64> {
        self.choose_next(candidates, current, interval)
            .into_iter()
            .collect()
    }
}

/// Among the `fraction` of candidates closest to the current value, prefers the one
/// closest to the midpoint of the interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopFractionMedian {
    fraction: f64,
}

impl TopFractionMedian {
    pub const DEFAULT_FRACTION: f64 = 0.1;

    pub fn new(fraction: f64) -> Self {
        TopFractionMedian { fraction }
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

impl Default for TopFractionMedian {
    fn default() -> Self {
        TopFractionMedian::new(Self::DEFAULT_FRACTION)
    }
}

impl SelectionStrategy for TopFractionMedian {
    fn choose_next(&self, candidates: &[f64], current: f64, interval: &Interval) -> Option<f64> {
        select_top_fraction_with_median(candidates, current, interval, self.fraction)
    }
}

/// Candidate closest to the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NearestNeighbor;

impl SelectionStrategy for NearestNeighbor {
    fn choose_next(&self, candidates: &[f64], current: f64, _interval: &Interval) -> Option<f64> {
        closest_to(candidates.iter().copied(), current)
    }
}

/// Relaxes every candidate, turning the search into a plain Dijkstra over the lattice.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Exhaustive;

impl SelectionStrategy for Exhaustive {
    fn choose_next(&self, candidates: &[f64], current: f64, _interval: &Interval) -> Option<f64> {
        closest_to(candidates.iter().copied(), current)
    }

    fn successors(&self, candidates: &[f64], _current: f64, _interval: &Interval) -> Vec<f64> {
        candidates.to_vec()
    }
}

/// Keeps the `max(1, ceil(fraction * count))` candidates nearest to `current` and
/// returns the one of them nearest to the midpoint of `interval`.
///
/// Ties are resolved by candidate order, so the result is deterministic.
/// # Example
/// ```
/// use interval_path::{select_top_fraction_with_median, Interval};
///
/// let interval = Interval::new(1.0, 1.5).unwrap();
/// let candidates: Vec<f64> = (0..=50).map(|k| 1.0 + k as f64 * 0.01).collect();
///
/// // the six values closest to 0.75 are 1.00..=1.05, 1.05 is closest to the midpoint 1.25
/// let selected = select_top_fraction_with_median(&candidates, 0.75, &interval, 0.1).unwrap();
/// assert!((selected - 1.05).abs() < 1e-9);
/// ```
pub fn select_top_fraction_with_median(
    candidates: &[f64],
    current: f64,
    interval: &Interval,
    fraction: f64,
) -> Option<f64> {
    if candidates.is_empty() {
        return None;
    }

    let mut by_distance: Vec<(f64, f64)> = candidates
        .iter()
        .map(|candidate| ((candidate - current).abs(), *candidate))
        .collect();
    // stable, equal distances keep candidate order
    by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));

    let keep = ((candidates.len() as f64 * fraction).ceil() as usize).clamp(1, candidates.len());
    let nearest = by_distance[..keep].iter().map(|(_, candidate)| *candidate);

    closest_to(nearest, interval.midpoint())
}

fn closest_to(values: impl Iterator<Item = f64>, target: f64) -> Option<f64> {
    // min_by keeps the first of equal elements
    values.min_by(|a, b| (a - target).abs().total_cmp(&(b - target).abs()))
}
