use std::{cmp::Ordering, collections::BinaryHeap};

use log::{debug, trace};
use nalgebra::DMatrix;
use thiserror::Error;

use crate::{
    interval::Interval,
    lattice::Lattice,
    path::{Path, PathPoint},
    selection::{SelectionStrategy, TopFractionMedian},
};

#[derive(Debug, Error, PartialEq)]
pub enum SolveError {
    #[error("start value {start} is outside the first interval [{low}, {high}]")]
    InvalidStart { start: f64, low: f64, high: f64 },

    #[error("invalid interval: {0}")]
    InvalidInterval(String),

    #[error("{positions} positions given for {intervals} intervals")]
    LengthMismatch { positions: usize, intervals: usize },

    #[error("positions must be finite and strictly increasing, violated at index {index}")]
    NonMonotonicInput { index: usize },

    #[error("value {value} falls outside the lattice [{min}, {max}]")]
    OutOfLattice { value: f64, min: f64, max: f64 },

    #[error("no terminal state is reachable from the start value")]
    NoPathFound,

    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),
}

/// Tunable constants of the search.
/// - `step` - lattice spacing,
/// - `top_fraction` - share of nearest candidates kept by [TopFractionMedian].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub step: f64,
    pub top_fraction: f64,
}

impl SolverConfig {
    pub const DEFAULT_STEP: f64 = 0.01;

    pub fn validate(&self) -> Result<(), SolveError> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(SolveError::InvalidConfig(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if !(self.top_fraction > 0.0 && self.top_fraction <= 1.0) {
            return Err(SolveError::InvalidConfig(format!(
                "top_fraction must be in (0, 1], got {}",
                self.top_fraction
            )));
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            step: Self::DEFAULT_STEP,
            top_fraction: TopFractionMedian::DEFAULT_FRACTION,
        }
    }
}

/// Shortest-path search over lattice values of consecutive intervals, minimizing
/// the sum of absolute value changes along the path.
///
/// Which successors a node relaxes is decided by the [SelectionStrategy] `S`.
pub struct PathSolver<S = TopFractionMedian> {
    step: f64,
    strategy: S,
}

impl PathSolver<TopFractionMedian> {
    /// Solver using [TopFractionMedian] with `config.top_fraction`.
    pub fn new(config: SolverConfig) -> Result<Self, SolveError> {
        PathSolver::with_strategy(config, TopFractionMedian::new(config.top_fraction))
    }
}

impl Default for PathSolver<TopFractionMedian> {
    fn default() -> Self {
        PathSolver {
            step: SolverConfig::DEFAULT_STEP,
            strategy: TopFractionMedian::default(),
        }
    }
}

impl<S: SelectionStrategy> PathSolver<S> {
    pub fn with_strategy(config: SolverConfig, strategy: S) -> Result<Self, SolveError> {
        config.validate()?;
        Ok(PathSolver {
            step: config.step,
            strategy,
        })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Finds the path through `intervals` starting at `start_value` on the first
    /// position.
    /// # Example
    /// ```
    /// use interval_path::{Interval, PathSolver};
    ///
    /// let positions = vec![0.0, 1.0, 2.0];
    /// let intervals = Interval::from_pairs(&[(0.0, 1.0), (2.0, 3.0), (0.0, 1.0)]).unwrap();
    ///
    /// let path = PathSolver::default().solve(&positions, &intervals, 0.5).unwrap();
    /// assert_eq!(3, path.len());
    /// assert_eq!(0.5, path.points()[0].value);
    /// ```
    /// # Errors
    /// [SolveError::InvalidStart] when `start_value` is outside the first interval,
    /// [SolveError::InvalidInterval], [SolveError::LengthMismatch] and
    /// [SolveError::NonMonotonicInput] for malformed input. Nothing is allocated for
    /// the search before these checks pass.
    pub fn solve(
        &self,
        positions: &[f64],
        intervals: &[Interval],
        start_value: f64,
    ) -> Result<Path, SolveError> {
        check_input(positions, intervals, start_value)?;

        let lattice = Lattice::covering(intervals, self.step)?;
        let columns = lattice.size();
        let last = positions.len() - 1;
        debug!(
            "lattice [{}, {}] step {} with {} values over {} positions",
            lattice.min(),
            lattice.max(),
            lattice.step(),
            columns,
            positions.len()
        );

        let cells = lattice.table_cells(positions.len())?;

        let mut distances = DMatrix::<f64>::from_element(positions.len(), columns, f64::INFINITY);
        let mut arrivals: Vec<Option<Arrival>> = vec![None; cells];
        let start_index = lattice.index_of(start_value)?;
        distances[(0, start_index)] = 0.0;
        arrivals[start_index] = Some(Arrival {
            value: start_value,
            from: None,
        });

        let mut queue = BinaryHeap::new();
        queue.push(Node {
            position: 0,
            value: start_value,
            cost: 0.0,
        });

        let mut pops = 0usize;
        let mut relaxations = 0usize;

        while let Some(node) = queue.pop() {
            pops += 1;
            let node_index = lattice.index_of(node.value)?;
            if node.cost > distances[(node.position, node_index)] {
                continue;
            }
            if node.position == last {
                continue;
            }

            let next = node.position + 1;
            let candidates = lattice.candidates(&intervals[next]);

            for selected in self.strategy.successors(&candidates, node.value, &intervals[next]) {
                let next_cost = node.cost + (selected - node.value).abs();
                let index = lattice.index_of(selected)?;

                if distances[(next, index)] > next_cost {
                    trace!(
                        "relax position {} value {} -> {} cost {}",
                        node.position,
                        node.value,
                        selected,
                        next_cost
                    );
                    distances[(next, index)] = next_cost;
                    arrivals[next * columns + index] = Some(Arrival {
                        value: selected,
                        from: Some(node_index),
                    });
                    queue.push(Node {
                        position: next,
                        value: selected,
                        cost: next_cost,
                    });
                    relaxations += 1;
                }
            }
        }

        let (best, cost) = distances
            .row(last)
            .iter()
            .copied()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .filter(|(_, cost)| cost.is_finite())
            .ok_or(SolveError::NoPathFound)?;
        debug!(
            "search finished after {} pops and {} relaxations, best cost {}",
            pops, relaxations, cost
        );

        let mut points = Vec::with_capacity(positions.len());
        let mut position = last;
        let mut index = best;
        while let Some(arrival) = arrivals[position * columns + index] {
            points.push(PathPoint::new(positions[position], arrival.value));
            match arrival.from {
                Some(from) if position > 0 => {
                    position -= 1;
                    index = from;
                }
                _ => break,
            }
        }
        if points.len() != positions.len() {
            return Err(SolveError::NoPathFound);
        }
        points.reverse();

        Ok(Path::new(points, cost))
    }

    /// Convenience form of [PathSolver::solve] taking `(low, high)` pairs.
    pub fn solve_pairs(
        &self,
        positions: &[f64],
        pairs: &[(f64, f64)],
        start_value: f64,
    ) -> Result<Path, SolveError> {
        let intervals = Interval::from_pairs(pairs)?;
        self.solve(positions, &intervals, start_value)
    }

    /// Reduced mode without positions: repeatedly applies the strategy within a single
    /// `interval`, starting at `start_value`, and returns the selected values in order.
    ///
    /// The walk stops as soon as a selection stays on, or returns to, an already
    /// visited lattice value.
    /// # Example
    /// ```
    /// use interval_path::{Interval, PathSolver};
    ///
    /// let interval = Interval::new(0.5, 1.5).unwrap();
    /// let values = PathSolver::default().solve_values(&interval, 0.6).unwrap();
    ///
    /// assert_eq!(0.6, values[0]);
    /// assert!((values[values.len() - 1] - interval.midpoint()).abs() < 1e-9);
    /// ```
    pub fn solve_values(&self, interval: &Interval, start_value: f64) -> Result<Vec<f64>, SolveError> {
        if !interval.contains(start_value) {
            return Err(SolveError::InvalidStart {
                start: start_value,
                low: interval.low(),
                high: interval.high(),
            });
        }

        let lattice = Lattice::covering(std::slice::from_ref(interval), self.step)?;
        let candidates = lattice.candidates(interval);
        let mut visited = vec![false; lattice.size()];
        visited[lattice.index_of(start_value)?] = true;

        let mut values = vec![start_value];
        let mut current = start_value;
        while let Some(next) = self.strategy.choose_next(&candidates, current, interval) {
            let index = lattice.index_of(next)?;
            if visited[index] {
                break;
            }
            visited[index] = true;
            values.push(next);
            current = next;
        }
        debug!("single interval walk selected {} values", values.len());

        Ok(values)
    }
}

fn check_input(positions: &[f64], intervals: &[Interval], start_value: f64) -> Result<(), SolveError> {
    let first = intervals
        .first()
        .ok_or_else(|| SolveError::InvalidInterval("interval sequence is empty".to_string()))?;

    if positions.len() != intervals.len() {
        return Err(SolveError::LengthMismatch {
            positions: positions.len(),
            intervals: intervals.len(),
        });
    }

    if let Some(index) = positions.iter().position(|p| !p.is_finite()) {
        return Err(SolveError::NonMonotonicInput { index });
    }
    if let Some(index) = positions.windows(2).position(|w| w[1] <= w[0]) {
        return Err(SolveError::NonMonotonicInput { index: index + 1 });
    }

    if !first.contains(start_value) {
        return Err(SolveError::InvalidStart {
            start: start_value,
            low: first.low(),
            high: first.high(),
        });
    }
    Ok(())
}

// Value that reached a lattice state and the lattice index it came from on the
// previous position. The start has no origin.
#[derive(Debug, Clone, Copy)]
struct Arrival {
    value: f64,
    from: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    position: usize,
    value: f64,
    cost: f64,
}

// BinaryHeap is a max-heap, the cheapest node has to compare greatest.
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| self.position.cmp(&other.position))
            .then_with(|| other.value.total_cmp(&self.value))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;
    use crate::selection::{select_top_fraction_with_median, Exhaustive, NearestNeighbor};

    const STEP: f64 = 0.01;

    fn scenario() -> (Vec<f64>, Vec<Interval>) {
        let positions = vec![0.5, 1.5, 2.5, 3.5, 4.5, 5.5];
        let intervals = Interval::from_pairs(&[
            (0.5, 1.0),
            (1.0, 1.5),
            (0.5, 1.0),
            (1.0, 1.5),
            (5.0, 5.5),
            (0.5, 1.0),
        ])
        .unwrap();
        (positions, intervals)
    }

    fn assert_path_is_valid(path: &Path, positions: &[f64], intervals: &[Interval]) {
        assert_eq!(positions.len(), path.len());
        for (point, (position, interval)) in path.points().iter().zip(positions.iter().zip(intervals)) {
            assert_eq!(*position, point.position);
            assert!(
                point.value >= interval.low() - STEP / 2.0 && point.value <= interval.high() + STEP / 2.0,
                "value {} outside [{}, {}]",
                point.value,
                interval.low(),
                interval.high()
            );
        }
        assert!(path.points().windows(2).all(|w| w[0].position < w[1].position));
        assert_approx_eq!(path.cost(), path.total_variation(), 1e-9);
    }

    #[test]
    fn scenario_with_default_heuristic() {
        let (positions, intervals) = scenario();
        let path = PathSolver::default().solve(&positions, &intervals, 0.75).unwrap();

        assert_path_is_valid(&path, &positions, &intervals);
        assert_eq!(0.75, path.points()[0].value);

        let expected = [0.75, 1.05, 0.95, 1.05, 5.05, 0.95];
        for (value, expected) in path.values().iter().zip(expected) {
            assert_approx_eq!(expected, *value, 1e-9);
        }
        assert_approx_eq!(8.6, path.cost(), 1e-9);

        let values = path.values();
        let jump = (values[4] - values[3]).abs() + (values[5] - values[4]).abs();
        assert!(jump > path.cost() / 2.0);
    }

    #[test]
    fn cost_matches_chain_replay() {
        let (positions, intervals) = scenario();
        let path = PathSolver::default().solve(&positions, &intervals, 0.75).unwrap();
        let lattice = Lattice::covering(&intervals, STEP).unwrap();

        let mut current = 0.75;
        let mut cost = 0.0;
        let mut replay = vec![current];
        for interval in &intervals[1..] {
            let candidates = lattice.candidates(interval);
            let next = select_top_fraction_with_median(&candidates, current, interval, 0.1).unwrap();
            cost += (next - current).abs();
            replay.push(next);
            current = next;
        }

        assert_eq!(replay, path.values());
        assert_approx_eq!(cost, path.cost(), 1e-12);
    }

    #[test]
    fn exhaustive_finds_minimal_variation() {
        let (positions, intervals) = scenario();
        let exhaustive = PathSolver::with_strategy(SolverConfig::default(), Exhaustive).unwrap();

        let optimal = exhaustive.solve(&positions, &intervals, 0.75).unwrap();
        let heuristic = PathSolver::default().solve(&positions, &intervals, 0.75).unwrap();

        assert_path_is_valid(&optimal, &positions, &intervals);
        assert_approx_eq!(8.25, optimal.cost(), 1e-9);
        assert!(optimal.cost() <= heuristic.cost());
    }

    #[test]
    fn nearest_neighbor_strategy() {
        let (positions, intervals) = scenario();
        let solver = PathSolver::with_strategy(SolverConfig::default(), NearestNeighbor).unwrap();
        let path = solver.solve(&positions, &intervals, 0.75).unwrap();

        assert_path_is_valid(&path, &positions, &intervals);
        let expected = [0.75, 1.0, 1.0, 1.0, 5.0, 1.0];
        for (value, expected) in path.values().iter().zip(expected) {
            assert_approx_eq!(expected, *value, 1e-9);
        }
        assert_approx_eq!(8.25, path.cost(), 1e-9);
    }

    #[test]
    fn start_outside_first_interval() {
        let (positions, intervals) = scenario();
        let result = PathSolver::default().solve(&positions, &intervals, 2.0);

        assert_eq!(
            Err(SolveError::InvalidStart {
                start: 2.0,
                low: 0.5,
                high: 1.0
            }),
            result
        );
        let message = result.unwrap_err().to_string();
        assert!(message.contains("[0.5, 1]"));
    }

    #[test]
    fn start_on_interval_bounds() {
        let (positions, intervals) = scenario();

        for start in [0.5, 1.0] {
            let path = PathSolver::default().solve(&positions, &intervals, start).unwrap();
            assert_path_is_valid(&path, &positions, &intervals);
            assert_eq!(start, path.points()[0].value);
        }
    }

    #[test]
    fn single_position() {
        let intervals = Interval::from_pairs(&[(0.5, 1.0)]).unwrap();
        let path = PathSolver::default().solve(&[3.0], &intervals, 0.757).unwrap();

        assert_eq!(1, path.len());
        assert_eq!(PathPoint::new(3.0, 0.757), path.points()[0]);
        assert_eq!(0.0, path.cost());
    }

    #[test]
    fn rejects_malformed_input() {
        let solver = PathSolver::default();
        let intervals = Interval::from_pairs(&[(0.5, 1.0), (1.0, 1.5)]).unwrap();

        assert!(matches!(solver.solve(&[], &[], 0.5), Err(SolveError::InvalidInterval(_))));
        assert_eq!(
            Err(SolveError::LengthMismatch {
                positions: 3,
                intervals: 2
            }),
            solver.solve(&[0.0, 1.0, 2.0], &intervals, 0.5)
        );
        assert_eq!(
            Err(SolveError::NonMonotonicInput { index: 1 }),
            solver.solve(&[1.0, 1.0], &intervals, 0.5)
        );
        assert_eq!(
            Err(SolveError::NonMonotonicInput { index: 0 }),
            solver.solve(&[f64::NAN, 1.0], &intervals, 0.5)
        );
        assert!(matches!(
            solver.solve_pairs(&[0.0, 1.0], &[(0.5, 1.0), (1.5, 1.0)], 0.5),
            Err(SolveError::InvalidInterval(_))
        ));
    }

    #[test]
    fn invalid_config() {
        let zero_step = SolverConfig {
            step: 0.0,
            ..SolverConfig::default()
        };
        let no_fraction = SolverConfig {
            top_fraction: 0.0,
            ..SolverConfig::default()
        };
        let large_fraction = SolverConfig {
            top_fraction: 1.5,
            ..SolverConfig::default()
        };

        assert!(matches!(PathSolver::new(zero_step), Err(SolveError::InvalidConfig(_))));
        assert!(PathSolver::new(no_fraction).is_err());
        assert!(PathSolver::new(large_fraction).is_err());
        assert!(PathSolver::new(SolverConfig::default()).is_ok());
    }

    #[test]
    fn tiny_step_fails_before_search() {
        let config = SolverConfig {
            step: 1e-300,
            top_fraction: 0.1,
        };
        let solver = PathSolver::new(config).unwrap();

        assert!(matches!(
            solver.solve_pairs(&[0.0, 1.0], &[(0.5, 1.0), (1.0, 1.5)], 0.75),
            Err(SolveError::InvalidConfig(_))
        ));
        let interval = Interval::new(0.5, 1.0).unwrap();
        assert!(matches!(
            solver.solve_values(&interval, 0.75),
            Err(SolveError::InvalidConfig(_))
        ));
    }

    #[test]
    fn solve_pairs_matches_solve() {
        let (positions, intervals) = scenario();
        let pairs: Vec<(f64, f64)> = intervals.iter().map(|i| (i.low(), i.high())).collect();
        let solver = PathSolver::default();

        let from_pairs = solver.solve_pairs(&positions, &pairs, 0.75).unwrap();
        let from_intervals = solver.solve(&positions, &intervals, 0.75).unwrap();

        assert_eq!(from_intervals, from_pairs);
        assert_eq!(6, from_pairs.len());
    }

    #[test]
    fn coarser_step() {
        let (positions, intervals) = scenario();
        let config = SolverConfig {
            step: 0.1,
            top_fraction: 0.1,
        };
        let solver = PathSolver::new(config).unwrap();
        assert_eq!(0.1, solver.step());

        let path = solver.solve(&positions, &intervals, 0.75).unwrap();
        assert_eq!(positions.len(), path.len());
        for (point, interval) in path.points().iter().zip(&intervals) {
            assert!(point.value >= interval.low() - 0.05 && point.value <= interval.high() + 0.05);
        }
    }

    #[test]
    fn random_intervals() {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let solver = PathSolver::default();

        for _ in 0..20 {
            let size = rng.gen_range(1..8);
            let positions: Vec<f64> = (0..size).map(|i| i as f64 + rng.gen_range(0.0..0.5)).collect();
            let intervals: Vec<Interval> = (0..size)
                .map(|_| {
                    let low = rng.gen_range(-2.0..2.0);
                    Interval::new(low, low + rng.gen_range(0.0..1.0)).unwrap()
                })
                .collect();
            let start = intervals[0].midpoint();

            let path = solver.solve(&positions, &intervals, start).unwrap();
            assert_path_is_valid(&path, &positions, &intervals);
            assert_eq!(start, path.points()[0].value);
        }
    }

    struct Stalled;

    impl SelectionStrategy for Stalled {
        fn choose_next(&self, _candidates: &[f64], _current: f64, _interval: &Interval) -> Option<f64> {
            None
        }
    }

    struct Escaping;

    impl SelectionStrategy for Escaping {
        fn choose_next(&self, _candidates: &[f64], current: f64, _interval: &Interval) -> Option<f64> {
            Some(current + 100.0)
        }
    }

    #[test]
    fn unreachable_terminal_state() {
        let (positions, intervals) = scenario();
        let solver = PathSolver::with_strategy(SolverConfig::default(), Stalled).unwrap();

        assert_eq!(Err(SolveError::NoPathFound), solver.solve(&positions, &intervals, 0.75));
    }

    #[test]
    fn selection_outside_lattice() {
        let (positions, intervals) = scenario();
        let solver = PathSolver::with_strategy(SolverConfig::default(), Escaping).unwrap();

        assert!(matches!(
            solver.solve(&positions, &intervals, 0.75),
            Err(SolveError::OutOfLattice { .. })
        ));
    }

    #[test]
    fn single_interval_walk() {
        let interval = Interval::new(0.5, 1.5).unwrap();
        let values = PathSolver::default().solve_values(&interval, 0.6).unwrap();

        assert_eq!(9, values.len());
        assert_eq!(0.6, values[0]);
        assert_approx_eq!(1.0, values[8], 1e-9);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
        assert!(values.iter().all(|v| interval.contains(*v)));
    }

    #[test]
    fn single_interval_walk_with_nearest_neighbor() {
        let interval = Interval::new(0.5, 1.5).unwrap();
        let solver = PathSolver::with_strategy(SolverConfig::default(), NearestNeighbor).unwrap();

        assert_eq!(vec![0.6], solver.solve_values(&interval, 0.6).unwrap());
    }

    #[test]
    fn single_interval_invalid_start() {
        let interval = Interval::new(0.5, 1.5).unwrap();

        assert!(matches!(
            PathSolver::default().solve_values(&interval, 1.6),
            Err(SolveError::InvalidStart { .. })
        ));
    }
}
