//! Minimum total variation paths through a sequence of permitted value intervals.
//!
//! [PathSolver] discretizes the intervals on a fixed-step lattice and runs a Dijkstra
//! ordered search in which a [SelectionStrategy] picks the successors of each node.
//! The default [TopFractionMedian] strategy prefers values close to the current one
//! but, among those, the one nearest to the middle of the next interval.
//! [SplineFitter] and [NaturalSpline] fit a natural cubic spline through the result.
//!
//! # Example
//! ```
//! use interval_path::{Interval, NaturalSpline, PathSolver};
//!
//! let positions = vec![0.5, 1.5, 2.5, 3.5, 4.5, 5.5];
//! let intervals = Interval::from_pairs(&[
//!     (0.5, 1.0), (1.0, 1.5), (0.5, 1.0), (1.0, 1.5), (5.0, 5.5), (0.5, 1.0)
//! ]).unwrap();
//!
//! let path = PathSolver::default().solve(&positions, &intervals, 0.75).unwrap();
//! assert_eq!(6, path.len());
//! assert!((path.cost() - 8.6).abs() < 1e-9);
//!
//! let spline = NaturalSpline::from_path(&path).unwrap();
//! assert_eq!(5, spline.segments().len());
//! assert!((spline.interpolate(0.5).unwrap() - 0.75).abs() < 1e-9);
//! ```

mod interval;
mod lattice;
mod path;
mod segment;
mod selection;
mod solver;
mod spline;

pub use interval::Interval;
pub use lattice::Lattice;
pub use path::{Path, PathPoint};
pub use segment::SplineSegment;
pub use selection::{
    select_top_fraction_with_median, Exhaustive, NearestNeighbor, SelectionStrategy, TopFractionMedian,
};
pub use solver::{PathSolver, SolveError, SolverConfig};
pub use spline::{NaturalSpline, SplineError, SplineFitter};
