extern crate interval_path;

use interval_path::{Exhaustive, Interval, NearestNeighbor, PathSolver, SolverConfig};

fn main() {

    let positions = vec![0.5, 1.5, 2.5, 3.5, 4.5, 5.5];
    let intervals = Interval::from_pairs(&[
        (0.5, 1.0),
        (1.0, 1.5),
        (0.5, 1.0),
        (1.0, 1.5),
        (5.0, 5.5),
        (0.5, 1.0)
    ]).unwrap();
    let start_value = 0.75;
    let config = SolverConfig::default();

    let top_fraction = PathSolver::new(config).unwrap().solve(&positions, &intervals, start_value).unwrap();
    let nearest = PathSolver::with_strategy(config, NearestNeighbor).unwrap()
        .solve(&positions, &intervals, start_value).unwrap();
    let exhaustive = PathSolver::with_strategy(config, Exhaustive).unwrap()
        .solve(&positions, &intervals, start_value).unwrap();

    println!("x;top_fraction_median;nearest_neighbor;exhaustive");
    for i in 0..positions.len() {
        println!(
            "{:.2};{:.2};{:.2};{:.2}",
            positions[i],
            top_fraction.points()[i].value,
            nearest.points()[i].value,
            exhaustive.points()[i].value
        );
    }
    println!(
        "cost;{:.2};{:.2};{:.2}",
        top_fraction.cost(),
        nearest.cost(),
        exhaustive.cost()
    );
}
