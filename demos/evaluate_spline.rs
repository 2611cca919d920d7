extern crate interval_path;

use interval_path::{Interval, NaturalSpline, PathSolver};

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

    let path = PathSolver::default().solve(&positions, &intervals, 0.75).unwrap();
    let spline = NaturalSpline::from_path(&path).unwrap();

    let x_min = positions[0];
    let x_max = positions[positions.len() - 1];
    let number_of_steps = 50;
    let step = (x_max - x_min) / number_of_steps as f64;

    let mut x_vector = Vec::new();
    for i in 0..=number_of_steps {
        x_vector.push((x_min + step * i as f64).min(x_max));
    }

    let result = spline.batch_interpolate(&x_vector).unwrap();

    println!("x;y");
    for i in 0..=number_of_steps {
        println!("{:.2};{:.2}", x_vector[i], result[i]);
    }
}
