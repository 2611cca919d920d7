extern crate interval_path;

use interval_path::{Interval, PathSolver, SplineFitter};

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

    let start_value = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f64>().ok())
        .unwrap_or(0.75);

    let path = match PathSolver::default().solve(&positions, &intervals, start_value) {
        Ok(path) => path,
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    };

    println!("path (cost {:.2}):", path.cost());
    for point in path.points() {
        println!("({}, {:.2})", point.position, point.value);
    }

    let segments = SplineFitter::fit_path(&path).unwrap();
    println!("cubic spline coefficients:");
    for s in segments {
        println!(
            "S(x) = {:.4} + {:.4}(x - {}) + {:.4}(x - {})^2 + {:.4}(x - {})^3",
            s.a, s.b, s.x, s.c, s.x, s.d, s.x
        );
    }
}
