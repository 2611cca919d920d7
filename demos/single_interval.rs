extern crate interval_path;

use interval_path::{Interval, PathSolver};

fn main() {

    let interval = Interval::new(0.5, 1.5).unwrap();

    let start_value = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f64>().ok())
        .unwrap_or(0.6);

    match PathSolver::default().solve_values(&interval, start_value) {
        Ok(values) => {
            for value in values {
                println!("{:.2}", value);
            }
        }
        Err(error) => eprintln!("{}", error),
    }
}
