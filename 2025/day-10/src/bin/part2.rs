use indicatif::{ProgressBar, ProgressStyle};
use miette::*;

use aoc2025_day_10::part2;
use aoc2025_day_10::solver::Solver;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/input2.txt").to_string());
    let input = std::fs::read_to_string(&path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {path}"))?;
    let progress = ProgressBar::no_length().with_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} machines")
            .into_diagnostic()?,
    );
    let result = part2::process_with(&input, &Solver::default(), &progress)?;
    progress.finish_and_clear();
    println!("Result: {}", result);
    Ok(())
}
