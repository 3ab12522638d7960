use indicatif::ProgressBar;
use miette::*;

use crate::parser::parse_machines;
use crate::report::Summary;
use crate::solver::Solver;

/// Fewest total presses to bring every machine's counters to their targets.
#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    process_with(input, &Solver::default(), &ProgressBar::hidden())
}

#[tracing::instrument(skip_all)]
pub fn process_with(input: &str, solver: &Solver, progress: &ProgressBar) -> Result<String> {
    let machines = parse_machines(input)?;
    let summary = Summary::collect(&machines, solver, progress);
    Ok(summary.counter_total.to_string())
}
