use indicatif::ProgressBar;
use miette::*;

use crate::parser::parse_machines;
use crate::report::Summary;
use crate::solver::Solver;

/// Fewest total presses to light every machine's pattern.
#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    process_with(input, &Solver::default(), &ProgressBar::hidden())
}

#[tracing::instrument(skip_all)]
pub fn process_with(input: &str, solver: &Solver, progress: &ProgressBar) -> Result<String> {
    let machines = parse_machines(input)?;
    let summary = Summary::collect(&machines, solver, progress);
    Ok(summary.binary_total.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::solver::SolverConfig;
    use rstest::rstest;

    const INPUT: &str = "[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}";

    #[test]
    fn it_works() -> Result<()> {
        assert_eq!("7", process(INPUT)?);
        Ok(())
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    #[case(25)]
    fn any_strategy_gives_the_same_total(#[case] threshold: usize) -> Result<()> {
        let solver = Solver::new(SolverConfig::default().with_exhaustive_threshold(threshold))?;
        assert_eq!("7", process_with(INPUT, &solver, &ProgressBar::hidden())?);
        Ok(())
    }
}
