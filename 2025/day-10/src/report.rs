use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::machine::Machine;
use crate::solver::{MachineReport, Outcome, Solver};

/// Totals over a whole input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub machines: usize,
    /// Sum of the solved light patterns (Part 1)
    pub binary_total: u64,
    /// Sum of the solved counter targets (Part 2)
    pub counter_total: u64,
    pub binary_skipped: usize,
    pub counter_skipped: usize,
}

impl Summary {
    /// Solves every machine in parallel and adds up the solved ones.
    ///
    /// Machines are independent, each solve owns its own memo table.
    #[tracing::instrument(skip_all, fields(machines = machines.len()))]
    pub fn collect(machines: &[Machine], solver: &Solver, progress: &ProgressBar) -> Self {
        progress.set_length(machines.len() as u64);

        let reports: Vec<MachineReport> = machines
            .par_iter()
            .progress_with(progress.clone())
            .map(|machine| solver.solve(machine))
            .collect();

        let mut summary = Summary {
            machines: machines.len(),
            ..Default::default()
        };

        for (i, (machine, report)) in machines.iter().zip(&reports).enumerate() {
            if let Some(outcome) = &report.binary {
                match outcome.presses() {
                    Some(presses) => summary.binary_total += presses,
                    None => {
                        summary.binary_skipped += 1;
                        warn!(
                            "Machine {}: light pattern SKIPPED ({}) - {} buttons, {} lights",
                            i + 1,
                            reason(outcome),
                            machine.num_buttons(),
                            machine.num_lights()
                        );
                    }
                }
            }
            if let Some(outcome) = &report.counters {
                match outcome.presses() {
                    Some(presses) => summary.counter_total += presses,
                    None => {
                        summary.counter_skipped += 1;
                        warn!(
                            "Machine {}: counters SKIPPED ({}) - {} buttons, {} counters",
                            i + 1,
                            reason(outcome),
                            machine.num_buttons(),
                            machine.num_counters()
                        );
                    }
                }
            }
        }

        info!(
            binary_skipped = summary.binary_skipped,
            counter_skipped = summary.counter_skipped,
            "Skipped {} machines out of {}",
            summary.counter_skipped,
            summary.machines
        );
        summary
    }
}

fn reason<T>(outcome: &Outcome<T>) -> String {
    match outcome {
        Outcome::Solved(_) => "solved".to_string(),
        Outcome::Unsolvable => "no solution found".to_string(),
        Outcome::DimensionExceeded { buttons, limit } => {
            format!("{buttons} buttons exceed the search limit of {limit}")
        }
        Outcome::BudgetExhausted { expanded } => {
            format!("gave up after expanding {expanded} residuals")
        }
    }
}
