use miette::*;
use tracing::debug;

use crate::decompose::Decomposer;
use crate::effects::EffectModel;
use crate::exhaustive;
use crate::gf2::LinearSystem;
use crate::machine::{Bits, Machine, Row};

// -----------------------------------------------------------------------------
// Constants & Configuration
// -----------------------------------------------------------------------------

/// Widest subset enumeration a [`crate::effects::SubsetMask`] can represent.
pub const MAX_MASK_BITS: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Binary machines with at most this many buttons are brute-forced,
    /// larger ones go through Gaussian elimination.
    pub exhaustive_threshold: usize,
    /// Largest button count for which a `2^n` subset enumeration is attempted.
    pub search_limit: usize,
    /// Largest null space searched for the minimum-weight GF(2) solution.
    pub max_nullity: usize,
    /// Distinct residual vectors the counter solver may expand per machine.
    pub expansion_budget: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            exhaustive_threshold: 12,
            search_limit: 25,
            max_nullity: 20,
            expansion_budget: Some(200_000),
        }
    }
}

impl SolverConfig {
    pub fn with_exhaustive_threshold(mut self, buttons: usize) -> Self {
        self.exhaustive_threshold = buttons;
        self
    }

    pub fn with_search_limit(mut self, buttons: usize) -> Self {
        self.search_limit = buttons;
        self
    }

    pub fn with_max_nullity(mut self, nullity: usize) -> Self {
        self.max_nullity = nullity;
        self
    }

    pub fn with_expansion_budget(mut self, budget: Option<usize>) -> Self {
        self.expansion_budget = budget;
        self
    }

    pub fn validate(self) -> Result<Self> {
        if self.search_limit > MAX_MASK_BITS {
            bail!(
                "search limit {} exceeds the {}-bit subset mask",
                self.search_limit,
                MAX_MASK_BITS
            );
        }
        if self.max_nullity > MAX_MASK_BITS {
            bail!(
                "null space limit {} exceeds the {}-bit subset mask",
                self.max_nullity,
                MAX_MASK_BITS
            );
        }
        if self.exhaustive_threshold > self.search_limit {
            bail!(
                "exhaustive threshold {} is above the search limit {}",
                self.exhaustive_threshold,
                self.search_limit
            );
        }
        if self.expansion_budget == Some(0) {
            bail!("expansion budget must allow at least one expansion");
        }
        Ok(self)
    }
}

// -----------------------------------------------------------------------------
// Outcomes
// -----------------------------------------------------------------------------

/// Result of one solve. Only `Solved` carries an answer; the other variants
/// tell the caller why there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Solved(T),
    /// No combination of presses reaches the target.
    Unsolvable,
    /// Too many buttons for an exact subset enumeration.
    DimensionExceeded { buttons: usize, limit: usize },
    /// The counter search gave up after expanding this many residuals.
    BudgetExhausted { expanded: usize },
}

impl<T> Outcome<T> {
    pub fn solution(&self) -> Option<&T> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Solved(solution) => Outcome::Solved(f(solution)),
            Outcome::Unsolvable => Outcome::Unsolvable,
            Outcome::DimensionExceeded { buttons, limit } => {
                Outcome::DimensionExceeded { buttons, limit }
            }
            Outcome::BudgetExhausted { expanded } => Outcome::BudgetExhausted { expanded },
        }
    }
}

/// Anything that reports a total number of button presses.
pub trait Presses {
    fn presses(&self) -> u64;
}

impl<T: Presses> Outcome<T> {
    pub fn presses(&self) -> Option<u64> {
        self.solution().map(Presses::presses)
    }
}

/// Buttons to press once each in binary mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinarySolution {
    pressed: Row,
    /// False when the weight is not proven to be the minimum.
    minimal: bool,
}

impl BinarySolution {
    pub fn new(pressed: Row, minimal: bool) -> Self {
        Self { pressed, minimal }
    }

    pub fn pressed(&self) -> &Bits {
        &self.pressed
    }

    pub fn is_minimal(&self) -> bool {
        self.minimal
    }
}

impl Presses for BinarySolution {
    fn presses(&self) -> u64 {
        self.pressed.count_ones() as u64
    }
}

/// How many times each button is pressed in counter mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterSolution {
    presses: Vec<u64>,
}

impl CounterSolution {
    pub fn new(presses: Vec<u64>) -> Self {
        Self { presses }
    }

    pub fn presses(&self) -> &[u64] {
        &self.presses
    }

    pub fn total(&self) -> u64 {
        self.presses.iter().sum()
    }
}

impl Presses for CounterSolution {
    fn presses(&self) -> u64 {
        self.total()
    }
}

// -----------------------------------------------------------------------------
// Dispatch
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryStrategy {
    Exhaustive,
    Linear,
}

/// Outcomes of one machine; `None` where the machine has no such objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineReport {
    pub binary: Option<Outcome<BinarySolution>>,
    pub counters: Option<Outcome<CounterSolution>>,
}

#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Result<Self> {
        Ok(Self {
            config: config.validate()?,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn strategy_for(&self, machine: &Machine) -> BinaryStrategy {
        if machine.num_buttons() <= self.config.exhaustive_threshold {
            BinaryStrategy::Exhaustive
        } else {
            BinaryStrategy::Linear
        }
    }

    /// Fewest presses (each button at most once) that light exactly the target pattern.
    #[tracing::instrument(level = "trace", skip_all, fields(buttons = machine.num_buttons()))]
    pub fn solve_binary(&self, machine: &Machine) -> Outcome<BinarySolution> {
        let model = EffectModel::new(machine);
        let strategy = self.strategy_for(machine);
        debug!(?strategy, lights = machine.num_lights(), "solving light pattern");

        match strategy {
            BinaryStrategy::Exhaustive => {
                exhaustive::solve(&model, machine.light_target(), self.config.search_limit)
            }
            BinaryStrategy::Linear => LinearSystem::new(&model, machine.light_target())
                .solve(self.config.max_nullity)
                .map_or(Outcome::Unsolvable, Outcome::Solved),
        }
    }

    /// Fewest presses (buttons may repeat) that bring every counter to its target.
    #[tracing::instrument(level = "trace", skip_all, fields(buttons = machine.num_buttons()))]
    pub fn solve_counters(&self, machine: &Machine) -> Outcome<CounterSolution> {
        let model = EffectModel::new(machine);
        Decomposer::new(&model, self.config.expansion_budget)
            .solve(machine.counter_target(), self.config.search_limit)
    }

    pub fn solve(&self, machine: &Machine) -> MachineReport {
        MachineReport {
            binary: machine
                .has_binary_objective()
                .then(|| self.solve_binary(machine)),
            counters: machine
                .has_counter_objective()
                .then(|| self.solve_counters(machine)),
        }
    }
}

/// [`Solver::solve_binary`] with the default configuration.
pub fn solve_binary(machine: &Machine) -> Outcome<BinarySolution> {
    Solver::default().solve_binary(machine)
}

/// [`Solver::solve_counters`] with the default configuration.
pub fn solve_counters(machine: &Machine) -> Outcome<CounterSolution> {
    Solver::default().solve_counters(machine)
}
