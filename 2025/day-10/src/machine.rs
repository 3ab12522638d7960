use bitvec::prelude::*;
use itertools::Itertools;

use crate::effects::EffectModel;
use crate::solver::{BinarySolution, CounterSolution};

/// Owned bit vector, index 0 in the least significant bit of the first word.
pub type Row = BitVec<usize, Lsb0>;

/// Borrowed view of a [`Row`].
pub type Bits = BitSlice<usize, Lsb0>;

/// What a single press of a button does.
///
/// Both projections are index sets: duplicates are collapsed and the order is
/// canonical. Indices beyond the machine's lights/counters are kept here and
/// ignored when the effect is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ButtonEffect {
    light_indices: Vec<usize>,
    counter_indices: Vec<usize>,
}

impl ButtonEffect {
    pub fn new(
        light_indices: impl IntoIterator<Item = usize>,
        counter_indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            light_indices: canonical(light_indices),
            counter_indices: canonical(counter_indices),
        }
    }

    /// A button wired to the same indices on the light panel and on the counters,
    /// which is how the puzzle input describes every button.
    pub fn uniform(indices: impl IntoIterator<Item = usize>) -> Self {
        let indices = canonical(indices);
        Self {
            light_indices: indices.clone(),
            counter_indices: indices,
        }
    }

    pub fn light_indices(&self) -> &[usize] {
        &self.light_indices
    }

    pub fn counter_indices(&self) -> &[usize] {
        &self.counter_indices
    }
}

fn canonical(indices: impl IntoIterator<Item = usize>) -> Vec<usize> {
    indices.into_iter().sorted_unstable().dedup().collect()
}

/// One parsed machine. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    /// Light pattern to reach (b vector in binary mode)
    light_target: Row,
    /// Counter values to reach (b vector in counter mode)
    counter_target: Vec<u32>,
    /// Buttons in input order (A matrix columns)
    buttons: Vec<ButtonEffect>,
}

impl Machine {
    pub fn new(light_target: Row, counter_target: Vec<u32>, buttons: Vec<ButtonEffect>) -> Self {
        Self {
            light_target,
            counter_target,
            buttons,
        }
    }

    pub fn light_target(&self) -> &Bits {
        &self.light_target
    }

    pub fn counter_target(&self) -> &[u32] {
        &self.counter_target
    }

    pub fn buttons(&self) -> &[ButtonEffect] {
        &self.buttons
    }

    pub fn num_lights(&self) -> usize {
        self.light_target.len()
    }

    pub fn num_counters(&self) -> usize {
        self.counter_target.len()
    }

    pub fn num_buttons(&self) -> usize {
        self.buttons.len()
    }

    pub fn has_binary_objective(&self) -> bool {
        !self.light_target.is_empty()
    }

    pub fn has_counter_objective(&self) -> bool {
        !self.counter_target.is_empty()
    }

    /// Whether pressing the buttons of `solution` once each lights exactly the target pattern.
    pub fn verify_lights(&self, solution: &BinarySolution) -> bool {
        solution.pressed().len() == self.num_buttons()
            && EffectModel::new(self).apply_light_presses(solution.pressed()) == self.light_target
    }

    /// Whether the press counts of `solution` add up to exactly the counter target.
    pub fn verify_counters(&self, solution: &CounterSolution) -> bool {
        solution.presses().len() == self.num_buttons()
            && EffectModel::new(self)
                .apply_counter_presses(solution.presses())
                .iter()
                .zip_eq(&self.counter_target)
                .all(|(&reached, &wanted)| reached == u64::from(wanted))
    }
}
