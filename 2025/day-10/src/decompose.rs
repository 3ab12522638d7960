use std::collections::HashMap;

use bitvec::prelude::*;
use num_integer::Integer;
use tracing::trace;

use crate::effects::{EffectModel, SubsetMask};
use crate::machine::Row;
use crate::solver::{CounterSolution, Outcome};

/// Best first move found for a residual: press `mask` once, then twice the
/// optimum of the halved remainder, for `total` presses overall.
#[derive(Debug, Clone, Copy)]
struct Step {
    mask: SubsetMask,
    total: u64,
}

/// The expansion budget ran out.
#[derive(Debug)]
struct Exhausted;

/// Minimum-press search for the counter puzzle.
///
/// Any solution `x` splits into its odd part `m = x mod 2` (a subset of
/// buttons) and an even remainder, so
///
/// ```text
/// f(b) = min over masks m with A m <= b and A m = b (mod 2) of |m| + 2 f((b - A m) / 2)
/// ```
///
/// Residual vectors shrink by half at every level, and the memo is keyed on
/// the residual itself since different branches keep reaching the same ones.
/// A `Decomposer` solves one machine and is consumed by [`Decomposer::solve`].
pub struct Decomposer<'m> {
    model: &'m EffectModel,
    /// residual -> best step, `None` when the residual is unreachable
    memo: HashMap<Box<[u32]>, Option<Step>>,
    budget: Option<usize>,
    expanded: usize,
}

impl<'m> Decomposer<'m> {
    pub fn new(model: &'m EffectModel, budget: Option<usize>) -> Self {
        Self {
            model,
            memo: HashMap::new(),
            budget,
            expanded: 0,
        }
    }

    pub fn solve(mut self, target: &[u32], limit: usize) -> Outcome<CounterSolution> {
        let num_buttons = self.model.num_buttons();

        if target.iter().all(|&v| v == 0) {
            return Outcome::Solved(CounterSolution::new(vec![0; num_buttons]));
        }
        if num_buttons > limit {
            return Outcome::DimensionExceeded {
                buttons: num_buttons,
                limit,
            };
        }

        let outcome = match self.min_presses(target) {
            Ok(Some(total)) => {
                let solution = self.reconstruct(target);
                debug_assert_eq!(total, solution.total());
                Outcome::Solved(solution)
            }
            Ok(None) => Outcome::Unsolvable,
            Err(Exhausted) => Outcome::BudgetExhausted {
                expanded: self.expanded,
            },
        };
        trace!(expanded = self.expanded, memo = self.memo.len(), "counter search done");
        outcome
    }

    fn min_presses(&mut self, residual: &[u32]) -> Result<Option<u64>, Exhausted> {
        if residual.iter().all(|&v| v == 0) {
            return Ok(Some(0));
        }
        if let Some(step) = self.memo.get(residual) {
            return Ok(step.map(|s| s.total));
        }
        if self.budget.is_some_and(|budget| self.expanded >= budget) {
            return Err(Exhausted);
        }
        self.expanded += 1;

        let model = self.model;
        let num_buttons = model.num_buttons();
        let parity_target: Row = residual.iter().map(|v| v.is_odd()).collect();

        // Walk all masks in Gray code order, keeping their effect and parity up to date
        let mut mask: SubsetMask = 0;
        let mut effect = vec![0u32; residual.len()];
        let mut parity = Row::repeat(false, residual.len());
        let mut best: Option<Step> = None;

        let num_combinations: u64 = 1 << num_buttons;
        for i in 0..num_combinations {
            if i > 0 {
                let button = i.trailing_zeros() as usize;
                mask ^= 1 << button;
                let pressed = mask >> button & 1 == 1;
                for &c in model.counter_effect(button) {
                    if pressed {
                        effect[c] += 1;
                    } else {
                        effect[c] -= 1;
                    }
                }
                parity ^= model.counter_parity(button);
            }

            let presses = u64::from(EffectModel::count_bits(mask));
            // The halved remainder costs at least 0 more presses
            if best.is_some_and(|b| presses >= b.total) {
                continue;
            }
            if parity != parity_target {
                continue;
            }
            if residual.iter().zip(&effect).any(|(r, e)| e > r) {
                continue;
            }

            let halved: Vec<u32> = residual
                .iter()
                .zip(&effect)
                .map(|(r, e)| {
                    let remaining = r - e;
                    debug_assert!(remaining.is_even());
                    remaining / 2
                })
                .collect();

            if let Some(rest) = self.min_presses(&halved)? {
                let total = presses + 2 * rest;
                if best.map_or(true, |b| total < b.total) {
                    best = Some(Step { mask, total });
                }
            }
        }

        self.memo.insert(residual.into(), best);
        Ok(best.map(|s| s.total))
    }

    /// Replays the memoized best steps from `target` down to zero.
    ///
    /// A mask chosen at depth `d` stands for `2^d` presses of each of its buttons.
    fn reconstruct(&self, target: &[u32]) -> CounterSolution {
        let mut presses = vec![0u64; self.model.num_buttons()];
        let mut residual = target.to_vec();
        let mut weight = 1u64;

        while residual.iter().any(|&v| v != 0) {
            let Some(Some(step)) = self.memo.get(residual.as_slice()) else {
                debug_assert!(false, "residual on the optimal path was not memoized");
                break;
            };
            for b in step.mask.view_bits::<Lsb0>().iter_ones() {
                presses[b] += weight;
            }
            let effect = self.model.apply_counter_mask(step.mask);
            residual = residual
                .iter()
                .zip(&effect)
                .map(|(r, e)| (r - e) / 2)
                .collect();
            weight *= 2;
        }

        CounterSolution::new(presses)
    }
}
