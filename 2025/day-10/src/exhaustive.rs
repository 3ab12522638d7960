use bitvec::prelude::*;

use crate::effects::{EffectModel, SubsetMask};
use crate::machine::{Bits, Row};
use crate::solver::{BinarySolution, Outcome};

/// Tries every subset of buttons and keeps the lightest one that lights `target`.
///
/// Masks are visited in Gray code order, so the light state of each mask is
/// obtained from the previous one with a single XOR instead of replaying
/// [`EffectModel::apply_light_mask`]. Every mask in `[0, 2^n)` is visited exactly once.
pub fn solve(model: &EffectModel, target: &Bits, limit: usize) -> Outcome<BinarySolution> {
    let num_buttons = model.num_buttons();
    if num_buttons > limit {
        return Outcome::DimensionExceeded {
            buttons: num_buttons,
            limit,
        };
    }

    let mut state = Row::repeat(false, model.num_lights());
    let mut mask: SubsetMask = 0;
    let mut best: Option<SubsetMask> = (state.as_bitslice() == target).then_some(0);

    let num_combinations: u64 = 1 << num_buttons;
    for i in 1..num_combinations {
        // gray(i) differs from gray(i - 1) in the lowest set bit of i
        let button = i.trailing_zeros() as usize;
        mask ^= 1 << button;
        state ^= model.light_effect(button);

        let weight = EffectModel::count_bits(mask);
        if best.is_some_and(|b| EffectModel::count_bits(b) <= weight) {
            continue;
        }
        if state.as_bitslice() == target {
            best = Some(mask);
        }
    }

    match best {
        Some(mask) => {
            let mut pressed = Row::repeat(false, num_buttons);
            for b in mask.view_bits::<Lsb0>().iter_ones() {
                pressed.set(b, true);
            }
            Outcome::Solved(BinarySolution::new(pressed, true))
        }
        None => Outcome::Unsolvable,
    }
}
