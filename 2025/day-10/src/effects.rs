use crate::machine::{Bits, Machine, Row};

/// A subset of buttons: bit `i` set means button `i` is pressed.
pub type SubsetMask = u64;

/// Per-button effects of a [`Machine`], projected onto its lights and counters.
///
/// Out-of-range indices are dropped while building the model, so every
/// operation here is total.
#[derive(Debug, Clone)]
pub struct EffectModel {
    num_lights: usize,
    num_counters: usize,
    /// lights[button] = lights toggled by one press (length `num_lights`)
    lights: Vec<Row>,
    /// counters[button] = counters incremented by one press
    counters: Vec<Vec<usize>>,
    /// counter_parity[button] = `counters[button]` as a bit row (length `num_counters`)
    counter_parity: Vec<Row>,
}

impl EffectModel {
    pub fn new(machine: &Machine) -> Self {
        let num_lights = machine.num_lights();
        let num_counters = machine.num_counters();

        let lights = machine
            .buttons()
            .iter()
            .map(|button| {
                let mut row = Row::repeat(false, num_lights);
                for &i in button.light_indices() {
                    if i < num_lights {
                        row.set(i, true);
                    }
                }
                row
            })
            .collect();

        let counters: Vec<Vec<usize>> = machine
            .buttons()
            .iter()
            .map(|button| {
                button
                    .counter_indices()
                    .iter()
                    .copied()
                    .filter(|&i| i < num_counters)
                    .collect()
            })
            .collect();

        let counter_parity = counters
            .iter()
            .map(|indices| {
                let mut row = Row::repeat(false, num_counters);
                for &i in indices {
                    row.set(i, true);
                }
                row
            })
            .collect();

        Self {
            num_lights,
            num_counters,
            lights,
            counters,
            counter_parity,
        }
    }

    pub fn num_buttons(&self) -> usize {
        self.lights.len()
    }

    pub fn num_lights(&self) -> usize {
        self.num_lights
    }

    pub fn num_counters(&self) -> usize {
        self.num_counters
    }

    pub fn light_effect(&self, button: usize) -> &Bits {
        &self.lights[button]
    }

    pub fn counter_effect(&self, button: usize) -> &[usize] {
        &self.counters[button]
    }

    pub fn counter_parity(&self, button: usize) -> &Bits {
        &self.counter_parity[button]
    }

    /// Buttons selected by `mask`, ignoring bits past the last button.
    fn pressed(&self, mask: SubsetMask) -> impl Iterator<Item = usize> {
        let width = self.num_buttons().min(SubsetMask::BITS as usize);
        (0..width).filter(move |&b| mask >> b & 1 == 1)
    }

    /// Light state reached from all-off by pressing every button in `mask` once.
    pub fn apply_light_mask(&self, mask: SubsetMask) -> Row {
        let mut state = Row::repeat(false, self.num_lights);
        for b in self.pressed(mask) {
            state ^= &self.lights[b];
        }
        state
    }

    /// Number of presses in `mask`.
    pub fn count_bits(mask: SubsetMask) -> u32 {
        mask.count_ones()
    }

    /// effect[c] = how many buttons in `mask` increment counter `c`.
    pub fn apply_counter_mask(&self, mask: SubsetMask) -> Vec<u32> {
        let mut effect = vec![0; self.num_counters];
        for b in self.pressed(mask) {
            for &c in &self.counters[b] {
                effect[c] += 1;
            }
        }
        effect
    }

    /// `apply_counter_mask(mask)` reduced mod 2.
    pub fn parity_of(&self, mask: SubsetMask) -> Row {
        let mut parity = Row::repeat(false, self.num_counters);
        for b in self.pressed(mask) {
            parity ^= &self.counter_parity[b];
        }
        parity
    }

    /// Like [`Self::apply_light_mask`] for a pressed-button vector of any length.
    pub fn apply_light_presses(&self, pressed: &Bits) -> Row {
        let mut state = Row::repeat(false, self.num_lights);
        for b in pressed.iter_ones().take_while(|&b| b < self.num_buttons()) {
            state ^= &self.lights[b];
        }
        state
    }

    /// Counter values reached after pressing button `b` exactly `presses[b]` times.
    pub fn apply_counter_presses(&self, presses: &[u64]) -> Vec<u64> {
        let mut totals = vec![0; self.num_counters];
        for (indices, &count) in self.counters.iter().zip(presses) {
            for &c in indices {
                totals[c] += count;
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::machine::ButtonEffect;
    use bitvec::prelude::*;
    use rstest::rstest;

    fn sample() -> Machine {
        // [.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
        Machine::new(
            bitvec![usize, Lsb0; 0, 1, 1, 0],
            vec![3, 5, 4, 7],
            [
                vec![3],
                vec![1, 3],
                vec![2],
                vec![2, 3],
                vec![0, 2],
                vec![0, 1],
            ]
            .into_iter()
            .map(ButtonEffect::uniform)
            .collect(),
        )
    }

    #[rstest]
    #[case(0b000000, bitvec![usize, Lsb0; 0, 0, 0, 0])]
    #[case(0b000010, bitvec![usize, Lsb0; 0, 1, 0, 1])]
    #[case(0b000011, bitvec![usize, Lsb0; 0, 1, 0, 0])]
    #[case(0b010010, bitvec![usize, Lsb0; 1, 1, 1, 1])]
    #[case(0b110000, bitvec![usize, Lsb0; 0, 1, 1, 0])]
    fn light_masks(#[case] mask: SubsetMask, #[case] expected: Row) {
        assert_eq!(expected, EffectModel::new(&sample()).apply_light_mask(mask));
    }

    #[rstest]
    #[case(0b000000, vec![0, 0, 0, 0])]
    #[case(0b001011, vec![0, 1, 1, 3])]
    #[case(0b111111, vec![2, 2, 3, 3])]
    fn counter_masks_and_parity(#[case] mask: SubsetMask, #[case] expected: Vec<u32>) {
        let model = EffectModel::new(&sample());
        let effect = model.apply_counter_mask(mask);
        let parity: Row = effect.iter().map(|v| v % 2 == 1).collect();
        assert_eq!(expected, effect);
        assert_eq!(parity, model.parity_of(mask));
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let machine = Machine::new(
            bitvec![usize, Lsb0; 1, 0],
            vec![1],
            vec![ButtonEffect::uniform([0, 5, 9])],
        );
        let model = EffectModel::new(&machine);
        assert_eq!(bitvec![usize, Lsb0; 1, 0], model.apply_light_mask(0b1));
        assert_eq!(vec![1], model.apply_counter_mask(0b1));
        // bits past the last button press nothing
        assert_eq!(model.apply_light_mask(0b1), model.apply_light_mask(0b101));
    }

    #[test]
    fn counts_bits() {
        assert_eq!(0, EffectModel::count_bits(0));
        assert_eq!(3, EffectModel::count_bits(0b1011));
    }

    #[test]
    fn applies_press_counts() {
        let model = EffectModel::new(&sample());
        assert_eq!(vec![0, 1, 0, 5], model.apply_counter_presses(&[4, 1, 0, 0, 0, 0]));
        assert_eq!(
            model.apply_light_mask(0b100110),
            model.apply_light_presses(bits![usize, Lsb0; 0, 1, 1, 0, 0, 1])
        );
    }
}
