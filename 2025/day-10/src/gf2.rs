use tracing::debug;

use crate::effects::EffectModel;
use crate::machine::{Bits, Row};
use crate::solver::BinarySolution;

/// The light puzzle as `A x = b` over GF(2).
pub struct LinearSystem {
    /// Augmented matrix [A | b], one row per light
    matrix: Vec<Row>,
    num_vars: usize,
    num_eqs: usize,
    /// col_to_pivot[button] = row holding that button's pivot
    col_to_pivot: Vec<Option<usize>>,
    /// Buttons whose column never got a pivot
    free_vars: Vec<usize>,
    reduced: bool,
}

impl LinearSystem {
    pub fn new(model: &EffectModel, target: &Bits) -> Self {
        let num_eqs = model.num_lights();
        let num_vars = model.num_buttons();

        let mut matrix = vec![Row::repeat(false, num_vars + 1); num_eqs];

        for c in 0..num_vars {
            for r in model.light_effect(c).iter_ones() {
                matrix[r].set(c, true);
            }
        }
        for r in target.iter_ones().take_while(|&r| r < num_eqs) {
            matrix[r].set(num_vars, true);
        }

        Self {
            matrix,
            num_vars,
            num_eqs,
            col_to_pivot: vec![None; num_vars],
            free_vars: Vec::new(),
            reduced: false,
        }
    }

    /// Gaussian elimination into Reduced Row Echelon Form.
    ///
    /// Returns false when a row reads `0 = 1`, i.e. the pattern is unreachable.
    pub fn reduce(&mut self) -> bool {
        if !self.reduced {
            self.eliminate();
            self.reduced = true;
        }

        // Rows past the rank have an all-zero coefficient part
        let rank = self.rank();
        self.matrix[rank..]
            .iter()
            .all(|row| !row[self.num_vars])
    }

    fn eliminate(&mut self) {
        let mut pivot_row = 0;

        for c in 0..self.num_vars {
            if pivot_row >= self.num_eqs {
                self.free_vars.push(c);
                continue;
            }

            let Some(r) = (pivot_row..self.num_eqs).find(|&r| self.matrix[r][c]) else {
                self.free_vars.push(c);
                continue;
            };

            self.matrix.swap(pivot_row, r);
            self.col_to_pivot[c] = Some(pivot_row);

            let pivot_vec = self.matrix[pivot_row].clone();

            // Clear column c everywhere else, above the pivot too
            for (i, row) in self.matrix.iter_mut().enumerate() {
                if i != pivot_row && row[c] {
                    *row ^= &pivot_vec;
                }
            }
            pivot_row += 1;
        }
    }

    pub fn rank(&self) -> usize {
        self.num_vars - self.free_vars.len()
    }

    pub fn nullity(&self) -> usize {
        self.free_vars.len()
    }

    /// The solution with every free variable set to 0.
    ///
    /// Since the matrix is in RREF, each pivot variable simply takes the value
    /// of the augmented column in its row.
    pub fn particular_solution(&self) -> Row {
        let mut x_p = Row::repeat(false, self.num_vars);
        for (c, pivot) in self.col_to_pivot.iter().enumerate() {
            if let Some(r) = *pivot {
                x_p.set(c, self.matrix[r][self.num_vars]);
            }
        }
        x_p
    }

    /// One basis vector per free variable `f`: `x_f = 1`, other free variables 0.
    ///
    /// In RREF a pivot row only mentions its own pivot and free columns, so
    /// the pivot variable of row `r` equals `matrix[r][f]`.
    pub fn null_space(&self) -> Vec<Row> {
        self.free_vars
            .iter()
            .map(|&f| {
                let mut v = Row::repeat(false, self.num_vars);
                v.set(f, true);
                for (c, pivot) in self.col_to_pivot.iter().enumerate() {
                    if let Some(r) = *pivot {
                        v.set(c, self.matrix[r][f]);
                    }
                }
                v
            })
            .collect()
    }

    /// Solves for the fewest presses.
    ///
    /// The whole null space is walked in Gray code order when it has at most
    /// `2^max_nullity` elements, which makes the answer exact. Beyond that the
    /// free-variables-zero solution is returned and marked as not minimal.
    pub fn solve(mut self, max_nullity: usize) -> Option<BinarySolution> {
        if !self.reduce() {
            return None;
        }

        let mut current = self.particular_solution();
        let basis = self.null_space();
        let k = basis.len();

        if k > max_nullity {
            debug!(nullity = k, max_nullity, "null space too large, returning a feasible solution");
            return Some(BinarySolution::new(current, false));
        }

        let mut best = current.clone();
        let mut min_weight = current.count_ones();

        let num_combinations: u64 = 1 << k;
        for i in 1..num_combinations {
            current ^= &basis[i.trailing_zeros() as usize];

            let weight = current.count_ones();
            if weight < min_weight {
                min_weight = weight;
                best.copy_from_bitslice(&current);
            }
        }

        Some(BinarySolution::new(best, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::exhaustive;
    use crate::parser::parse_machine;
    use crate::solver::{Outcome, Presses};
    use miette::Result;
    use rstest::rstest;

    fn system(line: &str) -> Result<(crate::machine::Machine, EffectModel)> {
        let machine = parse_machine(line)?;
        let model = EffectModel::new(&machine);
        Ok((machine, model))
    }

    #[rstest]
    #[case("[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1)", 4, 2)]
    #[case("[##] (0) (1)", 2, 0)]
    #[case("[##] (0) (1) (0,1)", 2, 1)]
    #[case("[...] (0) (0)", 1, 1)]
    fn rank_and_nullity(
        #[case] line: &str,
        #[case] rank: usize,
        #[case] nullity: usize,
    ) -> Result<()> {
        let (machine, model) = system(line)?;
        let mut sys = LinearSystem::new(&model, machine.light_target());
        assert!(sys.reduce());
        assert_eq!(rank, sys.rank());
        assert_eq!(nullity, sys.nullity());
        Ok(())
    }

    #[test]
    fn null_space_vectors_press_nothing() -> Result<()> {
        let (machine, model) = system("[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1)")?;
        let mut sys = LinearSystem::new(&model, machine.light_target());
        assert!(sys.reduce());
        for v in sys.null_space() {
            assert!(model.apply_light_presses(&v).not_any());
        }
        assert!(
            machine.light_target() == model.apply_light_presses(&sys.particular_solution()).as_bitslice()
        );
        Ok(())
    }

    #[rstest]
    #[case("[#.] (1)")]
    #[case("[###] (0,1) (1,2)")]
    #[case("[.#] (0) (0)")]
    fn detects_inconsistency(#[case] line: &str) -> Result<()> {
        let (machine, model) = system(line)?;
        assert!(LinearSystem::new(&model, machine.light_target())
            .solve(20)
            .is_none());
        Ok(())
    }

    #[rstest]
    #[case("[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1)")]
    #[case("[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4)")]
    #[case("[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2)")]
    #[case("[#..#.#] (0,3) (1,2) (0,1,2,3) (5) (4,5) (0,5) (2,4) (1,3,5)")]
    fn agrees_with_exhaustive(#[case] line: &str) -> Result<()> {
        let (machine, model) = system(line)?;
        let brute = exhaustive::solve(&model, machine.light_target(), 25);
        let linear = LinearSystem::new(&model, machine.light_target())
            .solve(20)
            .unwrap();
        assert!(linear.is_minimal());
        assert!(machine.verify_lights(&linear));
        assert_eq!(brute.presses(), Some(linear.presses()));
        Ok(())
    }

    #[test]
    fn large_null_space_falls_back_to_feasible_solution() -> Result<()> {
        // x0 is the only pivot; the five duplicates are free
        let (machine, model) = system("[#] (0) (0) (0) (0) (0) (0)")?;
        let approx = LinearSystem::new(&model, machine.light_target())
            .solve(2)
            .unwrap();
        assert!(!approx.is_minimal());
        assert!(machine.verify_lights(&approx));
        assert_eq!(1, approx.presses());
        assert!(matches!(
            exhaustive::solve(&model, machine.light_target(), 25),
            Outcome::Solved(_)
        ));
        Ok(())
    }
}
