// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Toppling alternation compliance.
//!
//! Single-source Aether tends to topple in a checkerboard rhythm: on one step
//! only cells with an even coordinate sum topple, on the next only the odd
//! ones. For a non-negative seed the even cells move first (generation 0);
//! a negative seed flips the phase. [`AlternationCompliance`] records, for the
//! most recently observed step, which canonical cells followed that rhythm.

use std::collections::BTreeMap;

use crate::engine::{StepInfo, StepObserver};
use crate::lattice::CanonicalCoord;

/// Records per-cell compliance with the even/odd toppling rhythm.
#[derive(Clone, Debug, Default)]
pub struct AlternationCompliance {
    even_turn: bool,
    generation: Option<u64>,
    sweep_max_v: u32,
    violations: BTreeMap<CanonicalCoord, bool>,
    observed: usize,
}

impl AlternationCompliance {
    /// An observer that has not yet seen a step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cells with an even coordinate sum were expected to topple in
    /// the observed step.
    pub fn even_turn(&self) -> bool {
        self.even_turn
    }

    /// Generation the observed step started from, if any.
    pub fn generation(&self) -> Option<u64> {
        self.generation
    }

    /// Whether `coord` complied in the observed step.
    ///
    /// Cells outside the swept region never topple, so they comply exactly
    /// when it was not their turn.
    pub fn complies(&self, coord: &CanonicalCoord) -> bool {
        if coord.v() > self.sweep_max_v {
            return !expected(self.even_turn, coord);
        }
        !self.violations.contains_key(coord)
    }

    /// Swept cells that broke the rhythm, with their toppled flag.
    pub fn violations(&self) -> impl Iterator<Item = (CanonicalCoord, bool)> + '_ {
        self.violations.iter().map(|(c, t)| (*c, *t))
    }

    /// Number of swept cells observed in the last step.
    pub fn observed(&self) -> usize {
        self.observed
    }

    /// Whether every swept cell complied.
    pub fn fully_compliant(&self) -> bool {
        self.violations.is_empty()
    }
}

fn expected(even_turn: bool, coord: &CanonicalCoord) -> bool {
    even_turn == coord.is_even()
}

impl StepObserver for AlternationCompliance {
    fn begin_step(&mut self, info: StepInfo) {
        self.even_turn = (info.seed >= 0) != (info.generation % 2 == 1);
        self.generation = Some(info.generation);
        self.sweep_max_v = info.sweep_max_v;
        self.violations.clear();
        self.observed = 0;
    }

    fn observe(&mut self, coord: CanonicalCoord, toppled: bool) {
        self.observed += 1;
        if toppled != expected(self.even_turn, &coord) {
            self.violations.insert(coord, toppled);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::engine::Aether5D;

    #[test]
    fn phase_follows_seed_sign_and_generation() {
        let mut obs = AlternationCompliance::new();
        let info = |generation, seed| StepInfo {
            generation,
            seed,
            sweep_max_v: 1,
        };
        obs.begin_step(info(0, 5));
        assert!(obs.even_turn());
        obs.begin_step(info(1, 5));
        assert!(!obs.even_turn());
        obs.begin_step(info(0, -5));
        assert!(!obs.even_turn());
        obs.begin_step(info(3, -5));
        assert!(obs.even_turn());
    }

    fn c(coords: [u32; 5]) -> CanonicalCoord {
        CanonicalCoord::new(coords).unwrap()
    }

    #[test]
    fn first_step_of_positive_seed() {
        let mut a = Aether5D::<i64>::new(1_000).unwrap();
        let mut obs = AlternationCompliance::new();
        a.step_observed(&mut obs);
        assert_eq!(obs.generation(), Some(0));
        assert_eq!(obs.observed(), 6);
        // The origin (even) topples and the odd unit cell stays put.
        assert!(obs.complies(&CanonicalCoord::ORIGIN));
        assert!(obs.complies(&c([1, 0, 0, 0, 0])));
        // An even cell with nothing below it cannot topple on its turn.
        assert!(!obs.complies(&c([1, 1, 0, 0, 0])));
        // Beyond the sweep only the parity counts.
        assert!(obs.complies(&c([3, 0, 0, 0, 0])));
        assert!(!obs.complies(&c([2, 0, 0, 0, 0])));
        assert!(!obs.fully_compliant());
    }

    #[test]
    fn idle_cell_on_its_turn_is_a_violation() {
        let mut a = Aether5D::<i64>::new(3).unwrap();
        let mut obs = AlternationCompliance::new();
        a.step_observed(&mut obs);
        // Too small to topple, yet it was the origin's turn.
        assert!(!obs.complies(&CanonicalCoord::ORIGIN));
        let violations: Vec<_> = obs.violations().collect();
        assert!(violations.contains(&(CanonicalCoord::ORIGIN, false)));
        // Origin plus the two even cells of slice 1.
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().all(|(c, toppled)| c.is_even() && !toppled));
    }
}
