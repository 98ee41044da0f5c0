// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! The 5D Aether automaton and its step engine.

use core::mem;

use thiserror::Error;
use tracing::{debug, info};

use crate::fold::folded_neighbors;
use crate::grid::{Grid, TailCoords, VSlice};
use crate::lattice::{CanonicalCoord, RAW_NEIGHBOR_COUNT};
use crate::quantity::Quantity;
use crate::snapshot::{compute_state_hash, StateHash};
use crate::topple::{topple, Candidate};
use crate::window::SliceWindow;

/// Errors raised when constructing an automaton.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AetherError {
    /// The single-source value is below the overflow-safe bound for the
    /// chosen quantity type.
    #[error("seed {seed} is below the minimum {minimum} for this quantity width")]
    SeedBelowMinimum {
        /// Requested seed.
        seed: i128,
        /// Smallest accepted seed.
        minimum: i128,
    },
}

/// Context handed to a [`StepObserver`] before a step sweeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepInfo {
    /// Generation the step starts from.
    pub generation: u64,
    /// Single-source value the automaton was started with.
    pub seed: i128,
    /// Outermost slice swept by this step.
    pub sweep_max_v: u32,
}

/// Receives the toppling outcome of every swept cell.
pub trait StepObserver {
    /// Called once before the sweep starts.
    fn begin_step(&mut self, _info: StepInfo) {}

    /// Called once per swept canonical cell, in sweep order.
    fn observe(&mut self, coord: CanonicalCoord, toppled: bool);
}

impl StepObserver for () {
    #[inline]
    fn observe(&mut self, _coord: CanonicalCoord, _toppled: bool) {}
}

/// Single-source Aether automaton on the 5D lattice.
///
/// Only the fundamental domain `v ≥ w ≥ x ≥ y ≥ z ≥ 0` is stored; every
/// other lattice cell is read through [`Aether5D::value_at`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Aether5D<Q = i64> {
    grid: Grid<Q>,
    seed: Q,
    generation: u64,
    last_changed: bool,
}

impl<Q: Quantity> Aether5D<Q> {
    /// Starts an automaton with `seed` at the origin and zero elsewhere.
    pub fn new(seed: Q) -> Result<Self, AetherError> {
        check_seed(seed)?;
        Ok(Self {
            grid: Grid::single_source(seed),
            seed,
            generation: 0,
            last_changed: false,
        })
    }

    /// Rebuilds an automaton from validated parts (checkpoint restore).
    pub(crate) fn from_parts(
        grid: Grid<Q>,
        seed: Q,
        generation: u64,
        last_changed: bool,
    ) -> Result<Self, AetherError> {
        check_seed(seed)?;
        Ok(Self {
            grid,
            seed,
            generation,
            last_changed,
        })
    }

    /// Advances one generation. Returns whether any cell toppled.
    pub fn step(&mut self) -> bool {
        self.step_observed(&mut ())
    }

    /// Advances one generation, reporting each swept cell to `observer`.
    pub fn step_observed<O: StepObserver + ?Sized>(&mut self, observer: &mut O) -> bool {
        let old_max_v = self.grid.max_v();
        let sweep_max_v = old_max_v + 1;
        observer.begin_step(StepInfo {
            generation: self.generation,
            seed: self.seed.to_i128(),
            sweep_max_v,
        });

        let mut window = SliceWindow::new(mem::take(&mut self.grid).into_slices());
        let mut next: Vec<VSlice<Q>> = Vec::with_capacity(sweep_max_v as usize + 2);
        next.push(VSlice::zeroed(0));
        let mut candidates: Vec<Candidate<Q>> = Vec::with_capacity(RAW_NEIGHBOR_COUNT);
        let mut changed = false;
        let mut frontier_toppled = false;

        for v in 0..=sweep_max_v {
            // Deposits reach at most one slice outwards.
            if v < sweep_max_v {
                next.push(VSlice::zeroed(v + 1));
            }
            for tail in TailCoords::new(v) {
                let coord = CanonicalCoord::from_parts(v, tail);
                let value = window.value(&coord);
                candidates.clear();
                candidates.extend(
                    folded_neighbors(&coord)
                        .iter()
                        .map(|n| Candidate::new(n, window.value(&n.target))),
                );
                let outcome = topple(value, &mut candidates);
                accumulate(&mut next, &coord, outcome.retained);
                if outcome.toppled {
                    changed = true;
                    frontier_toppled |= v >= old_max_v;
                    for candidate in &candidates {
                        if candidate.deposit != Q::ZERO {
                            accumulate(&mut next, &candidate.target, candidate.deposit);
                        }
                    }
                }
                observer.observe(coord, outcome.toppled);
            }
            window.advance();
        }

        let new_max_v = if frontier_toppled { sweep_max_v } else { old_max_v };
        if new_max_v > old_max_v {
            info!(
                generation = self.generation + 1,
                max_v = new_max_v,
                "frontier grew"
            );
        }
        debug_assert!(
            next[new_max_v as usize + 1..].iter().all(VSlice::is_zero),
            "non-zero cells beyond the frontier"
        );
        next.truncate(new_max_v as usize + 1);
        // Slices come out consecutive from zero, so this cannot fail.
        self.grid = Grid::from_slices(next).unwrap_or_default();
        self.generation += 1;
        self.last_changed = changed;
        debug!(
            generation = self.generation,
            max_v = new_max_v,
            changed,
            retired = window.retired(),
            "step"
        );
        changed
    }

    /// Value of any lattice cell, through sign and permutation symmetry.
    pub fn value_at(&self, v: i64, w: i64, x: i64, y: i64, z: i64) -> Q {
        CanonicalCoord::from_raw([v, w, x, y, z])
            .map_or(Q::ZERO, |coord| self.grid.get(&coord))
    }

    /// Value of a canonical cell.
    pub fn canonical_value(&self, coord: &CanonicalCoord) -> Q {
        self.grid.get(coord)
    }

    /// Completed steps.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Outermost stored slice.
    pub fn max_v(&self) -> u32 {
        self.grid.max_v()
    }

    /// Initial origin value.
    pub fn seed(&self) -> Q {
        self.seed
    }

    /// Whether the most recent step toppled anything (`false` before the first step).
    pub fn last_changed(&self) -> bool {
        self.last_changed
    }

    /// Stored canonical cells with their values, in slice order.
    pub fn canonical_cells(&self) -> impl Iterator<Item = (CanonicalCoord, Q)> + '_ {
        self.grid.cells()
    }

    /// Sum of every lattice cell, expanded through orbit sizes.
    pub fn physical_total(&self) -> i128 {
        self.grid
            .cells()
            .map(|(coord, value)| value.to_i128() * i128::from(coord.orbit_size()))
            .sum()
    }

    /// Canonical digest of the full state.
    pub fn state_hash(&self) -> StateHash {
        compute_state_hash(&self.grid, self.seed, self.generation)
    }

    pub(crate) fn grid(&self) -> &Grid<Q> {
        &self.grid
    }
}

fn check_seed<Q: Quantity>(seed: Q) -> Result<(), AetherError> {
    if seed < Q::MIN_SEED {
        return Err(AetherError::SeedBelowMinimum {
            seed: seed.to_i128(),
            minimum: Q::MIN_SEED.to_i128(),
        });
    }
    Ok(())
}

fn accumulate<Q: Quantity>(next: &mut [VSlice<Q>], coord: &CanonicalCoord, amount: Q) {
    if let Some(cell) = next
        .get_mut(coord.v() as usize)
        .and_then(|slice| slice.get_mut(coord.tail()))
    {
        *cell = cell.wrapping_add(amount);
    }
}
