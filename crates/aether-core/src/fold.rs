// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Neighbour folding.
//!
//! Each canonical cell has ten raw neighbours. Folding maps every raw
//! neighbour back into the fundamental domain and attaches two counts:
//!
//! - `tie_weight(c → n)`: how many of `c`'s raw neighbour slots fold onto
//!   `n`. A canonical neighbour with tie weight `t` occupies `t` seats in
//!   `c`'s division pool.
//! - `deposit_multiplier(c → n)`: how many raw neighbour slots of `n` fold
//!   onto `c`, i.e. how many symmetric images of `c` pay into one physical
//!   copy of `n` when `c` topples.
//!
//! The two are linked by orbit sizes:
//! `orbit(c) · tie_weight(c → n) = orbit(n) · deposit_multiplier(c → n)`.

use core::ops::Deref;

use crate::lattice::{Axis, CanonicalCoord, Direction, RAW_NEIGHBOR_COUNT};

/// A raw neighbour folded into the fundamental domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FoldedNeighbor {
    /// Canonical image of the raw neighbour.
    pub target: CanonicalCoord,
    /// Copies of the source that deposit into one physical copy of `target`.
    pub deposit_multiplier: u32,
    /// Raw neighbour slots of the source that fold onto `target`.
    pub tie_weight: u32,
}

impl FoldedNeighbor {
    fn between(source: &CanonicalCoord, target: CanonicalCoord, tie_weight: u32) -> Self {
        // orbit(source) · tie is always a multiple of orbit(target).
        let deposit_multiplier = source.orbit_size() * tie_weight / target.orbit_size();
        Self {
            target,
            deposit_multiplier,
            tie_weight,
        }
    }
}

/// Folds the raw neighbour of `coord` one step along `axis`.
pub fn fold(coord: &CanonicalCoord, axis: Axis, direction: Direction) -> FoldedNeighbor {
    let target = coord.neighbor(axis, direction);
    let tie_weight = coord
        .raw_neighbors()
        .filter(|(_, _, n)| *n == target)
        .count() as u32;
    FoldedNeighbor::between(coord, target, tie_weight)
}

/// Distinct folded neighbours of a cell, in first-seen raw order.
#[derive(Clone, Copy, Debug)]
pub struct FoldedNeighbors {
    items: [FoldedNeighbor; RAW_NEIGHBOR_COUNT],
    len: usize,
}

impl Deref for FoldedNeighbors {
    type Target = [FoldedNeighbor];

    fn deref(&self) -> &Self::Target {
        &self.items[..self.len]
    }
}

/// Collapses the ten raw neighbours of `coord` into distinct canonical ones.
///
/// Order follows the first raw slot (axis `v..z`, positive before negative)
/// that produced each target, so iteration is deterministic.
pub fn folded_neighbors(coord: &CanonicalCoord) -> FoldedNeighbors {
    let mut targets = [CanonicalCoord::ORIGIN; RAW_NEIGHBOR_COUNT];
    let mut ties = [0u32; RAW_NEIGHBOR_COUNT];
    let mut len = 0;
    for (_, _, target) in coord.raw_neighbors() {
        match targets[..len].iter().position(|t| *t == target) {
            Some(i) => ties[i] += 1,
            None => {
                targets[len] = target;
                ties[len] = 1;
                len += 1;
            }
        }
    }
    let mut items = [FoldedNeighbor::default(); RAW_NEIGHBOR_COUNT];
    for ((item, target), tie) in items.iter_mut().zip(targets).zip(ties).take(len) {
        *item = FoldedNeighbor::between(coord, target, tie);
    }
    FoldedNeighbors { items, len }
}
