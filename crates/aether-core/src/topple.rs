// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Exact integer toppling of a single cell.
//!
//! A cell shares with the neighbours holding strictly less than it. Lower
//! neighbours are grouped by value and processed from the highest group
//! down. At each level the cell splits the difference to that level evenly
//! over a pool made of itself plus every still-eligible neighbour seat
//! (weighted by tie weight). Whatever does not divide evenly stays on the
//! cell; after a level is processed its group leaves the pool.

use core::cmp::Reverse;

use crate::fold::FoldedNeighbor;
use crate::lattice::CanonicalCoord;
use crate::quantity::Quantity;

/// A folded neighbour together with its current value and the deposit it
/// receives from the toppling cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate<Q> {
    /// Neighbour's canonical coordinate.
    pub target: CanonicalCoord,
    /// Neighbour's value before the step.
    pub value: Q,
    /// See [`FoldedNeighbor::deposit_multiplier`].
    pub deposit_multiplier: u32,
    /// See [`FoldedNeighbor::tie_weight`].
    pub tie_weight: u32,
    /// Amount added to one physical copy of `target`; written by [`topple`].
    pub deposit: Q,
}

impl<Q: Quantity> Candidate<Q> {
    /// Pairs a folded neighbour with its current value.
    pub fn new(neighbor: &FoldedNeighbor, value: Q) -> Self {
        Self {
            target: neighbor.target,
            value,
            deposit_multiplier: neighbor.deposit_multiplier,
            tie_weight: neighbor.tie_weight,
            deposit: Q::ZERO,
        }
    }
}

/// Outcome of toppling one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Toppling<Q> {
    /// Whether any positive share left the cell.
    pub toppled: bool,
    /// Value the cell keeps for the next generation.
    pub retained: Q,
}

/// Topples a cell holding `value` against its folded neighbours.
///
/// `candidates` may contain every folded neighbour; those not strictly below
/// `value` take no part and receive a zero deposit. The slice is reordered
/// (descending by value), so callers should read deposits through
/// [`Candidate::target`].
pub fn topple<Q: Quantity>(value: Q, candidates: &mut [Candidate<Q>]) -> Toppling<Q> {
    for candidate in candidates.iter_mut() {
        candidate.deposit = Q::ZERO;
    }
    candidates.sort_by_key(|c| Reverse(c.value));
    let first_lower = candidates.partition_point(|c| c.value >= value);
    let lower = &mut candidates[first_lower..];
    if lower.is_empty() {
        return Toppling {
            toppled: false,
            retained: value,
        };
    }

    let mut pool: u32 = 1 + lower.iter().map(|c| c.tie_weight).sum::<u32>();
    let mut remaining = value;
    let mut toppled = false;
    let mut start = 0;
    while start < lower.len() {
        let level = lower[start].value;
        let end = start + lower[start..].partition_point(|c| c.value == level);
        let divisor = Q::from_count(pool);
        let to_share = remaining - level;
        let share = to_share / divisor;
        if share != Q::ZERO {
            toppled = true;
            for candidate in &mut lower[start..] {
                candidate.deposit = candidate
                    .deposit
                    .wrapping_add(share.wrapping_scale(candidate.deposit_multiplier));
            }
            remaining = level + to_share % divisor + share;
        }
        pool -= lower[start..end].iter().map(|c| c.tie_weight).sum::<u32>();
        start = end;
    }

    Toppling {
        toppled,
        retained: remaining,
    }
}
