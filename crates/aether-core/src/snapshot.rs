// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Canonical state hashing.
//!
//! Determinism contract
//! - The state hash is a BLAKE3 digest over a canonical byte stream covering
//!   everything that influences future evolution.
//! - Stream layout, all integers little-endian:
//!   - domain tag `aether5d/state/v1`
//!   - quantity width in bits (`u32`)
//!   - seed, generation (`u64`), `max_v` (`u32`)
//!   - for each slice in ascending `v`: `v` (`u32`), cell count (`u64`),
//!     then every cell value at the quantity width in storage order.
//! - Two automata with equal hashes evolve identically; the hash doubles as
//!   the integrity digest of a checkpoint.

use blake3::Hasher;

use crate::grid::Grid;
use crate::quantity::Quantity;

/// 32-byte BLAKE3 digest of an automaton state.
pub type StateHash = [u8; 32];

const DOMAIN_TAG: &[u8] = b"aether5d/state/v1";

/// Hashes a grid together with the metadata that shapes its evolution.
pub fn compute_state_hash<Q: Quantity>(grid: &Grid<Q>, seed: Q, generation: u64) -> StateHash {
    let mut hasher = Hasher::new();
    hasher.update(DOMAIN_TAG);
    hasher.update(&Q::BITS.to_le_bytes());
    seed.hash_le(&mut hasher);
    hasher.update(&generation.to_le_bytes());
    hasher.update(&grid.max_v().to_le_bytes());
    for slice in grid.slices() {
        hasher.update(&slice.v().to_le_bytes());
        hasher.update(&(slice.cells().len() as u64).to_le_bytes());
        for value in slice.cells() {
            value.hash_le(&mut hasher);
        }
    }
    hasher.finalize().into()
}

/// Lower-case hex rendering of a state hash, for logs and file names.
pub fn state_hash_hex(hash: &StateHash) -> String {
    hex::encode(hash)
}
