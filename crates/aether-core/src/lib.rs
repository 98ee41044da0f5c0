// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! aether-core: the single-source Aether automaton on the 5D integer lattice.
//!
//! The rule is invariant under every permutation and sign flip of the five
//! axes, so only the fundamental domain `v ≥ w ≥ x ≥ y ≥ z ≥ 0` is stored.
//! Each canonical cell is evolved against its folded neighbours, with
//! deposit multipliers standing in for the symmetric copies that are never
//! materialized. All arithmetic is exact and fixed width; the seed bound of
//! each [`Quantity`] keeps a full evolution free of overflow.
//!
//! ```
//! use aether_core::Aether5D;
//!
//! let mut aether = Aether5D::<i64>::new(1_000).expect("seed in range");
//! for _ in 0..20 {
//!     if !aether.step() {
//!         break;
//!     }
//! }
//! assert_eq!(aether.physical_total(), 1_000);
//! assert_eq!(aether.value_at(0, -1, 0, 0, 0), aether.value_at(0, 0, 0, 1, 0));
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]
// Coordinates are u32 and flat indices usize; lattice sizes stay far below
// either limit.
#![allow(clippy::cast_possible_truncation, clippy::cast_lossless)]

mod checkpoint;
mod compliance;
/// Run configuration and its storage port.
pub mod config;
mod engine;
/// Neighbour folding into the fundamental domain.
pub mod fold;
/// v-slice storage and tetrahedral indexing.
pub mod grid;
mod lattice;
mod policy;
mod quantity;
mod runner;
mod snapshot;
/// Single-cell toppling.
pub mod topple;
mod window;

/// Checkpoint encoding and its errors.
pub use checkpoint::{CheckpointError, CHECKPOINT_MAGIC};
/// Toppling alternation observer.
pub use compliance::AlternationCompliance;
/// Automaton, step observer hooks and construction errors.
pub use engine::{Aether5D, AetherError, StepInfo, StepObserver};
/// Lattice coordinates.
pub use lattice::{Axis, CanonicalCoord, Direction, DIMENSIONS, RAW_NEIGHBOR_COUNT};
/// Checkpoint scheduling.
pub use policy::CheckpointPolicy;
/// Cell value types and their seed bounds.
pub use quantity::{min_safe_seed, Quantity};
/// Library driver.
pub use runner::{checkpoint_path, RunError, RunSummary, Runner, CHECKPOINT_EXTENSION};
/// State hashing.
pub use snapshot::{compute_state_hash, state_hash_hex, StateHash};
/// Rolling sweep window.
pub use window::SliceWindow;
