// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Checkpoint policies for long runs.
//!
//! A [`CheckpointPolicy`] decides after each step whether the runner writes
//! the current state to disk:
//!
//! - [`CheckpointPolicy::Never`] - no files, the default.
//! - [`CheckpointPolicy::Every`] - every `k` generations.
//! - [`CheckpointPolicy::OnStabilize`] - once, on the first step that
//!   topples nothing.

use serde::{Deserialize, Serialize};

/// When the runner persists a checkpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CheckpointPolicy {
    /// Never write checkpoints.
    #[default]
    Never,

    /// Write a checkpoint whenever the generation is a multiple of `k`.
    Every {
        /// Interval between checkpoints in generations. Zero disables.
        k: u64,
    },

    /// Write a checkpoint when a step reports no change.
    OnStabilize,
}

impl CheckpointPolicy {
    /// Whether a checkpoint is due after a step reached `generation`.
    pub fn is_due(&self, generation: u64, changed: bool) -> bool {
        match *self {
            Self::Never => false,
            Self::Every { k } => k != 0 && generation.is_multiple_of(k),
            Self::OnStabilize => !changed,
        }
    }
}
