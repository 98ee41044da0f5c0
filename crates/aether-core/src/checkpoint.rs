// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Checkpoint files.
//!
//! Layout:
//! - 8 bytes magic `AETH5D01`
//! - 4 bytes quantity width in bits (`u32`, little-endian)
//! - CBOR body: seed, generation, `max_v`, last-changed flag, every slice,
//!   and the state hash of the encoded state.
//!
//! The width sits outside the CBOR body so a checkpoint written by a wider
//! automaton is rejected before any cell is decoded. On load the body is
//! checked for shape, the seed is checked against the construction bound and
//! the state hash is recomputed; any mismatch fails the load.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::{Aether5D, AetherError};
use crate::grid::{Grid, VSlice};
use crate::quantity::Quantity;
use crate::snapshot::{compute_state_hash, state_hash_hex, StateHash};

/// Leading bytes of every checkpoint.
pub const CHECKPOINT_MAGIC: [u8; 8] = *b"AETH5D01";

const HEADER_LEN: usize = CHECKPOINT_MAGIC.len() + 4;

/// Errors raised while writing or restoring a checkpoint.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Filesystem failure.
    #[error("checkpoint io error: {0}")]
    Io(#[from] io::Error),
    /// CBOR serialization failure.
    #[error("checkpoint encode error: {0}")]
    Encode(#[from] ciborium::ser::Error<io::Error>),
    /// CBOR deserialization failure (truncated or malformed body).
    #[error("checkpoint decode error: {0}")]
    Decode(#[from] ciborium::de::Error<io::Error>),
    /// The file does not start with [`CHECKPOINT_MAGIC`].
    #[error("not an aether checkpoint (bad magic)")]
    InvalidMagic,
    /// The checkpoint was written with a different quantity width.
    #[error("checkpoint stores {found}-bit quantities, expected {expected}-bit")]
    QuantityWidthMismatch {
        /// Width of the automaton being restored.
        expected: u32,
        /// Width recorded in the file.
        found: u32,
    },
    /// Slice count, slice order or slice length disagree with `max_v`.
    #[error("checkpoint shape mismatch: {0}")]
    ShapeMismatch(String),
    /// Recomputed state hash differs from the recorded one.
    #[error("checkpoint digest mismatch: recorded {recorded}, computed {computed}")]
    DigestMismatch {
        /// Hex digest stored in the file.
        recorded: String,
        /// Hex digest of the decoded state.
        computed: String,
    },
    /// The recorded seed is outside the accepted range.
    #[error("checkpoint seed rejected: {0}")]
    Seed(#[from] AetherError),
}

#[derive(Serialize)]
struct BodyRef<'a, Q> {
    seed: Q,
    generation: u64,
    max_v: u32,
    last_changed: bool,
    slices: &'a [VSlice<Q>],
    digest: StateHash,
}

#[derive(Deserialize)]
struct Body<Q> {
    seed: Q,
    generation: u64,
    max_v: u32,
    last_changed: bool,
    slices: Vec<VSlice<Q>>,
    digest: StateHash,
}

impl<Q: Quantity> Aether5D<Q> {
    /// Encodes the full state as checkpoint bytes.
    pub fn to_checkpoint_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        let mut out = Vec::with_capacity(HEADER_LEN);
        out.extend_from_slice(&CHECKPOINT_MAGIC);
        out.extend_from_slice(&Q::BITS.to_le_bytes());
        let body = BodyRef {
            seed: self.seed(),
            generation: self.generation(),
            max_v: self.max_v(),
            last_changed: self.last_changed(),
            slices: self.grid().slices(),
            digest: self.state_hash(),
        };
        ciborium::into_writer(&body, &mut out)?;
        Ok(out)
    }

    /// Restores an automaton from checkpoint bytes.
    pub fn from_checkpoint_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let restored = decode::<Q>(bytes);
        if let Err(err) = &restored {
            warn!(error = %err, "checkpoint rejected");
        }
        restored
    }

    /// Writes a checkpoint to `path`, replacing any existing file.
    pub fn save_state(&self, path: impl AsRef<Path>) -> Result<(), CheckpointError> {
        let path = path.as_ref();
        let bytes = self.to_checkpoint_bytes()?;
        fs::write(path, &bytes)?;
        debug!(
            path = %path.display(),
            generation = self.generation(),
            bytes = bytes.len(),
            "checkpoint saved"
        );
        Ok(())
    }

    /// Reads a checkpoint written by [`Aether5D::save_state`].
    pub fn load_state(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_checkpoint_bytes(&bytes)
    }
}

fn decode<Q: Quantity>(bytes: &[u8]) -> Result<Aether5D<Q>, CheckpointError> {
    let (magic, rest) = bytes
        .split_first_chunk::<8>()
        .ok_or(CheckpointError::InvalidMagic)?;
    if *magic != CHECKPOINT_MAGIC {
        return Err(CheckpointError::InvalidMagic);
    }
    let (width, body) = rest
        .split_first_chunk::<4>()
        .ok_or_else(|| CheckpointError::ShapeMismatch("missing quantity width".into()))?;
    let found = u32::from_le_bytes(*width);
    if found != Q::BITS {
        return Err(CheckpointError::QuantityWidthMismatch {
            expected: Q::BITS,
            found,
        });
    }

    let body: Body<Q> = ciborium::from_reader(body)?;
    if body.slices.len() != body.max_v as usize + 1 {
        return Err(CheckpointError::ShapeMismatch(format!(
            "max_v {} but {} slices",
            body.max_v,
            body.slices.len()
        )));
    }
    let grid = Grid::from_slices(body.slices).ok_or_else(|| {
        CheckpointError::ShapeMismatch("slices out of order or wrong length".into())
    })?;

    let computed = compute_state_hash(&grid, body.seed, body.generation);
    if computed != body.digest {
        return Err(CheckpointError::DigestMismatch {
            recorded: state_hash_hex(&body.digest),
            computed: state_hash_hex(&computed),
        });
    }
    Ok(Aether5D::from_parts(
        grid,
        body.seed,
        body.generation,
        body.last_changed,
    )?)
}
