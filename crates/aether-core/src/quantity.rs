// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Fixed-width cell quantities.
//!
//! The automaton is generic over the signed integer used to store cell
//! values so callers can trade range for memory. Every implementation carries
//! the seed bounds that keep a full evolution free of overflow.
//!
//! Seed bound derivation (dimensionality `d`, type maximum `M`):
//! - Positive seeds never overflow. Every cell stays in `[0, seed]` because a
//!   cell only receives mass from strictly higher neighbours and the physical
//!   total equals the seed.
//! - A negative seed `-N` is the deepest point of the lattice. On the first
//!   step each of the `2d` unit neighbours sees the single lower neighbour
//!   with a pool of 2, gives it `N/2` and keeps `-N/2`. The origin ends at
//!   `(d - 1)·N`, and on the next step its toppling computes
//!   `to_share = (d - 1)·N + N/2 = (2d - 1)·N / 2`. Requiring that difference
//!   to fit gives `N ≤ 2M / (2d - 1)`.
//!
//! For `d = 5` and `i64` this reproduces `-2_049_638_230_412_172_401`.
//!
//! Intermediate accumulation into next-generation cells uses wrapping
//! arithmetic. Two's complement addition is exact modulo `2^BITS`, so a cell
//! whose final value is in range is computed exactly even when a single
//! folded deposit (`share · multiplier`) transiently exceeds the range.

use core::fmt;
use core::hash::Hash;
use core::ops::{Add, Div, Rem, Sub};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::lattice::DIMENSIONS;

/// Smallest safe seed for a signed type whose maximum is `max`.
pub const fn min_safe_seed(max: i128) -> i128 {
    -(max * 2 / (2 * DIMENSIONS as i128 - 1))
}

/// Signed fixed-width integer usable as a cell value.
///
/// Operator bounds cover the plain arithmetic the toppling rule needs; the
/// wrapping helpers are used only for accumulation into the next generation.
pub trait Quantity:
    Copy
    + fmt::Debug
    + fmt::Display
    + Ord
    + Hash
    + Default
    + Send
    + Sync
    + 'static
    + Serialize
    + DeserializeOwned
    + Add<Output = Self>
    + Sub<Output = Self>
    + Div<Output = Self>
    + Rem<Output = Self>
{
    /// Additive identity.
    const ZERO: Self;
    /// Largest accepted seed (the type maximum).
    const MAX_SEED: Self;
    /// Smallest accepted seed; see the module docs for the derivation.
    const MIN_SEED: Self;
    /// Bit width, recorded in checkpoints so a file cannot be restored into a
    /// narrower or wider automaton.
    const BITS: u32;

    /// Converts a small neighbour count (pool size or multiplier) into `Self`.
    fn from_count(count: u32) -> Self;

    /// Two's complement addition.
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Two's complement multiplication by a neighbour count.
    fn wrapping_scale(self, factor: u32) -> Self;

    /// Widens to `i128` for totals and diagnostics.
    fn to_i128(self) -> i128;

    /// Feeds the little-endian encoding of `self` into `hasher`.
    fn hash_le(self, hasher: &mut blake3::Hasher);
}

macro_rules! impl_quantity {
    ($($t:ty),* $(,)?) => {
        $(
            impl Quantity for $t {
                const ZERO: Self = 0;
                const MAX_SEED: Self = <$t>::MAX;
                const MIN_SEED: Self = min_safe_seed(<$t>::MAX as i128) as $t;
                const BITS: u32 = <$t>::BITS;

                #[inline]
                fn from_count(count: u32) -> Self {
                    <$t>::try_from(count).unwrap_or(<$t>::MAX)
                }

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$t>::wrapping_add(self, rhs)
                }

                #[inline]
                fn wrapping_scale(self, factor: u32) -> Self {
                    self.wrapping_mul(Self::from_count(factor))
                }

                #[inline]
                fn to_i128(self) -> i128 {
                    i128::from(self)
                }

                #[inline]
                fn hash_le(self, hasher: &mut blake3::Hasher) {
                    hasher.update(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_quantity!(i16, i32, i64);
