// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Lattice coordinates and the fundamental domain.
//!
//! The automaton is invariant under every permutation of the five axes and
//! every sign flip. A [`CanonicalCoord`] is the representative of such an
//! orbit: absolute values sorted descending (`v ≥ w ≥ x ≥ y ≥ z ≥ 0`).

use core::fmt;

/// Lattice dimensionality.
pub const DIMENSIONS: usize = 5;

/// Number of von Neumann neighbours of any lattice cell.
pub const RAW_NEIGHBOR_COUNT: usize = 2 * DIMENSIONS;

const PERMUTATIONS: u32 = 120;

/// One of the five lattice axes, outermost (`V`) first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    /// First (largest canonical) coordinate.
    V,
    /// Second coordinate.
    W,
    /// Third coordinate.
    X,
    /// Fourth coordinate.
    Y,
    /// Fifth (smallest canonical) coordinate.
    Z,
}

impl Axis {
    /// All axes in coordinate order.
    pub const ALL: [Axis; DIMENSIONS] = [Axis::V, Axis::W, Axis::X, Axis::Y, Axis::Z];

    /// Position of the axis within a coordinate array.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Step direction along an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `+1` along the axis.
    Positive,
    /// `-1` along the axis.
    Negative,
}

impl Direction {
    /// Both directions, positive first.
    pub const BOTH: [Direction; 2] = [Direction::Positive, Direction::Negative];
}

/// Sorted, non-negative representative of a symmetry orbit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalCoord([u32; DIMENSIONS]);

impl CanonicalCoord {
    /// The lattice origin.
    pub const ORIGIN: CanonicalCoord = CanonicalCoord([0; DIMENSIONS]);

    /// Wraps `coords` if they are already sorted descending.
    pub fn new(coords: [u32; DIMENSIONS]) -> Option<Self> {
        coords
            .windows(2)
            .all(|pair| pair[0] >= pair[1])
            .then_some(Self(coords))
    }

    /// Folds an arbitrary lattice position into the fundamental domain.
    ///
    /// Returns `None` when a coordinate magnitude exceeds `u32::MAX`; such a
    /// cell is far beyond any representable frontier.
    pub fn from_raw(raw: [i64; DIMENSIONS]) -> Option<Self> {
        let mut abs = [0u32; DIMENSIONS];
        for (slot, value) in abs.iter_mut().zip(raw) {
            *slot = u32::try_from(value.unsigned_abs()).ok()?;
        }
        Some(Self::from_abs(abs))
    }

    /// Sorts already non-negative coordinates into canonical order.
    pub(crate) fn from_abs(mut abs: [u32; DIMENSIONS]) -> Self {
        abs.sort_unstable_by(|a, b| b.cmp(a));
        Self(abs)
    }

    /// Builds a canonical coordinate from a v-slice index and a slice tail.
    pub(crate) const fn from_parts(v: u32, tail: [u32; 4]) -> Self {
        Self([v, tail[0], tail[1], tail[2], tail[3]])
    }

    /// Coordinate components, outermost first.
    pub const fn as_array(&self) -> [u32; DIMENSIONS] {
        self.0
    }

    /// The outermost coordinate, which selects the v-slice.
    pub const fn v(&self) -> u32 {
        self.0[0]
    }

    /// The remaining four coordinates, addressing a cell inside its v-slice.
    pub const fn tail(&self) -> [u32; 4] {
        [self.0[1], self.0[2], self.0[3], self.0[4]]
    }

    /// Whether the coordinate sum is even.
    pub fn is_even(&self) -> bool {
        self.0.iter().fold(0u32, |acc, c| acc ^ (c & 1)) == 0
    }

    /// Number of physical lattice cells in this coordinate's orbit.
    ///
    /// Equal to the distinct permutations of the coordinate multiset times
    /// one sign choice per non-zero coordinate.
    pub fn orbit_size(&self) -> u32 {
        let mut denominator = 1u32;
        let mut run = 1u32;
        for pair in self.0.windows(2) {
            if pair[0] == pair[1] {
                run += 1;
                denominator *= run;
            } else {
                run = 1;
            }
        }
        let nonzero = self.0.iter().filter(|&&c| c != 0).count() as u32;
        (PERMUTATIONS / denominator) << nonzero
    }

    /// The raw neighbour one step along `axis`, folded back into the domain.
    pub fn neighbor(&self, axis: Axis, direction: Direction) -> Self {
        let mut abs = self.0;
        let slot = &mut abs[axis.index()];
        *slot = match direction {
            Direction::Positive => slot.saturating_add(1),
            // |c - 1| also covers c = 0 crossing to -1.
            Direction::Negative => slot.abs_diff(1),
        };
        Self::from_abs(abs)
    }

    /// All raw neighbours in axis order, positive before negative.
    pub fn raw_neighbors(&self) -> impl Iterator<Item = (Axis, Direction, Self)> + '_ {
        Axis::ALL.into_iter().flat_map(move |axis| {
            Direction::BOTH
                .into_iter()
                .map(move |direction| (axis, direction, self.neighbor(axis, direction)))
        })
    }
}

impl fmt::Display for CanonicalCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [v, w, x, y, z] = self.0;
        write!(f, "({v}, {w}, {x}, {y}, {z})")
    }
}
