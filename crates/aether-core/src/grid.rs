// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Storage for the fundamental domain.
//!
//! The domain is cut into v-slices: slice `v` holds every canonical cell
//! whose outermost coordinate equals `v`, i.e. all tails
//! `v ≥ w ≥ x ≥ y ≥ z ≥ 0`. There are `C(v + 4, 4)` of them. Cells are
//! stored flat in lexicographic tail order, which is also the order
//! [`TailCoords`] yields them in:
//!
//! `index(w, x, y, z) = C(w + 3, 4) + C(x + 2, 3) + C(y + 1, 2) + z`

use serde::{Deserialize, Serialize};

use crate::lattice::CanonicalCoord;

/// `C(n + 3, 4)`: tails with first component below `n`.
fn tetrahedral(n: u32) -> usize {
    let n = n as usize;
    n * (n + 1) * (n + 2) * (n + 3) / 24
}

/// `C(n + 2, 3)`.
fn pyramidal(n: u32) -> usize {
    let n = n as usize;
    n * (n + 1) * (n + 2) / 6
}

/// `C(n + 1, 2)`.
fn triangular(n: u32) -> usize {
    let n = n as usize;
    n * (n + 1) / 2
}

/// Number of canonical cells in slice `v`.
pub fn slice_len(v: u32) -> usize {
    tetrahedral(v + 1)
}

/// Flat index of a slice tail.
pub fn tail_index(tail: [u32; 4]) -> usize {
    let [w, x, y, z] = tail;
    tetrahedral(w) + pyramidal(x) + triangular(y) + z as usize
}

/// Iterates the tails of slice `v` in storage order.
#[derive(Clone, Debug)]
pub struct TailCoords {
    v: u32,
    next: Option<[u32; 4]>,
}

impl TailCoords {
    /// Tails of slice `v`, starting at `(0, 0, 0, 0)`.
    pub fn new(v: u32) -> Self {
        Self {
            v,
            next: Some([0; 4]),
        }
    }
}

impl Iterator for TailCoords {
    type Item = [u32; 4];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let [mut w, mut x, mut y, mut z] = current;
        z += 1;
        if z > y {
            z = 0;
            y += 1;
            if y > x {
                y = 0;
                x += 1;
                if x > w {
                    x = 0;
                    w += 1;
                }
            }
        }
        self.next = (w <= self.v).then_some([w, x, y, z]);
        Some(current)
    }
}

/// All cells sharing one outermost coordinate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VSlice<T> {
    v: u32,
    cells: Vec<T>,
}

impl<T: Copy + Default> VSlice<T> {
    /// A slice of zeros.
    pub fn zeroed(v: u32) -> Self {
        Self {
            v,
            cells: vec![T::default(); slice_len(v)],
        }
    }

    /// Rebuilds a slice from raw cells; `None` if the length is wrong for `v`.
    pub fn from_cells(v: u32, cells: Vec<T>) -> Option<Self> {
        (cells.len() == slice_len(v)).then_some(Self { v, cells })
    }

    /// Outermost coordinate shared by every cell in the slice.
    pub fn v(&self) -> u32 {
        self.v
    }

    /// Cells in storage order.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Value at `tail`, or the default if the tail lies outside this slice.
    pub fn get(&self, tail: [u32; 4]) -> T {
        self.cells
            .get(tail_index(tail))
            .copied()
            .unwrap_or_default()
    }

    /// Mutable cell at `tail`.
    pub fn get_mut(&mut self, tail: [u32; 4]) -> Option<&mut T> {
        self.cells.get_mut(tail_index(tail))
    }

    /// Canonical coordinates paired with their values.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalCoord, T)> + '_ {
        let v = self.v;
        TailCoords::new(v)
            .zip(self.cells.iter().copied())
            .map(move |(tail, value)| (CanonicalCoord::from_parts(v, tail), value))
    }

    /// Whether every cell holds the default value.
    pub fn is_zero(&self) -> bool
    where
        T: PartialEq,
    {
        self.cells.iter().all(|c| *c == T::default())
    }

    /// Consumes the slice, yielding its cells.
    pub fn into_cells(self) -> Vec<T> {
        self.cells
    }
}

/// The stored part of the fundamental domain: slices `0..=max_v`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    slices: Vec<VSlice<T>>,
}

impl<T: Copy + Default> Grid<T> {
    /// A grid holding only `value` at the origin.
    pub fn single_source(value: T) -> Self {
        let mut origin = VSlice::zeroed(0);
        if let Some(cell) = origin.get_mut([0; 4]) {
            *cell = value;
        }
        Self {
            slices: vec![origin],
        }
    }

    /// Assembles a grid from consecutive slices starting at `v = 0`.
    pub fn from_slices(slices: Vec<VSlice<T>>) -> Option<Self> {
        let consecutive = !slices.is_empty()
            && slices
                .iter()
                .enumerate()
                .all(|(i, s)| s.v as usize == i && s.cells.len() == slice_len(s.v));
        consecutive.then_some(Self { slices })
    }

    /// Outermost stored slice index.
    pub fn max_v(&self) -> u32 {
        self.slices.last().map_or(0, VSlice::v)
    }

    /// Value at a canonical coordinate; zero beyond the frontier.
    pub fn get(&self, coord: &CanonicalCoord) -> T {
        self.slices
            .get(coord.v() as usize)
            .map_or_else(T::default, |slice| slice.get(coord.tail()))
    }

    /// Stored slices in ascending `v`.
    pub fn slices(&self) -> &[VSlice<T>] {
        &self.slices
    }

    /// Consumes the grid, yielding its slices in ascending `v`.
    pub fn into_slices(self) -> Vec<VSlice<T>> {
        self.slices
    }

    /// Every stored canonical cell with its value.
    pub fn cells(&self) -> impl Iterator<Item = (CanonicalCoord, T)> + '_ {
        self.slices.iter().flat_map(VSlice::iter)
    }
}

impl<T: Copy + Default> Default for Grid<T> {
    /// An all-zero grid holding only slice 0.
    fn default() -> Self {
        Self::single_source(T::default())
    }
}
