// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Rolling three-slice view over the previous generation.
//!
//! Sweeping slice `v` reads only slices `v - 1`, `v` and `v + 1`. The window
//! takes ownership of the old slices one at a time and drops each as soon as
//! the sweep has moved two slices past it, so peak memory holds at most three
//! old slices next to the growing new grid.

use std::vec;

use crate::grid::VSlice;
use crate::lattice::CanonicalCoord;

/// Owns the previous generation's slices around the sweep position.
#[derive(Debug)]
pub struct SliceWindow<T> {
    source: vec::IntoIter<VSlice<T>>,
    lower: Option<VSlice<T>>,
    current: Option<VSlice<T>>,
    upper: Option<VSlice<T>>,
    position: u32,
    retired: u32,
}

impl<T: Copy + Default> SliceWindow<T> {
    /// Opens the window at `v = 0` over slices ordered by ascending `v`.
    pub fn new(slices: Vec<VSlice<T>>) -> Self {
        let mut source = slices.into_iter();
        let current = source.next();
        let upper = source.next();
        Self {
            source,
            lower: None,
            current,
            upper,
            position: 0,
            retired: 0,
        }
    }

    /// Slice index the window is centred on.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Number of old slices dropped so far.
    pub fn retired(&self) -> u32 {
        self.retired
    }

    /// Reads a cell within one slice of the current position.
    ///
    /// Slices beyond the old frontier read as zero.
    pub fn value(&self, coord: &CanonicalCoord) -> T {
        let v = coord.v();
        debug_assert!(
            v + 1 >= self.position && v <= self.position + 1,
            "read of slice {v} outside window at {}",
            self.position
        );
        [&self.lower, &self.current, &self.upper]
            .into_iter()
            .flatten()
            .find(|slice| slice.v() == v)
            .map_or_else(T::default, |slice| slice.get(coord.tail()))
    }

    /// Moves the window one slice outwards, retiring the lowest slice.
    pub fn advance(&mut self) {
        if self.lower.take().is_some() {
            self.retired += 1;
        }
        self.lower = self.current.take();
        self.current = self.upper.take();
        self.upper = self.source.next();
        self.position += 1;
    }
}
