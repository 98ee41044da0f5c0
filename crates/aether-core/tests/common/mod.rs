// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};

use aether_core::topple::{topple, Candidate};
use aether_core::{Aether5D, CanonicalCoord, Quantity};

/// Builds an automaton and advances it `steps` times.
pub fn evolved<Q: Quantity>(seed: Q, steps: usize) -> Aether5D<Q> {
    let mut aether = Aether5D::new(seed).unwrap();
    for _ in 0..steps {
        aether.step();
    }
    aether
}

/// Steps until the automaton reports no change, up to `limit` steps.
/// Returns the number of steps taken.
pub fn run_until_stable<Q: Quantity>(aether: &mut Aether5D<Q>, limit: usize) -> usize {
    for taken in 1..=limit {
        if !aether.step() {
            return taken;
        }
    }
    limit
}

/// Every lattice point obtained from `coord` by permuting axes and flipping signs.
pub fn symmetric_images(coord: [i64; 5]) -> BTreeSet<[i64; 5]> {
    let mut out = BTreeSet::new();
    let mut perm = [0usize, 1, 2, 3, 4];
    permute(&mut perm, 0, &mut |p| {
        for signs in 0u32..32 {
            let mut image = [0i64; 5];
            for (axis, slot) in image.iter_mut().enumerate() {
                let value = coord[p[axis]];
                *slot = if signs & (1 << axis) == 0 { value } else { -value };
            }
            out.insert(image);
        }
    });
    out
}

fn permute(p: &mut [usize; 5], k: usize, f: &mut impl FnMut(&[usize; 5])) {
    if k == p.len() {
        f(p);
        return;
    }
    for i in k..p.len() {
        p.swap(k, i);
        permute(p, k + 1, f);
        p.swap(k, i);
    }
}

/// Unfolded reference automaton over the whole lattice, stored sparsely.
///
/// Every cell topples against its ten raw neighbours, each with one seat and
/// a multiplier of one. Used to check the folded engine cell by cell.
#[derive(Clone, Debug)]
pub struct FullLattice {
    cells: BTreeMap<[i64; 5], i64>,
}

const UNIT_STEPS: [[i64; 5]; 10] = [
    [1, 0, 0, 0, 0],
    [-1, 0, 0, 0, 0],
    [0, 1, 0, 0, 0],
    [0, -1, 0, 0, 0],
    [0, 0, 1, 0, 0],
    [0, 0, -1, 0, 0],
    [0, 0, 0, 1, 0],
    [0, 0, 0, -1, 0],
    [0, 0, 0, 0, 1],
    [0, 0, 0, 0, -1],
];

fn offset(c: [i64; 5], d: [i64; 5]) -> [i64; 5] {
    [c[0] + d[0], c[1] + d[1], c[2] + d[2], c[3] + d[3], c[4] + d[4]]
}

impl FullLattice {
    pub fn new(seed: i64) -> Self {
        Self {
            cells: BTreeMap::from([([0; 5], seed)]),
        }
    }

    pub fn get(&self, c: [i64; 5]) -> i64 {
        self.cells.get(&c).copied().unwrap_or(0)
    }

    pub fn cells(&self) -> impl Iterator<Item = ([i64; 5], i64)> + '_ {
        self.cells.iter().map(|(c, v)| (*c, *v))
    }

    pub fn step(&mut self) {
        let mut active = BTreeSet::new();
        for c in self.cells.keys() {
            active.insert(*c);
            for d in UNIT_STEPS {
                active.insert(offset(*c, d));
            }
        }
        let mut next: BTreeMap<[i64; 5], i64> = BTreeMap::new();
        for c in active {
            let neighbors: Vec<_> = UNIT_STEPS.iter().map(|d| offset(c, *d)).collect();
            let mut candidates: Vec<_> = neighbors
                .iter()
                .map(|n| Candidate {
                    target: CanonicalCoord::ORIGIN,
                    value: self.get(*n),
                    deposit_multiplier: 1,
                    tie_weight: 1,
                    deposit: 0,
                })
                .collect();
            let outcome = topple(self.get(c), &mut candidates);
            // With unit multipliers the deposit depends only on the neighbour's value.
            let by_value: BTreeMap<i64, i64> =
                candidates.iter().map(|k| (k.value, k.deposit)).collect();
            *next.entry(c).or_default() += outcome.retained;
            for n in neighbors {
                let deposit = by_value[&self.get(n)];
                if deposit != 0 {
                    *next.entry(n).or_default() += deposit;
                }
            }
        }
        next.retain(|_, v| *v != 0);
        self.cells = next;
    }
}
