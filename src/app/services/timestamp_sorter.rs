//! Index sort over observation timestamps
//!
//! Records stay where the collector put them. The sorter only computes the
//! order in which to visit them, using an in-place heap sort over an index
//! array: build an implicit max-heap of positions keyed by `keys`, then
//! repeatedly move the root to the tail and sift the displaced element down.
//!
//! Ties come out in no particular order.

use std::cmp::Ordering;

/// Positions of `keys` in ascending key order
///
/// The result is always a permutation of `0..keys.len()`.
pub fn sort_indices(keys: &[f64]) -> Vec<usize> {
    let n = keys.len();
    let mut index: Vec<usize> = (0..n).collect();

    // The heap phases below need at least two elements
    if n < 2 {
        return index;
    }

    let less = |a: usize, b: usize| keys[a].total_cmp(&keys[b]) == Ordering::Less;

    let mut left = n / 2;
    let mut right = n - 1;

    loop {
        let held;
        if left > 0 {
            // Heap construction
            left -= 1;
            held = index[left];
        } else {
            // Selection: retire the current maximum to the tail
            held = index[right];
            index[right] = index[0];
            right -= 1;
            if right == 0 {
                index[0] = held;
                break;
            }
        }

        let mut slot = left;
        let mut child = 2 * left + 1;
        while child <= right {
            if child < right && less(index[child], index[child + 1]) {
                child += 1;
            }
            if less(held, index[child]) {
                index[slot] = index[child];
                slot = child;
                child = 2 * child + 1;
            } else {
                break;
            }
        }
        index[slot] = held;
    }

    index
}

/// Visiting order for a collection of records
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortIndex {
    positions: Vec<usize>,
}

impl SortIndex {
    /// Build the index for the given sort keys
    pub fn by_key(keys: &[f64]) -> Self {
        Self {
            positions: sort_indices(keys),
        }
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Walk `items` in sorted order
    ///
    /// `items` must be the collection the keys were taken from.
    pub fn ordered<'a, T>(&'a self, items: &'a [T]) -> impl Iterator<Item = &'a T> + 'a {
        self.positions.iter().map(move |&position| &items[position])
    }
}
