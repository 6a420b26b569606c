//! Sparse Bitmap for Points-to Sets
//!
//! Sorted `Vec<u32>` representation. Points-to sets in object-oriented
//! programs are small and grow by merge, so a sorted vector beats a dense
//! bit vector on both memory and union cost.
//!
//! # Performance Characteristics
//! - Insert: O(n) worst case, O(log n) lookup
//! - Contains: O(log n)
//! - Union with delta: O(n + m) merge

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sorted, duplicate-free set of `u32`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SparseBitmap {
    ids: Vec<u32>,
}

impl SparseBitmap {
    #[inline]
    pub fn new() -> Self {
        Self { ids: Vec::new() }
    }

    #[inline]
    pub fn singleton(element: u32) -> Self {
        Self {
            ids: vec![element],
        }
    }

    pub fn from_iter(iter: impl IntoIterator<Item = u32>) -> Self {
        let mut ids: Vec<u32> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Basic Operations
    // ═══════════════════════════════════════════════════════════════════════

    /// Insert an element. Returns true if element was not present.
    #[inline]
    pub fn insert(&mut self, element: u32) -> bool {
        match self.ids.binary_search(&element) {
            Ok(_) => false,
            Err(pos) => {
                self.ids.insert(pos, element);
                true
            }
        }
    }

    #[inline]
    pub fn contains(&self, element: u32) -> bool {
        self.ids.binary_search(&element).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate in ascending order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Set Operations
    // ═══════════════════════════════════════════════════════════════════════

    /// self = self ∪ other, returning other \ self (before the union)
    ///
    /// One merge pass computes both the union and the delta.
    pub fn union_diff(&mut self, other: &SparseBitmap) -> SparseBitmap {
        if other.is_empty() {
            return SparseBitmap::new();
        }
        if self.is_empty() {
            self.ids = other.ids.clone();
            return other.clone();
        }

        let mut merged = Vec::with_capacity(self.ids.len() + other.ids.len());
        let mut delta = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < self.ids.len() && j < other.ids.len() {
            match self.ids[i].cmp(&other.ids[j]) {
                Ordering::Less => {
                    merged.push(self.ids[i]);
                    i += 1;
                }
                Ordering::Greater => {
                    merged.push(other.ids[j]);
                    delta.push(other.ids[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    merged.push(self.ids[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.ids[i..]);
        merged.extend_from_slice(&other.ids[j..]);
        delta.extend_from_slice(&other.ids[j..]);

        if !delta.is_empty() {
            self.ids = merged;
        }
        SparseBitmap { ids: delta }
    }

    /// self ⊆ other
    pub fn is_subset_of(&self, other: &SparseBitmap) -> bool {
        if self.len() > other.len() {
            return false;
        }
        let mut j = 0;
        for &e in &self.ids {
            while j < other.ids.len() && other.ids[j] < e {
                j += 1;
            }
            if j == other.ids.len() || other.ids[j] != e {
                return false;
            }
            j += 1;
        }
        true
    }

    /// Whether the sets share an element
    pub fn intersects(&self, other: &SparseBitmap) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.ids.len() && j < other.ids.len() {
            match self.ids[i].cmp(&other.ids[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => return true,
            }
        }
        false
    }
}
