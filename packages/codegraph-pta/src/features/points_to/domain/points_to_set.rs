//! Points-to sets over context-qualified objects

use super::handles::CSObjId;
use super::sparse_bitmap::SparseBitmap;
use serde::{Deserialize, Serialize};

/// Monotone set of `CSObjId`
///
/// Grows only; there is no removal operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsToSet {
    bits: SparseBitmap,
}

impl PointsToSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(obj: CSObjId) -> Self {
        Self {
            bits: SparseBitmap::singleton(obj.0),
        }
    }

    /// Returns true if `obj` was not present
    #[inline]
    pub fn insert(&mut self, obj: CSObjId) -> bool {
        self.bits.insert(obj.0)
    }

    #[inline]
    pub fn contains(&self, obj: CSObjId) -> bool {
        self.bits.contains(obj.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Objects in ascending handle order
    pub fn iter(&self) -> impl Iterator<Item = CSObjId> + '_ {
        self.bits.iter().map(CSObjId)
    }

    /// Union `other` into `self`, returning the objects that were new
    pub fn add_all_diff(&mut self, other: &PointsToSet) -> PointsToSet {
        Self {
            bits: self.bits.union_diff(&other.bits),
        }
    }

    pub fn is_subset_of(&self, other: &PointsToSet) -> bool {
        self.bits.is_subset_of(&other.bits)
    }
}

impl FromIterator<CSObjId> for PointsToSet {
    fn from_iter<I: IntoIterator<Item = CSObjId>>(iter: I) -> Self {
        Self {
            bits: SparseBitmap::from_iter(iter.into_iter().map(|o| o.0)),
        }
    }
}
