//! Propagation work list of `(pointer, points-to delta)` entries

use crate::config::WorkListOrder;
use crate::features::points_to::domain::{PointerId, PointsToSet};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct WorkList {
    order: WorkListOrder,
    entries: VecDeque<(PointerId, PointsToSet)>,
}

impl WorkList {
    pub fn new(order: WorkListOrder) -> Self {
        Self {
            order,
            entries: VecDeque::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, pointer: PointerId, pts: PointsToSet) {
        self.entries.push_back((pointer, pts));
    }

    /// Next entry per the configured discipline
    #[inline]
    pub fn pop(&mut self) -> Option<(PointerId, PointsToSet)> {
        match self.order {
            WorkListOrder::Fifo => self.entries.pop_front(),
            WorkListOrder::Lifo => self.entries.pop_back(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
