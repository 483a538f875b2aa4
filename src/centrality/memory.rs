//! Bounded short-term memory of recently appended nodes.

use std::collections::VecDeque;

use crate::graph::NodeIx;

/// A FIFO of recently visited nodes; the oldest entry is evicted first.
///
/// # Examples
///
/// ```
/// use u_tour::centrality::ShortTermMemory;
///
/// let mut memory = ShortTermMemory::new(2);
/// memory.remember(1);
/// memory.remember(2);
/// memory.remember(3);
/// assert!(!memory.contains(1));
/// assert!(memory.contains(2) && memory.contains(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortTermMemory {
    capacity: usize,
    entries: VecDeque<NodeIx>,
}

impl ShortTermMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, node: NodeIx) -> bool {
        self.entries.contains(&node)
    }

    /// Records `node` as the most recent entry. A node already remembered
    /// is refreshed rather than duplicated.
    pub fn remember(&mut self, node: NodeIx) {
        if self.capacity == 0 {
            return;
        }
        if let Some(pos) = self.entries.iter().position(|&n| n == node) {
            self.entries.remove(pos);
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(node);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = NodeIx> + '_ {
        self.entries.iter().copied()
    }
}
