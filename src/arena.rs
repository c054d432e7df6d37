//! Index-based node store for the landscape's doubly linked chain.
//!
//! Nodes live in a Vec and refer to each other by u32 index instead of
//! raw pointers or `Rc` cycles. Excavated slots go on a free list and are
//! reused by later insertions, so memory for removed positions is
//! reclaimed eagerly without invalidating the indices of live nodes.

use crate::landscape::Height;

/// Sentinel index meaning "no node" (absent neighbor, no valley, etc).
pub const NIL: u32 = u32::MAX;

/// One position in the landscape.
///
/// `rank` is 1-based from the head. `prefix_sum` is the sum of heights
/// from the head through this node, inclusive. `next_valley` is the
/// head-most valley at or after this node (NIL if none), maintained by
/// the landscape's window-repair logic.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    /// Height of this position.
    pub height: Height,
    /// 1-based position from the head.
    pub rank: u32,
    /// Sum of heights from head through this node.
    pub prefix_sum: i64,
    /// Previous node index (NIL at the head).
    pub prev: u32,
    /// Next node index (NIL at the tail).
    pub next: u32,
    /// Head-most valley at or after this node (NIL if none).
    pub next_valley: u32,
}

impl Node {
    /// Create a detached node with the given height.
    pub fn new(height: Height) -> Node {
        return Node {
            height,
            rank: 0,
            prefix_sum: 0,
            prev: NIL,
            next: NIL,
            next_valley: NIL,
        };
    }
}

/// Slab of nodes with free-list reuse.
#[derive(Clone, Debug, Default)]
pub struct Arena {
    /// Backing storage. Freed slots keep stale data until reused.
    nodes: Vec<Node>,
    /// Indices of freed slots, reused LIFO.
    free: Vec<u32>,
}

impl Arena {
    /// Create an empty arena.
    pub fn new() -> Arena {
        return Arena {
            nodes: Vec::new(),
            free: Vec::new(),
        };
    }

    /// Create an empty arena with room for `cap` nodes.
    pub fn with_capacity(cap: usize) -> Arena {
        return Arena {
            nodes: Vec::with_capacity(cap),
            free: Vec::new(),
        };
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        return self.nodes.len() - self.free.len();
    }

    /// Check if there are no live nodes.
    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    /// Store a node, reusing a freed slot if one is available.
    pub fn alloc(&mut self, node: Node) -> u32 {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx as usize] = node;
            return idx;
        }
        let idx = self.nodes.len();
        assert!(idx < NIL as usize, "arena full (max u32::MAX - 1 nodes)");
        self.nodes.push(node);
        return idx as u32;
    }

    /// Release a node's slot for reuse. The index must not be used again
    /// until it is returned by a later `alloc`.
    pub fn free(&mut self, idx: u32) {
        debug_assert!((idx as usize) < self.nodes.len());
        debug_assert!(!self.free.contains(&idx), "double free of node {idx}");
        self.free.push(idx);
    }

    /// Get a node by index.
    #[inline(always)]
    pub fn get(&self, idx: u32) -> &Node {
        return &self.nodes[idx as usize];
    }

    /// Get a node by index, mutably.
    #[inline(always)]
    pub fn get_mut(&mut self, idx: u32) -> &mut Node {
        return &mut self.nodes[idx as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_arena() {
        let arena = Arena::new();
        assert_eq!(arena.len(), 0);
        assert!(arena.is_empty());
    }

    #[test]
    fn alloc_and_read() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(3));
        let b = arena.alloc(Node::new(7));

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a).height, 3);
        assert_eq!(arena.get(b).height, 7);
    }

    #[test]
    fn free_slot_is_reused() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(1));
        let _b = arena.alloc(Node::new(2));

        arena.free(a);
        assert_eq!(arena.len(), 1);

        let c = arena.alloc(Node::new(9));
        assert_eq!(c, a, "freed slot should be reused");
        assert_eq!(arena.get(c).height, 9);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn mutate_in_place() {
        let mut arena = Arena::new();
        let a = arena.alloc(Node::new(5));

        arena.get_mut(a).prefix_sum = 5;
        arena.get_mut(a).rank = 1;

        assert_eq!(arena.get(a).prefix_sum, 5);
        assert_eq!(arena.get(a).rank, 1);
    }
}
