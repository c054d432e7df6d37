//! Leftmost-valley excavation over a mutable landscape of distinct heights.
//!
//! A valley is a position strictly lower than each of its present
//! neighbors; a sole remaining position is always a valley. Excavating
//! the leftmost valley yields a treasure equal to the mean of the prefix
//! of heights up to and including it. Key design decisions:
//!
//! 1. **Doubly linked chain in an arena**: positions refer to neighbors
//!    by u32 index into a slab, so splicing a position in or out is a
//!    constant number of index writes and no unsafe pointer surgery.
//!
//! 2. **Cached leftmost valley + per-position next-valley links**: every
//!    position stores the head-most valley at or after itself. A
//!    mutation can only change valley status inside a fixed-radius
//!    window around the splice site, so relocating the leftmost valley
//!    is a right-to-left repair of at most three links followed by one
//!    link read. No rescans.
//!
//! 3. **Eager prefix sums**: each position stores the sum of heights
//!    from the head through itself, so the treasure at the cached valley
//!    is a single division. Mutations walk from the splice site to the
//!    tail adjusting sums and ranks by the spliced height.

#[cfg(debug_assertions)]
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::arena::{Arena, NIL, Node};

/// Height of one position. Distinct across the landscape's lifetime.
pub type Height = i64;

/// Check the valley predicate: strictly below each present neighbor.
/// A position with both neighbors absent is always a valley.
fn is_valley(arena: &Arena, idx: u32) -> bool {
    let node = arena.get(idx);
    let below_prev = node.prev == NIL || node.height < arena.get(node.prev).height;
    let below_next = node.next == NIL || node.height < arena.get(node.next).height;
    return below_prev && below_next;
}

/// Recompute the next-valley link of `idx` from its own valley status
/// and its successor's link. Callers repair a mutation window from
/// right to left so the successor's link is already fresh when read.
fn repair_link(arena: &mut Arena, idx: u32) {
    let link = if is_valley(arena, idx) {
        idx
    } else {
        let next = arena.get(idx).next;
        if next == NIL {
            NIL
        } else {
            arena.get(next).next_valley
        }
    };
    arena.get_mut(idx).next_valley = link;
}

/// A mutable landscape supporting repeated excavation of its leftmost
/// valley and insertion at the most recent excavation site.
#[derive(Clone, Debug)]
pub struct Landscape {
    arena: Arena,
    /// First position (NIL when empty).
    head: u32,
    /// Last position (NIL when empty).
    tail: u32,
    /// Cached leftmost valley (NIL iff empty).
    first_valley: u32,
    /// Sum of treasures returned by every `remove` so far.
    total_treasure: f64,
    /// Heights currently present. Distinctness is trusted in release;
    /// debug builds keep the set to back the duplicate assertions.
    #[cfg(debug_assertions)]
    present: FxHashSet<Height>,
}

impl Landscape {
    /// Build a landscape from distinct heights, head first.
    ///
    /// One forward pass links the chain and fills prefix sums; one
    /// backward pass fills every next-valley link.
    pub fn new(heights: &[Height]) -> Landscape {
        let mut arena = Arena::with_capacity(heights.len());
        #[cfg(debug_assertions)]
        let mut present = FxHashSet::default();
        let mut head = NIL;
        let mut prev = NIL;
        let mut sum = 0i64;
        let mut rank = 0u32;

        for &height in heights {
            #[cfg(debug_assertions)]
            assert!(present.insert(height), "duplicate height {height}");
            sum += height;
            rank += 1;
            let idx = arena.alloc(Node {
                height,
                rank,
                prefix_sum: sum,
                prev,
                next: NIL,
                next_valley: NIL,
            });
            if prev == NIL {
                head = idx;
            } else {
                arena.get_mut(prev).next = idx;
            }
            prev = idx;
        }
        let tail = prev;

        // Backward pass: each position points at the head-most valley at
        // or after itself. The value left after reaching the head is the
        // leftmost valley of the whole landscape.
        let mut link = NIL;
        let mut cur = tail;
        while cur != NIL {
            if is_valley(&arena, cur) {
                link = cur;
            }
            arena.get_mut(cur).next_valley = link;
            cur = arena.get(cur).prev;
        }

        let landscape = Landscape {
            arena,
            head,
            tail,
            first_valley: link,
            total_treasure: 0.0,
            #[cfg(debug_assertions)]
            present,
        };
        debug_assert!(landscape.invariants_hold());
        return landscape;
    }

    /// Number of positions remaining.
    pub fn len(&self) -> usize {
        return self.arena.len();
    }

    /// Check if the whole landscape has been excavated.
    pub fn is_empty(&self) -> bool {
        return self.head == NIL;
    }

    /// Treasure at the leftmost valley: its prefix sum divided by its
    /// 1-based rank. `None` on an empty landscape.
    pub fn get_first(&self) -> Option<f64> {
        if self.first_valley == NIL {
            return None;
        }
        let node = self.arena.get(self.first_valley);
        return Some(node.prefix_sum as f64 / node.rank as f64);
    }

    /// Excavate the leftmost valley, returning its treasure and adding
    /// it to the running total. `None` on an empty landscape.
    ///
    /// Positions after the excavated one lose its height from their
    /// prefix sums and shift down one rank. The cached valley is
    /// relocated by repairing the links of the two former neighbors.
    pub fn remove(&mut self) -> Option<f64> {
        let treasure = self.get_first()?;
        let v = self.first_valley;
        let node = *self.arena.get(v);
        self.total_treasure += treasure;

        // Splice out.
        let (p, n) = (node.prev, node.next);
        if p == NIL {
            self.head = n;
        } else {
            self.arena.get_mut(p).next = n;
        }
        if n == NIL {
            self.tail = p;
        } else {
            self.arena.get_mut(n).prev = p;
        }
        #[cfg(debug_assertions)]
        self.present.remove(&node.height);
        self.arena.free(v);

        // Everything after the excavation loses its height and a rank.
        let mut cur = n;
        while cur != NIL {
            let after = self.arena.get_mut(cur);
            after.prefix_sum -= node.height;
            after.rank -= 1;
            cur = after.next;
        }

        // Only the former neighbors can change valley status. Repair
        // right to left; the leftmost repaired link is the new cached
        // valley (no valley can exist before the former predecessor).
        let mut window: SmallVec<[u32; 2]> = SmallVec::new();
        if n != NIL {
            window.push(n);
        }
        if p != NIL {
            window.push(p);
        }
        for &idx in &window {
            repair_link(&mut self.arena, idx);
        }
        self.first_valley = match window.last() {
            Some(&leftmost) => self.arena.get(leftmost).next_valley,
            None => NIL,
        };

        debug_assert!(self.invariants_hold());
        return Some(treasure);
    }

    /// Create a new position at the most recent excavation site: spliced
    /// immediately before the cached valley, or at the head when the
    /// cached valley is the head. No-op on an empty landscape, which has
    /// no excavation site to anchor on.
    ///
    /// Positions from the displaced valley onward gain the new height in
    /// their prefix sums and shift up one rank.
    pub fn insert(&mut self, height: Height) {
        let v = self.first_valley;
        if v == NIL {
            return;
        }
        #[cfg(debug_assertions)]
        assert!(self.present.insert(height), "duplicate height {height}");

        // Splice in before the cached valley.
        let p = self.arena.get(v).prev;
        let mut node = Node::new(height);
        node.prev = p;
        node.next = v;
        if p == NIL {
            node.rank = 1;
            node.prefix_sum = height;
        } else {
            let before = self.arena.get(p);
            node.rank = before.rank + 1;
            node.prefix_sum = before.prefix_sum + height;
        }
        let m = self.arena.alloc(node);
        if p == NIL {
            self.head = m;
        } else {
            self.arena.get_mut(p).next = m;
        }
        self.arena.get_mut(v).prev = m;

        // Everything from the displaced valley onward gains the new
        // height and a rank.
        let mut cur = v;
        while cur != NIL {
            let after = self.arena.get_mut(cur);
            after.prefix_sum += height;
            after.rank += 1;
            cur = after.next;
        }

        // Status can change for the displaced valley, the new position,
        // and the predecessor. Repair right to left and read the new
        // cached valley off the leftmost repaired link.
        let mut window: SmallVec<[u32; 3]> = SmallVec::new();
        window.push(v);
        window.push(m);
        if p != NIL {
            window.push(p);
        }
        for &idx in &window {
            repair_link(&mut self.arena, idx);
        }
        let anchor = if p == NIL { m } else { p };
        self.first_valley = self.arena.get(anchor).next_valley;

        debug_assert!(self.invariants_hold());
    }

    /// Sum of treasures from every excavation so far.
    pub fn total_treasure(&self) -> f64 {
        return self.total_treasure;
    }

    /// Heights in head-to-tail order.
    pub fn iter(&self) -> impl Iterator<Item = Height> + '_ {
        let mut cur = self.head;
        return std::iter::from_fn(move || {
            if cur == NIL {
                return None;
            }
            let node = self.arena.get(cur);
            cur = node.next;
            return Some(node.height);
        });
    }

    /// Whole-structure validation, run in debug builds after construction
    /// and after every mutation: chain consistency, ranks, prefix sums,
    /// distinctness, the cached valley being head-most, and next-valley
    /// links being exact for positions at or after it. Links strictly
    /// before the cached valley are allowed to be stale; they are never
    /// consulted because mutations only happen at the cached valley.
    fn invariants_hold(&self) -> bool {
        let mut count = 0usize;
        let mut sum = 0i64;
        let mut prev = NIL;
        let mut cur = self.head;
        while cur != NIL {
            let node = self.arena.get(cur);
            count += 1;
            sum += node.height;
            if node.prev != prev {
                return false;
            }
            if node.rank as usize != count {
                return false;
            }
            if node.prefix_sum != sum {
                return false;
            }
            #[cfg(debug_assertions)]
            if !self.present.contains(&node.height) {
                return false;
            }
            prev = cur;
            cur = node.next;
        }
        if prev != self.tail {
            return false;
        }
        if count != self.arena.len() {
            return false;
        }
        #[cfg(debug_assertions)]
        if count != self.present.len() {
            return false;
        }

        // The cached valley must be the head-most position satisfying
        // the valley predicate.
        let mut first = NIL;
        let mut cur = self.head;
        while cur != NIL {
            if is_valley(&self.arena, cur) {
                first = cur;
                break;
            }
            cur = self.arena.get(cur).next;
        }
        if self.first_valley != first {
            return false;
        }

        // Next-valley links from the tail back to the cached valley.
        if first != NIL {
            let mut link = NIL;
            let mut cur = self.tail;
            loop {
                if is_valley(&self.arena, cur) {
                    link = cur;
                }
                if self.arena.get(cur).next_valley != link {
                    return false;
                }
                if cur == first {
                    break;
                }
                cur = self.arena.get(cur).prev;
            }
        }
        return true;
    }
}
