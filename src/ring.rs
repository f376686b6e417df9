//! Circular sibling ring over arena handles.
//!
//! This is the one list abstraction the heap uses everywhere: the top-level
//! root list and every node's child list are both a [`Ring`]. Because nodes
//! live in an arena ([`slotmap::SlotMap`]) and relate to each other through
//! handles, the ring itself stores no nodes; it is a cursor (head handle plus
//! length) and every operation takes the arena as an argument.
//!
//! # Circular structure
//!
//! - An empty ring has no head.
//! - A single member points to itself through both sibling links.
//! - Removing the last member resets the ring to empty.
//! - Appending inserts between the last member (`head.prev`) and the head, so
//!   push is O(1) and iteration order is insertion order.
//! - Two rings splice into one in O(1) by reconnecting their endpoints.
//!
//! Removal is O(1) *given a handle* - no searching - which is what lets a
//! Fibonacci heap cut nodes cheaply.

use std::collections::HashSet;

use slotmap::{Key, SlotMap};

use crate::error::HeapError;

/// Link fields a ring member exposes to the ring operations.
///
/// Node types embed their sibling handles and implement this trait so a
/// [`Ring`] can walk and rewrite them. `clear_parent` is invoked when a member
/// is removed: removal is full detachment, the node leaves with no sibling
/// links and no parent.
pub trait Sibling<K: Key> {
    fn next(&self) -> Option<K>;
    fn prev(&self) -> Option<K>;
    fn set_next(&mut self, link: Option<K>);
    fn set_prev(&mut self, link: Option<K>);
    fn clear_parent(&mut self);
}

/// A circular doubly-linked ring of arena nodes.
///
/// The handle before the head (`head.prev`) is the last member, so appending
/// at the end needs no separate tail pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring<K: Key> {
    head: Option<K>,
    len: usize,
}

impl<K: Key> Default for Ring<K> {
    fn default() -> Self {
        Ring { head: None, len: 0 }
    }
}

impl<K: Key> Ring<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the first member, if any.
    pub fn head(&self) -> Option<K> {
        self.head
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Appends `key` at the end of the ring, between the last member and the
    /// head. O(1). Whatever sibling links `key` carried before are
    /// overwritten.
    ///
    /// `key` must be live in `nodes` and must not already be a member of any
    /// ring.
    pub fn push<N: Sibling<K>>(&mut self, nodes: &mut SlotMap<K, N>, key: K) {
        match self.head {
            None => {
                let node = &mut nodes[key];
                node.set_next(Some(key));
                node.set_prev(Some(key));
                self.head = Some(key);
            }
            Some(head) => {
                let last = nodes[head].prev().expect("head of a non-empty ring is linked");
                let node = &mut nodes[key];
                node.set_next(Some(head));
                node.set_prev(Some(last));
                nodes[last].set_next(Some(key));
                nodes[head].set_prev(Some(key));
            }
        }
        self.len += 1;
    }

    /// Unlinks `key` from the ring. O(1) given the handle.
    ///
    /// The removed node is fully detached: its sibling links and parent are
    /// cleared. If `key` was the head, the head advances to its successor; if
    /// it was the sole member, the ring becomes empty.
    ///
    /// Fails with [`HeapError::InvalidOperation`] on an empty ring. `key` must
    /// be a member of *this* ring; membership of another ring is not
    /// detectable and corrupts both.
    pub fn remove<N: Sibling<K>>(
        &mut self,
        nodes: &mut SlotMap<K, N>,
        key: K,
    ) -> Result<(), HeapError> {
        let head = self
            .head
            .ok_or(HeapError::InvalidOperation("remove from an empty ring"))?;
        debug_assert!(nodes[key].next().is_some(), "removed node is not linked");

        let next = nodes[key].next().expect("ring member is linked");
        let prev = nodes[key].prev().expect("ring member is linked");
        if next == key {
            // sole member
            self.head = None;
        } else {
            nodes[prev].set_next(Some(next));
            nodes[next].set_prev(Some(prev));
            if head == key {
                self.head = Some(next);
            }
        }

        let node = &mut nodes[key];
        node.set_next(None);
        node.set_prev(None);
        node.clear_parent();
        self.len -= 1;
        Ok(())
    }

    /// Concatenates `other` onto the end of this ring in O(1) by reconnecting
    /// the two rings' endpoints. Members keep their relative order; `other` is
    /// consumed.
    pub fn splice<N: Sibling<K>>(&mut self, nodes: &mut SlotMap<K, N>, other: Ring<K>) {
        let Some(other_head) = other.head else {
            return;
        };
        match self.head {
            None => *self = other,
            Some(head) => {
                let last = nodes[head].prev().expect("head of a non-empty ring is linked");
                let other_last = nodes[other_head]
                    .prev()
                    .expect("head of a non-empty ring is linked");
                nodes[last].set_next(Some(other_head));
                nodes[other_head].set_prev(Some(last));
                nodes[other_last].set_next(Some(head));
                nodes[head].set_prev(Some(other_last));
                self.len += other.len;
            }
        }
    }

    /// Lazy, restartable traversal starting at the head and stopping upon
    /// wrapping back around to it.
    ///
    /// A visited set bounds the walk, so iteration terminates even over a
    /// corrupted ring. Diagnostic only: no correctness-critical operation
    /// searches a ring, they all hold direct handles.
    pub fn iter<'a, N: Sibling<K>>(&self, nodes: &'a SlotMap<K, N>) -> RingIter<'a, K, N> {
        RingIter {
            nodes,
            head: self.head,
            cursor: self.head,
            seen: HashSet::new(),
        }
    }

    /// Rewrites the head handle through `f`. Used when nodes migrate between
    /// arenas and every handle must be translated.
    pub(crate) fn remap(self, f: impl FnOnce(K) -> K) -> Ring<K> {
        Ring {
            head: self.head.map(f),
            len: self.len,
        }
    }
}

/// Iterator over the handles of a ring's members. See [`Ring::iter`].
pub struct RingIter<'a, K: Key, N: Sibling<K>> {
    nodes: &'a SlotMap<K, N>,
    head: Option<K>,
    cursor: Option<K>,
    seen: HashSet<K>,
}

impl<'a, K: Key, N: Sibling<K>> Iterator for RingIter<'a, K, N> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let current = self.cursor?;
        if !self.seen.insert(current) {
            self.cursor = None;
            return None;
        }
        let next = self.nodes.get(current).and_then(|n| n.next());
        self.cursor = match next {
            Some(n) if self.head != Some(n) => Some(n),
            _ => None,
        };
        Some(current)
    }
}
