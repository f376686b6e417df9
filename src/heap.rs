//! The Fibonacci heap engine.
//!
//! The heap owns an arena of nodes, the circular root ring, a cached handle to
//! the minimum root, and the total node count. Clients drive the five public
//! operations; the private consolidation and cut/cascading-cut algorithms keep
//! the forest balanced:
//!
//! - O(1) amortized `insert`, `decrease_key`, `union`
//! - O(log n) amortized `extract_min`, `delete`

use std::fmt;

use slotmap::SecondaryMap;
use tracing::{debug, trace};

use crate::error::HeapError;
use crate::node::{self, Node, NodeArena, NodeHandle};
use crate::priority::Priority;
use crate::ring::Ring;

/// 1 / log2(phi): tree degree in a Fibonacci heap of n nodes is bounded by
/// log_phi(n) = log2(n) / log2(phi).
const INV_LOG2_PHI: f64 = 1.4404200904125564;

/// A min-ordered Fibonacci heap.
///
/// Entries are (priority, item) pairs; [`insert`](FibonacciHeap::insert)
/// returns a [`NodeHandle`] that addresses the entry for
/// [`decrease_key`](FibonacciHeap::decrease_key) and
/// [`delete`](FibonacciHeap::delete). Handles are generation-checked: once an
/// entry has been extracted or deleted, its handle is reported as
/// [`HeapError::InvalidHandle`].
///
/// # Example
///
/// ```rust
/// use fibonacci_heap::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let _a = heap.insert(5, "a").unwrap();
/// let b = heap.insert(3, "b").unwrap();
/// let c = heap.insert(8, "c").unwrap();
///
/// assert_eq!(heap.peek_min(), Some((&3, &"b")));
/// assert_eq!(heap.extract_min(), Ok((3, "b")));
///
/// heap.decrease_key(c, 1).unwrap();
/// assert_eq!(heap.peek_min(), Some((&1, &"c")));
/// # let _ = b;
/// ```
pub struct FibonacciHeap<T, P: Priority> {
    nodes: NodeArena<T, P>,
    roots: Ring<NodeHandle>,
    min: Option<NodeHandle>,
    len: usize,
}

impl<T, P: Priority> Default for FibonacciHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Priority> FibonacciHeap<T, P> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        FibonacciHeap {
            nodes: NodeArena::with_key(),
            roots: Ring::new(),
            min: None,
            len: 0,
        }
    }

    /// Creates an empty heap with arena capacity for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        FibonacciHeap {
            nodes: NodeArena::with_capacity_and_key(capacity),
            roots: Ring::new(),
            min: None,
            len: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Total number of nodes across the whole forest.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Inserts an entry as a new root. O(1).
    ///
    /// Fails with [`HeapError::InvalidPriority`] if the priority cannot serve
    /// as an ordering key (NaN for float priorities).
    pub fn insert(&mut self, priority: P, item: T) -> Result<NodeHandle, HeapError> {
        if !priority.is_valid() {
            return Err(HeapError::InvalidPriority);
        }
        let key = self.nodes.insert(Node::new(priority, item));
        self.roots.push(&mut self.nodes, key);
        match self.min {
            Some(min) if !(priority < self.nodes[min].priority) => {}
            _ => self.min = Some(key),
        }
        self.len += 1;
        Ok(key)
    }

    /// The minimum entry, without removing it. O(1).
    pub fn peek_min(&self) -> Option<(&P, &T)> {
        self.min.map(|key| {
            let node = &self.nodes[key];
            (&node.priority, &node.item)
        })
    }

    /// Handle of the minimum entry. O(1).
    pub fn min_handle(&self) -> Option<NodeHandle> {
        self.min
    }

    /// The entry addressed by `handle`, or `None` if the handle is stale.
    pub fn get(&self, handle: NodeHandle) -> Option<(&P, &T)> {
        self.nodes.get(handle).map(|node| (&node.priority, &node.item))
    }

    /// Whether `handle` addresses a live entry of this heap.
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Parent handle of a live entry; `None` for roots and stale handles.
    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(handle).and_then(|node| node.parent)
    }

    /// Number of direct children of a live entry.
    pub fn degree(&self, handle: NodeHandle) -> Option<usize> {
        self.nodes.get(handle).map(|node| node.degree)
    }

    /// Diagnostic traversal of the root ring, head (minimum) first.
    pub fn roots(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.roots.iter(&self.nodes)
    }

    /// Diagnostic traversal of an entry's direct children. Empty for stale
    /// handles.
    pub fn children(&self, handle: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        let ring = self
            .nodes
            .get(handle)
            .map(|node| node.children)
            .unwrap_or_default();
        ring.iter(&self.nodes)
    }

    /// Merges `other` into this heap, consuming it. The root rings are
    /// concatenated circularly, the lower of the two minima is adopted, and
    /// the counts are summed.
    ///
    /// Because each heap owns its own arena, `other`'s nodes are migrated into
    /// this heap's arena; the returned table maps every handle `other` issued
    /// to its replacement. Handles issued by `other` must not be used on the
    /// merged heap without translating them through the table. The ring
    /// splice itself is O(1); the migration is O(`other.len()`).
    pub fn union(&mut self, mut other: Self) -> SecondaryMap<NodeHandle, NodeHandle> {
        let mut remap = SecondaryMap::with_capacity(other.len);
        if other.is_empty() {
            return remap;
        }
        if self.is_empty() {
            for key in other.nodes.keys() {
                remap.insert(key, key);
            }
            *self = other;
            return remap;
        }

        let mut moved = Vec::with_capacity(other.len);
        for (old, node) in other.nodes.drain() {
            let new = self.nodes.insert(node);
            remap.insert(old, new);
            moved.push(new);
        }
        // Every handle field of a migrated node still speaks the old arena's
        // language; rewrite them all through the table.
        for &key in &moved {
            let node = &mut self.nodes[key];
            node.parent = node.parent.map(|k| remap[k]);
            node.next = node.next.map(|k| remap[k]);
            node.prev = node.prev.map(|k| remap[k]);
            node.children = node.children.remap(|k| remap[k]);
        }

        let other_roots = other.roots.remap(|k| remap[k]);
        self.roots.splice(&mut self.nodes, other_roots);

        let own_min = self.min.expect("non-empty heap has a minimum");
        let other_min = remap[other.min.expect("non-empty heap has a minimum")];
        if self.nodes[other_min].priority < self.nodes[own_min].priority {
            self.min = Some(other_min);
        }
        self.len += other.len;
        remap
    }

    /// Removes and returns the minimum entry. O(log n) amortized.
    ///
    /// Fails with [`HeapError::EmptyHeap`] on an empty heap. The extracted
    /// entry's handle becomes stale.
    pub fn extract_min(&mut self) -> Result<(P, T), HeapError> {
        let min = self.min.ok_or(HeapError::EmptyHeap)?;

        // Promote every child of the minimum to the root ring. Clearing the
        // parent links is O(degree); the ring splice is O(1).
        let children = std::mem::take(&mut self.nodes[min].children);
        let promoted: Vec<NodeHandle> = children.iter(&self.nodes).collect();
        for child in promoted {
            let node = &mut self.nodes[child];
            node.parent = None;
            node.mark = false;
        }
        self.roots.splice(&mut self.nodes, children);

        self.roots.remove(&mut self.nodes, min)?;
        let node = self.nodes.remove(min).expect("minimum handle is live");
        self.len -= 1;

        if self.roots.is_empty() {
            self.min = None;
        } else {
            // Tentative; consolidation recomputes the true minimum.
            self.min = self.roots.head();
            self.consolidate();
        }
        Ok((node.priority, node.item))
    }

    /// Lowers the priority of the entry addressed by `handle`. O(1)
    /// amortized.
    ///
    /// A new priority that does not strictly decrease the current one is
    /// ignored (logged at debug level); decrease-key never raises a priority.
    /// Fails with [`HeapError::InvalidHandle`] for stale handles and
    /// [`HeapError::InvalidPriority`] for NaN.
    pub fn decrease_key(&mut self, handle: NodeHandle, new_priority: P) -> Result<(), HeapError> {
        if !new_priority.is_valid() {
            return Err(HeapError::InvalidPriority);
        }
        let node = self.nodes.get(handle).ok_or(HeapError::InvalidHandle)?;
        if !(new_priority < node.priority) {
            debug!(
                current = ?node.priority,
                requested = ?new_priority,
                "decrease_key ignored: new priority does not decrease the current one"
            );
            return Ok(());
        }

        self.nodes[handle].priority = new_priority;
        if let Some(parent) = self.nodes[handle].parent {
            if self.nodes[parent].priority > new_priority {
                self.cut(handle, parent);
                self.cascading_cut(parent);
            }
        }
        let min = self.min.expect("non-empty heap has a minimum");
        if new_priority < self.nodes[min].priority {
            self.min = Some(handle);
        }
        Ok(())
    }

    /// Removes the entry addressed by `handle`, returning its (priority,
    /// item) pair. O(log n) amortized.
    ///
    /// Implemented as a decrease to the [`Priority::lowest`] sentinel followed
    /// by an extraction of the minimum; the sentinel never escapes, the
    /// entry's own priority is returned. Fails with
    /// [`HeapError::InvalidHandle`] for stale handles.
    pub fn delete(&mut self, handle: NodeHandle) -> Result<(P, T), HeapError> {
        let node = self.nodes.get(handle).ok_or(HeapError::InvalidHandle)?;
        let priority = node.priority;

        // Unconditional cut: unlike decrease_key there is no order check,
        // the node may already sit at the sentinel priority.
        self.nodes[handle].priority = P::lowest();
        if let Some(parent) = self.nodes[handle].parent {
            self.cut(handle, parent);
            self.cascading_cut(parent);
        }
        self.min = Some(handle);
        let (_, item) = self.extract_min()?;
        Ok((priority, item))
    }

    /// Merges equal-degree roots until every root has a distinct degree, then
    /// rebuilds the root ring and recomputes the minimum. Invoked only by
    /// `extract_min`.
    fn consolidate(&mut self) {
        if self.roots.is_empty() {
            return;
        }
        if self.roots.len() == 1 {
            self.min = self.roots.head();
            return;
        }
        trace!(roots = self.roots.len(), len = self.len, "consolidating root ring");

        // Degree is bounded by log_phi(n); one spare slot absorbs the link
        // a root may gain while it sits in its bucket.
        let cap = ((self.len.max(2).ilog2() + 1) as f64 * INV_LOG2_PHI).ceil() as usize + 1;
        let mut buckets: Vec<Option<NodeHandle>> = vec![None; cap];

        // Single pass over a snapshot of the ring; relinking below never
        // revisits a processed root.
        let pass: Vec<NodeHandle> = self.roots.iter(&self.nodes).collect();
        for root in pass {
            let mut x = root;
            loop {
                let degree = self.nodes[x].degree;
                if degree >= buckets.len() {
                    buckets.resize(degree + 1, None);
                }
                match buckets[degree].take() {
                    None => {
                        buckets[degree] = Some(x);
                        break;
                    }
                    Some(occupant) => {
                        // Lower-or-equal priority wins as parent; on a tie
                        // the existing bucket occupant adopts the newcomer.
                        x = if self.nodes[x].priority < self.nodes[occupant].priority {
                            self.link(occupant, x);
                            x
                        } else {
                            self.link(x, occupant);
                            occupant
                        };
                    }
                }
            }
        }

        // Rebuild the root ring from the surviving distinct-degree roots and
        // recompute the minimum over them.
        self.roots = Ring::new();
        self.min = None;
        for key in buckets.into_iter().flatten() {
            self.roots.push(&mut self.nodes, key);
            match self.min {
                Some(min) if !(self.nodes[key].priority < self.nodes[min].priority) => {}
                _ => self.min = Some(key),
            }
        }
    }

    /// Makes `child` a subtree of `parent`. Both must currently be roots with
    /// `parent`'s priority at or below `child`'s; these are programming
    /// invariants of consolidation, checked before any mutation.
    fn link(&mut self, child: NodeHandle, parent: NodeHandle) {
        debug_assert!(self.nodes[child].is_root(), "linked node must be parentless");
        debug_assert!(self.nodes[parent].is_root(), "link target must be a root");
        debug_assert!(
            !(self.nodes[child].priority < self.nodes[parent].priority),
            "link parent's priority must not exceed the child's"
        );
        self.roots
            .remove(&mut self.nodes, child)
            .expect("linked node is a member of the root ring");
        node::add_child(&mut self.nodes, parent, child);
        // A node entering a new parent has no lost-child history.
        self.nodes[child].mark = false;
    }

    /// Detaches `child` from `parent` and promotes it to the root ring,
    /// clearing its mark.
    fn cut(&mut self, child: NodeHandle, parent: NodeHandle) {
        debug_assert_eq!(
            self.nodes[child].parent,
            Some(parent),
            "cut requires the child to be parented to the given node"
        );
        node::remove_child(&mut self.nodes, parent, child);
        self.roots.push(&mut self.nodes, child);
        self.nodes[child].mark = false;
    }

    /// Walks up from a node that just lost a child. The first unmarked
    /// non-root ancestor is marked and the walk stops; already-marked
    /// ancestors are themselves cut to the root ring and the walk continues.
    ///
    /// Iterative on purpose: adversarially deep cascades must not consume
    /// call stack.
    fn cascading_cut(&mut self, start: NodeHandle) {
        let mut current = start;
        while let Some(parent) = self.nodes[current].parent {
            if !self.nodes[current].mark {
                self.nodes[current].mark = true;
                return;
            }
            self.cut(current, parent);
            current = parent;
        }
    }
}

impl<T: fmt::Debug, P: Priority> FibonacciHeap<T, P> {
    fn fmt_subtree(
        &self,
        f: &mut fmt::Formatter<'_>,
        key: NodeHandle,
        depth: usize,
    ) -> fmt::Result {
        let node = &self.nodes[key];
        writeln!(
            f,
            "{:indent$}{:?}: {:?} (degree {}{})",
            "",
            node.priority,
            node.item,
            node.degree,
            if node.mark { ", marked" } else { "" },
            indent = depth * 2
        )?;
        for child in node.children.iter(&self.nodes) {
            self.fmt_subtree(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug, P: Priority> fmt::Debug for FibonacciHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FibonacciHeap(len = {})", self.len)?;
        for root in self.roots.iter(&self.nodes) {
            self.fmt_subtree(f, root, 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl<T, P: Priority> FibonacciHeap<T, P> {
    /// Structural invariant checker for tests: min cache coherence, root ring
    /// integrity, per-edge heap order, degree bookkeeping, node count.
    fn check(&self) -> Result<(), String> {
        if (self.len == 0) != self.min.is_none() {
            return Err(format!("len {} but min is {:?}", self.len, self.min));
        }
        if self.roots.is_empty() != self.min.is_none() {
            return Err("root ring emptiness disagrees with min cache".into());
        }
        let Some(min) = self.min else {
            return Ok(());
        };

        let mut count = 0;
        let mut ring_members = 0;
        for root in self.roots.iter(&self.nodes) {
            ring_members += 1;
            if !self.nodes[root].is_root() {
                return Err("root ring member has a parent".to_string());
            }
            if self.nodes[root].priority < self.nodes[min].priority {
                return Err("cached minimum is not minimal among roots".to_string());
            }
            count += self.check_subtree(root)?;
        }
        if ring_members != self.roots.len() {
            return Err(format!(
                "root ring len {} but {} members reachable",
                self.roots.len(),
                ring_members
            ));
        }
        if count != self.len {
            return Err(format!("len {} but {} nodes reachable", self.len, count));
        }
        Ok(())
    }

    fn check_subtree(&self, key: NodeHandle) -> Result<usize, String> {
        let node = &self.nodes[key];
        if node.children.len() != node.degree {
            return Err(format!(
                "degree {} disagrees with child ring len {}",
                node.degree,
                node.children.len()
            ));
        }
        let mut count = 1;
        for child in node.children.iter(&self.nodes) {
            if self.nodes[child].parent != Some(key) {
                return Err("child's parent link does not point back".to_string());
            }
            if self.nodes[child].priority < node.priority {
                return Err("heap order violated along a parent edge".to_string());
            }
            let prev = self.nodes[child].prev.ok_or("ring member lost its prev link")?;
            if self.nodes[prev].next != Some(child) {
                return Err("sibling back-link broken".to_string());
            }
            count += self.check_subtree(child)?;
        }
        Ok(count)
    }
}
