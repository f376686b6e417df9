//! The arena node: one (priority, item) pair and its place in the forest.

use slotmap::{new_key_type, SlotMap};

use crate::ring::{Ring, Sibling};

new_key_type! {
    /// Generation-checked handle to a heap node.
    ///
    /// Handles are issued by `insert` and stay valid until the node is
    /// extracted or deleted (or the issuing heap is consumed by `union`).
    /// A stale handle is detected by the arena's generation check and reported
    /// as `HeapError::InvalidHandle`, never dereferenced.
    pub struct NodeHandle;
}

pub(crate) type NodeArena<T, P> = SlotMap<NodeHandle, Node<T, P>>;

/// A heap node. Structural relations (parent, siblings, children) are handle
/// fields into the owning arena, so there is no ownership cycle to manage.
#[derive(Debug)]
pub(crate) struct Node<T, P> {
    pub(crate) item: T,
    pub(crate) priority: P,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) next: Option<NodeHandle>,
    pub(crate) prev: Option<NodeHandle>,
    /// This node's child ring. The node is a member of its parent's ring (or
    /// the root ring), never of its own.
    pub(crate) children: Ring<NodeHandle>,
    /// Number of direct children; the consolidation bucket key.
    pub(crate) degree: usize,
    /// Whether this node has lost a child since it last became a child
    /// itself. Drives the cascading cut.
    pub(crate) mark: bool,
}

impl<T, P> Node<T, P> {
    pub(crate) fn new(priority: P, item: T) -> Self {
        Node {
            item,
            priority,
            parent: None,
            next: None,
            prev: None,
            children: Ring::new(),
            degree: 0,
            mark: false,
        }
    }

    pub(crate) fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl<T, P> Sibling<NodeHandle> for Node<T, P> {
    fn next(&self) -> Option<NodeHandle> {
        self.next
    }

    fn prev(&self) -> Option<NodeHandle> {
        self.prev
    }

    fn set_next(&mut self, link: Option<NodeHandle>) {
        self.next = link;
    }

    fn set_prev(&mut self, link: Option<NodeHandle>) {
        self.prev = link;
    }

    fn clear_parent(&mut self) {
        self.parent = None;
    }
}

/// Appends `child` to `parent`'s child ring and bumps the degree.
///
/// Re-parenting is explicit: a child that already has a parent is detached
/// from it first. Children of equal priority are legal siblings; min-heap
/// order only requires `parent <= child`.
pub(crate) fn add_child<T, P>(nodes: &mut NodeArena<T, P>, parent: NodeHandle, child: NodeHandle) {
    debug_assert_ne!(parent, child, "a node cannot be its own child");
    if let Some(old_parent) = nodes[child].parent {
        remove_child(nodes, old_parent, child);
    }
    // The ring is a small cursor; take it out of the slot to operate on the
    // arena without aliasing the parent's slot.
    let mut ring = std::mem::take(&mut nodes[parent].children);
    ring.push(nodes, child);
    nodes[parent].children = ring;
    nodes[child].parent = Some(parent);
    nodes[parent].degree += 1;
}

/// Detaches `child` from `parent`'s child ring and decrements the degree.
/// A no-op if `parent` has no children or `child` is not its child.
pub(crate) fn remove_child<T, P>(
    nodes: &mut NodeArena<T, P>,
    parent: NodeHandle,
    child: NodeHandle,
) {
    if nodes[parent].children.is_empty() || nodes[child].parent != Some(parent) {
        return;
    }
    let mut ring = std::mem::take(&mut nodes[parent].children);
    ring.remove(nodes, child)
        .expect("child ring is non-empty");
    nodes[parent].children = ring;
    nodes[parent].degree -= 1;
}
