//! Arena-backed radix trie.
//!
//! Nodes live in one `Vec` and refer to each other through [`NodeId`]s, so a
//! flat index of terminal handles can sit next to the tree without fighting
//! ownership. The root is always `NodeId::ROOT`.

use smallvec::SmallVec;

use crate::error::{Result, SortError};
use crate::geometry::Geometry;
use crate::key::TreeKey;
use crate::node::{NodeId, RadixNode};

#[derive(Clone, Copy)]
struct DrainFrame {
    node: NodeId,
    /// Next child slot to visit.
    next_slot: usize,
    /// Output position once this node's own values were written.
    written_at_entry: usize,
}

/// Nodes on the route from the root to (excluding) a terminal leaf.
type Route = SmallVec<[NodeId; 8]>;

pub struct RadixTree {
    pub(crate) geometry: Geometry,
    pub(crate) nodes: Vec<RadixNode>,
    /// Insertions not yet drained.
    pending: usize,
    /// Cleared when a terminal is bumped through the flat index, which leaves
    /// ancestor counters alone. Restored once the tree is fully drained.
    pub(crate) exact_descendants: bool,
}

impl RadixTree {
    pub fn new(geometry: Geometry) -> Self {
        let root = RadixNode::branch(geometry.slots(), None);
        Self {
            geometry,
            nodes: vec![root],
            pending: 0,
            exact_descendants: true,
        }
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of inserted values waiting to be drained.
    #[inline]
    pub fn len(&self) -> usize {
        self.pending
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &RadixNode {
        &self.nodes[id.index()]
    }

    fn alloc_node(&mut self, node: RadixNode) -> Result<NodeId> {
        let id = u32::try_from(self.nodes.len()).map_err(|_| SortError::CapacityOverflow {
            requested: self.geometry.capacity(),
        })?;
        self.nodes.push(node);
        Ok(NodeId(id))
    }

    /// Child of `parent` (sitting at `depth`) on the route of `value`,
    /// allocated on first use.
    fn child_or_alloc(&mut self, parent: NodeId, depth: usize, value: u64) -> Result<NodeId> {
        let slot = self.geometry.bucket(value, depth);
        if let Some(child) = self.nodes[parent.index()].children[slot] {
            return Ok(child);
        }

        let node = if self.geometry.children_are_terminal(depth) {
            RadixNode::terminal(parent, value)
        } else {
            RadixNode::branch(self.geometry.slots(), Some(parent))
        };
        let child = self.alloc_node(node)?;
        self.nodes[parent.index()].children[slot] = Some(child);
        Ok(child)
    }

    /// Walk to the terminal leaf of `value`, creating missing nodes.
    fn descend(&mut self, value: u64, route: &mut Route) -> Result<NodeId> {
        debug_assert!(self.geometry.contains(value));

        let mut node = NodeId::ROOT;
        for depth in 1..=self.geometry.depth() {
            route.push(node);
            node = self.child_or_alloc(node, depth, value)?;
        }
        Ok(node)
    }

    /// Insert one value, descending from the root.
    ///
    /// On a capacity violation the error reports index 0.
    pub fn insert<K: TreeKey>(&mut self, value: K) -> Result<()> {
        self.geometry.check_all(std::slice::from_ref(&value))?;
        self.insert_value(value.to_u64())
    }

    /// Insert a batch. The batch is rejected as a whole, before any node is
    /// touched, if one of its values does not fit.
    pub fn insert_all<K: TreeKey>(&mut self, values: &[K]) -> Result<()> {
        self.geometry.check_all(values)?;
        for value in values {
            self.insert_value(value.to_u64())?;
        }
        Ok(())
    }

    pub(crate) fn insert_value(&mut self, value: u64) -> Result<()> {
        let mut route = Route::new();
        let leaf = self.descend(value, &mut route)?;

        // Counters move only once every node on the route exists.
        for id in route {
            self.nodes[id.index()].descendant_count += 1;
        }
        self.nodes[leaf.index()].increment(value);
        self.pending += 1;
        Ok(())
    }

    /// Terminal leaf representing `value`, created along with its ancestors
    /// if absent. Counters are left untouched.
    pub fn locate_terminal(&mut self, value: u64) -> Result<NodeId> {
        if !self.geometry.contains(value) {
            return Err(SortError::ValueOutOfRange {
                index: 0,
                value,
                capacity: self.geometry.capacity(),
            });
        }
        self.descend(value, &mut Route::new())
    }

    /// Bump a terminal found through a flat index. Ancestors are not visited.
    #[inline]
    pub(crate) fn increment_terminal(&mut self, leaf: NodeId, value: u64) {
        let node = &mut self.nodes[leaf.index()];
        debug_assert!(node.is_terminal());
        node.increment(value);
        self.pending += 1;
        self.exact_descendants = false;
    }

    /// Eagerly allocate every node reachable by a value below the capacity.
    pub fn initialise(&mut self) -> Result<()> {
        let mut stack: SmallVec<[(NodeId, usize, u64); 32]> = SmallVec::new();
        stack.push((NodeId::ROOT, 1, 0));

        while let Some((node, depth, base)) = stack.pop() {
            let divisor = self.geometry.divisor(depth);
            let terminal = self.geometry.children_are_terminal(depth);

            for slot in 0..self.geometry.slots() {
                let child_base = match (slot as u64)
                    .checked_mul(divisor)
                    .and_then(|offset| offset.checked_add(base))
                {
                    Some(b) if self.geometry.contains(b) => b,
                    _ => break,
                };

                let child = self.child_or_alloc(node, depth, child_base)?;
                if !terminal {
                    stack.push((child, depth + 1, child_base));
                }
            }
        }
        Ok(())
    }

    /// Write every pending value into `out` in ascending order.
    ///
    /// Children are visited in ascending slot order and each node is drained
    /// before its children. Stops as soon as `out` is full. Returns the
    /// number of values written.
    pub fn drain_into<K: TreeKey>(&mut self, out: &mut [K]) -> usize {
        if out.is_empty() || self.pending == 0 {
            return 0;
        }

        let mut written = 0usize;
        let mut stack: SmallVec<[DrainFrame; 16]> = SmallVec::new();

        self.emit(NodeId::ROOT, out, &mut written);
        stack.push(DrainFrame {
            node: NodeId::ROOT,
            next_slot: 0,
            written_at_entry: written,
        });

        while let Some(top) = stack.last_mut() {
            if written == out.len() {
                break;
            }

            let children = &self.nodes[top.node.index()].children;
            let mut next = None;
            while top.next_slot < children.len() {
                let slot = top.next_slot;
                top.next_slot += 1;
                if let Some(child) = children[slot] {
                    next = Some(child);
                    break;
                }
            }

            match next {
                Some(child) => {
                    self.emit(child, out, &mut written);
                    if !self.nodes[child.index()].is_terminal() {
                        stack.push(DrainFrame {
                            node: child,
                            next_slot: 0,
                            written_at_entry: written,
                        });
                    }
                }
                None => {
                    if let Some(frame) = stack.pop() {
                        self.settle(frame, written);
                    }
                }
            }
        }

        while let Some(frame) = stack.pop() {
            self.settle(frame, written);
        }

        self.pending = self.pending.saturating_sub(written);
        if self.pending == 0 {
            self.exact_descendants = true;
        }
        written
    }

    #[inline]
    fn emit<K: TreeKey>(&mut self, id: NodeId, out: &mut [K], written: &mut usize) {
        let node = &mut self.nodes[id.index()];
        while node.count_here > 0 && *written < out.len() {
            out[*written] = K::from_u64(node.stored_value);
            *written += 1;
            node.count_here -= 1;
        }
    }

    #[inline]
    fn settle(&mut self, frame: DrainFrame, written: usize) {
        let node = &mut self.nodes[frame.node.index()];
        node.descendant_count = node
            .descendant_count
            .saturating_sub(written - frame.written_at_entry);
    }
}
