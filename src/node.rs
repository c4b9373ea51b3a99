//! Trie nodes and their arena handles.

/// Index of a node inside a [`RadixTree`](crate::RadixTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single node of the routing trie.
///
/// Branch nodes own one slot per digit; terminal leaves own none and instead
/// count how many times their value was inserted.
#[derive(Debug, Clone)]
pub struct RadixNode {
    /// Child slots in ascending digit order. Empty for terminal leaves.
    pub(crate) children: Box<[Option<NodeId>]>,
    /// Insertions of `stored_value` not yet drained.
    pub(crate) count_here: usize,
    pub(crate) stored_value: u64,
    /// Insertions anywhere below this node not yet drained.
    pub(crate) descendant_count: usize,
    /// Owning node. Only read by the integrity checker.
    pub(crate) parent: Option<NodeId>,
}

impl RadixNode {
    pub(crate) fn branch(branch_factor: usize, parent: Option<NodeId>) -> Self {
        Self {
            children: vec![None; branch_factor].into_boxed_slice(),
            count_here: 0,
            stored_value: 0,
            descendant_count: 0,
            parent,
        }
    }

    pub(crate) fn terminal(parent: NodeId, value: u64) -> Self {
        Self {
            children: Vec::new().into_boxed_slice(),
            count_here: 0,
            stored_value: value,
            descendant_count: 0,
            parent: Some(parent),
        }
    }

    #[inline]
    pub(crate) fn increment(&mut self, value: u64) {
        self.count_here += 1;
        self.stored_value = value;
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn count_here(&self) -> usize {
        self.count_here
    }

    /// The value this node currently holds, if any insertion is pending.
    #[inline]
    pub fn stored_value(&self) -> Option<u64> {
        (self.count_here > 0).then_some(self.stored_value)
    }

    #[inline]
    pub fn descendant_count(&self) -> usize {
        self.descendant_count
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Occupied child slots as `(slot, child)`, in ascending slot order.
    pub fn children(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(slot, child)| child.map(|id| (slot, id)))
    }
}
