//! Sort entry points.
//!
//! Two modes share the same trie and drain traversal:
//!
//! - one-shot ([`sort`], [`sort_with`], [`TreeSort`]): a fresh tree is built
//!   lazily for every call and dropped afterwards;
//! - prebuilt ([`SortEngine`], [`PrebuiltTree`]): the whole tree is allocated
//!   once along with a flat index from value to terminal leaf, and reused.
//!   Insertion is a single index lookup instead of a descent.

use crate::config::{Capacity, TreeConfig};
use crate::error::{Result, SortError};
use crate::geometry::Geometry;
use crate::key::TreeKey;
use crate::node::NodeId;
use crate::tree::RadixTree;

/// Sort `data` ascending with the default [`TreeConfig`].
pub fn sort<K: TreeKey>(data: &mut [K]) -> Result<&mut [K]> {
    sort_with_config(data, &TreeConfig::default())
}

/// Sort `data` ascending through a fresh tree of `branch_factor` slots per node.
///
/// ```
/// use radix_tree_sort::{sort_with, Capacity};
///
/// let mut values = [5u32, 3, 3, 1, 4, 1, 5, 9, 2, 6];
/// sort_with(&mut values, 4, Capacity::AtLeast(16)).unwrap();
/// assert_eq!(values, [1, 1, 2, 3, 3, 4, 5, 5, 6, 9]);
/// ```
pub fn sort_with<K: TreeKey>(
    data: &mut [K],
    branch_factor: usize,
    capacity: Capacity,
) -> Result<&mut [K]> {
    sort_with_config(
        data,
        &TreeConfig {
            branch_factor,
            capacity,
        },
    )
}

pub fn sort_with_config<'a, K: TreeKey>(
    data: &'a mut [K],
    config: &TreeConfig,
) -> Result<&'a mut [K]> {
    let max_value = match config.capacity {
        Capacity::FromData => data.iter().map(|v| v.to_u64()).max(),
        _ => None,
    };
    let capacity = config.capacity.resolve(max_value)?;
    let geometry = Geometry::new(capacity, config.branch_factor)?;
    geometry.check_all(data)?;

    tracing::debug!(
        len = data.len(),
        capacity,
        branch_factor = config.branch_factor,
        "one-shot tree sort"
    );

    if data.is_empty() {
        return Ok(data);
    }

    let mut tree = RadixTree::new(geometry);
    for value in data.iter() {
        tree.insert_value(value.to_u64())?;
    }
    tree.drain_into(data);

    Ok(data)
}

/// Extension trait sorting slices (and `Vec`s, through deref) with a
/// one-shot tree.
pub trait TreeSort {
    /// ```
    /// use radix_tree_sort::TreeSort;
    ///
    /// let mut values = vec![3u16, 1, 2];
    /// values.tree_sort().unwrap();
    /// assert_eq!(values, [1, 2, 3]);
    /// ```
    fn tree_sort(&mut self) -> Result<()>;

    fn tree_sort_with(&mut self, config: &TreeConfig) -> Result<()>;
}

impl<K: TreeKey> TreeSort for [K] {
    fn tree_sort(&mut self) -> Result<()> {
        sort(self).map(|_| ())
    }

    fn tree_sort_with(&mut self, config: &TreeConfig) -> Result<()> {
        sort_with_config(self, config).map(|_| ())
    }
}

/// An eagerly allocated tree plus the flat index of its terminal leaves.
///
/// Counts return to zero after every sort, so the same tree serves any
/// number of sorts whose values fit below its capacity.
pub struct PrebuiltTree {
    tree: RadixTree,
    /// `terminals[v]` is the leaf representing `v`.
    terminals: Vec<NodeId>,
}

impl PrebuiltTree {
    /// Allocate the full tree described by `config`.
    ///
    /// `Capacity::FromData` has no data to look at here and resolves to
    /// [`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY).
    pub fn new(config: &TreeConfig) -> Result<Self> {
        let capacity = config.capacity.resolve(None)?;
        let geometry = Geometry::new(capacity, config.branch_factor)?;
        let slots = usize::try_from(capacity)
            .map_err(|_| SortError::CapacityOverflow { requested: capacity })?;
        // Node ids are u32 arena indices; refuse before allocating anything.
        if geometry.eager_node_count() > u128::from(u32::MAX) + 1 {
            return Err(SortError::CapacityOverflow { requested: capacity });
        }

        let mut tree = RadixTree::new(geometry);
        tree.initialise()?;

        let mut terminals = Vec::with_capacity(slots);
        for value in 0..capacity {
            terminals.push(tree.locate_terminal(value)?);
        }

        tracing::debug!(
            capacity,
            branch_factor = config.branch_factor,
            depth = tree.geometry().depth(),
            nodes = tree.node_count(),
            "built prebuilt tree"
        );

        Ok(Self { tree, terminals })
    }

    #[inline]
    pub fn capacity(&self) -> u64 {
        self.tree.geometry().capacity()
    }

    #[inline]
    pub fn branch_factor(&self) -> usize {
        self.tree.geometry().branch_factor()
    }

    #[inline]
    pub fn tree(&self) -> &RadixTree {
        &self.tree
    }

    /// Sort `data` ascending through the prebuilt tree.
    ///
    /// Every value must be below [`capacity`](Self::capacity); otherwise the
    /// batch is rejected and neither `data` nor the tree is modified.
    pub fn sort_in_place<'a, K: TreeKey>(&mut self, data: &'a mut [K]) -> Result<&'a mut [K]> {
        self.tree.geometry().check_all(data)?;

        tracing::debug!(
            len = data.len(),
            capacity = self.capacity(),
            "prebuilt tree sort"
        );

        if data.is_empty() {
            return Ok(data);
        }

        for value in data.iter() {
            let value = value.to_u64();
            // In range: checked above, and `terminals` has one entry per value.
            let leaf = self.terminals[value as usize];
            self.tree.increment_terminal(leaf, value);
        }
        self.tree.drain_into(data);

        Ok(data)
    }
}

/// Reusable sort context owning at most one [`PrebuiltTree`].
///
/// ```
/// use radix_tree_sort::SortEngine;
///
/// let mut engine = SortEngine::new();
/// engine.initialize(1000, 16).unwrap();
///
/// let mut first = [999u32, 0, 500, 500];
/// engine.sort_in_place(&mut first).unwrap();
/// assert_eq!(first, [0, 500, 500, 999]);
///
/// let mut second = [3u32, 2, 1];
/// engine.sort_in_place(&mut second).unwrap();
/// assert_eq!(second, [1, 2, 3]);
/// ```
#[derive(Default)]
pub struct SortEngine {
    prebuilt: Option<PrebuiltTree>,
}

impl SortEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the prebuilt tree. A `capacity_hint` of 0 selects
    /// [`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY); anything else is rounded
    /// up to a power of two.
    ///
    /// Replaces the previous tree on success and keeps it on failure. Call
    /// again to grow the capacity.
    pub fn initialize(&mut self, capacity_hint: u64, branch_factor: usize) -> Result<()> {
        let config = TreeConfig::new()
            .with_branch_factor(branch_factor)
            .with_capacity(Capacity::from_hint(capacity_hint));
        self.prebuilt = Some(PrebuiltTree::new(&config)?);
        Ok(())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.prebuilt.is_some()
    }

    pub fn capacity(&self) -> Option<u64> {
        self.prebuilt.as_ref().map(PrebuiltTree::capacity)
    }

    pub fn branch_factor(&self) -> Option<usize> {
        self.prebuilt.as_ref().map(PrebuiltTree::branch_factor)
    }

    pub fn prebuilt(&self) -> Option<&PrebuiltTree> {
        self.prebuilt.as_ref()
    }

    /// Sort `data` ascending through the prebuilt tree.
    pub fn sort_in_place<'a, K: TreeKey>(&mut self, data: &'a mut [K]) -> Result<&'a mut [K]> {
        self.prebuilt
            .as_mut()
            .ok_or(SortError::NotInitialized)?
            .sort_in_place(data)
    }
}
