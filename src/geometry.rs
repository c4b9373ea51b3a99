//! Per-tree routing constants.
//!
//! A tree over capacity `C` with branch factor `W` has depth
//! `D = max(1, ceil(log_W(C)))`. A node at depth `d` (the root is depth 1)
//! routes a value `v` to slot `(v / W^(D-d)) mod W`. At depth `D` the divisor
//! is 1 and the slots hold terminal leaves, one per value.

use smallvec::SmallVec;

use crate::error::{Result, SortError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    capacity: u64,
    branch_factor: usize,
    /// `divisors[d - 1] == W^(D - d)`; the last entry is always 1.
    divisors: SmallVec<[u64; 8]>,
}

impl Geometry {
    /// Build the geometry for `capacity` values routed `branch_factor` ways.
    ///
    /// `capacity` is used as given; rounding to a power of two is the job of
    /// [`Capacity::resolve`](crate::Capacity::resolve).
    pub fn new(capacity: u64, branch_factor: usize) -> Result<Self> {
        if branch_factor < 2 {
            return Err(SortError::DegenerateBranchFactor { branch_factor });
        }
        if capacity == 0 {
            return Err(SortError::CapacityOverflow { requested: 0 });
        }

        // span = W^depth stays below 2^128: it is < 2^64 before each multiply.
        let width = branch_factor as u128;
        let mut depth = 1usize;
        let mut span = width;
        while span < u128::from(capacity) {
            span *= width;
            depth += 1;
        }

        let mut divisors: SmallVec<[u64; 8]> = SmallVec::with_capacity(depth);
        let mut divisor = 1u64;
        for _ in 0..depth {
            divisors.push(divisor);
            // Only the last multiplication may leave the u64 range and it is never read.
            divisor = divisor.saturating_mul(branch_factor as u64);
        }
        divisors.reverse();

        tracing::trace!(capacity, branch_factor, depth, "resolved tree geometry");

        Ok(Self {
            capacity,
            branch_factor,
            divisors,
        })
    }

    #[inline]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    #[inline]
    pub fn branch_factor(&self) -> usize {
        self.branch_factor
    }

    /// Child slots allocated per branch node.
    ///
    /// A branch factor above the capacity only happens with a single level,
    /// where slots at or beyond the capacity can never be routed to.
    #[inline]
    pub fn slots(&self) -> usize {
        match usize::try_from(self.capacity) {
            Ok(capacity) => self.branch_factor.min(capacity),
            Err(_) => self.branch_factor,
        }
    }

    /// Nodes an eagerly initialised tree allocates, root and leaves included.
    pub fn eager_node_count(&self) -> u128 {
        let capacity = u128::from(self.capacity);
        let width = self.branch_factor as u128;
        let branches: u128 = self
            .divisors
            .iter()
            .map(|&divisor| capacity.div_ceil(u128::from(divisor) * width))
            .sum();
        branches + capacity
    }

    /// Number of routing levels between the root and a terminal leaf.
    #[inline]
    pub fn depth(&self) -> usize {
        self.divisors.len()
    }

    /// Per-level divisor `W^(D - depth)` for a node at `depth` (1-based).
    #[inline]
    pub fn divisor(&self, depth: usize) -> u64 {
        self.divisors[depth - 1]
    }

    /// Whether the children of a node at `depth` are terminal leaves.
    #[inline]
    pub fn children_are_terminal(&self, depth: usize) -> bool {
        self.divisor(depth) < 2
    }

    /// Child slot taken by `value` at a node of `depth`.
    #[inline]
    pub fn bucket(&self, value: u64, depth: usize) -> usize {
        ((value / self.divisor(depth)) % self.branch_factor as u64) as usize
    }

    #[inline]
    pub fn contains(&self, value: u64) -> bool {
        value < self.capacity
    }

    /// Rejects the first element that does not fit below the capacity.
    pub fn check_all<K: crate::TreeKey>(&self, data: &[K]) -> Result<()> {
        match data.iter().position(|v| !self.contains(v.to_u64())) {
            None => Ok(()),
            Some(index) => {
                let value = data[index].to_u64();
                tracing::warn!(
                    index,
                    value,
                    capacity = self.capacity,
                    "rejecting batch: value does not fit in tree"
                );
                Err(SortError::ValueOutOfRange {
                    index,
                    value,
                    capacity: self.capacity,
                })
            }
        }
    }
}

/// Smallest power of two that is `>= hint` (a hint of 0 yields 1).
pub fn capacity_at_least(hint: u64) -> Result<u64> {
    hint.checked_next_power_of_two()
        .ok_or(SortError::CapacityOverflow { requested: hint })
}

/// Smallest power of two strictly greater than `max_value`.
pub fn capacity_above(max_value: u64) -> Result<u64> {
    max_value
        .checked_add(1)
        .and_then(u64::checked_next_power_of_two)
        .ok_or(SortError::CapacityOverflow {
            requested: max_value,
        })
}
