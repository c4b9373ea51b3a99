//! Tree configuration.

use crate::error::Result;
use crate::geometry::{capacity_above, capacity_at_least};

/// Branch factor used when none is given.
pub const DEFAULT_BRANCH_FACTOR: usize = 128;

/// Capacity used by [`Capacity::Default`]: every 16-bit value.
pub const DEFAULT_CAPACITY: u64 = 1 << 16;

/// How the capacity (exclusive upper bound on values) of a tree is chosen.
///
/// Capacities are always powers of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capacity {
    /// [`DEFAULT_CAPACITY`].
    Default,
    /// Smallest power of two strictly greater than the largest value sorted.
    #[default]
    FromData,
    /// Smallest power of two that is at least the given bound.
    AtLeast(u64),
}

impl Capacity {
    /// Decode the numeric mode accepted by the one-shot sort: `0` is the
    /// default capacity, `1` derives it from the data and anything else is an
    /// explicit bound.
    pub fn from_mode(mode: u64) -> Self {
        match mode {
            0 => Capacity::Default,
            1 => Capacity::FromData,
            bound => Capacity::AtLeast(bound),
        }
    }

    /// Decode the hint accepted by [`SortEngine::initialize`](crate::SortEngine::initialize),
    /// where `0` selects the default capacity.
    pub fn from_hint(hint: u64) -> Self {
        if hint == 0 {
            Capacity::Default
        } else {
            Capacity::AtLeast(hint)
        }
    }

    /// Resolve to a concrete power-of-two capacity.
    ///
    /// `max_value` is the largest value about to be sorted, if known.
    /// `FromData` without one falls back to [`DEFAULT_CAPACITY`].
    pub fn resolve(self, max_value: Option<u64>) -> Result<u64> {
        match (self, max_value) {
            (Capacity::Default, _) | (Capacity::FromData, None) => Ok(DEFAULT_CAPACITY),
            (Capacity::FromData, Some(max)) => capacity_above(max),
            (Capacity::AtLeast(bound), _) => capacity_at_least(bound),
        }
    }
}

/// Configuration shared by both sort modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Child slots per node. Must be at least 2.
    pub branch_factor: usize,
    pub capacity: Capacity,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            branch_factor: DEFAULT_BRANCH_FACTOR,
            capacity: Capacity::FromData,
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branch_factor(mut self, branch_factor: usize) -> Self {
        self.branch_factor = branch_factor;

        self
    }

    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;

        self
    }
}
