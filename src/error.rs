use thiserror::Error;

/// Errors returned by the tree sort entry points.
///
/// Every variant is a caller precondition violation. Nothing is retried and
/// the input slice is left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    /// Branch factors of 0 or 1 make the digit arithmetic meaningless.
    #[error("branch factor must be at least 2, got {branch_factor}")]
    DegenerateBranchFactor { branch_factor: usize },

    /// An element does not fit below the capacity of the tree.
    #[error("value {value} at index {index} does not fit below capacity {capacity}")]
    ValueOutOfRange {
        index: usize,
        value: u64,
        capacity: u64,
    },

    /// `sort_in_place` was called before `initialize`.
    #[error("sort engine has no prebuilt tree; call `initialize` first")]
    NotInitialized,

    /// The rounded capacity cannot be represented or indexed.
    #[error("capacity for {requested} cannot be represented on this target")]
    CapacityOverflow { requested: u64 },
}

pub type Result<T, E = SortError> = std::result::Result<T, E>;
