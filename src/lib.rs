//! # radix-tree-sort
//!
//! Non-comparison sorting of unsigned integers through a fixed-radix trie.
//!
//! Every value is routed through a tree whose nodes have `W` child slots (the
//! branch factor), one digit of the value in base `W` per level, most
//! significant digit first. Terminal leaves count how often their value was
//! inserted, and one depth-first traversal in ascending slot order writes the
//! values back out sorted.
//!
//! Two modes are offered:
//!
//! - [`sort`] / [`sort_with`] build a fresh tree lazily for each call;
//! - [`SortEngine`] allocates the whole tree once, together with a flat index
//!   from value to leaf, and reuses it for every sort.
//!
//! ## Example
//!
//! ```rust
//! use radix_tree_sort::{sort_with, Capacity, SortEngine};
//!
//! let mut values = [5u32, 3, 3, 1, 4, 1, 5, 9, 2, 6];
//! sort_with(&mut values, 4, Capacity::FromData).unwrap();
//! assert_eq!(values, [1, 1, 2, 3, 3, 4, 5, 5, 6, 9]);
//!
//! let mut engine = SortEngine::new();
//! engine.initialize(16, 4).unwrap();
//! let mut values = [15u32, 0, 15, 8];
//! engine.sort_in_place(&mut values).unwrap();
//! assert_eq!(values, [0, 8, 15, 15]);
//! ```

#![forbid(unsafe_code)]

mod config;
mod debug;
mod engine;
mod error;
mod geometry;
mod key;
mod node;
mod tree;

#[cfg(test)]
mod proptests;

pub use config::{Capacity, TreeConfig, DEFAULT_BRANCH_FACTOR, DEFAULT_CAPACITY};
pub use debug::TreeStats;
pub use engine::{sort, sort_with, sort_with_config, PrebuiltTree, SortEngine, TreeSort};
pub use error::{Result, SortError};
pub use geometry::Geometry;
pub use key::TreeKey;
pub use node::{NodeId, RadixNode};
pub use tree::RadixTree;
