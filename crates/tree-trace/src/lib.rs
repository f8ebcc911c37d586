//! Step-generating engine for animating tree data structures.
//!
//! Given an algorithm, an operation and values, the engines produce an
//! ordered sequence of discrete, inspectable snapshots ("steps") of the
//! tree's evolving shape and annotation state (comparisons, rotations,
//! color flips, sift-up swaps) so a consumer can animate the algorithm's
//! decision process rather than only its end state.
//!
//! - **BST / AVL / red-black**: single-value insert and bulk insert; BST
//!   additionally supports delete (including the two-children in-order
//!   successor case).
//! - **Min/max heap**: insert with sift-up over the implicit array
//!   encoding, bridged to the explicit node model at step boundaries.
//! - **Dispatch facade**: [`step_insert_one`] and [`step_bulk`] route by
//!   [`TreeAlgorithm`] and [`TreeOperation`].
//!
//! Each engine call clones its input, holds no state across calls, and
//! returns a lazy, finite, one-shot iterator of [`TreeStep`]s; every step
//! carries a fully independent structural copy of the tree, so a consumer
//! retaining history never observes retroactive mutation.
//!
//! ```
//! use tree_trace::{step_bulk, TreeAlgorithm, TreeOperation};
//!
//! let steps: Vec<_> =
//!     step_bulk(TreeAlgorithm::Bst, TreeOperation::Insert, &[5, 3, 8], None).collect();
//! let tree = steps.last().unwrap().tree.as_ref().unwrap();
//! assert_eq!(tree.in_order_values(), vec![3, 5, 8]);
//! ```
//!
//! Rendering, playback pacing and input validation are the consumer's
//! concern; the engine has no notion of wall-clock time and assumes
//! validated numeric input.

pub mod algorithms;
pub mod node;
pub mod stats;
pub mod step;
pub mod tree;

pub use algorithms::{
    step_bulk, step_insert_one, HeapKind, ParseAlgorithmError, TreeAlgorithm, TreeOperation,
};
pub use node::{Color, NodeMeta, NodeState, TreeNode};
pub use stats::{AlgorithmInfo, Complexity, TreeStats};
pub use step::{Steps, TreeStep};
pub use tree::{Tree, TreeError};
