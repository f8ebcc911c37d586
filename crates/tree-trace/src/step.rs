//! The consumer-facing step protocol.
//!
//! Engines communicate exclusively through ordered sequences of
//! [`TreeStep`]s. Failure conditions are informational steps, never panics
//! or error values, because the intended consumer is an animation loop that
//! must keep running.

use serde::{Deserialize, Serialize};

use crate::tree::Tree;

/// One atomic, externally observable snapshot of an operation in progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeStep {
    /// The tree after the work this step narrates; `None` means no tree
    /// exists yet. Always an independent structural copy, never an alias of
    /// a previously yielded snapshot.
    pub tree: Option<Tree>,
    /// Human-readable narration of what just happened. Non-empty on every
    /// step.
    pub description: String,
    /// Monotonically non-decreasing count of algorithmic work units
    /// performed so far within the current call.
    pub operations: u64,
}

impl TreeStep {
    pub fn new(tree: Option<Tree>, description: impl Into<String>, operations: u64) -> Self {
        Self {
            tree,
            description: description.into(),
            operations,
        }
    }
}

/// A lazy, finite, one-shot step sequence. Replaying requires a fresh
/// engine call.
pub type Steps = Box<dyn Iterator<Item = TreeStep>>;

/// A sequence consisting of exactly one informational step with zero
/// operations.
pub(crate) fn once(tree: Option<Tree>, description: impl Into<String>) -> Steps {
    Box::new(std::iter::once(TreeStep::new(tree, description, 0)))
}
