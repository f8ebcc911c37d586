//! Per-algorithm engines and the dispatch facade.
//!
//! Callers pick an engine through [`step_insert_one`] and [`step_bulk`];
//! both return a lazy, finite, one-shot [`Steps`] sequence. Failure
//! conditions (empty tree, missing value, unimplemented operation) are
//! informational steps, never errors; the consumer is an animation loop
//! that must keep running. Unknown string tags are rejected earlier, at the
//! [`FromStr`] boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::step::{self, Steps, TreeStep};
use crate::tree::Tree;

pub mod avl;
pub mod bst;
pub mod heap;
pub mod redblack;

pub use heap::HeapKind;

/// Snapshot for a step: an independent structural copy, or `None` while no
/// tree exists.
pub(crate) fn snapshot(tree: &Tree) -> Option<Tree> {
    if tree.is_empty() {
        None
    } else {
        Some(tree.clone_structure())
    }
}

/// Bulk insertion as repeated single-value insertion: each value's engine
/// run is seeded with a clone of the tree shown by the previous run's last
/// step, so every inner call keeps the fresh-tree contract.
pub(crate) struct RepeatedInsert<F, I> {
    make: F,
    values: std::vec::IntoIter<i64>,
    inner: Option<I>,
    last: Option<Tree>,
}

impl<F, I> RepeatedInsert<F, I>
where
    F: FnMut(Option<&Tree>, i64) -> I,
    I: Iterator<Item = TreeStep>,
{
    pub(crate) fn new(values: &[i64], make: F) -> Self {
        Self {
            make,
            values: values.to_vec().into_iter(),
            inner: None,
            last: None,
        }
    }
}

impl<F, I> Iterator for RepeatedInsert<F, I>
where
    F: FnMut(Option<&Tree>, i64) -> I,
    I: Iterator<Item = TreeStep>,
{
    type Item = TreeStep;

    fn next(&mut self) -> Option<TreeStep> {
        loop {
            if let Some(inner) = &mut self.inner {
                if let Some(item) = inner.next() {
                    if let Some(tree) = &item.tree {
                        self.last = Some(tree.clone());
                    }
                    return Some(item);
                }
                self.inner = None;
            }
            let value = self.values.next()?;
            self.inner = Some((self.make)(self.last.as_ref(), value));
        }
    }
}

/// Algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeAlgorithm {
    Bst,
    Avl,
    #[serde(rename = "redblack")]
    RedBlack,
    #[serde(rename = "minheap")]
    MinHeap,
    #[serde(rename = "maxheap")]
    MaxHeap,
}

/// Operation selector for [`step_bulk`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeOperation {
    Insert,
    Delete,
}

/// Rejected string tags at the parse boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseAlgorithmError {
    #[error("unknown algorithm tag: {0}")]
    UnknownAlgorithm(String),
    #[error("unknown operation tag: {0}")]
    UnknownOperation(String),
}

impl FromStr for TreeAlgorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bst" => Ok(Self::Bst),
            "avl" => Ok(Self::Avl),
            "redblack" => Ok(Self::RedBlack),
            "minheap" => Ok(Self::MinHeap),
            "maxheap" => Ok(Self::MaxHeap),
            other => Err(ParseAlgorithmError::UnknownAlgorithm(other.to_owned())),
        }
    }
}

impl fmt::Display for TreeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Bst => "bst",
            Self::Avl => "avl",
            Self::RedBlack => "redblack",
            Self::MinHeap => "minheap",
            Self::MaxHeap => "maxheap",
        };
        f.write_str(tag)
    }
}

impl FromStr for TreeOperation {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insert" => Ok(Self::Insert),
            "delete" => Ok(Self::Delete),
            other => Err(ParseAlgorithmError::UnknownOperation(other.to_owned())),
        }
    }
}

impl fmt::Display for TreeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
        })
    }
}

/// Animates a single-value insertion against `existing` with the selected
/// engine. The input tree is cloned, never mutated.
pub fn step_insert_one(algorithm: TreeAlgorithm, existing: Option<&Tree>, value: i64) -> Steps {
    match algorithm {
        TreeAlgorithm::Bst => Box::new(bst::insert_one(existing, value)),
        TreeAlgorithm::Avl => Box::new(avl::insert_one(existing, value)),
        TreeAlgorithm::RedBlack => Box::new(redblack::insert_one(existing, value)),
        TreeAlgorithm::MinHeap => Box::new(heap::insert_one(existing, value, HeapKind::Min)),
        TreeAlgorithm::MaxHeap => Box::new(heap::insert_one(existing, value, HeapKind::Max)),
    }
}

/// Runs a bulk operation.
///
/// Inserts route to the matching bulk engine. Deletes are wired for BST
/// only: the full bulk insertion of `values` is replayed (consuming the
/// generated sequence) to obtain a concrete tree, which is then fed to the
/// delete engine together with `delete_value`. Every other delete
/// combination yields exactly one informational step with zero operations.
pub fn step_bulk(
    algorithm: TreeAlgorithm,
    operation: TreeOperation,
    values: &[i64],
    delete_value: Option<i64>,
) -> Steps {
    match operation {
        TreeOperation::Insert => match algorithm {
            TreeAlgorithm::Bst => Box::new(bst::insert_bulk(values)),
            TreeAlgorithm::Avl => Box::new(avl::insert_bulk(values)),
            TreeAlgorithm::RedBlack => Box::new(redblack::insert_bulk(values)),
            TreeAlgorithm::MinHeap => Box::new(heap::insert_bulk(values, HeapKind::Min)),
            TreeAlgorithm::MaxHeap => Box::new(heap::insert_bulk(values, HeapKind::Max)),
        },
        TreeOperation::Delete => match algorithm {
            TreeAlgorithm::Bst => {
                let Some(value) = delete_value else {
                    return step::once(None, "no value specified for deletion");
                };
                let tree = bst::insert_bulk(values).last().and_then(|s| s.tree);
                Box::new(bst::delete(tree.as_ref(), value))
            }
            _ => step::once(None, "deletion for this algorithm is not yet implemented"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_strings() {
        for tag in ["bst", "avl", "redblack", "minheap", "maxheap"] {
            let algorithm: TreeAlgorithm = tag.parse().unwrap();
            assert_eq!(algorithm.to_string(), tag);
        }
        assert_eq!(
            "splay".parse::<TreeAlgorithm>(),
            Err(ParseAlgorithmError::UnknownAlgorithm("splay".to_owned()))
        );
        assert_eq!(
            "search".parse::<TreeOperation>(),
            Err(ParseAlgorithmError::UnknownOperation("search".to_owned()))
        );
    }

    #[test]
    fn delete_without_value_is_one_zero_operation_step() {
        let steps: Vec<TreeStep> =
            step_bulk(TreeAlgorithm::Bst, TreeOperation::Delete, &[1, 2, 3], None).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].description, "no value specified for deletion");
        assert_eq!(steps[0].operations, 0);
    }

    #[test]
    fn delete_is_unimplemented_outside_bst() {
        for algorithm in [
            TreeAlgorithm::Avl,
            TreeAlgorithm::RedBlack,
            TreeAlgorithm::MinHeap,
            TreeAlgorithm::MaxHeap,
        ] {
            let steps: Vec<TreeStep> =
                step_bulk(algorithm, TreeOperation::Delete, &[1, 2], Some(1)).collect();
            assert_eq!(steps.len(), 1);
            assert_eq!(
                steps[0].description,
                "deletion for this algorithm is not yet implemented"
            );
            assert_eq!(steps[0].operations, 0);
        }
    }

    #[test]
    fn bst_delete_replays_the_bulk_insert_first() {
        let steps: Vec<TreeStep> = step_bulk(
            TreeAlgorithm::Bst,
            TreeOperation::Delete,
            &[50, 30, 70],
            Some(30),
        )
        .collect();
        let tree = steps.last().unwrap().tree.as_ref().unwrap();
        assert_eq!(tree.in_order_values(), vec![50, 70]);
    }
}
