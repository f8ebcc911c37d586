//! Run statistics and the algorithm registry.

use serde::{Deserialize, Serialize};

use crate::algorithms::TreeAlgorithm;
use crate::step::TreeStep;

/// Statistics a playback layer accumulates over a consumed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Work units reported by the last step.
    pub operations: u64,
    /// Measured height of the last step's tree.
    pub height: u32,
    /// Node count of the last step's tree.
    pub node_count: usize,
    /// Total number of steps in the run.
    pub steps: usize,
}

impl TreeStats {
    /// Summarizes an already-consumed run.
    pub fn from_steps(steps: &[TreeStep]) -> Self {
        let last = steps.last();
        let tree = last.and_then(|s| s.tree.as_ref());
        Self {
            operations: last.map(|s| s.operations).unwrap_or(0),
            height: tree.map(|t| t.height()).unwrap_or(0),
            node_count: tree.map(|t| t.node_count()).unwrap_or(0),
            steps: steps.len(),
        }
    }
}

/// Asymptotic complexity strings for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Complexity {
    pub insert: &'static str,
    pub delete: &'static str,
    pub search: &'static str,
}

/// Display metadata for one algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub complexity: Complexity,
}

impl TreeAlgorithm {
    /// Display name and complexity table entry for this algorithm.
    pub fn info(self) -> AlgorithmInfo {
        match self {
            Self::Bst => AlgorithmInfo {
                name: "Binary search tree (BST)",
                complexity: Complexity {
                    insert: "O(n)",
                    delete: "O(n)",
                    search: "O(n)",
                },
            },
            Self::Avl => AlgorithmInfo {
                name: "AVL tree",
                complexity: Complexity {
                    insert: "O(log n)",
                    delete: "O(log n)",
                    search: "O(log n)",
                },
            },
            Self::RedBlack => AlgorithmInfo {
                name: "Red-black tree",
                complexity: Complexity {
                    insert: "O(log n)",
                    delete: "O(log n)",
                    search: "O(log n)",
                },
            },
            Self::MinHeap => AlgorithmInfo {
                name: "Min-heap",
                complexity: Complexity {
                    insert: "O(log n)",
                    delete: "O(log n)",
                    search: "O(n)",
                },
            },
            Self::MaxHeap => AlgorithmInfo {
                name: "Max-heap",
                complexity: Complexity {
                    insert: "O(log n)",
                    delete: "O(log n)",
                    search: "O(n)",
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{step_bulk, TreeOperation};

    #[test]
    fn stats_summarize_the_last_step() {
        let steps: Vec<TreeStep> =
            step_bulk(TreeAlgorithm::Bst, TreeOperation::Insert, &[5, 3, 8], None).collect();
        let stats = TreeStats::from_steps(&steps);
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.height, 2);
        assert_eq!(stats.steps, steps.len());
        assert_eq!(stats.operations, steps.last().unwrap().operations);
    }

    #[test]
    fn stats_on_an_empty_run_are_zero() {
        assert_eq!(TreeStats::from_steps(&[]), TreeStats::default());
    }

    #[test]
    fn every_algorithm_has_a_registry_entry() {
        for algorithm in [
            TreeAlgorithm::Bst,
            TreeAlgorithm::Avl,
            TreeAlgorithm::RedBlack,
            TreeAlgorithm::MinHeap,
            TreeAlgorithm::MaxHeap,
        ] {
            let info = algorithm.info();
            assert!(!info.name.is_empty());
            assert!(info.complexity.insert.starts_with("O("));
        }
    }
}
