//! Binary heap engine, parameterized by comparison direction.
//!
//! Heap operations are simplest over the implicit array encoding (index `i`
//! owns children at `2i + 1` and `2i + 2`, its parent sits at
//! `(i - 1) / 2`), so the engine works on a `Vec<i64>` and converts to the
//! explicit node model only at step-yield boundaries for display.

use serde::{Deserialize, Serialize};

use crate::node::{NodeMeta, NodeState};
use crate::step::TreeStep;
use crate::tree::Tree;

use super::RepeatedInsert;

/// Comparison direction of a heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeapKind {
    Min,
    Max,
}

impl HeapKind {
    /// Whether a child/parent pair violates heap order and must swap.
    pub fn should_swap(self, child: i64, parent: i64) -> bool {
        match self {
            Self::Min => child < parent,
            Self::Max => child > parent,
        }
    }
}

/// Builds the explicit node model for an implicit heap array.
///
/// Ids are derived from array positions: the heap rebuilds its display tree
/// on every step, so node identity follows the slot, not the element.
pub fn array_to_tree(arr: &[i64]) -> Option<Tree> {
    if arr.is_empty() {
        return None;
    }
    let mut tree = Tree::new();
    let indices: Vec<u32> = arr
        .iter()
        .map(|&value| tree.alloc(value, NodeState::Default, NodeMeta::Plain))
        .collect();
    for (i, &node) in indices.iter().enumerate() {
        let left = 2 * i + 1;
        let right = 2 * i + 2;
        if left < indices.len() {
            tree.link_l(node, Some(indices[left]));
        }
        if right < indices.len() {
            tree.link_r(node, Some(indices[right]));
        }
    }
    tree.set_root(Some(indices[0]));
    Some(tree)
}

/// Level-order readout of a displayed tree back into the implicit array.
pub fn tree_to_array(tree: &Tree) -> Vec<i64> {
    tree.level_order_values()
}

/// Animates the insertion of `value`: append at the end of the array, then
/// sift up until the heap property holds or the root is reached.
pub fn insert_one(existing: Option<&Tree>, value: i64, kind: HeapKind) -> HeapInsertOne {
    HeapInsertOne {
        arr: existing.map(tree_to_array).unwrap_or_default(),
        value,
        kind,
        idx: 0,
        operations: 0,
        phase: Phase::Start,
    }
}

/// Repeated single-value insertion, reconstructing the array from the
/// previous final tree between values.
pub fn insert_bulk(values: &[i64], kind: HeapKind) -> impl Iterator<Item = TreeStep> {
    RepeatedInsert::new(values, move |prev, value| insert_one(prev, value, kind))
}

enum Phase {
    Start,
    Compare,
    Decide,
    Final,
    Done,
}

pub struct HeapInsertOne {
    arr: Vec<i64>,
    value: i64,
    kind: HeapKind,
    idx: usize,
    operations: u64,
    phase: Phase,
}

impl HeapInsertOne {
    fn step(&self, description: String) -> TreeStep {
        TreeStep::new(array_to_tree(&self.arr), description, self.operations)
    }

    fn parent_idx(&self) -> usize {
        (self.idx - 1) / 2
    }
}

impl Iterator for HeapInsertOne {
    type Item = TreeStep;

    fn next(&mut self) -> Option<TreeStep> {
        loop {
            match self.phase {
                Phase::Start => {
                    self.arr.push(self.value);
                    self.operations += 1;
                    self.idx = self.arr.len() - 1;
                    self.phase = Phase::Compare;
                    let value = self.value;
                    return Some(self.step(format!("appended {value} at the end of the array")));
                }
                Phase::Compare => {
                    if self.idx == 0 {
                        self.phase = Phase::Final;
                        continue;
                    }
                    self.operations += 1;
                    self.phase = Phase::Decide;
                    let child = self.arr[self.idx];
                    let parent = self.arr[self.parent_idx()];
                    return Some(
                        self.step(format!("comparing {child} with its parent {parent}")),
                    );
                }
                Phase::Decide => {
                    let idx = self.idx;
                    let pidx = self.parent_idx();
                    if self.kind.should_swap(self.arr[idx], self.arr[pidx]) {
                        self.arr.swap(idx, pidx);
                        self.operations += 1;
                        self.idx = pidx;
                        self.phase = Phase::Compare;
                        // Post-swap reading: the sifted value first, the
                        // displaced parent second.
                        let up = self.arr[pidx];
                        let down = self.arr[idx];
                        return Some(self.step(format!("swapped {up} and {down}")));
                    }
                    self.phase = Phase::Final;
                }
                Phase::Final => {
                    self.phase = Phase::Done;
                    return Some(self.step("the heap property is satisfied".to_owned()));
                }
                Phase::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_array(steps: impl Iterator<Item = TreeStep>) -> Vec<i64> {
        tree_to_array(&steps.last().unwrap().tree.unwrap())
    }

    fn assert_heap(arr: &[i64], kind: HeapKind) {
        for (i, &parent) in arr.iter().enumerate() {
            for child in [2 * i + 1, 2 * i + 2] {
                if let Some(&c) = arr.get(child) {
                    assert!(!kind.should_swap(c, parent), "heap order violated at {i}");
                }
            }
        }
    }

    #[test]
    fn bridge_round_trips_level_order() {
        let arr = [1, 2, 8, 5];
        let tree = array_to_tree(&arr).unwrap();
        tree.assert_valid().unwrap();
        assert_eq!(tree_to_array(&tree), arr);
        // Children sit at 2i+1 / 2i+2.
        let root = tree.root().unwrap();
        let l = tree.node(root).l.unwrap();
        let r = tree.node(root).r.unwrap();
        assert_eq!(tree.node(l).value, 2);
        assert_eq!(tree.node(r).value, 8);
    }

    #[test]
    fn array_to_tree_on_empty_array_is_no_tree() {
        assert!(array_to_tree(&[]).is_none());
    }

    #[test]
    fn min_heap_sifts_new_minimum_to_the_root() {
        let arr = final_array(insert_bulk(&[5, 2, 8, 1], HeapKind::Min));
        assert_eq!(arr, vec![1, 2, 8, 5]);
        assert_heap(&arr, HeapKind::Min);
    }

    #[test]
    fn max_heap_sifts_new_maximum_to_the_root() {
        let arr = final_array(insert_bulk(&[1, 5, 3, 9], HeapKind::Max));
        assert_eq!(arr[0], 9);
        assert_heap(&arr, HeapKind::Max);
    }

    #[test]
    fn first_insert_yields_append_then_satisfied() {
        let steps: Vec<TreeStep> = insert_one(None, 7, HeapKind::Min).collect();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].description, "appended 7 at the end of the array");
        assert_eq!(steps[1].description, "the heap property is satisfied");
        assert_eq!(steps[1].operations, 1);
    }

    #[test]
    fn sift_stops_at_first_non_swapping_comparison() {
        // 8 never swaps in a min-heap of [2, 5]: one compare step, no swap.
        let base = final_array(insert_bulk(&[2, 5], HeapKind::Min));
        let tree = array_to_tree(&base).unwrap();
        let steps: Vec<TreeStep> = insert_one(Some(&tree), 8, HeapKind::Min).collect();
        let compares = steps
            .iter()
            .filter(|s| s.description.starts_with("comparing"))
            .count();
        let swaps = steps
            .iter()
            .filter(|s| s.description.starts_with("swapped"))
            .count();
        assert_eq!(compares, 1);
        assert_eq!(swaps, 0);
    }
}
