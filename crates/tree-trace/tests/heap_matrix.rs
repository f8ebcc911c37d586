use tree_trace::algorithms::heap::{self, tree_to_array};
use tree_trace::{step_bulk, HeapKind, TreeAlgorithm, TreeOperation, TreeStep};

fn assert_heap(arr: &[i64], kind: HeapKind) {
    for (i, &parent) in arr.iter().enumerate() {
        for child in [2 * i + 1, 2 * i + 2] {
            if let Some(&c) = arr.get(child) {
                assert!(
                    !kind.should_swap(c, parent),
                    "heap order violated between {parent} and {c}"
                );
            }
        }
    }
}

#[test]
fn min_heap_bulk_insert_matrix() {
    let steps: Vec<TreeStep> = step_bulk(
        TreeAlgorithm::MinHeap,
        TreeOperation::Insert,
        &[5, 2, 8, 1],
        None,
    )
    .collect();
    let tree = steps.last().unwrap().tree.as_ref().unwrap();
    let arr = tree_to_array(tree);
    assert_eq!(arr, vec![1, 2, 8, 5]);
    assert_heap(&arr, HeapKind::Min);
    tree.assert_valid().unwrap();
}

#[test]
fn max_heap_bulk_insert_matrix() {
    let steps: Vec<TreeStep> = step_bulk(
        TreeAlgorithm::MaxHeap,
        TreeOperation::Insert,
        &[5, 2, 8, 1, 9, 9],
        None,
    )
    .collect();
    let arr = tree_to_array(steps.last().unwrap().tree.as_ref().unwrap());
    assert_eq!(arr[0], 9);
    assert_heap(&arr, HeapKind::Max);
}

#[test]
fn heap_property_holds_after_every_completed_insert() {
    let mut tree = None;
    for value in [7, 3, 9, 1, 8, 2] {
        let steps: Vec<TreeStep> = heap::insert_one(tree.as_ref(), value, HeapKind::Min).collect();
        assert_eq!(
            steps.last().unwrap().description,
            "the heap property is satisfied"
        );
        tree = steps.last().unwrap().tree.clone();
        assert_heap(&tree_to_array(tree.as_ref().unwrap()), HeapKind::Min);
    }
}

#[test]
fn sift_up_yields_a_compare_step_per_level_and_a_swap_step_per_swap() {
    // Inserting 0 under min-heap [1, 2, 8, 5] sifts two levels up.
    let base = {
        let steps: Vec<TreeStep> =
            heap::insert_bulk(&[5, 2, 8, 1], HeapKind::Min).collect();
        steps.last().unwrap().tree.clone().unwrap()
    };
    let steps: Vec<TreeStep> = heap::insert_one(Some(&base), 0, HeapKind::Min).collect();
    let compares = steps
        .iter()
        .filter(|s| s.description.starts_with("comparing"))
        .count();
    let swaps = steps
        .iter()
        .filter(|s| s.description.starts_with("swapped"))
        .count();
    assert_eq!(compares, 2);
    assert_eq!(swaps, 2);
    let arr = tree_to_array(steps.last().unwrap().tree.as_ref().unwrap());
    assert_eq!(arr[0], 0);
}

#[test]
fn every_step_shows_a_complete_tree() {
    // The implicit array encodes a complete binary tree: at each step the
    // level-order readout must round-trip through the displayed tree.
    let steps: Vec<TreeStep> = heap::insert_bulk(&[4, 7, 1, 3, 9, 2], HeapKind::Min).collect();
    for step in &steps {
        let tree = step.tree.as_ref().unwrap();
        tree.assert_valid().unwrap();
        let arr = tree_to_array(tree);
        let rebuilt = heap::array_to_tree(&arr).unwrap();
        assert_eq!(tree_to_array(&rebuilt), arr);
    }
}
