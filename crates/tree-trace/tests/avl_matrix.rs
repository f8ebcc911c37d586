use tree_trace::algorithms::avl;
use tree_trace::{step_insert_one, Tree, TreeAlgorithm, TreeStep};

fn last_tree(steps: impl Iterator<Item = TreeStep>) -> Tree {
    steps.last().unwrap().tree.unwrap()
}

fn measured_depth(tree: &Tree, i: Option<u32>) -> u32 {
    match i {
        None => 0,
        Some(i) => {
            let node = tree.node(i);
            1 + measured_depth(tree, node.l).max(measured_depth(tree, node.r))
        }
    }
}

fn assert_avl_balanced(tree: &Tree) {
    for &i in &tree.level_order() {
        let node = tree.node(i);
        let l = i64::from(measured_depth(tree, node.l));
        let r = i64::from(measured_depth(tree, node.r));
        assert!(
            (l - r).abs() <= 1,
            "node {} has balance {}",
            node.value,
            l - r
        );
    }
}

#[test]
fn sequential_single_inserts_fire_a_left_left_rotation() {
    // Each call's output tree feeds the next call.
    let mut tree: Option<Tree> = None;
    for value in [30, 20, 10] {
        let steps: Vec<TreeStep> =
            step_insert_one(TreeAlgorithm::Avl, tree.as_ref(), value).collect();
        tree = steps.last().unwrap().tree.clone();
    }
    let tree = tree.unwrap();
    assert_eq!(tree.node(tree.root().unwrap()).value, 20);
    assert_eq!(tree.height(), 2);
    assert_avl_balanced(&tree);
    tree.assert_valid().unwrap();
}

#[test]
fn completion_balance_holds_for_adversarial_orders() {
    for values in [
        &[1, 2, 3, 4, 5, 6, 7, 8, 9][..],
        &[9, 8, 7, 6, 5, 4, 3, 2, 1][..],
        &[5, 1, 9, 2, 8, 3, 7, 4, 6][..],
    ] {
        let tree = last_tree(avl::insert_bulk(values));
        assert_avl_balanced(&tree);
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        assert_eq!(tree.in_order_values(), sorted);
        tree.assert_valid().unwrap();
    }
}

#[test]
fn each_rotation_case_announces_itself() {
    let cases = [
        (&[30, 20, 10][..], "left-left case: rotating right"),
        (&[10, 20, 30][..], "right-right case: rotating left"),
        (&[30, 10, 20][..], "left-right case: rotating left, then right"),
        (&[10, 30, 20][..], "right-left case: rotating right, then left"),
    ];
    for (values, announcement) in cases {
        let steps: Vec<TreeStep> = avl::insert_bulk(values).collect();
        let at = steps
            .iter()
            .position(|s| s.description == announcement)
            .unwrap_or_else(|| panic!("missing announcement for {values:?}"));
        assert_eq!(steps[at + 1].description, "rotation complete");
    }
}

#[test]
fn single_insert_ends_with_one_completion_step() {
    let base = last_tree(avl::insert_bulk(&[30, 20]));
    let steps: Vec<TreeStep> = avl::insert_one(Some(&base), 10).collect();
    let completions = steps
        .iter()
        .filter(|s| s.description == "insertion complete (the AVL tree is balanced)")
        .count();
    assert_eq!(completions, 1);
    assert_eq!(
        steps.last().unwrap().description,
        "insertion complete (the AVL tree is balanced)"
    );
}

#[test]
fn duplicate_insert_reports_and_unwinds_without_rebalancing() {
    let base = last_tree(avl::insert_bulk(&[30, 20, 10, 25]));
    let steps: Vec<TreeStep> = avl::insert_one(Some(&base), 25).collect();
    assert!(steps.iter().any(|s| s.description == "25 already exists"));
    assert!(!steps.iter().any(|s| s.description.contains("rotating")));
    let after = steps.last().unwrap().tree.as_ref().unwrap();
    assert_eq!(after.level_order_values(), base.level_order_values());
}

#[test]
fn inserts_into_an_unbalanced_bst_shape_rebalance_it() {
    // A plain BST tree handed to the AVL engine adopts height metadata with
    // defaults, then rebalances as new values arrive.
    let bst_tree = {
        let steps: Vec<TreeStep> =
            tree_trace::algorithms::bst::insert_bulk(&[1, 2]).collect();
        steps.last().unwrap().tree.clone().unwrap()
    };
    let steps: Vec<TreeStep> = avl::insert_one(Some(&bst_tree), 3).collect();
    let tree = steps.last().unwrap().tree.clone().unwrap();
    assert_eq!(tree.node(tree.root().unwrap()).value, 2);
    assert_avl_balanced(&tree);
}
