//! AVL tree engine.
//!
//! Augments the BST descent with a cached per-node height and the four
//! classical rebalancing cases. The recursive unwind of the textbook
//! formulation becomes a walk up the `p` chain: every frame recomputes its
//! height, evaluates its balance factor against the inserted value, and
//! either announces-then-performs a rotation or reports the frame as
//! updated before climbing to its parent.

use crate::node::{NodeMeta, NodeState};
use crate::step::TreeStep;
use crate::tree::{MetaKind, Tree};

use super::{snapshot, RepeatedInsert};

/// Animates the insertion of `value` into a copy of `existing`, rebalancing
/// on the way back up. Inserting a value that already exists yields an
/// "already exists" step and performs no structural change.
pub fn insert_one(existing: Option<&Tree>, value: i64) -> AvlInsertOne {
    AvlInsertOne {
        tree: existing.map(|t| t.adopt(MetaKind::Avl)).unwrap_or_default(),
        value,
        operations: 0,
        phase: Phase::Start,
    }
}

/// Repeated single-value insertion; each value's run is re-cloned from the
/// previous final tree, so every call keeps the fresh-tree contract.
pub fn insert_bulk(values: &[i64]) -> impl Iterator<Item = TreeStep> {
    RepeatedInsert::new(values, |prev, value| insert_one(prev, value))
}

#[derive(Clone, Copy)]
enum RotationCase {
    LeftLeft,
    RightRight,
    LeftRight,
    RightLeft,
}

impl RotationCase {
    fn announce(self) -> &'static str {
        match self {
            Self::LeftLeft => "left-left case: rotating right",
            Self::RightRight => "right-right case: rotating left",
            Self::LeftRight => "left-right case: rotating left, then right",
            Self::RightLeft => "right-left case: rotating right, then left",
        }
    }
}

enum Phase {
    Start,
    Compare { cur: u32 },
    Advance { cur: u32 },
    Attach { parent: u32, left: bool },
    Unwind { node: u32 },
    Rotate { node: u32, case: RotationCase },
    Finish,
    Done,
}

pub struct AvlInsertOne {
    tree: Tree,
    value: i64,
    operations: u64,
    phase: Phase,
}

impl AvlInsertOne {
    fn step(&self, description: String) -> TreeStep {
        TreeStep::new(snapshot(&self.tree), description, self.operations)
    }

    fn after_frame(&self, node: u32) -> Phase {
        match self.tree.node(node).p {
            Some(p) => Phase::Unwind { node: p },
            None => Phase::Finish,
        }
    }
}

impl Iterator for AvlInsertOne {
    type Item = TreeStep;

    fn next(&mut self) -> Option<TreeStep> {
        let value = self.value;
        loop {
            match self.phase {
                Phase::Start => {
                    let Some(root) = self.tree.root() else {
                        let n = self
                            .tree
                            .alloc(value, NodeState::Committed, NodeMeta::Avl { height: 1 });
                        self.tree.set_root(Some(n));
                        self.operations += 1;
                        self.phase = Phase::Done;
                        return Some(self.step(format!("inserted {value} as the root node")));
                    };
                    self.tree.reset_states();
                    self.phase = Phase::Compare { cur: root };
                    return Some(self.step(format!("inserting {value} into the AVL tree...")));
                }
                Phase::Compare { cur } => {
                    self.operations += 1;
                    self.tree.node_mut(cur).state = NodeState::Visiting;
                    self.phase = Phase::Advance { cur };
                    let other = self.tree.node(cur).value;
                    return Some(self.step(format!("comparing {value} with {other}")));
                }
                Phase::Advance { cur } => {
                    self.tree.node_mut(cur).state = NodeState::Default;
                    let node = self.tree.node(cur);
                    if value == node.value {
                        // The frame ends here; ancestors still unwind
                        // normally, with nothing to rebalance.
                        self.phase = self.after_frame(cur);
                        return Some(self.step(format!("{value} already exists")));
                    }
                    let left = value < node.value;
                    let child = if left { node.l } else { node.r };
                    self.phase = match child {
                        Some(c) => Phase::Compare { cur: c },
                        None => Phase::Attach { parent: cur, left },
                    };
                }
                Phase::Attach { parent, left } => {
                    self.operations += 1;
                    let n = self
                        .tree
                        .alloc(value, NodeState::Candidate, NodeMeta::Avl { height: 1 });
                    if left {
                        self.tree.link_l(parent, Some(n));
                    } else {
                        self.tree.link_r(parent, Some(n));
                    }
                    self.phase = Phase::Unwind { node: parent };
                    return Some(self.step(format!("inserted {value} as a new node")));
                }
                Phase::Unwind { node } => {
                    update_height(&mut self.tree, node);
                    let balance = balance_of(&self.tree, node);
                    let n = self.tree.node(node);
                    let left_value = n.l.map(|l| self.tree.node(l).value);
                    let right_value = n.r.map(|r| self.tree.node(r).value);

                    let case = if balance > 1 && left_value.is_some_and(|lv| value < lv) {
                        Some(RotationCase::LeftLeft)
                    } else if balance < -1 && right_value.is_some_and(|rv| value > rv) {
                        Some(RotationCase::RightRight)
                    } else if balance > 1 && left_value.is_some_and(|lv| value > lv) {
                        Some(RotationCase::LeftRight)
                    } else if balance < -1 && right_value.is_some_and(|rv| value < rv) {
                        Some(RotationCase::RightLeft)
                    } else {
                        None
                    };

                    match case {
                        Some(case) => {
                            self.operations += 1;
                            self.phase = Phase::Rotate { node, case };
                            return Some(self.step(case.announce().to_owned()));
                        }
                        None => {
                            self.tree.node_mut(node).state = NodeState::Default;
                            self.phase = self.after_frame(node);
                            return Some(self.step("node update complete".to_owned()));
                        }
                    }
                }
                Phase::Rotate { node, case } => {
                    let new_top = match case {
                        RotationCase::LeftLeft => rotate_right(&mut self.tree, node),
                        RotationCase::RightRight => rotate_left(&mut self.tree, node),
                        RotationCase::LeftRight => {
                            let l = self.tree.node(node).l.expect("left-right case has a left child");
                            rotate_left(&mut self.tree, l);
                            rotate_right(&mut self.tree, node)
                        }
                        RotationCase::RightLeft => {
                            let r = self
                                .tree
                                .node(node)
                                .r
                                .expect("right-left case has a right child");
                            rotate_right(&mut self.tree, r);
                            rotate_left(&mut self.tree, node)
                        }
                    };
                    self.phase = self.after_frame(new_top);
                    return Some(self.step("rotation complete".to_owned()));
                }
                Phase::Finish => {
                    self.tree.reset_states();
                    self.phase = Phase::Done;
                    return Some(
                        self.step("insertion complete (the AVL tree is balanced)".to_owned()),
                    );
                }
                Phase::Done => return None,
            }
        }
    }
}

fn height_of(tree: &Tree, i: Option<u32>) -> u32 {
    i.map(|i| tree.node(i).height()).unwrap_or(0)
}

fn update_height(tree: &mut Tree, i: u32) {
    let node = tree.node(i);
    let h = 1 + height_of(tree, node.l).max(height_of(tree, node.r));
    tree.node_mut(i).set_height(h);
}

fn balance_of(tree: &Tree, i: u32) -> i64 {
    let node = tree.node(i);
    i64::from(height_of(tree, node.l)) - i64::from(height_of(tree, node.r))
}

/// Promotes `y.l` to the local root. Heights are recomputed children
/// before parent; the subtree's attachment point (or the tree root) is
/// rewired and `p` links re-derived.
fn rotate_right(tree: &mut Tree, y: u32) -> u32 {
    let x = tree.node(y).l.expect("right rotation requires a left child");
    let t2 = tree.node(x).r;
    let p = tree.node(y).p;

    tree.link_r(x, Some(y));
    tree.set_l(y, t2);
    if let Some(t2) = t2 {
        tree.set_p(t2, Some(y));
    }
    reattach(tree, x, y, p);

    update_height(tree, y);
    update_height(tree, x);
    x
}

/// Mirror of [`rotate_right`].
fn rotate_left(tree: &mut Tree, x: u32) -> u32 {
    let y = tree.node(x).r.expect("left rotation requires a right child");
    let t2 = tree.node(y).l;
    let p = tree.node(x).p;

    tree.link_l(y, Some(x));
    tree.set_r(x, t2);
    if let Some(t2) = t2 {
        tree.set_p(t2, Some(x));
    }
    reattach(tree, y, x, p);

    update_height(tree, x);
    update_height(tree, y);
    y
}

/// Hooks the promoted node into the demoted node's old attachment point.
fn reattach(tree: &mut Tree, promoted: u32, demoted: u32, parent: Option<u32>) {
    tree.set_p(promoted, parent);
    match parent {
        Some(p) => {
            if tree.node(p).l == Some(demoted) {
                tree.set_l(p, Some(promoted));
            } else {
                tree.set_r(p, Some(promoted));
            }
        }
        None => tree.set_root(Some(promoted)),
    }
}
