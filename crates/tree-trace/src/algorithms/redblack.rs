//! Red-black tree engine.
//!
//! Bottom-up local fixup: a brand-new node is inserted red (the tree's very
//! first node is forced black), and every frame of the unwind walk applies
//! three checks in fixed order: left rotation, right rotation, color flip.
//! The order matters: later checks inspect structure the earlier ones may
//! have changed within the same frame. After the walk, a red root is
//! recolored black with a dedicated step.

use crate::node::{Color, NodeMeta, NodeState};
use crate::step::TreeStep;
use crate::tree::{MetaKind, Tree};

use super::{snapshot, RepeatedInsert};

/// Animates the insertion of `value` into a copy of `existing`. Inserting
/// a value that already exists yields an "already exists" step and performs
/// no structural change.
pub fn insert_one(existing: Option<&Tree>, value: i64) -> RbInsertOne {
    RbInsertOne {
        tree: existing.map(|t| t.adopt(MetaKind::Rb)).unwrap_or_default(),
        value,
        operations: 0,
        phase: Phase::Start,
    }
}

/// Repeated single-value insertion, re-cloning the previous final tree
/// between values.
pub fn insert_bulk(values: &[i64]) -> impl Iterator<Item = TreeStep> {
    RepeatedInsert::new(values, |prev, value| insert_one(prev, value))
}

/// The three fixup checks of one unwind frame, in their mandatory order.
#[derive(Clone, Copy)]
enum Check {
    RotateLeft,
    RotateRight,
    FlipColors,
    Updated,
}

enum Phase {
    Start,
    Compare { cur: u32 },
    Advance { cur: u32 },
    Attach { parent: u32, left: bool },
    Unwind { node: u32, check: Check },
    ApplyRotateLeft { node: u32 },
    ApplyRotateRight { node: u32 },
    ApplyFlip { node: u32 },
    RootCheck,
    Finish,
    Done,
}

pub struct RbInsertOne {
    tree: Tree,
    value: i64,
    operations: u64,
    phase: Phase,
}

impl RbInsertOne {
    fn step(&self, description: String) -> TreeStep {
        TreeStep::new(snapshot(&self.tree), description, self.operations)
    }

    fn is_red(&self, i: Option<u32>) -> bool {
        i.is_some_and(|i| self.tree.node(i).is_red())
    }

    fn after_frame(&self, node: u32) -> Phase {
        match self.tree.node(node).p {
            Some(p) => Phase::Unwind {
                node: p,
                check: Check::RotateLeft,
            },
            None => Phase::RootCheck,
        }
    }
}

impl Iterator for RbInsertOne {
    type Item = TreeStep;

    fn next(&mut self) -> Option<TreeStep> {
        let value = self.value;
        loop {
            match self.phase {
                Phase::Start => {
                    let Some(root) = self.tree.root() else {
                        let n = self.tree.alloc(
                            value,
                            NodeState::Committed,
                            NodeMeta::Rb { color: Color::Black },
                        );
                        self.tree.set_root(Some(n));
                        self.operations += 1;
                        self.phase = Phase::Done;
                        return Some(
                            self.step(format!("inserted {value} as the root node (black)")),
                        );
                    };
                    self.tree.reset_states();
                    self.phase = Phase::Compare { cur: root };
                    return Some(
                        self.step(format!("inserting {value} into the red-black tree...")),
                    );
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
                        // Ancestors still run their fixup checks; nothing
                        // changed, so none of them fire.
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
                    let n = self.tree.alloc(
                        value,
                        NodeState::Candidate,
                        NodeMeta::Rb { color: Color::Red },
                    );
                    if left {
                        self.tree.link_l(parent, Some(n));
                    } else {
                        self.tree.link_r(parent, Some(n));
                    }
                    self.phase = Phase::Unwind {
                        node: parent,
                        check: Check::RotateLeft,
                    };
                    return Some(self.step(format!("inserted {value} as a new red node")));
                }
                Phase::Unwind { node, check } => match check {
                    Check::RotateLeft => {
                        let n = self.tree.node(node);
                        if self.is_red(n.r) && !self.is_red(n.l) {
                            self.operations += 1;
                            self.phase = Phase::ApplyRotateLeft { node };
                            return Some(self.step(
                                "the right child is red and the left child is black: rotating left"
                                    .to_owned(),
                            ));
                        }
                        self.phase = Phase::Unwind {
                            node,
                            check: Check::RotateRight,
                        };
                    }
                    Check::RotateRight => {
                        let l = self.tree.node(node).l;
                        let ll = l.and_then(|l| self.tree.node(l).l);
                        if self.is_red(l) && self.is_red(ll) {
                            self.operations += 1;
                            self.phase = Phase::ApplyRotateRight { node };
                            return Some(self.step(
                                "the left child and left-left grandchild are both red: rotating right"
                                    .to_owned(),
                            ));
                        }
                        self.phase = Phase::Unwind {
                            node,
                            check: Check::FlipColors,
                        };
                    }
                    Check::FlipColors => {
                        let n = self.tree.node(node);
                        if self.is_red(n.l) && self.is_red(n.r) {
                            self.operations += 1;
                            self.phase = Phase::ApplyFlip { node };
                            return Some(
                                self.step("both children are red: flipping colors".to_owned()),
                            );
                        }
                        self.phase = Phase::Unwind {
                            node,
                            check: Check::Updated,
                        };
                    }
                    Check::Updated => {
                        self.tree.node_mut(node).state = NodeState::Default;
                        self.phase = self.after_frame(node);
                        return Some(self.step("node update complete".to_owned()));
                    }
                },
                Phase::ApplyRotateLeft { node } => {
                    let new_top = rotate_left(&mut self.tree, node);
                    self.phase = Phase::Unwind {
                        node: new_top,
                        check: Check::RotateRight,
                    };
                    return Some(self.step("left rotation complete".to_owned()));
                }
                Phase::ApplyRotateRight { node } => {
                    let new_top = rotate_right(&mut self.tree, node);
                    self.phase = Phase::Unwind {
                        node: new_top,
                        check: Check::FlipColors,
                    };
                    return Some(self.step("right rotation complete".to_owned()));
                }
                Phase::ApplyFlip { node } => {
                    flip_colors(&mut self.tree, node);
                    self.phase = Phase::Unwind {
                        node,
                        check: Check::Updated,
                    };
                    return Some(self.step("color flip complete".to_owned()));
                }
                Phase::RootCheck => {
                    let root = self.tree.root().expect("non-empty tree at root check");
                    if self.tree.node(root).is_red() {
                        self.tree.node_mut(root).set_color(Color::Black);
                        self.operations += 1;
                        self.phase = Phase::Finish;
                        return Some(self.step("recolored the root black".to_owned()));
                    }
                    self.phase = Phase::Finish;
                }
                Phase::Finish => {
                    self.tree.reset_states();
                    self.phase = Phase::Done;
                    return Some(
                        self.step("insertion complete (red-black properties hold)".to_owned()),
                    );
                }
                Phase::Done => return None,
            }
        }
    }
}

/// Left rotation with the red-black color handoff: the promoted right child
/// takes the demoted node's former color, the demoted node becomes red.
fn rotate_left(tree: &mut Tree, node: u32) -> u32 {
    let right = tree.node(node).r.expect("left rotation requires a right child");
    let p = tree.node(node).p;
    let rl = tree.node(right).l;

    tree.set_r(node, rl);
    if let Some(rl) = rl {
        tree.set_p(rl, Some(node));
    }
    tree.link_l(right, Some(node));
    let old_color = tree.node(node).color();
    tree.node_mut(right).set_color(old_color);
    tree.node_mut(node).set_color(Color::Red);
    reattach(tree, right, node, p);
    right
}

/// Mirror of [`rotate_left`], same color handoff pattern.
fn rotate_right(tree: &mut Tree, node: u32) -> u32 {
    let left = tree.node(node).l.expect("right rotation requires a left child");
    let p = tree.node(node).p;
    let lr = tree.node(left).r;

    tree.set_l(node, lr);
    if let Some(lr) = lr {
        tree.set_p(lr, Some(node));
    }
    tree.link_r(left, Some(node));
    let old_color = tree.node(node).color();
    tree.node_mut(left).set_color(old_color);
    tree.node_mut(node).set_color(Color::Red);
    reattach(tree, left, node, p);
    left
}

/// Recolors a node red and both of its children black.
fn flip_colors(tree: &mut Tree, node: u32) {
    tree.node_mut(node).set_color(Color::Red);
    let (l, r) = {
        let n = tree.node(node);
        (n.l, n.r)
    };
    if let Some(l) = l {
        tree.node_mut(l).set_color(Color::Black);
    }
    if let Some(r) = r {
        tree.node_mut(r).set_color(Color::Black);
    }
}

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
