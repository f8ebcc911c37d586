//! Binary search tree engine.
//!
//! The recursive generator control flow of the textbook formulation is
//! rendered as explicit state machines: each iterator variant is a resume
//! point, and the work between two yielded steps happens inside a single
//! `next()` call. Equal values route right, so repeated inserts of the same
//! value grow a multiset rather than being rejected; see
//! [`insert_one`].

use crate::node::{NodeMeta, NodeState};
use crate::step::TreeStep;
use crate::tree::{MetaKind, Tree};

use super::snapshot;

/// Animates the insertion of `value` into a copy of `existing`.
///
/// The input tree is never mutated: the engine adopts a structural clone
/// and every yielded step carries its own independent snapshot. Duplicate
/// values are not rejected: `>=` descends right until a free slot is
/// found, preserving multiset semantics.
pub fn insert_one(existing: Option<&Tree>, value: i64) -> BstInsertOne {
    BstInsertOne {
        tree: existing.map(|t| t.adopt(MetaKind::Plain)).unwrap_or_default(),
        value,
        operations: 0,
        phase: InsertPhase::Start,
    }
}

/// Builds a tree from `values` by repeated insertion into one growing
/// working tree, yielding every intermediate step across all values and a
/// single summary step at the end.
pub fn insert_bulk(values: &[i64]) -> BstBulkInsert {
    BstBulkInsert {
        tree: Tree::new(),
        values: values.to_vec().into_iter(),
        operations: 0,
        phase: BulkPhase::NextValue,
    }
}

/// Animates the deletion of `value` from a copy of `existing`.
pub fn delete(existing: Option<&Tree>, value: i64) -> BstDelete {
    BstDelete {
        tree: existing.map(|t| t.adopt(MetaKind::Plain)).unwrap_or_default(),
        value,
        operations: 0,
        phase: DeletePhase::Start,
    }
}

enum InsertPhase {
    Start,
    Compare { cur: u32 },
    Advance { cur: u32 },
    Attach { parent: u32, left: bool },
    Promote { node: u32, parent: u32 },
    Finish,
    Done,
}

pub struct BstInsertOne {
    tree: Tree,
    value: i64,
    operations: u64,
    phase: InsertPhase,
}

impl BstInsertOne {
    fn step(&self, description: String) -> TreeStep {
        TreeStep::new(snapshot(&self.tree), description, self.operations)
    }
}

impl Iterator for BstInsertOne {
    type Item = TreeStep;

    fn next(&mut self) -> Option<TreeStep> {
        let value = self.value;
        loop {
            match self.phase {
                InsertPhase::Start => {
                    let Some(root) = self.tree.root() else {
                        let n = self.tree.alloc(value, NodeState::Committed, NodeMeta::Plain);
                        self.tree.set_root(Some(n));
                        self.operations += 1;
                        self.phase = InsertPhase::Done;
                        return Some(self.step(format!("inserted {value} as the root node")));
                    };
                    self.tree.reset_states();
                    self.phase = InsertPhase::Compare { cur: root };
                    return Some(
                        self.step(format!("searching for the insertion point of {value}...")),
                    );
                }
                InsertPhase::Compare { cur } => {
                    self.operations += 1;
                    self.tree.node_mut(cur).state = NodeState::Visiting;
                    self.phase = InsertPhase::Advance { cur };
                    let other = self.tree.node(cur).value;
                    return Some(self.step(format!("comparing {value} with {other}")));
                }
                InsertPhase::Advance { cur } => {
                    self.tree.node_mut(cur).state = NodeState::Default;
                    let node = self.tree.node(cur);
                    let left = value < node.value;
                    let child = if left { node.l } else { node.r };
                    self.phase = match child {
                        Some(c) => InsertPhase::Compare { cur: c },
                        None => InsertPhase::Attach { parent: cur, left },
                    };
                }
                InsertPhase::Attach { parent, left } => {
                    self.operations += 1;
                    let n = self.tree.alloc(value, NodeState::Candidate, NodeMeta::Plain);
                    if left {
                        self.tree.link_l(parent, Some(n));
                    } else {
                        self.tree.link_r(parent, Some(n));
                    }
                    self.phase = InsertPhase::Promote { node: n, parent };
                    let side = if left { "left" } else { "right" };
                    return Some(self.step(format!("inserted {value} as the {side} child")));
                }
                InsertPhase::Promote { node, parent } => {
                    self.tree.node_mut(node).state = NodeState::Committed;
                    self.tree.node_mut(parent).state = NodeState::Default;
                    self.phase = InsertPhase::Finish;
                    return Some(self.step(format!("insertion of {value} complete")));
                }
                InsertPhase::Finish => {
                    self.tree.reset_states();
                    self.phase = InsertPhase::Done;
                    return Some(self.step("insertion finished".to_owned()));
                }
                InsertPhase::Done => return None,
            }
        }
    }
}

enum BulkPhase {
    NextValue,
    Compare { value: i64, cur: u32 },
    Advance { value: i64, cur: u32 },
    Attach { value: i64, parent: u32, left: bool },
    Promote { value: i64, node: u32, parent: u32 },
    Finish,
    Done,
}

pub struct BstBulkInsert {
    tree: Tree,
    values: std::vec::IntoIter<i64>,
    operations: u64,
    phase: BulkPhase,
}

impl BstBulkInsert {
    fn step(&self, description: String) -> TreeStep {
        TreeStep::new(snapshot(&self.tree), description, self.operations)
    }
}

impl Iterator for BstBulkInsert {
    type Item = TreeStep;

    fn next(&mut self) -> Option<TreeStep> {
        loop {
            match self.phase {
                BulkPhase::NextValue => {
                    let Some(value) = self.values.next() else {
                        self.phase = BulkPhase::Finish;
                        continue;
                    };
                    // One work unit per value; comparisons within a value
                    // share its counter reading.
                    self.operations += 1;
                    let Some(root) = self.tree.root() else {
                        let n = self.tree.alloc(value, NodeState::Committed, NodeMeta::Plain);
                        self.tree.set_root(Some(n));
                        return Some(self.step(format!("inserted {value} as the root node")));
                    };
                    self.phase = BulkPhase::Compare { value, cur: root };
                }
                BulkPhase::Compare { value, cur } => {
                    self.tree.node_mut(cur).state = NodeState::Visiting;
                    self.phase = BulkPhase::Advance { value, cur };
                    let other = self.tree.node(cur).value;
                    return Some(self.step(format!("comparing {value} with {other}")));
                }
                BulkPhase::Advance { value, cur } => {
                    self.tree.node_mut(cur).state = NodeState::Default;
                    let node = self.tree.node(cur);
                    let left = value < node.value;
                    let child = if left { node.l } else { node.r };
                    self.phase = match child {
                        Some(c) => BulkPhase::Compare { value, cur: c },
                        None => BulkPhase::Attach {
                            value,
                            parent: cur,
                            left,
                        },
                    };
                }
                BulkPhase::Attach {
                    value,
                    parent,
                    left,
                } => {
                    let n = self.tree.alloc(value, NodeState::Candidate, NodeMeta::Plain);
                    if left {
                        self.tree.link_l(parent, Some(n));
                    } else {
                        self.tree.link_r(parent, Some(n));
                    }
                    self.phase = BulkPhase::Promote {
                        value,
                        node: n,
                        parent,
                    };
                    let side = if left { "left" } else { "right" };
                    return Some(self.step(format!("inserted {value} as the {side} child")));
                }
                BulkPhase::Promote {
                    value,
                    node,
                    parent,
                } => {
                    self.tree.node_mut(node).state = NodeState::Committed;
                    self.tree.node_mut(parent).state = NodeState::Default;
                    self.phase = BulkPhase::NextValue;
                    return Some(self.step(format!("insertion of {value} complete")));
                }
                BulkPhase::Finish => {
                    self.tree.reset_states();
                    self.phase = BulkPhase::Done;
                    return Some(self.step("all insertions complete".to_owned()));
                }
                BulkPhase::Done => return None,
            }
        }
    }
}

enum DeletePhase {
    Start,
    Search {
        cur: u32,
        parent: Option<u32>,
        is_left: bool,
    },
    Move {
        cur: u32,
    },
    Mark {
        cur: u32,
        parent: Option<u32>,
        is_left: bool,
    },
    Cases {
        cur: u32,
        parent: Option<u32>,
        is_left: bool,
    },
    Replace {
        cur: u32,
        succ: u32,
        succ_parent: u32,
    },
    Finish,
    Done,
}

pub struct BstDelete {
    tree: Tree,
    value: i64,
    operations: u64,
    phase: DeletePhase,
}

impl BstDelete {
    fn step(&self, description: String) -> TreeStep {
        TreeStep::new(snapshot(&self.tree), description, self.operations)
    }
}

impl Iterator for BstDelete {
    type Item = TreeStep;

    fn next(&mut self) -> Option<TreeStep> {
        let value = self.value;
        loop {
            match self.phase {
                DeletePhase::Start => {
                    let Some(root) = self.tree.root() else {
                        self.phase = DeletePhase::Done;
                        return Some(self.step("the tree is empty".to_owned()));
                    };
                    self.phase = DeletePhase::Search {
                        cur: root,
                        parent: None,
                        is_left: false,
                    };
                }
                DeletePhase::Search {
                    cur,
                    parent,
                    is_left,
                } => {
                    if self.tree.node(cur).value == value {
                        self.phase = DeletePhase::Mark {
                            cur,
                            parent,
                            is_left,
                        };
                        continue;
                    }
                    self.operations += 1;
                    self.tree.node_mut(cur).state = NodeState::Visiting;
                    self.phase = DeletePhase::Move { cur };
                    let at = self.tree.node(cur).value;
                    return Some(self.step(format!("searching for {value} (currently at {at})")));
                }
                DeletePhase::Move { cur } => {
                    self.tree.node_mut(cur).state = NodeState::Default;
                    let node = self.tree.node(cur);
                    let is_left = value < node.value;
                    let child = if is_left { node.l } else { node.r };
                    match child {
                        Some(c) => {
                            self.phase = DeletePhase::Search {
                                cur: c,
                                parent: Some(cur),
                                is_left,
                            };
                        }
                        None => {
                            self.phase = DeletePhase::Done;
                            return Some(self.step(format!("{value} was not found")));
                        }
                    }
                }
                DeletePhase::Mark {
                    cur,
                    parent,
                    is_left,
                } => {
                    self.tree.node_mut(cur).state = NodeState::Comparing;
                    self.phase = DeletePhase::Cases {
                        cur,
                        parent,
                        is_left,
                    };
                    return Some(self.step(format!("deleting {value}")));
                }
                DeletePhase::Cases {
                    cur,
                    parent,
                    is_left,
                } => {
                    let node = self.tree.node(cur);
                    let (l, r) = (node.l, node.r);
                    match (l, r) {
                        (None, None) => {
                            match parent {
                                None => self.tree.set_root(None),
                                Some(p) => {
                                    if is_left {
                                        self.tree.set_l(p, None);
                                    } else {
                                        self.tree.set_r(p, None);
                                    }
                                }
                            }
                            self.phase = DeletePhase::Finish;
                            return Some(self.step(format!("deleted leaf node {value}")));
                        }
                        (Some(child), None) | (None, Some(child)) => {
                            match parent {
                                None => {
                                    self.tree.set_p(child, None);
                                    self.tree.set_root(Some(child));
                                }
                                Some(p) => {
                                    if is_left {
                                        self.tree.link_l(p, Some(child));
                                    } else {
                                        self.tree.link_r(p, Some(child));
                                    }
                                }
                            }
                            self.phase = DeletePhase::Finish;
                            return Some(self.step(format!("deleted node {value} with one child")));
                        }
                        (Some(_), Some(right)) => {
                            // In-order successor: leftmost node of the right
                            // subtree, each left descent counted as work.
                            let mut succ = right;
                            let mut succ_parent = cur;
                            while let Some(l) = self.tree.node(succ).l {
                                self.operations += 1;
                                succ_parent = succ;
                                succ = l;
                            }
                            self.tree.node_mut(succ).state = NodeState::Candidate;
                            self.phase = DeletePhase::Replace {
                                cur,
                                succ,
                                succ_parent,
                            };
                            let sv = self.tree.node(succ).value;
                            return Some(self.step(format!("found the in-order successor {sv}")));
                        }
                    }
                }
                DeletePhase::Replace {
                    cur,
                    succ,
                    succ_parent,
                } => {
                    let succ_value = self.tree.node(succ).value;
                    let succ_right = self.tree.node(succ).r;
                    self.tree.node_mut(cur).value = succ_value;
                    // Splice the successor out of its original position,
                    // reattaching its right child where it was.
                    if succ_parent != cur {
                        self.tree.set_l(succ_parent, succ_right);
                    } else {
                        self.tree.set_r(succ_parent, succ_right);
                    }
                    if let Some(r) = succ_right {
                        self.tree.set_p(r, Some(succ_parent));
                    }
                    self.tree.node_mut(cur).state = NodeState::Committed;
                    self.phase = DeletePhase::Finish;
                    return Some(self.step(format!("replaced {value} with its successor")));
                }
                DeletePhase::Finish => {
                    self.tree.reset_states();
                    self.phase = DeletePhase::Done;
                    return Some(self.step("deletion complete".to_owned()));
                }
                DeletePhase::Done => return None,
            }
        }
    }
}
