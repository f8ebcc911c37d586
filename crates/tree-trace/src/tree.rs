//! Arena-backed binary tree and the structural clone every engine relies on.
//!
//! The arena is append-only within one engine call: structural deletes and
//! rotations only rewire `l` / `r` / `p` indices, and slots that become
//! unreachable are dropped by the next [`Tree::clone_structure`], which
//! rebuilds a compact arena from the owning edges alone.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::{NodeMeta, NodeState, TreeNode};

/// Which metadata variant an engine expects on every node it works with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MetaKind {
    Plain,
    Avl,
    Rb,
}

/// Structural violations reported by [`Tree::assert_valid`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node index {0} out of bounds")]
    OutOfBounds(u32),
    #[error("root {0} has a parent link")]
    RootHasParent(u32),
    #[error("node {child} is not linked back to its parent {parent}")]
    BrokenParentLink { parent: u32, child: u32 },
    #[error("node {0} is reachable through more than one owning edge")]
    SharedChild(u32),
}

/// An arena-backed binary tree.
///
/// Engines mutate a private `Tree` and publish independent snapshots of it
/// through [`Tree::clone_structure`]; the tree a consumer extracts from the
/// final step is the "existing root" input to the next engine call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    root: Option<u32>,
    next_id: u64,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<u32> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn node(&self, i: u32) -> &TreeNode {
        &self.nodes[i as usize]
    }

    pub fn node_mut(&mut self, i: u32) -> &mut TreeNode {
        &mut self.nodes[i as usize]
    }

    pub(crate) fn set_root(&mut self, root: Option<u32>) {
        self.root = root;
        if let Some(r) = root {
            self.nodes[r as usize].p = None;
        }
    }

    /// Appends a fresh node with the next deterministic id.
    pub(crate) fn alloc(&mut self, value: i64, state: NodeState, meta: NodeMeta) -> u32 {
        let i = self.nodes.len() as u32;
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.push(TreeNode::new(id, value, state, meta));
        i
    }

    pub(crate) fn set_p(&mut self, i: u32, v: Option<u32>) {
        self.nodes[i as usize].p = v;
    }

    pub(crate) fn set_l(&mut self, i: u32, v: Option<u32>) {
        self.nodes[i as usize].l = v;
    }

    pub(crate) fn set_r(&mut self, i: u32, v: Option<u32>) {
        self.nodes[i as usize].r = v;
    }

    /// Sets `parent.l = child` and re-derives the back-reference.
    pub(crate) fn link_l(&mut self, parent: u32, child: Option<u32>) {
        self.set_l(parent, child);
        if let Some(c) = child {
            self.set_p(c, Some(parent));
        }
    }

    /// Sets `parent.r = child` and re-derives the back-reference.
    pub(crate) fn link_r(&mut self, parent: u32, child: Option<u32>) {
        self.set_r(parent, child);
        if let Some(c) = child {
            self.set_p(c, Some(parent));
        }
    }

    /// Deep structural copy.
    ///
    /// Traverses the owning `l` / `r` edges only, rebuilds a compact arena,
    /// re-derives every `p` pointer for the new structure, and preserves
    /// `id`, `value`, `state` and metadata at every node. The copy shares
    /// nothing with the source, so a consumer retaining the result never
    /// observes later mutation.
    pub fn clone_structure(&self) -> Self {
        let mut out = Self {
            nodes: Vec::with_capacity(self.nodes.len()),
            root: None,
            next_id: self.next_id,
        };
        if let Some(root) = self.root {
            let r = self.copy_subtree(root, None, &mut out);
            out.root = Some(r);
        }
        out
    }

    fn copy_subtree(&self, i: u32, parent: Option<u32>, out: &mut Tree) -> u32 {
        let src = &self.nodes[i as usize];
        let ni = out.nodes.len() as u32;
        let mut node = TreeNode::new(src.id, src.value, src.state, src.meta);
        node.p = parent;
        out.nodes.push(node);
        if let Some(l) = src.l {
            let c = self.copy_subtree(l, Some(ni), out);
            out.nodes[ni as usize].l = Some(c);
        }
        if let Some(r) = src.r {
            let c = self.copy_subtree(r, Some(ni), out);
            out.nodes[ni as usize].r = Some(c);
        }
        ni
    }

    /// Structural clone plus metadata normalization for the given engine:
    /// heights default to 0 and colors to black wherever the source tree
    /// carried a different (or no) metadata variant.
    pub(crate) fn adopt(&self, kind: MetaKind) -> Self {
        let mut out = self.clone_structure();
        for node in &mut out.nodes {
            node.meta = match kind {
                MetaKind::Plain => NodeMeta::Plain,
                MetaKind::Avl => NodeMeta::Avl {
                    height: node.height(),
                },
                MetaKind::Rb => NodeMeta::Rb {
                    color: node.color(),
                },
            };
        }
        out
    }

    /// Resets every annotation to [`NodeState::Default`].
    pub(crate) fn reset_states(&mut self) {
        for node in &mut self.nodes {
            node.state = NodeState::Default;
        }
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = Vec::new();
        stack.extend(self.root);
        while let Some(i) = stack.pop() {
            count += 1;
            let node = self.node(i);
            stack.extend(node.l);
            stack.extend(node.r);
        }
        count
    }

    /// Measured height of the tree (a single node has height 1).
    pub fn height(&self) -> u32 {
        fn depth(tree: &Tree, i: Option<u32>) -> u32 {
            match i {
                None => 0,
                Some(i) => {
                    let node = tree.node(i);
                    1 + depth(tree, node.l).max(depth(tree, node.r))
                }
            }
        }
        depth(self, self.root)
    }

    /// Node indices in breadth-first (level) order.
    pub fn level_order(&self) -> Vec<u32> {
        let mut out = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        queue.extend(self.root);
        while let Some(i) = queue.pop_front() {
            out.push(i);
            let node = self.node(i);
            queue.extend(node.l);
            queue.extend(node.r);
        }
        out
    }

    /// Values in breadth-first (level) order.
    pub fn level_order_values(&self) -> Vec<i64> {
        self.level_order()
            .into_iter()
            .map(|i| self.node(i).value)
            .collect()
    }

    /// Values in symmetric (in-) order.
    pub fn in_order_values(&self) -> Vec<i64> {
        fn walk(tree: &Tree, i: Option<u32>, out: &mut Vec<i64>) {
            let Some(i) = i else { return };
            let node = tree.node(i);
            walk(tree, node.l, out);
            out.push(node.value);
            walk(tree, node.r, out);
        }
        let mut out = Vec::new();
        walk(self, self.root, &mut out);
        out
    }

    /// First reachable node carrying `value`, in symmetric order.
    pub fn find(&self, value: i64) -> Option<u32> {
        fn walk(tree: &Tree, i: Option<u32>, value: i64) -> Option<u32> {
            let i = i?;
            let node = tree.node(i);
            walk(tree, node.l, value)
                .or(if node.value == value { Some(i) } else { None })
                .or_else(|| walk(tree, node.r, value))
        }
        walk(self, self.root, value)
    }

    /// Checks arena-link consistency: indices in bounds, every child linked
    /// back to its parent, the root carrying no parent, and no node owned
    /// by more than one edge.
    pub fn assert_valid(&self) -> Result<(), TreeError> {
        let Some(root) = self.root else {
            return Ok(());
        };
        let bound = self.nodes.len() as u32;
        if root >= bound {
            return Err(TreeError::OutOfBounds(root));
        }
        if self.node(root).p.is_some() {
            return Err(TreeError::RootHasParent(root));
        }
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            if seen[i as usize] {
                return Err(TreeError::SharedChild(i));
            }
            seen[i as usize] = true;
            let node = self.node(i);
            for child in [node.l, node.r].into_iter().flatten() {
                if child >= bound {
                    return Err(TreeError::OutOfBounds(child));
                }
                if self.node(child).p != Some(i) {
                    return Err(TreeError::BrokenParentLink { parent: i, child });
                }
                stack.push(child);
            }
        }
        Ok(())
    }
}
