//! Shared binary-tree node model.
//!
//! Every engine operates on the same node shape. "Pointers" are
//! `Option<u32>` indices into the owning [`Tree`](crate::tree::Tree) arena,
//! never references: `l` / `r` are the owning edges, `p` is a derived
//! back-reference that is rebuilt whenever a node is re-attached and must
//! never be treated as a source of truth for structure.

use serde::{Deserialize, Serialize};

/// Presentation state of a node.
///
/// Purely an annotation for the rendering layer; engine control flow never
/// branches on it beyond resetting annotations between phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    #[default]
    Default,
    Visiting,
    Candidate,
    Comparing,
    Committed,
    Idle,
}

/// Node color in a red-black tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

/// Per-algorithm node metadata.
///
/// One node shape is shared by every engine, so the field that is only
/// meaningful for one algorithm (cached height for AVL, color for
/// red-black) lives in a tagged variant rather than in a pair of
/// sometimes-meaningful optional fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeMeta {
    #[default]
    Plain,
    Avl {
        height: u32,
    },
    Rb {
        color: Color,
    },
}

/// A node in the tree arena.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Stable identity, minted once per logical node and preserved by
    /// structural clones. Not reused when a structural change replaces the
    /// node with a new instance.
    pub id: u64,
    pub value: i64,
    pub state: NodeState,
    pub meta: NodeMeta,
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
}

impl TreeNode {
    pub fn new(id: u64, value: i64, state: NodeState, meta: NodeMeta) -> Self {
        Self {
            id,
            value,
            state,
            meta,
            p: None,
            l: None,
            r: None,
        }
    }

    /// Cached AVL subtree height; 0 for nodes that carry no AVL metadata.
    pub fn height(&self) -> u32 {
        match self.meta {
            NodeMeta::Avl { height } => height,
            _ => 0,
        }
    }

    pub(crate) fn set_height(&mut self, height: u32) {
        self.meta = NodeMeta::Avl { height };
    }

    /// Red-black color; black for nodes that carry no color.
    pub fn color(&self) -> Color {
        match self.meta {
            NodeMeta::Rb { color } => color,
            _ => Color::Black,
        }
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.meta = NodeMeta::Rb { color };
    }

    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_defaults_for_absent_fields() {
        let node = TreeNode::new(0, 7, NodeState::Default, NodeMeta::Plain);
        assert_eq!(node.height(), 0);
        assert_eq!(node.color(), Color::Black);
        assert!(!node.is_red());
    }

    #[test]
    fn meta_accessors_read_their_own_variant() {
        let mut node = TreeNode::new(1, 7, NodeState::Default, NodeMeta::Plain);
        node.set_height(3);
        assert_eq!(node.meta, NodeMeta::Avl { height: 3 });
        assert_eq!(node.height(), 3);

        node.set_color(Color::Red);
        assert_eq!(node.meta, NodeMeta::Rb { color: Color::Red });
        assert!(node.is_red());
        // Height reads back as the default once the variant changed.
        assert_eq!(node.height(), 0);
    }
}
