use std::collections::BTreeMap;

use derive_more::{Deref, DerefMut, From, Into, IntoIterator};

/// A node of the review tree: a changed file, or a directory aggregating every
/// file beneath it.
///
/// Children are kept in a `BTreeMap`, so siblings always iterate in ascending
/// key order no matter in which order the records arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    File {
        magnitude: i64,
        reviewed: bool,
        origin_path: String,
    },
    Directory {
        magnitude: i64,
        reviewed: bool,
        children: BTreeMap<String, TreeNode>,
    },
}

impl TreeNode {
    pub fn file(origin_path: impl Into<String>, magnitude: i64, reviewed: bool) -> Self {
        TreeNode::File {
            magnitude,
            reviewed,
            origin_path: origin_path.into(),
        }
    }

    /// A directory with no magnitude and no children yet. Only valid while a
    /// record is being folded into the tree.
    pub(super) fn empty_directory() -> Self {
        TreeNode::Directory {
            magnitude: 0,
            reviewed: false,
            children: BTreeMap::new(),
        }
    }

    pub fn magnitude(&self) -> i64 {
        match self {
            TreeNode::File { magnitude, .. } | TreeNode::Directory { magnitude, .. } => *magnitude,
        }
    }

    pub fn reviewed(&self) -> bool {
        match self {
            TreeNode::File { reviewed, .. } | TreeNode::Directory { reviewed, .. } => *reviewed,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, TreeNode::Directory { .. })
    }

    pub fn origin_path(&self) -> Option<&str> {
        match self {
            TreeNode::File { origin_path, .. } => Some(origin_path),
            TreeNode::Directory { .. } => None,
        }
    }

    pub fn children(&self) -> Option<&BTreeMap<String, TreeNode>> {
        match self {
            TreeNode::File { .. } => None,
            TreeNode::Directory { children, .. } => Some(children),
        }
    }
}

/// The top level of a review tree, keyed by first path segment (or by a
/// compressed run of segments).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut, From, Into, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct Tree(BTreeMap<String, TreeNode>);

impl FromIterator<(String, TreeNode)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, TreeNode)>>(iter: I) -> Self {
        Tree(iter.into_iter().collect())
    }
}
