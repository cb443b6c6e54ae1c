use std::collections::BTreeMap;
use std::mem;

use tracing::debug;

use super::{Tree, TreeNode};

/// Collapses every chain of directories that each hold exactly one further
/// directory into a single entry keyed by the joined path (`a/b/c`).
///
/// A directory whose only child is a file keeps its own key; the file is never
/// folded into it. Aggregates are carried through untouched: a lone child
/// directory already holds the same magnitude as its parent.
pub fn compress(tree: Tree) -> Tree {
    let compressed = compress_children(tree.into());
    debug!("Compressed tree to {} top-level entries", compressed.len());
    Tree::from(compressed)
}

fn compress_children(children: BTreeMap<String, TreeNode>) -> BTreeMap<String, TreeNode> {
    children
        .into_iter()
        .map(|(key, node)| compress_entry(key, node))
        .collect()
}

fn compress_entry(mut key: String, mut node: TreeNode) -> (String, TreeNode) {
    while let Some((child_key, child)) = take_lone_directory(&mut node) {
        key = format!("{key}/{child_key}");
        node = child;
    }

    if let TreeNode::Directory { children, .. } = &mut node {
        assert!(
            !children.is_empty(),
            "directory '{key}' has no children; the assembler must never produce one"
        );
        *children = compress_children(mem::take(children));
    }

    (key, node)
}

/// Detaches the only child of `node` when that child is itself a directory.
fn take_lone_directory(node: &mut TreeNode) -> Option<(String, TreeNode)> {
    match node {
        TreeNode::Directory { children, .. }
            if children.len() == 1 && children.values().all(TreeNode::is_directory) =>
        {
            children.pop_first()
        }
        _ => None,
    }
}
