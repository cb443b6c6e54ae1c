use std::collections::BTreeMap;

use super::{Tree, TreeNode};

/// Marks each directory reviewed iff all of its children are reviewed, working
/// from the leaves up. File flags are left as assembled.
pub fn propagate_reviewed(tree: Tree) -> Tree {
    tree.into_iter()
        .map(|(key, node)| (key, propagate_node(node)))
        .collect()
}

fn propagate_node(node: TreeNode) -> TreeNode {
    match node {
        file @ TreeNode::File { .. } => file,
        TreeNode::Directory {
            magnitude,
            children,
            ..
        } => {
            let children = children
                .into_iter()
                .map(|(key, child)| (key, propagate_node(child)))
                .collect::<BTreeMap<_, _>>();
            let reviewed = !children.is_empty() && children.values().all(TreeNode::reviewed);

            TreeNode::Directory {
                magnitude,
                reviewed,
                children,
            }
        }
    }
}
