use std::fmt;

use super::{Tree, TreeNode};

/// One line of the display view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRow<'a> {
    pub depth: usize,
    pub key: &'a str,
    pub magnitude: i64,
    pub reviewed: bool,
    pub is_directory: bool,
    /// Presentation hint: directories start expanded unless fully reviewed.
    pub expanded: bool,
}

/// One row of the flat export view. Only files produce rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRow<'a> {
    pub origin_path: &'a str,
    pub magnitude: i64,
    pub reviewed: bool,
}

/// Pre-order walk over a tree, siblings in ascending key order.
pub struct Walk<'a> {
    stack: Vec<(usize, &'a str, &'a TreeNode)>,
}

impl<'a> Walk<'a> {
    pub fn new(tree: &'a Tree) -> Self {
        let stack = tree
            .iter()
            .rev()
            .map(|(key, node)| (0, key.as_str(), node))
            .collect();
        Self { stack }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a str, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, key, node) = self.stack.pop()?;
        if let TreeNode::Directory { children, .. } = node {
            self.stack.extend(
                children
                    .iter()
                    .rev()
                    .map(|(key, child)| (depth + 1, key.as_str(), child)),
            );
        }
        Some((depth, key, node))
    }
}

pub fn display_rows(tree: &Tree) -> impl Iterator<Item = DisplayRow<'_>> {
    Walk::new(tree).map(|(depth, key, node)| DisplayRow {
        depth,
        key,
        magnitude: node.magnitude(),
        reviewed: node.reviewed(),
        is_directory: node.is_directory(),
        expanded: node.is_directory() && !node.reviewed(),
    })
}

pub fn export_rows(tree: &Tree) -> impl Iterator<Item = ExportRow<'_>> {
    Walk::new(tree).filter_map(|(_, _, node)| match node {
        TreeNode::File {
            magnitude,
            reviewed,
            origin_path,
        } => Some(ExportRow {
            origin_path,
            magnitude: *magnitude,
            reviewed: *reviewed,
        }),
        TreeNode::Directory { .. } => None,
    })
}

/// Reviewed share of the total change magnitude, over file leaves only.
///
/// Sums are kept in `i128`: top-level files are not bounded by any directory
/// total, so their sum may exceed `i64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub reviewed_magnitude: i128,
    pub total_magnitude: i128,
}

impl Progress {
    pub fn of(tree: &Tree) -> Self {
        export_rows(tree).fold(Progress::default(), |mut progress, row| {
            progress.total_magnitude += i128::from(row.magnitude);
            if row.reviewed {
                progress.reviewed_magnitude += i128::from(row.magnitude);
            }
            progress
        })
    }

    pub fn percentage(&self) -> f64 {
        if self.total_magnitude == 0 {
            0.0
        } else {
            self.reviewed_magnitude as f64 / self.total_magnitude as f64 * 100.0
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.percentage())
    }
}
