use std::collections::BTreeMap;

use derive_more::Display;
use snafu::Snafu;
use tracing::{debug, warn};

use super::{ChangeRecord, Tree, TreeNode};

/// What to do with the directory aggregates when the same path is reported
/// more than once in a batch. The file node always keeps the last record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum DuplicatePaths {
    /// Every occurrence is added to the ancestors' running sums, so their
    /// aggregates count the file once per occurrence.
    #[default]
    #[display("accumulate")]
    Accumulate,
    /// Ancestors only receive the difference to the previous occurrence,
    /// keeping every aggregate equal to the sum of its files.
    #[display("last-wins")]
    LastWins,
}

impl TryFrom<&str> for DuplicatePaths {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "accumulate" => Ok(DuplicatePaths::Accumulate),
            "last-wins" => Ok(DuplicatePaths::LastWins),
            other => Err(other.to_string()),
        }
    }
}

/// A freshly assembled tree and the number of records that could not be
/// placed in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembled {
    pub tree: Tree,
    pub skipped: usize,
}

/// Folds records into a tree keyed by path segment. Every directory carries the
/// running sum of the magnitudes below it; `reviewed` stays unset on
/// directories until propagation.
pub fn assemble(
    records: impl IntoIterator<Item = ChangeRecord>,
    duplicates: DuplicatePaths,
) -> Assembled {
    let mut assembled = Assembled::default();

    for record in records {
        if let Err(reason) = insert_record(&mut assembled.tree, &record, duplicates) {
            warn!("Skipping '{}': {}", record.path(), reason);
            assembled.skipped += 1;
        }
    }

    debug!(
        "Assembled tree with {} top-level entries, skipped {} records",
        assembled.tree.len(),
        assembled.skipped
    );
    assembled
}

/// Inserts one record. Every check runs before the first aggregate is
/// touched, so a skipped record leaves the tree unchanged.
fn insert_record(
    root: &mut BTreeMap<String, TreeNode>,
    record: &ChangeRecord,
    duplicates: DuplicatePaths,
) -> Result<(), SkipReason> {
    let segments = record.segments().collect::<Vec<_>>();
    let Some((file_name, directories)) = segments.split_last() else {
        return Ok(());
    };

    let increment = match existing_file_magnitude(root, &segments)? {
        Some(previous) => {
            warn!(
                "Path '{}' reported more than once, handling as {}",
                record.path(),
                duplicates
            );
            match duplicates {
                DuplicatePaths::Accumulate => record.magnitude(),
                DuplicatePaths::LastWins => record
                    .magnitude()
                    .checked_sub(previous)
                    .ok_or(SkipReason::Overflow)?,
            }
        }
        None => record.magnitude(),
    };
    ensure_ancestors_fit(root, directories, increment)?;

    let mut children = root;
    for segment in directories {
        children = match children
            .entry(segment.to_string())
            .or_insert_with(TreeNode::empty_directory)
        {
            TreeNode::Directory {
                magnitude,
                children,
                ..
            } => {
                *magnitude += increment;
                children
            }
            TreeNode::File { .. } => unreachable!("paths through files are rejected up front"),
        };
    }

    children.insert(
        file_name.to_string(),
        TreeNode::file(record.path(), record.magnitude(), record.reviewed()),
    );
    Ok(())
}

/// Walks the tree without touching it, returning the magnitude of the file
/// already stored at `segments`, if any.
fn existing_file_magnitude(
    root: &BTreeMap<String, TreeNode>,
    segments: &[&str],
) -> Result<Option<i64>, SkipReason> {
    let mut children = root;

    for (depth, segment) in segments.iter().enumerate() {
        let is_last = depth + 1 == segments.len();
        match (children.get(*segment), is_last) {
            (None, _) => return Ok(None),
            (Some(TreeNode::File { magnitude, .. }), true) => return Ok(Some(*magnitude)),
            (Some(TreeNode::Directory { .. }), true) => {
                return Err(SkipReason::DirectoryAsFile);
            }
            (Some(TreeNode::File { .. }), false) => {
                return Err(SkipReason::FileAsDirectory {
                    prefix: segments[..=depth].join("/"),
                });
            }
            (Some(TreeNode::Directory { children: next, .. }), false) => children = next,
        }
    }

    Ok(None)
}

/// Checks that adding `increment` to every existing directory along
/// `directories` stays within `i64`. Directories not created yet start at 0.
fn ensure_ancestors_fit(
    root: &BTreeMap<String, TreeNode>,
    directories: &[&str],
    increment: i64,
) -> Result<(), SkipReason> {
    let mut children = root;

    for segment in directories {
        match children.get(*segment) {
            Some(TreeNode::Directory {
                magnitude,
                children: next,
                ..
            }) => {
                magnitude
                    .checked_add(increment)
                    .ok_or(SkipReason::Overflow)?;
                children = next;
            }
            _ => return Ok(()),
        }
    }

    Ok(())
}

#[derive(Debug, Snafu)]
enum SkipReason {
    #[snafu(display("'{}' is already a file", prefix))]
    FileAsDirectory { prefix: String },
    #[snafu(display("the path is already a directory"))]
    DirectoryAsFile,
    #[snafu(display("its magnitude would overflow a directory total"))]
    Overflow,
}
