//! Turns a flat batch of change records into a compressed, aggregated review
//! tree.
//!
//! Stages run strictly in order and are pure functions of their input:
//! normalize → assemble → compress → propagate reviewed state → project.

mod assembler;
mod compressor;
mod normalizer;
mod projector;
mod propagator;
mod record;
mod tree;

pub use assembler::{Assembled, DuplicatePaths, assemble};
pub use compressor::compress;
pub use normalizer::{Normalized, normalize};
pub use projector::{DisplayRow, ExportRow, Progress, display_rows, export_rows};
pub use propagator::propagate_reviewed;
pub use record::{ChangeRecord, RawEntry, RawMagnitude, RejectedEntry};
pub use tree::{Tree, TreeNode};

use tracing::{info, warn};

use crate::source::{RecordSource, SourceError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub duplicates: DuplicatePaths,
}

/// The final, read-only tree of one review snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTree {
    tree: Tree,
    dropped: usize,
}

impl ReviewTree {
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Number of input entries left out of the tree: malformed ones and
    /// ones that could not be placed in it.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn display_rows(&self) -> impl Iterator<Item = DisplayRow<'_>> {
        display_rows(&self.tree)
    }

    pub fn export_rows(&self) -> impl Iterator<Item = ExportRow<'_>> {
        export_rows(&self.tree)
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.tree)
    }
}

/// Outcome of one pipeline run. `NoData` means the source delivered nothing
/// at all, which is distinct from a batch whose entries were all rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    NoData,
    Ready(ReviewTree),
}

/// Runs every stage on one complete batch.
pub fn build(entries: Option<Vec<RawEntry>>, options: &PipelineOptions) -> Snapshot {
    let entries = match entries {
        Some(entries) if !entries.is_empty() => entries,
        _ => {
            info!("No change records available");
            return Snapshot::NoData;
        }
    };

    let Normalized { records, rejected } = normalize(entries);
    if rejected > 0 {
        warn!("{} malformed change records were dropped", rejected);
    }

    let Assembled { tree, skipped } = assemble(records, options.duplicates);
    let tree = compress(tree);
    let tree = propagate_reviewed(tree);

    Snapshot::Ready(ReviewTree {
        tree,
        dropped: rejected + skipped,
    })
}

/// Requests one batch from `source` and runs the pipeline on it.
pub async fn load(
    source: &impl RecordSource,
    options: &PipelineOptions,
) -> Result<Snapshot, SourceError> {
    let entries = source.fetch().await?;
    Ok(build(entries, options))
}
