use std::path::PathBuf;

use snafu::Snafu;

use crate::ext::BestEffortPathExt;
use crate::pipeline::RawEntry;

// Sources are polled on compio's thread-per-core runtime; no `Send` bound.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    /// Requests one complete batch. `Ok(None)` means the source had nothing to
    /// answer with.
    async fn fetch(&self) -> Result<Option<Vec<RawEntry>>, SourceError>;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum SourceError {
    #[snafu(display("Failed to read change records from {}", path.best_effort_path_display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse change records from {}", path.best_effort_path_display()))]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[snafu(display("Change records in {} should be a JSON array", path.best_effort_path_display()))]
    NotAnArray { path: PathBuf },
    #[snafu(display("The record source is no longer accepting requests"))]
    Disconnected,
    #[snafu(display("The record source dropped the request without answering"))]
    CanceledError {
        source: futures_channel::oneshot::Canceled,
    },
}
