use std::path::PathBuf;

use compio::fs;
use serde_json::Value;
use snafu::ResultExt;
use tracing::{debug, warn};

use super::record_source::{NotAnArraySnafu, ParseSnafu, ReadSnafu};
use super::{RecordSource, SourceError};
use crate::ext::BestEffortPathExt;
use crate::pipeline::RawEntry;

/// Reads a batch captured to disk: a JSON array of
/// `{ "path", "magnitude", "reviewed" }` objects. A `null` document stands for
/// "no response".
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(&self, bytes: &[u8]) -> Result<Option<Vec<RawEntry>>, SourceError> {
        let document: Value = serde_json::from_slice(bytes).context(ParseSnafu {
            path: self.path.clone(),
        })?;

        let items = match document {
            Value::Null => return Ok(None),
            Value::Array(items) => items,
            _ => {
                return NotAnArraySnafu {
                    path: self.path.clone(),
                }
                .fail();
            }
        };

        let entries = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<RawEntry>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping entry #{} of unexpected shape: {}", index, e);
                    None
                }
            })
            .collect::<Vec<_>>();

        Ok(Some(entries))
    }
}

impl RecordSource for JsonFileSource {
    async fn fetch(&self) -> Result<Option<Vec<RawEntry>>, SourceError> {
        debug!(
            "Reading change records from {}",
            self.path.best_effort_path_display()
        );
        let bytes = fs::read(&self.path).await.context(ReadSnafu {
            path: self.path.clone(),
        })?;
        debug!("Read {} bytes of change records", bytes.len());

        self.parse(&bytes)
    }
}
