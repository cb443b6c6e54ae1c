use tracing::{debug, warn};

use super::{ChangeRecord, RawEntry};

/// Records that survived validation, plus how many entries were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub records: Vec<ChangeRecord>,
    pub rejected: usize,
}

/// Validates raw entries one by one. A malformed entry is logged and skipped;
/// it never aborts the batch.
pub fn normalize(entries: impl IntoIterator<Item = RawEntry>) -> Normalized {
    let normalized = entries.into_iter().fold(
        Normalized::default(),
        |mut normalized, entry| {
            match ChangeRecord::try_from(entry) {
                Ok(record) => normalized.records.push(record),
                Err(reason) => {
                    warn!("Dropping change record: {}", reason);
                    normalized.rejected += 1;
                }
            }
            normalized
        },
    );

    debug!(
        "Normalized {} records, rejected {}",
        normalized.records.len(),
        normalized.rejected
    );
    normalized
}
