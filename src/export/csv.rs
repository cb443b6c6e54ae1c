use std::borrow::Cow;
use std::path::{Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;
use crate::pipeline::{ExportRow, ReviewTree};

/// Spreadsheet tools only detect UTF-8 reliably with a byte-order mark.
const BYTE_ORDER_MARK: &str = "\u{feff}";
const HEADER: [&str; 3] = ["FilePath", "Magnitude", "Reviewed"];
const LINE_END: &str = "\r\n";

/// Renders export rows as comma-separated text: byte-order mark, header row,
/// then one row per file in the order given.
pub fn render_csv<'a>(rows: impl IntoIterator<Item = ExportRow<'a>>) -> String {
    let mut out = String::from(BYTE_ORDER_MARK);
    push_line(&mut out, HEADER.map(Cow::Borrowed));

    for row in rows {
        push_line(
            &mut out,
            [
                escape_field(row.origin_path),
                Cow::Owned(row.magnitude.to_string()),
                Cow::Borrowed(if row.reviewed { "true" } else { "false" }),
            ],
        );
    }

    out
}

fn push_line(out: &mut String, fields: [Cow<'_, str>; 3]) {
    out.push_str(&fields.join(","));
    out.push_str(LINE_END);
}

/// Quotes a field when it holds a separator, a quote or a line break.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Writes the export of `tree` to `path`, returning the number of rows.
pub async fn write_csv(tree: &ReviewTree, path: &Path) -> Result<usize, ExportError> {
    let rows = tree.export_rows().count();
    let contents = render_csv(tree.export_rows());
    debug!("Rendered {} export rows, {} bytes", rows, contents.len());

    fs::write(path, contents.into_bytes())
        .await
        .0
        .context(WriteSnafu {
            path: path.to_path_buf(),
        })?;
    info!(
        "Exported {} rows to {}",
        rows,
        path.best_effort_path_display()
    );

    Ok(rows)
}

#[derive(Debug, Snafu)]
pub enum ExportError {
    #[snafu(display("Failed to write export to {}", path.best_effort_path_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}
