use colored::Colorize;
use supports_color::Stream;

use crate::pipeline::{DisplayRow, Progress, ReviewTree, Snapshot};

const INDENT: &str = "  ";
const EMPTY_STATE: &str = "No difference found.";

/// Draws the display view of a snapshot as indented plain text.
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    color: bool,
    expand_all: bool,
}

impl TerminalRenderer {
    pub fn new(expand_all: bool) -> Self {
        Self {
            color: supports_color::on(Stream::Stdout).is_some(),
            expand_all,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn render(&self, snapshot: &Snapshot) -> String {
        match snapshot {
            Snapshot::NoData => format!("{EMPTY_STATE}\n"),
            Snapshot::Ready(tree) if tree.is_empty() => format!("{EMPTY_STATE}\n"),
            Snapshot::Ready(tree) => self.render_tree(tree),
        }
    }

    fn render_tree(&self, tree: &ReviewTree) -> String {
        let mut out = String::new();
        // Depth of the collapsed directory whose descendants are being hidden
        let mut collapsed_at: Option<usize> = None;

        for row in tree.display_rows() {
            match collapsed_at {
                Some(depth) if row.depth > depth => continue,
                _ => collapsed_at = None,
            }
            if row.is_directory && !row.expanded && !self.expand_all {
                collapsed_at = Some(row.depth);
            }

            out.push_str(&self.render_row(&row, collapsed_at.is_some()));
            out.push('\n');
        }

        out.push('\n');
        out.push_str(&self.render_progress(&tree.progress()));
        out.push('\n');
        if tree.dropped() > 0 {
            out.push_str(&format!(
                "Left out {} entries that could not be read or placed\n",
                tree.dropped()
            ));
        }
        out
    }

    fn render_row(&self, row: &DisplayRow<'_>, collapsed: bool) -> String {
        let label = if row.is_directory {
            let marker = if collapsed { '▸' } else { '▾' };
            format!("{marker} {}/ ({})", row.key, format_thousands(row.magnitude))
        } else {
            format!("{} ({})", row.key, format_thousands(row.magnitude))
        };
        let label = if self.color && row.reviewed {
            label.green().to_string()
        } else {
            label
        };

        format!("{}{}", INDENT.repeat(row.depth), label)
    }

    fn render_progress(&self, progress: &Progress) -> String {
        format!(
            "Reviewed {} of {} ({})",
            format_thousands(progress.reviewed_magnitude),
            format_thousands(progress.total_magnitude),
            progress
        )
    }
}

/// Formats an integer with comma thousands separators (`-1,234,567`).
fn format_thousands(value: impl Into<i128>) -> String {
    let value = value.into();
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineOptions, RawEntry, build};
    use rstest::*;

    fn snapshot() -> Snapshot {
        build(
            Some(vec![
                RawEntry::new("src/app/mod.rs", 1200i64, true),
                RawEntry::new("src/app/view.rs", 34i64, true),
                RawEntry::new("src/main.rs", 5i64, false),
                RawEntry::new("Cargo.toml", 1i64, false),
            ]),
            &PipelineOptions::default(),
        )
    }

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(1234567, "1,234,567")]
    #[case(-4321, "-4,321")]
    #[case(i64::MIN, "-9,223,372,036,854,775,808")]
    fn thousands_separators(#[case] value: i64, #[case] expected: &str) {
        assert_eq!(format_thousands(value), expected);
    }

    #[test]
    fn thousands_separators_beyond_i64() {
        assert_eq!(
            format_thousands(i128::from(i64::MAX) + 1),
            "9,223,372,036,854,775,808"
        );
    }

    #[test]
    fn reviewed_directories_are_collapsed() {
        let rendered = TerminalRenderer::new(false)
            .with_color(false)
            .render(&snapshot());

        assert_eq!(
            rendered,
            "Cargo.toml (1)\n\
             ▾ src/ (1,239)\n\
             \x20\x20▸ app/ (1,234)\n\
             \x20\x20main.rs (5)\n\
             \n\
             Reviewed 1,234 of 1,240 (99.52%)\n"
        );
    }

    #[test]
    fn expand_all_shows_reviewed_children() {
        let rendered = TerminalRenderer::new(true)
            .with_color(false)
            .render(&snapshot());

        assert!(rendered.contains("  ▾ app/ (1,234)\n    mod.rs (1,200)\n    view.rs (34)\n"));
    }

    #[test]
    fn dropped_entries_are_reported() {
        let snapshot = build(
            Some(vec![
                RawEntry::new("a/x.txt", 3i64, false),
                RawEntry::new("logo.png", "BIN", false),
            ]),
            &PipelineOptions::default(),
        );
        let rendered = TerminalRenderer::new(false).with_color(false).render(&snapshot);

        assert!(rendered.ends_with(
            "Reviewed 0 of 3 (0.00%)\n\
             Left out 1 entries that could not be read or placed\n"
        ));
    }

    #[test]
    fn no_data_shows_empty_state() {
        let rendered = TerminalRenderer::new(false)
            .with_color(false)
            .render(&Snapshot::NoData);
        assert_eq!(rendered, "No difference found.\n");
    }

    #[test]
    fn fully_rejected_batch_shows_empty_state() {
        let snapshot = build(
            Some(vec![RawEntry::new("", 1i64, false)]),
            &PipelineOptions::default(),
        );
        let rendered = TerminalRenderer::new(false).with_color(false).render(&snapshot);
        assert_eq!(rendered, "No difference found.\n");
    }
}
