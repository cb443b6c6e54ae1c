use serde::Deserialize;
use snafu::Snafu;

/// One entry as delivered by a record source, before any validation.
///
/// Field names follow the scraper output as well (`filePath`, `diff`), so a
/// batch captured straight from a pull request page deserializes unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEntry {
    #[serde(default, alias = "filePath")]
    pub path: Option<String>,
    #[serde(default, alias = "diff")]
    pub magnitude: Option<RawMagnitude>,
    #[serde(default)]
    pub reviewed: bool,
}

impl RawEntry {
    pub fn new(path: impl Into<String>, magnitude: impl Into<RawMagnitude>, reviewed: bool) -> Self {
        Self {
            path: Some(path.into()),
            magnitude: Some(magnitude.into()),
            reviewed,
        }
    }
}

/// A magnitude as scraped: either a JSON number or the text shown on the page
/// (`"1,234"`, `"BIN"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawMagnitude {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for RawMagnitude {
    fn from(value: i64) -> Self {
        RawMagnitude::Integer(value)
    }
}

impl From<&str> for RawMagnitude {
    fn from(text: &str) -> Self {
        RawMagnitude::Text(text.to_string())
    }
}

impl From<String> for RawMagnitude {
    fn from(text: String) -> Self {
        RawMagnitude::Text(text)
    }
}

impl RawMagnitude {
    pub fn parse(&self) -> Option<i64> {
        match self {
            RawMagnitude::Integer(value) => Some(*value),
            // i64::MAX as f64 rounds up to 2^63, hence the exclusive bound
            RawMagnitude::Float(value)
                if value.fract() == 0.0
                    && *value >= i64::MIN as f64
                    && *value < i64::MAX as f64 =>
            {
                Some(*value as i64)
            }
            RawMagnitude::Float(_) => None,
            RawMagnitude::Text(text) => text
                .trim()
                .chars()
                .filter(|c| *c != ',')
                .collect::<String>()
                .parse::<i64>()
                .ok(),
        }
    }
}

/// A validated change record: a file path made of non-empty segments, the
/// size of its change, and whether it has been reviewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    path: String,
    magnitude: i64,
    reviewed: bool,
}

impl ChangeRecord {
    pub fn new(
        path: impl Into<String>,
        magnitude: i64,
        reviewed: bool,
    ) -> Result<Self, RejectedEntry> {
        let path = path.into();
        if path.is_empty() {
            return Err(RejectedEntry::MissingPath);
        }
        if path.split('/').any(str::is_empty) {
            return Err(RejectedEntry::EmptySegment { path });
        }

        Ok(Self {
            path,
            magnitude,
            reviewed,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn magnitude(&self) -> i64 {
        self.magnitude
    }

    pub fn reviewed(&self) -> bool {
        self.reviewed
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/')
    }
}

impl TryFrom<RawEntry> for ChangeRecord {
    type Error = RejectedEntry;

    fn try_from(entry: RawEntry) -> Result<Self, Self::Error> {
        let path = entry
            .path
            .filter(|path| !path.is_empty())
            .ok_or(RejectedEntry::MissingPath)?;

        let magnitude = match entry.magnitude {
            None => return Err(RejectedEntry::MissingMagnitude { path }),
            Some(raw) => match raw.parse() {
                Some(magnitude) => magnitude,
                None => {
                    return Err(RejectedEntry::UnparsableMagnitude {
                        path,
                        value: raw.to_string(),
                    });
                }
            },
        };

        Self::new(path, magnitude, entry.reviewed)
    }
}

impl std::fmt::Display for RawMagnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawMagnitude::Integer(value) => write!(f, "{value}"),
            RawMagnitude::Float(value) => write!(f, "{value}"),
            RawMagnitude::Text(text) => write!(f, "{text:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum RejectedEntry {
    #[snafu(display("Entry has no path"))]
    MissingPath,
    #[snafu(display("Path '{}' contains an empty segment", path))]
    EmptySegment { path: String },
    #[snafu(display("Entry '{}' has no magnitude", path))]
    MissingMagnitude { path: String },
    #[snafu(display("Magnitude {} of '{}' is not an integer", value, path))]
    UnparsableMagnitude { path: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(RawMagnitude::Integer(42), Some(42))]
    #[case(RawMagnitude::Integer(-7), Some(-7))]
    #[case(RawMagnitude::Float(12.0), Some(12))]
    #[case(RawMagnitude::Float(1.5), None)]
    #[case(RawMagnitude::Float(f64::NAN), None)]
    #[case(RawMagnitude::Float(1e19), None)]
    #[case("1,234".into(), Some(1234))]
    #[case(" 17 ".into(), Some(17))]
    #[case("-3".into(), Some(-3))]
    #[case("+3".into(), Some(3))]
    #[case("0".into(), Some(0))]
    #[case("BIN".into(), None)]
    #[case("".into(), None)]
    #[case("12abc".into(), None)]
    fn magnitude_parsing(#[case] raw: RawMagnitude, #[case] expected: Option<i64>) {
        assert_eq!(raw.parse(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("/a")]
    #[case("a/")]
    #[case("a//b")]
    fn record_rejects_malformed_paths(#[case] path: &str) {
        assert!(ChangeRecord::new(path, 1, false).is_err());
    }

    #[test]
    fn record_from_entry_keeps_fields() {
        let record = ChangeRecord::try_from(RawEntry::new("src/lib.rs", "2,048", true)).unwrap();
        assert_eq!(record.path(), "src/lib.rs");
        assert_eq!(record.magnitude(), 2048);
        assert!(record.reviewed());
        assert_eq!(record.segments().collect::<Vec<_>>(), vec!["src", "lib.rs"]);
    }

    #[test]
    fn record_from_entry_without_magnitude_is_rejected() {
        let entry = RawEntry {
            path: Some("a.txt".into()),
            magnitude: None,
            reviewed: false,
        };
        assert_eq!(
            ChangeRecord::try_from(entry),
            Err(RejectedEntry::MissingMagnitude {
                path: "a.txt".into()
            })
        );
    }

    #[test]
    fn record_from_entry_with_binary_marker_is_rejected() {
        let result = ChangeRecord::try_from(RawEntry::new("logo.png", "BIN", false));
        assert!(matches!(
            result,
            Err(RejectedEntry::UnparsableMagnitude { .. })
        ));
    }

    #[test]
    fn raw_entry_accepts_scraper_field_names() {
        let entry: RawEntry =
            serde_json::from_str(r#"{"filePath": "a/b.rs", "diff": "12"}"#).unwrap();
        assert_eq!(entry, RawEntry::new("a/b.rs", "12", false));
    }

    #[test]
    fn raw_entry_accepts_numeric_magnitude() {
        let entry: RawEntry =
            serde_json::from_str(r#"{"path": "a/b.rs", "magnitude": 12, "reviewed": true}"#)
                .unwrap();
        assert_eq!(entry, RawEntry::new("a/b.rs", 12i64, true));
    }
}
