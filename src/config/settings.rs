use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::ext::BestEffortPathExt;
use crate::pipeline::DuplicatePaths;

const SETTINGS_FILE_NAME: &str = "reviewtree.yaml";

fn get_settings_file_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE_NAME)
}

/// Optional per-project settings read from `reviewtree.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub duplicates: DuplicatePaths,
    /// Export destination, relative to the project root.
    pub export: Option<PathBuf>,
    pub expand_reviewed: bool,
}

impl Settings {
    /// Reads the settings file under `root`. A missing file yields defaults.
    pub async fn read(root: &Path) -> Result<Self, SettingsError> {
        Self::from_path(get_settings_file_path(root)).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, SettingsError> {
        debug!("Opening settings file: {}", path.best_effort_path_display());
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).context(ReadSnafu {
                    file_path: path.best_effort_path_display(),
                });
            }
        };

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }

    fn parse_top_level(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, SettingsError> {
        let mut settings = Settings::default();

        for (key, value) in top_level {
            let Some(key) = key.as_str() else {
                debug!("Skipping non-string settings key: {:?}", key);
                continue;
            };

            match key {
                "duplicates" => {
                    let name = value.as_str().context(InvalidValueSnafu {
                        key,
                        expected: "a string",
                    })?;
                    settings.duplicates = DuplicatePaths::try_from(name)
                        .map_err(|value| SettingsError::UnknownDuplicatePolicy { value })?;
                }
                "export" => {
                    let path = value.as_str().context(InvalidValueSnafu {
                        key,
                        expected: "a path",
                    })?;
                    settings.export = Some(PathBuf::from(path));
                }
                "expand_reviewed" => {
                    settings.expand_reviewed = match value {
                        Yaml::Value(Scalar::Boolean(flag)) => *flag,
                        _ => {
                            return InvalidValueSnafu {
                                key,
                                expected: "a boolean",
                            }
                            .fail();
                        }
                    };
                }
                other => debug!("Ignoring unknown settings key '{}'", other),
            }
        }

        Ok(settings)
    }
}

impl TryFrom<&str> for Settings {
    type Error = SettingsError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents =
            Yaml::load_from_str(contents).map_err(|e| SettingsError::ParseError { source: e })?;

        match documents.first() {
            None => Ok(Settings::default()),
            Some(Yaml::Value(Scalar::Null)) => Ok(Settings::default()),
            Some(document) => {
                let top_level = document
                    .as_mapping()
                    .ok_or(SettingsError::TopLevelNotMap)?;
                Self::parse_top_level(top_level)
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum SettingsError {
    #[snafu(display("Failed to read the settings file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Settings file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the settings file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the settings file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Setting '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: &'static str },
    #[snafu(display(
        "Unknown duplicate path policy '{}', expected 'accumulate' or 'last-wins'",
        value
    ))]
    UnknownDuplicatePolicy { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[compio::test]
    async fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let settings = Settings::read(temp_dir.path()).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[compio::test]
    async fn reads_settings_from_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(
            temp_dir.path().join(SETTINGS_FILE_NAME),
            "duplicates: last-wins\nexport: out/review.csv\nexpand_reviewed: true\n",
        )
        .expect("Failed to write settings");

        let settings = Settings::read(temp_dir.path()).await.unwrap();
        assert_eq!(
            settings,
            Settings {
                duplicates: DuplicatePaths::LastWins,
                export: Some(PathBuf::from("out/review.csv")),
                expand_reviewed: true,
            }
        );
    }

    #[compio::test]
    async fn settings_path_that_is_a_directory_is_a_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::create_dir(temp_dir.path().join(SETTINGS_FILE_NAME))
            .expect("Failed to create directory");

        let result = Settings::read(temp_dir.path()).await;
        assert!(matches!(result, Err(SettingsError::ReadError { .. })));
    }

    #[test]
    fn empty_file_yields_defaults() {
        let result: Result<Settings, _> = "".try_into();
        assert_eq!(result.unwrap(), Settings::default());
    }

    #[test]
    fn null_document_yields_defaults() {
        let result: Result<Settings, _> = "~".try_into();
        assert_eq!(result.unwrap(), Settings::default());
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let result: Result<Settings, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(SettingsError::ParseError { .. })));
    }

    #[test]
    fn list_top_level_is_rejected() {
        let result: Result<Settings, _> = "- item1\n- item2".try_into();
        assert!(matches!(result, Err(SettingsError::TopLevelNotMap)));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result: Result<Settings, _> = "duplicates: sum".try_into();
        assert!(matches!(
            result,
            Err(SettingsError::UnknownDuplicatePolicy { value }) if value == "sum"
        ));
    }

    #[test]
    fn wrong_value_type_is_rejected() {
        let result: Result<Settings, _> = "expand_reviewed: sometimes".try_into();
        assert!(matches!(
            result,
            Err(SettingsError::InvalidValue { key, .. }) if key == "expand_reviewed"
        ));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let result: Result<Settings, _> = "theme: dark\nexport: review.csv".try_into();
        assert_eq!(
            result.unwrap(),
            Settings {
                export: Some(PathBuf::from("review.csv")),
                ..Settings::default()
            }
        );
    }
}
