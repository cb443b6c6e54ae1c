use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::application::RuntimeConfig;
use crate::config::settings::{Settings, SettingsError};
use crate::export::{self, ExportError};
use crate::pipeline::{self, Snapshot};
use crate::render::TerminalRenderer;
use crate::source::{JsonFileSource, SourceError};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let settings = Settings::read(&app_config.root)
            .await
            .context(SettingsSnafu)?;
        debug!("Loaded settings: {:?}", settings);

        let app_config = app_config.with_settings(settings);
        debug!("Resolved runtime config: {:?}", app_config);

        let source = JsonFileSource::new(&app_config.input);
        let snapshot = pipeline::load(&source, &app_config.pipeline_options())
            .await
            .context(SourceSnafu)?;
        if let Snapshot::Ready(tree) = &snapshot {
            info!(
                "Built review tree, {} entries left out, {} reviewed",
                tree.dropped(),
                tree.progress()
            );
        }

        print!("{}", TerminalRenderer::new(app_config.expand_all).render(&snapshot));

        if let Some(export_path) = &app_config.export {
            match &snapshot {
                Snapshot::Ready(tree) if !tree.is_empty() => {
                    let rows = export::write_csv(tree, export_path)
                        .await
                        .context(ExportSnafu)?;
                    info!("Export finished with {} rows", rows);
                }
                _ => warn!("Nothing to export, skipping CSV export"),
            }
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while reading settings"))]
    SettingsError { source: SettingsError },
    #[snafu(display("Critical failure encountered while fetching change records"))]
    SourceError { source: SourceError },
    #[snafu(display("Critical failure encountered during export"))]
    ExportError { source: ExportError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    use crate::pipeline::DuplicatePaths;

    fn config(root: &Path, input: &str, export: Option<PathBuf>) -> RuntimeConfig {
        RuntimeConfig {
            input: root.join(input),
            root: root.to_path_buf(),
            export,
            expand_all: false,
            duplicates: DuplicatePaths::default(),
        }
    }

    #[compio::test]
    async fn run_writes_export_configured_in_settings() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(
            temp_dir.path().join("review.json"),
            r#"[{"path": "a/x.txt", "magnitude": 5, "reviewed": true},
                {"path": "a/y.txt", "magnitude": "3", "reviewed": false}]"#,
        )
        .expect("Failed to write input");
        std::fs::write(temp_dir.path().join("reviewtree.yaml"), "export: review.csv")
            .expect("Failed to write settings");

        Application::run(config(temp_dir.path(), "review.json", None))
            .await
            .unwrap();

        let written = std::fs::read_to_string(temp_dir.path().join("review.csv"))
            .expect("Failed to read export");
        assert_eq!(
            written,
            "\u{feff}FilePath,Magnitude,Reviewed\r\na/x.txt,5,true\r\na/y.txt,3,false\r\n"
        );
    }

    #[compio::test]
    async fn run_skips_export_without_data() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(temp_dir.path().join("review.json"), "[]").expect("Failed to write input");
        let export_path = temp_dir.path().join("review.csv");

        Application::run(config(temp_dir.path(), "review.json", Some(export_path.clone())))
            .await
            .unwrap();

        assert!(!export_path.exists());
    }

    #[compio::test]
    async fn run_fails_on_missing_input() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = Application::run(config(temp_dir.path(), "missing.json", None)).await;
        assert!(matches!(result, Err(ApplicationError::SourceError { .. })));
    }

    #[compio::test]
    async fn run_fails_on_broken_settings() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(temp_dir.path().join("review.json"), "[]").expect("Failed to write input");
        std::fs::write(temp_dir.path().join("reviewtree.yaml"), "- not\n- a map")
            .expect("Failed to write settings");

        let result = Application::run(config(temp_dir.path(), "review.json", None)).await;
        assert!(matches!(result, Err(ApplicationError::SettingsError { .. })));
    }
}
