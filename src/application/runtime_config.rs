use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::settings::Settings;
use crate::pipeline::{DuplicatePaths, PipelineOptions};

/// Everything one run needs, merged from the command line and the settings
/// file. Command-line flags win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub input: PathBuf,
    pub root: PathBuf,
    pub export: Option<PathBuf>,
    pub expand_all: bool,
    pub duplicates: DuplicatePaths,
}

impl RuntimeConfig {
    pub fn with_settings(mut self, settings: Settings) -> Self {
        if self.export.is_none() {
            self.export = settings.export.map(|export| self.root.join(export));
        }
        self.expand_all |= settings.expand_reviewed;
        self.duplicates = settings.duplicates;
        self
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            duplicates: self.duplicates,
        }
    }
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            root: cli.root,
            export: cli.export,
            expand_all: cli.expand_all,
            duplicates: DuplicatePaths::default(),
        }
    }
}
