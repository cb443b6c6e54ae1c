use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Summarize a review's changed files as a compressed directory tree")]
pub struct Cli {
    /// JSON file holding the change records of one review
    pub input: PathBuf,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// The root directory of the project, where reviewtree.yaml is looked up
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// Write the flat CSV export to this file
    #[clap(long, short)]
    pub export: Option<PathBuf>,

    /// Show the contents of fully reviewed directories
    #[clap(long)]
    pub expand_all: bool,
}
