//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::platform::logging::LogDestination;

/// Compare human and machine transcripts side by side and rate each video.
#[derive(Parser, Debug)]
#[command(name = "transcript-review")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Folder or http(s) URL holding manifest.json and the transcript folders
    #[arg(short, long, value_name = "URL|DIR")]
    pub root: Option<String>,

    /// Directory for the persisted ratings snapshot
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Directory downloaded ratings are written to
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// RON config file (default: ./review.ron when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Prefix of the external video link; the identifier is appended
    #[arg(long, value_name = "URL")]
    pub link_base: Option<String>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
