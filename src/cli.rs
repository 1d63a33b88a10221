//! Command-line flags.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "estante", version, about = "Terminal book finder")]
pub struct Cli {
    /// Base URL of the book API (overrides the config file).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path to an alternate config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}
