use std::path::PathBuf;

use clap::Parser;

use super::app_config::LogLevel;
use crate::domain::entities::{ImageVariant, SortOrder};

/// Command-line arguments. Every value overrides the config file.
#[derive(Debug, Parser)]
#[command(
    name = "photofeed",
    version,
    about = "Fetches and prints the public photo feed",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", env = "PHOTOFEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", env = "PHOTOFEED_LOG_PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Space-delimited tag filter.
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Feed ordering.
    #[arg(short, long, value_enum)]
    pub sort: Option<SortOrder>,

    /// Base feed URL.
    #[arg(long, value_name = "URL", env = "PHOTOFEED_URL")]
    pub feed_url: Option<String>,

    /// Treat the network as unavailable.
    #[arg(long)]
    pub offline: bool,

    /// Keep downloaded images in memory only.
    #[arg(long)]
    pub no_disk_cache: bool,

    /// Download one image variant (code or name) of every post.
    #[arg(long, value_name = "VARIANT")]
    pub prefetch: Option<ImageVariant>,

    /// Maximum concurrent image downloads.
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}
