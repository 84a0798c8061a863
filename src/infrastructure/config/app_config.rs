//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use super::args::CliArgs;
use super::storage::ConfigError;
use crate::domain::entities::{ImageVariant, SortOrder};
use crate::infrastructure::cache::{DEFAULT_MAX_DISK_BYTES, DEFAULT_MEMORY_ENTRIES};

pub(super) const APP_NAME: &str = "photofeed";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "photofeed";

/// Public feed endpoint, asking for plain JSON without a JSONP wrapper.
pub const DEFAULT_FEED_URL: &str =
    "https://api.flickr.com/services/feeds/photos_public.gne?format=json&nojsoncallback=1";

/// Verbosity used when `RUST_LOG` is not set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.directive())
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path. Logs go to stderr when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Feed source and ordering.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Transport and connectivity settings.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Byte store settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Treat the network as unavailable for this run.
    #[serde(skip)]
    pub offline: bool,

    /// Image variant to download for every post after the refresh.
    #[serde(skip)]
    pub prefetch: Option<ImageVariant>,
}

/// Feed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base feed URL. The tag filter is appended as a query parameter.
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Space-delimited tag filter. Empty means no filter.
    #[serde(default)]
    pub tags: String,

    /// Ordering applied to decoded posts.
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl FeedConfig {
    /// Parses the configured base URL.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidFeedUrl`] if the URL does not parse.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.url).map_err(|source| ConfigError::InvalidFeedUrl {
            url: self.url.clone(),
            source,
        })
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            tags: String::new(),
            sort_order: SortOrder::default(),
        }
    }
}

/// Network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// `host:port` probed to detect connectivity. Probing is off when empty.
    #[serde(default = "default_probe_host")]
    pub probe_host: String,

    /// Seconds between connectivity probes.
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,

    /// Upper bound on concurrent image downloads.
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,
}

impl NetworkConfig {
    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Probe interval, never shorter than one second.
    #[must_use]
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            probe_host: default_probe_host(),
            probe_interval_secs: default_probe_interval_secs(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
        }
    }
}

/// Byte store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entries kept in the in-memory LRU.
    #[serde(default = "default_memory_entries")]
    pub memory_entries: usize,

    /// Size bound of the disk store in bytes.
    #[serde(default = "default_disk_max_bytes")]
    pub disk_max_bytes: u64,

    /// Disk store directory. Defaults to the platform cache directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Persist images across runs.
    #[serde(default = "default_true")]
    pub disk_enabled: bool,
}

impl CacheConfig {
    /// Returns the effective disk store directory.
    #[must_use]
    pub fn effective_dir(&self) -> Option<PathBuf> {
        self.dir.clone().or_else(|| {
            ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
                .map(|dirs| dirs.cache_dir().join("images"))
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_entries: default_memory_entries(),
            disk_max_bytes: default_disk_max_bytes(),
            dir: None,
            disk_enabled: true,
        }
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

fn default_probe_host() -> String {
    "api.flickr.com:443".to_string()
}

fn default_probe_interval_secs() -> u64 {
    15
}

fn default_max_concurrent_downloads() -> usize {
    4
}

fn default_memory_entries() -> usize {
    DEFAULT_MEMORY_ENTRIES
}

fn default_disk_max_bytes() -> u64 {
    DEFAULT_MAX_DISK_BYTES
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(tags) = args.tags {
            self.feed.tags = tags;
        }
        if let Some(sort_order) = args.sort {
            self.feed.sort_order = sort_order;
        }
        if let Some(url) = args.feed_url {
            self.feed.url = url;
        }
        if let Some(limit) = args.limit {
            self.network.max_concurrent_downloads = limit;
        }
        if args.no_disk_cache {
            self.cache.disk_enabled = false;
        }
        self.offline |= args.offline;
        if args.prefetch.is_some() {
            self.prefetch = args.prefetch;
        }
    }

    /// Returns the configured log file, if any.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            feed: FeedConfig::default(),
            network: NetworkConfig::default(),
            cache: CacheConfig::default(),
            offline: false,
            prefetch: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [feed]
            tags = "bird warbler"
            sort_order = "taken"

            [cache]
            memory_entries = 32
            disk_enabled = false
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.feed.tags, "bird warbler");
        assert_eq!(config.feed.sort_order, SortOrder::CreationDate);
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.cache.memory_entries, 32);
        assert!(!config.cache.disk_enabled);
        assert_eq!(config.network, NetworkConfig::default());
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.feed.tags, "");
        assert_eq!(config.feed.sort_order, SortOrder::PublishingDate);
        assert_eq!(config.network.timeout(), Duration::from_secs(30));
        assert!(config.cache.disk_enabled);
        assert!(!config.offline);
        assert!(config.effective_log_path().is_none());
        assert!(config.feed.base_url().is_ok());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let content = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let parsed: AppConfig = toml::from_str(&content).unwrap();

        assert_eq!(parsed.feed, FeedConfig::default());
        assert_eq!(parsed.network, NetworkConfig::default());
        assert_eq!(parsed.cache, CacheConfig::default());
    }

    #[test]
    fn test_invalid_feed_url() {
        let feed = FeedConfig {
            url: "not a url".to_string(),
            ..FeedConfig::default()
        };
        assert!(matches!(
            feed.base_url(),
            Err(ConfigError::InvalidFeedUrl { .. })
        ));
    }

    #[test]
    fn test_merge_with_args() {
        let args = CliArgs::parse_from([
            "photofeed",
            "--tags",
            "cat",
            "--sort",
            "taken",
            "--offline",
            "--no-disk-cache",
            "--prefetch",
            "b",
            "--limit",
            "8",
        ]);
        let mut config = AppConfig::default();
        config.merge_with_args(args);

        assert_eq!(config.feed.tags, "cat");
        assert_eq!(config.feed.sort_order, SortOrder::CreationDate);
        assert!(config.offline);
        assert!(!config.cache.disk_enabled);
        assert_eq!(config.prefetch, Some(ImageVariant::Large));
        assert_eq!(config.network.max_concurrent_downloads, 8);
    }

    #[test]
    fn test_merge_without_args_keeps_file_values() {
        let mut config = AppConfig::default();
        config.feed.tags = "from-file".to_string();
        config.merge_with_args(CliArgs::parse_from(["photofeed"]));

        assert_eq!(config.feed.tags, "from-file");
        assert!(config.cache.disk_enabled);
        assert_eq!(config.prefetch, None);
    }
}
