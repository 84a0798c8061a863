//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{AppConfig, CacheConfig, DEFAULT_FEED_URL, FeedConfig, LogLevel, NetworkConfig};
pub use args::CliArgs;
pub use storage::{ConfigError, ConfigStorage};
