//! Infrastructure layer with adapters for the feed service, byte stores and
//! the network.

/// Byte store adapters.
pub mod cache;
/// Application configuration.
pub mod config;
/// Connectivity tracking.
pub mod connectivity;
/// HTTP transport.
pub mod http;

pub use cache::{CacheStats, DiskByteStore, MemoryByteStore, TieredByteStore};
pub use config::{AppConfig, CliArgs, ConfigError, ConfigStorage, LogLevel};
pub use connectivity::ConnectivityMonitor;
pub use http::HttpTransport;
