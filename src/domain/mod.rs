//! Domain layer with core feed entities, pure services and port definitions.

/// Connectivity status definitions.
pub mod connection;
/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Pure domain services.
pub mod services;

pub use connection::ConnectivityStatus;
pub use entities::{ImageVariant, Post, PostId, PreviewSize, SortOrder};
pub use errors::{DecodeError, NetworkError};
pub use ports::{ByteStorePort, ConnectivityPort, TransportPort};
