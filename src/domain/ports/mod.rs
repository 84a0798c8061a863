mod byte_store_port;
mod connectivity_port;
mod transport_port;

pub use byte_store_port::{ByteStorePort, CachedResource};
pub use connectivity_port::ConnectivityPort;
pub use transport_port::TransportPort;

#[cfg(test)]
pub use transport_port::MockTransportPort;

#[cfg(test)]
pub mod mocks {
    pub use super::byte_store_port::mock::RecordingByteStore;
    pub use super::connectivity_port::mock::FixedConnectivity;
    pub use super::transport_port::mock::ScriptedTransport;
}
