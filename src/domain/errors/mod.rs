//! Domain error types.

mod decode_error;
mod network_error;

pub use decode_error::DecodeError;
pub use network_error::{NetworkError, TransportError};
