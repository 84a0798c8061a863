//! Resource retrieval error types.

use thiserror::Error;

/// Failure surfaced to callers of a retrieval.
///
/// Never retried by the retrieval policy itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum NetworkError {
    /// Nothing usable came back from the network.
    #[error("server not available")]
    NoConnection,
    /// The server answered, but not with something that can be used.
    #[error("invalid response")]
    InvalidResponse,
}

impl NetworkError {
    /// Short user-facing title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::NoConnection => "Server Not Available",
            Self::InvalidResponse => "Invalid Response",
        }
    }

    /// User-facing explanation.
    #[must_use]
    pub const fn failure_reason(self) -> &'static str {
        match self {
            Self::NoConnection => "Please check your Internet connection.",
            Self::InvalidResponse => "Server returned data in an unsupported format.",
        }
    }

    /// Returns whether retrying later might succeed.
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        matches!(self, Self::NoConnection)
    }
}

/// Errors reported by the transport collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum TransportError {
    #[error("host unreachable: {message}")]
    Unreachable { message: String },

    #[error("server responded with HTTP {status}")]
    Status { status: u16 },
}

impl TransportError {
    /// Creates unreachable error.
    #[must_use]
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }
}

impl From<TransportError> for NetworkError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Unreachable { .. } => Self::NoConnection,
            TransportError::Status { .. } => Self::InvalidResponse,
        }
    }
}
