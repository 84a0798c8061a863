//! Feed decoding error types.

use thiserror::Error;

/// Failure to turn a wire record into a typed post or feed.
///
/// Always fatal to the post (and therefore the feed) being decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum DecodeError {
    #[error("missing or malformed field `{field}`")]
    MissingField { field: String },

    #[error("field `{field}` is not an ISO-8601 date: {value:?}")]
    MalformedDate { field: String, value: String },

    #[error("unknown image variant code {key:?}")]
    UnknownImageVariant { key: String },

    #[error("media key {key:?} is not a single-character variant code")]
    MalformedMediaKey { key: String },

    #[error("field `{field}` is not an absolute URL: {value:?}")]
    InvalidUrl { field: String, value: String },

    #[error("payload is not valid JSON: {message}")]
    InvalidJson { message: String },
}

impl DecodeError {
    /// Creates missing field error.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates malformed date error.
    #[must_use]
    pub fn malformed_date(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedDate {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates invalid URL error.
    #[must_use]
    pub fn invalid_url(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidUrl {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates invalid JSON error.
    #[must_use]
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::InvalidJson {
            message: message.into(),
        }
    }

    /// Returns whether the error points at schema drift in the media map.
    #[must_use]
    pub const fn is_media_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownImageVariant { .. } | Self::MalformedMediaKey { .. }
        )
    }
}
