//! Preview dimensions embedded in a post's HTML description.
//!
//! The feed describes each post with an HTML fragment whose `<img>` tag
//! carries `width="…"` and `height="…"` attributes. The server sometimes
//! double-escapes the quotes and sometimes omits the attributes entirely.

use thiserror::Error;
use tracing::trace;

use crate::domain::entities::PreviewSize;

/// Which dimension to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// The `width` attribute.
    Width,
    /// The `height` attribute.
    Height,
}

impl Dimension {
    const fn marker(self) -> &'static str {
        match self {
            Self::Width => "width=\"",
            Self::Height => "height=\"",
        }
    }
}

/// Reasons a dimension could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The attribute marker does not occur in the description.
    #[error("attribute marker not found")]
    MarkerNotFound,
    /// The input ended before the closing quote.
    #[error("attribute value is not terminated")]
    Unterminated,
    /// The attribute value is empty.
    #[error("attribute value is empty")]
    Empty,
    /// The attribute value is not an unsigned integer.
    #[error("attribute value is not a number")]
    InvalidNumber,
}

/// Extracts one dimension from a description.
///
/// Backslashes are stripped first, then the characters between the first
/// marker and the next `"` are parsed as an integer.
///
/// # Errors
/// Returns a [`ParseError`] if the marker is missing, the value is never
/// terminated, or the value is not a number.
pub fn parse_dimension(description: &str, which: Dimension) -> Result<u32, ParseError> {
    let normalized = description.replace('\\', "");
    let marker = which.marker();

    let start = normalized
        .find(marker)
        .ok_or(ParseError::MarkerNotFound)?
        + marker.len();

    let mut value = String::new();
    for ch in normalized[start..].chars() {
        if ch == '"' {
            if value.is_empty() {
                return Err(ParseError::Empty);
            }
            return value.parse().map_err(|_| ParseError::InvalidNumber);
        }
        value.push(ch);
    }

    Err(ParseError::Unterminated)
}

/// Reads the preview size, falling back to [`PreviewSize::DEFAULT`] for
/// each dimension that cannot be parsed.
#[must_use]
pub fn preview_size(description: &str) -> PreviewSize {
    let read = |which: Dimension, fallback: u32| {
        parse_dimension(description, which).unwrap_or_else(|e| {
            trace!(dimension = ?which, error = %e, "Using default preview dimension");
            fallback
        })
    };

    PreviewSize::new(
        read(Dimension::Width, PreviewSize::DEFAULT.width),
        read(Dimension::Height, PreviewSize::DEFAULT.height),
    )
}
