//! Whole-feed decoding and encoding.

use serde_json::Value;
use tracing::{debug, warn};

use super::post_codec::PostCodec;
use crate::application::dto::{PublicFeedPayload, fields};
use crate::domain::entities::Post;
use crate::domain::errors::DecodeError;

/// Stateless codec for the feed envelope.
///
/// Decoding is all-or-nothing: one bad record fails the whole feed.
pub struct FeedCodec;

impl FeedCodec {
    /// Decodes a raw feed body.
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidJson`] if the body is not JSON, or the
    /// first error produced by any record.
    pub fn decode_feed(body: &[u8]) -> Result<Vec<Post>, DecodeError> {
        let envelope: Value =
            serde_json::from_slice(body).map_err(|e| DecodeError::invalid_json(e.to_string()))?;
        Self::decode_envelope(&envelope)
    }

    /// Decodes an already-parsed feed envelope. Keys other than `items`
    /// are ignored.
    ///
    /// # Errors
    /// Returns [`DecodeError::MissingField`] if `items` is absent or not an
    /// array, or the first error produced by any record.
    pub fn decode_envelope(envelope: &Value) -> Result<Vec<Post>, DecodeError> {
        let items = envelope
            .get(fields::ITEMS)
            .and_then(Value::as_array)
            .ok_or_else(|| DecodeError::missing(fields::ITEMS))?;

        let posts = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                PostCodec::decode(item).inspect_err(|e| {
                    warn!(
                        index,
                        error = %e,
                        schema_drift = e.is_media_error(),
                        "Feed item failed to decode"
                    );
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = posts.len(), "Decoded feed");
        Ok(posts)
    }

    /// Encodes posts as a feed body, preserving order.
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidJson`] if serialization fails.
    pub fn encode_feed(posts: &[Post]) -> Result<Vec<u8>, DecodeError> {
        let payload = PublicFeedPayload {
            items: posts.iter().map(PostCodec::encode).collect(),
        };
        serde_json::to_vec(&payload).map_err(|e| DecodeError::invalid_json(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) const FIXTURE: &[u8] = include_bytes!("fixtures/public_feed.json");
