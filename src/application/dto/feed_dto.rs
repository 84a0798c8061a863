//! Wire representation of the public feed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field names used by the feed service.
pub mod fields {
    #![allow(missing_docs)]
    pub const ITEMS: &str = "items";
    pub const LINK: &str = "link";
    pub const MEDIA: &str = "media";
    pub const DATE_TAKEN: &str = "date_taken";
    pub const PUBLISHED: &str = "published";
    pub const AUTHOR: &str = "author";
    pub const TAGS: &str = "tags";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
}

/// One post as emitted on the wire.
///
/// Media keys are one-character variant codes. Dates are RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PostPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub link: String,
    pub media: BTreeMap<String, String>,
    pub date_taken: String,
    pub description: String,
    pub published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub tags: String,
}

/// Feed envelope. Only `items` is meaningful to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PublicFeedPayload {
    /// Posts in feed order.
    pub items: Vec<PostPayload>,
}
