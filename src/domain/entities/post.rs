//! Feed post entity.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use url::Url;

use super::ImageVariant;
use crate::domain::services::description_parser;

/// Identity of a post, derived from its link.
///
/// Only used in memory for equality and list diffing. The value depends on
/// the hash function and is never written to the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(u64);

impl PostId {
    /// Derives an id from a post link.
    #[must_use]
    pub fn from_link(link: &Url) -> Self {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(link.as_str().as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(prefix))
    }

    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Pixel dimensions of the preview image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PreviewSize {
    /// Size the feed uses for previews when the description does not say.
    pub const DEFAULT: Self = Self::new(240, 180);

    /// Creates a new size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for PreviewSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for PreviewSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single photo post from the public feed.
///
/// Posts compare equal when their ids match, regardless of any other field.
#[derive(Debug, Clone)]
pub struct Post {
    id: PostId,
    media: BTreeMap<ImageVariant, Url>,
    link: Url,
    taken_date: DateTime<Utc>,
    published_date: DateTime<Utc>,
    author: Option<String>,
    tags: String,
    title: Option<String>,
    description: String,
    preview_size: PreviewSize,
}

#[allow(missing_docs)]
impl Post {
    /// Assembles a post, deriving its id and preview size.
    ///
    /// Media completeness is the caller's responsibility.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub(crate) fn new(
        media: BTreeMap<ImageVariant, Url>,
        link: Url,
        taken_date: DateTime<Utc>,
        published_date: DateTime<Utc>,
        author: Option<String>,
        tags: String,
        title: Option<String>,
        description: String,
    ) -> Self {
        Self {
            id: PostId::from_link(&link),
            preview_size: description_parser::preview_size(&description),
            media,
            link,
            taken_date,
            published_date,
            author,
            tags,
            title,
            description,
        }
    }

    #[must_use]
    pub const fn id(&self) -> PostId {
        self.id
    }

    #[must_use]
    pub const fn media(&self) -> &BTreeMap<ImageVariant, Url> {
        &self.media
    }

    /// Returns the URL of a specific image variant, if known.
    #[must_use]
    pub fn image_url(&self, variant: ImageVariant) -> Option<&Url> {
        self.media.get(&variant)
    }

    #[must_use]
    pub const fn link(&self) -> &Url {
        &self.link
    }

    #[must_use]
    pub const fn taken_date(&self) -> DateTime<Utc> {
        self.taken_date
    }

    #[must_use]
    pub const fn published_date(&self) -> DateTime<Utc> {
        self.published_date
    }

    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    #[must_use]
    pub fn tags(&self) -> &str {
        &self.tags
    }

    /// Iterates over the individual tags.
    pub fn tag_list(&self) -> impl Iterator<Item = &str> {
        self.tags.split_whitespace()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Raw description, kept only so the post can be re-encoded.
    #[must_use]
    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn preview_size(&self) -> PreviewSize {
        self.preview_size
    }
}

impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Post {}

impl Hash for Post {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
impl Post {
    /// Fixed post for tests.
    pub(crate) fn fixture() -> Self {
        let parse = |s: &str| Url::parse(s).unwrap();
        let date = DateTime::parse_from_rfc3339("2021-11-28T19:19:23Z")
            .unwrap()
            .with_timezone(&Utc);

        let media = BTreeMap::from([
            (
                ImageVariant::Small,
                parse("https://live.staticflickr.com/65535/51710825195_27169cc8db_m.jpg"),
            ),
            (
                ImageVariant::Large,
                parse("https://live.staticflickr.com/65535/51710825195_27169cc8db_b.jpg"),
            ),
        ]);

        Self::new(
            media,
            parse("https://www.flickr.com/photos/124592429@N08/51710825195/"),
            date,
            date,
            Some("nobody@flickr.com".to_string()),
            "random nothing empty blank test mock".to_string(),
            Some("Some test image".to_string()),
            String::new(),
        )
    }
}
