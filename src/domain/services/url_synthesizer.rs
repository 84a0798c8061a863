//! Derives URLs of other image sizes from the `small` image URL.
//!
//! The CDN names files `<id>_<secret>_<code>.jpg`, except the medium size,
//! which has no `_<code>` suffix at all.

use std::ops::Range;

use url::Url;

use crate::domain::entities::ImageVariant;

const EXTENSION: &str = ".jpg";
const SUFFIX_LEN: usize = 2;

/// Returns true if the URL has the shape [`derive`] expects of a small
/// image URL.
#[must_use]
pub fn accepts(small: &Url) -> bool {
    suffix_range(small.as_str()).is_some()
}

/// Returns the URL of `target` given the URL of the small variant.
///
/// The small URL must end its file stem in `_m` right before `.jpg`
/// (see [`accepts`]). The codec checks this before calling, so a violation
/// is a programming error: it trips a debug assertion, and release builds
/// return the input unchanged.
#[must_use]
pub fn derive(target: ImageVariant, small: &Url) -> Url {
    if target == ImageVariant::Small {
        return small.clone();
    }

    let source = small.as_str();
    let range = suffix_range(source);

    debug_assert!(
        range.is_some(),
        "small image URL must carry the _{} suffix before {EXTENSION}: {source}",
        ImageVariant::Small.code()
    );
    let Some(range) = range else {
        return small.clone();
    };

    let replacement = match target {
        ImageVariant::Medium => String::new(),
        other => format!("_{}", other.code()),
    };

    let derived = format!(
        "{}{replacement}{}",
        &source[..range.start],
        &source[range.end..]
    );
    Url::parse(&derived).unwrap_or_else(|_| small.clone())
}

/// Byte range of the two-character size suffix before the extension.
fn suffix_range(source: &str) -> Option<Range<usize>> {
    let ext_at = source.find(EXTENSION)?;
    let start = ext_at.checked_sub(SUFFIX_LEN)?;
    let suffix = source.get(start..ext_at)?;

    let mut chars = suffix.chars();
    let is_small = chars.next() == Some('_') && chars.next() == Some(ImageVariant::Small.code());
    is_small.then_some(start..ext_at)
}
