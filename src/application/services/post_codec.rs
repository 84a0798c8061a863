//! Conversion between wire records and [`Post`] entities.
//!
//! The feed's `media` object is keyed by one-character size codes rather
//! than fixed field names, and usually carries only the small image. The
//! decoder maps every key through the variant table and synthesizes the
//! variants every post must have.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::trace;
use url::Url;

use crate::application::dto::{PostPayload, fields};
use crate::domain::entities::{ImageVariant, Post};
use crate::domain::errors::DecodeError;
use crate::domain::services::url_synthesizer;

/// Variants synthesized from the small image when the server omits them.
const SYNTHESIZED: [ImageVariant; 2] = [ImageVariant::SquaredLarge, ImageVariant::Large];

/// Stateless codec for single posts.
pub struct PostCodec;

impl PostCodec {
    /// Decodes one wire record into a post.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] if a required field is missing or
    /// malformed, a date is not RFC 3339, a media key is not a known
    /// variant code, or the small image is missing.
    pub fn decode(wire: &Value) -> Result<Post, DecodeError> {
        let record = wire.as_object().ok_or_else(|| DecodeError::missing("item"))?;

        let link = parse_url(fields::LINK, required_str(record, fields::LINK)?)?;
        let taken_date = required_date(record, fields::DATE_TAKEN)?;
        let published_date = required_date(record, fields::PUBLISHED)?;
        let tags = required_str(record, fields::TAGS)?.to_owned();
        let description = required_str(record, fields::DESCRIPTION)?.to_owned();
        let author = optional_str(record, fields::AUTHOR)?;
        let title = optional_str(record, fields::TITLE)?;

        let mut media = decode_media(record.get(fields::MEDIA))?;
        fill_missing_variants(&mut media)?;

        Ok(Post::new(
            media,
            link,
            taken_date,
            published_date,
            author,
            tags,
            title,
            description,
        ))
    }

    /// Encodes a post back into its wire shape.
    ///
    /// The id and preview size are derived values and are not emitted.
    #[must_use]
    pub fn encode(post: &Post) -> PostPayload {
        PostPayload {
            title: post.title().map(str::to_owned),
            link: post.link().to_string(),
            media: post
                .media()
                .iter()
                .map(|(variant, url)| (variant.wire_key(), url.to_string()))
                .collect(),
            date_taken: format_date(post.taken_date()),
            description: post.description().to_owned(),
            published: format_date(post.published_date()),
            author: post.author().map(str::to_owned),
            tags: post.tags().to_owned(),
        }
    }
}

fn required_str<'a>(record: &'a Map<String, Value>, field: &str) -> Result<&'a str, DecodeError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::missing(field))
}

fn optional_str(record: &Map<String, Value>, field: &str) -> Result<Option<String>, DecodeError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(DecodeError::missing(field)),
    }
}

fn required_date(record: &Map<String, Value>, field: &str) -> Result<DateTime<Utc>, DecodeError> {
    let raw = required_str(record, field)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|_| DecodeError::malformed_date(field, raw))
}

fn format_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_url(field: &str, raw: &str) -> Result<Url, DecodeError> {
    Url::parse(raw).map_err(|_| DecodeError::invalid_url(field, raw))
}

fn media_field(code: &str) -> String {
    format!("{}.{code}", fields::MEDIA)
}

fn variant_for_key(key: &str) -> Result<ImageVariant, DecodeError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(code), None) => {
            ImageVariant::from_code(code).ok_or_else(|| DecodeError::UnknownImageVariant {
                key: key.to_owned(),
            })
        }
        _ => Err(DecodeError::MalformedMediaKey {
            key: key.to_owned(),
        }),
    }
}

fn decode_media(value: Option<&Value>) -> Result<BTreeMap<ImageVariant, Url>, DecodeError> {
    let entries = value
        .and_then(Value::as_object)
        .ok_or_else(|| DecodeError::missing(fields::MEDIA))?;

    let mut media = BTreeMap::new();
    for (key, value) in entries {
        let variant = variant_for_key(key)?;
        let field = media_field(key);
        let raw = value
            .as_str()
            .ok_or_else(|| DecodeError::missing(field.as_str()))?;
        media.insert(variant, parse_url(&field, raw)?);
    }

    Ok(media)
}

fn fill_missing_variants(media: &mut BTreeMap<ImageVariant, Url>) -> Result<(), DecodeError> {
    let small_field = media_field(&ImageVariant::Small.wire_key());
    let small = media
        .get(&ImageVariant::Small)
        .cloned()
        .ok_or_else(|| DecodeError::missing(small_field.as_str()))?;

    let missing: Vec<_> = SYNTHESIZED
        .into_iter()
        .filter(|variant| !media.contains_key(variant))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    if !url_synthesizer::accepts(&small) {
        return Err(DecodeError::invalid_url(small_field, small.as_str()));
    }

    for variant in missing {
        let url = url_synthesizer::derive(variant, &small);
        trace!(variant = %variant, url = %url, "Synthesized missing image variant");
        media.insert(variant, url);
    }

    Ok(())
}
