//! Codecs between the wire format and domain entities.

mod feed_codec;
mod post_codec;

pub use feed_codec::FeedCodec;
#[cfg(test)]
pub(crate) use feed_codec::FIXTURE;
pub use post_codec::PostCodec;
