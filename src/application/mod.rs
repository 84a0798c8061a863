//! Application layer with codecs, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Wire codecs.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{PrefetchOutcome, RetrievalSource, Retrieved};
pub use services::{FeedCodec, PostCodec};
pub use use_cases::{RefreshFeedUseCase, RetrieveResourceUseCase};
