//! Data transfer objects for the application layer.

mod feed_dto;
mod retrieval_dto;

pub use feed_dto::{PostPayload, PublicFeedPayload, fields};
pub use retrieval_dto::{PrefetchOutcome, RetrievalSource, Retrieved};
