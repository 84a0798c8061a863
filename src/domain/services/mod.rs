//! Pure domain services.

pub mod description_parser;
pub mod image_signature;
pub mod retrieval_policy;
pub mod url_synthesizer;

pub use retrieval_policy::{RetrievalDecision, decide};
