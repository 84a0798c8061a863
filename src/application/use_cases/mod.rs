//! Use case implementations.

mod refresh_feed_use_case;
mod retrieve_resource_use_case;

pub use refresh_feed_use_case::RefreshFeedUseCase;
pub use retrieve_resource_use_case::RetrieveResourceUseCase;
