//! Feed refresh and image prefetch.

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, info, trace, warn};
use url::Url;

use super::RetrieveResourceUseCase;
use crate::application::dto::PrefetchOutcome;
use crate::application::services::FeedCodec;
use crate::domain::entities::{ImageVariant, Post, SortOrder};
use crate::domain::errors::NetworkError;

/// Query parameter carrying the tag filter.
const TAGS_PARAM: &str = "tags";

/// Downloads, decodes and orders the public feed.
#[derive(Clone)]
pub struct RefreshFeedUseCase {
    retrieve: RetrieveResourceUseCase,
    feed_url: Url,
}

impl RefreshFeedUseCase {
    /// Creates new refresh use case for a base feed URL.
    #[must_use]
    pub const fn new(retrieve: RetrieveResourceUseCase, feed_url: Url) -> Self {
        Self { retrieve, feed_url }
    }

    /// Builds the request URL for a tag filter.
    ///
    /// Blank filters leave the base URL unchanged.
    #[must_use]
    pub fn request_url(&self, tags: &str) -> Url {
        let mut url = self.feed_url.clone();
        let tags = tags.trim();
        if !tags.is_empty() {
            url.query_pairs_mut().append_pair(TAGS_PARAM, tags);
        }
        url
    }

    /// Retrieves the feed for a tag filter and sorts it.
    ///
    /// # Errors
    /// Returns [`NetworkError::NoConnection`] if the feed could not be
    /// reached, or [`NetworkError::InvalidResponse`] if it was refused or
    /// did not decode.
    pub async fn execute(&self, tags: &str, order: SortOrder) -> Result<Vec<Post>, NetworkError> {
        let url = self.request_url(tags);
        debug!(url = %url, order = %order, "Refreshing feed");

        let retrieved = self.retrieve.execute(&url).await?;

        let mut posts = FeedCodec::decode_feed(&retrieved.bytes).map_err(|e| {
            warn!(url = %url, error = %e, "Feed did not decode");
            NetworkError::InvalidResponse
        })?;
        order.sort(&mut posts);

        info!(count = posts.len(), source = %retrieved.source, "Feed refreshed");
        Ok(posts)
    }

    /// Retrieves one image variant of every post, at most `limit` at a time.
    ///
    /// Posts without the variant are skipped. Outcomes arrive in completion
    /// order, not feed order.
    pub async fn prefetch(
        &self,
        posts: &[Post],
        variant: ImageVariant,
        limit: usize,
    ) -> Vec<PrefetchOutcome> {
        let requests: Vec<_> = posts
            .iter()
            .filter_map(|post| match post.image_url(variant) {
                Some(url) => Some((post.id(), url.clone())),
                None => {
                    trace!(post = %post.id(), variant = %variant, "Post has no such variant");
                    None
                }
            })
            .collect();

        debug!(count = requests.len(), variant = %variant, limit, "Prefetching images");

        let outcomes: Vec<_> = stream::iter(requests)
            .map(|(post, url)| async move {
                let result = self.retrieve.execute(&url).await.map(|r| r.source);
                PrefetchOutcome { post, url, result }
            })
            .buffer_unordered(limit.max(1))
            .collect()
            .await;

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        if failed > 0 {
            warn!(failed, total = outcomes.len(), "Some images could not be prefetched");
        }
        outcomes
    }
}
