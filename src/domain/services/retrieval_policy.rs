//! Decides between cached bytes and a fresh download.

use crate::domain::connection::ConnectivityStatus;
use crate::domain::ports::CachedResource;

/// Outcome of the retrieval decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalDecision {
    /// Serve the stored bytes.
    ServeCache,
    /// Download, then store.
    Fetch,
}

/// Picks an action from the connectivity status and the cache content.
///
/// Once cached, a payload is served while connected regardless of kind.
/// While disconnected only cached images are served: a cached non-image
/// payload such as the feed JSON must not hide the lost connection, so it
/// is treated as a miss and the fetch is allowed to fail.
#[must_use]
pub fn decide(status: ConnectivityStatus, cached: Option<&CachedResource>) -> RetrievalDecision {
    match (status, cached) {
        (_, None) => RetrievalDecision::Fetch,
        (ConnectivityStatus::Connected, Some(_)) => RetrievalDecision::ServeCache,
        (ConnectivityStatus::Disconnected, Some(entry)) if entry.is_image => {
            RetrievalDecision::ServeCache
        }
        (ConnectivityStatus::Disconnected, Some(_)) => RetrievalDecision::Fetch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use test_case::test_case;

    fn entry(is_image: bool) -> CachedResource {
        CachedResource::new(Bytes::from_static(b"payload"), is_image)
    }

    #[test_case(ConnectivityStatus::Disconnected, Some(false), RetrievalDecision::Fetch ; "offline_non_image_ignored")]
    #[test_case(ConnectivityStatus::Disconnected, Some(true), RetrievalDecision::ServeCache ; "offline_image_served")]
    #[test_case(ConnectivityStatus::Connected, Some(false), RetrievalDecision::ServeCache ; "online_non_image_served")]
    #[test_case(ConnectivityStatus::Connected, Some(true), RetrievalDecision::ServeCache ; "online_image_served")]
    #[test_case(ConnectivityStatus::Connected, None, RetrievalDecision::Fetch ; "online_miss")]
    #[test_case(ConnectivityStatus::Disconnected, None, RetrievalDecision::Fetch ; "offline_miss")]
    fn test_decision_table(
        status: ConnectivityStatus,
        cached_is_image: Option<bool>,
        expected: RetrievalDecision,
    ) {
        let cached = cached_is_image.map(entry);
        assert_eq!(decide(status, cached.as_ref()), expected);
    }
}
