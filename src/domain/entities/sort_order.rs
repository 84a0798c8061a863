//! Feed ordering.

use serde::{Deserialize, Serialize};

use super::Post;

/// Ordering applied to a decoded feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest publication first.
    #[default]
    #[serde(rename = "published")]
    #[value(name = "published")]
    PublishingDate,
    /// Oldest capture first.
    #[serde(rename = "taken")]
    #[value(name = "taken")]
    CreationDate,
}

impl SortOrder {
    /// Sorts posts in place. The sort is stable, so posts with equal dates
    /// keep their feed order.
    pub fn sort(self, posts: &mut [Post]) {
        match self {
            Self::PublishingDate => posts.sort_by_key(Post::published_date),
            Self::CreationDate => posts.sort_by_key(Post::taken_date),
        }
    }

    /// Returns a sorted copy of the posts.
    #[must_use]
    pub fn sorted(self, posts: &[Post]) -> Vec<Post> {
        let mut sorted = posts.to_vec();
        self.sort(&mut sorted);
        sorted
    }

    /// Display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::PublishingDate => "Publication Date",
            Self::CreationDate => "Creation Date",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}
