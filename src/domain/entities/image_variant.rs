//! Public image size classes and their wire codes.

use std::str::FromStr;

/// Image size class served by the photo CDN without an API key.
///
/// Declaration order is the ordering used for map keys, so encoded media
/// objects are emitted smallest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImageVariant {
    /// 75x75 square crop.
    Squared,
    /// 150x150 square crop.
    SquaredLarge,
    /// 100 px on the longest side.
    Thumbnail,
    /// 240 px on the longest side. The only variant the feed reliably sends.
    Small,
    /// 640 px on the longest side. Its URL carries no size suffix.
    Medium,
    /// 1024 px on the longest side.
    Large,
}

impl ImageVariant {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Squared,
        Self::SquaredLarge,
        Self::Thumbnail,
        Self::Small,
        Self::Medium,
        Self::Large,
    ];

    /// Variants every decoded post is guaranteed to carry.
    pub const REQUIRED: [Self; 3] = [Self::Small, Self::SquaredLarge, Self::Large];

    /// Returns the one-character wire code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Squared => 's',
            Self::SquaredLarge => 'q',
            Self::Thumbnail => 't',
            Self::Small => 'm',
            Self::Medium => 'z',
            Self::Large => 'b',
        }
    }

    /// Looks up a variant by its wire code.
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            's' => Some(Self::Squared),
            'q' => Some(Self::SquaredLarge),
            't' => Some(Self::Thumbnail),
            'm' => Some(Self::Small),
            'z' => Some(Self::Medium),
            'b' => Some(Self::Large),
            _ => None,
        }
    }

    /// Wire code as an owned map key.
    #[must_use]
    pub fn wire_key(self) -> String {
        self.code().to_string()
    }

    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Squared => "squared",
            Self::SquaredLarge => "squaredLarge",
            Self::Thumbnail => "thumbnail",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl std::fmt::Display for ImageVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImageVariant {
    type Err = String;

    /// Accepts either the variant name (case-insensitive) or its wire code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(code), None) = (chars.next(), chars.next())
            && let Some(variant) = Self::from_code(code)
        {
            return Ok(variant);
        }

        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown image variant: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ImageVariant::Squared, 's' ; "squared")]
    #[test_case(ImageVariant::SquaredLarge, 'q' ; "squared_large")]
    #[test_case(ImageVariant::Thumbnail, 't' ; "thumbnail")]
    #[test_case(ImageVariant::Small, 'm' ; "small")]
    #[test_case(ImageVariant::Medium, 'z' ; "medium")]
    #[test_case(ImageVariant::Large, 'b' ; "large")]
    fn test_code_table(variant: ImageVariant, code: char) {
        assert_eq!(variant.code(), code);
        assert_eq!(ImageVariant::from_code(code), Some(variant));
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(ImageVariant::from_code('x'), None);
        assert_eq!(ImageVariant::from_code('M'), None);
    }

    #[test]
    fn test_parse_name_or_code() {
        assert_eq!("large".parse::<ImageVariant>(), Ok(ImageVariant::Large));
        assert_eq!(
            "SquaredLarge".parse::<ImageVariant>(),
            Ok(ImageVariant::SquaredLarge)
        );
        assert_eq!("z".parse::<ImageVariant>(), Ok(ImageVariant::Medium));
        assert!("huge".parse::<ImageVariant>().is_err());
    }

    #[test]
    fn test_ordering_follows_declaration() {
        let mut sorted = ImageVariant::ALL;
        sorted.reverse();
        sorted.sort();
        assert_eq!(sorted, ImageVariant::ALL);
    }
}
