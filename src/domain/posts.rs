//! Listing records and the aggregates derived from them.

pub use postdesk_api_types::{Post, PostStatus};

/// Image shown for posts without an uploaded image.
pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/60/60";

const FALLBACK_FLAG: &str = "\u{1F30D}";
const COUNTRY_FLAGS: &[(&str, &str)] = &[
    ("US", "\u{1F1FA}\u{1F1F8}"),
    ("PK", "\u{1F1F5}\u{1F1F0}"),
    ("IN", "\u{1F1EE}\u{1F1F3}"),
    ("UK", "\u{1F1EC}\u{1F1E7}"),
    ("CA", "\u{1F1E8}\u{1F1E6}"),
];

/// Counts of posts per status, always derived from one full collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostStats {
    pub total: usize,
    pub available: usize,
    pub on_hold: usize,
    pub sold: usize,
    pub other: usize,
}

impl PostStats {
    pub fn from_posts(posts: &[Post]) -> Self {
        posts.iter().fold(Self::default(), |mut acc, post| {
            acc.total += 1;
            match post.status {
                PostStatus::Available => acc.available += 1,
                PostStatus::OnHold => acc.on_hold += 1,
                PostStatus::Sold => acc.sold += 1,
                PostStatus::Other(_) => acc.other += 1,
            }
            acc
        })
    }
}

pub fn country_flag(country: &str) -> &'static str {
    COUNTRY_FLAGS
        .iter()
        .find(|(code, _)| *code == country)
        .map_or(FALLBACK_FLAG, |&(_, flag)| flag)
}

pub fn thumbnail(post: &Post) -> &str {
    post.image_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or(PLACEHOLDER_IMAGE)
}
