use chrono::{DateTime, Utc};

use crate::filter::{
    ContentType, SafeSearch, SearchOrder, VideoDefinition, VideoDuration,
};
use crate::ids::VideoId;

/// One lightweight item returned by the coarse search call.
///
/// `id` is optional because the platform occasionally returns items whose
/// identifier block is missing or points at a different resource kind; the
/// normalizer rejects those per item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResultItem {
    pub id: Option<VideoId>,
    /// Channel or playlist id when the item is not a video.
    pub resource_id: Option<String>,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category_id: Option<String>,
}

impl SearchResultItem {
    pub fn with_id(id: VideoId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

/// Parameters forwarded verbatim to a single search call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchQuery {
    pub query: String,
    pub content_type: ContentType,
    pub max_results: u32,
    pub order: SearchOrder,
    pub safe_search: SafeSearch,
    pub duration: Option<VideoDuration>,
    pub definition: Option<VideoDefinition>,
    pub category_id: Option<String>,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    pub region: Option<String>,
    pub language: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            content_type: ContentType::Video,
            max_results: 10,
            order: SearchOrder::default(),
            safe_search: SafeSearch::default(),
            duration: None,
            definition: None,
            category_id: None,
            published_after: None,
            published_before: None,
            region: None,
            language: None,
        }
    }
}
