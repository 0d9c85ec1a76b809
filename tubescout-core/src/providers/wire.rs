//! JSON shapes of the YouTube Data API v3 responses we consume, and their
//! conversion into model types. Every field is optional on the wire.

use serde::Deserialize;
use tracing::debug;
use tubescout_model::{
    ChannelDetail, DetailRecord, PlaylistDetail, SearchResultItem, VideoId,
};

use crate::error::ProviderError;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItemWire>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchItemWire {
    #[serde(default)]
    pub id: Option<ResourceIdWire>,
    #[serde(default)]
    pub snippet: Option<SnippetWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ResourceIdWire {
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
    pub playlist_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SnippetWire {
    pub title: Option<String>,
    pub description: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<String>,
    pub thumbnails: Option<ThumbnailsWire>,
    pub category_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ThumbnailsWire {
    pub default: Option<ThumbnailWire>,
    pub medium: Option<ThumbnailWire>,
    pub high: Option<ThumbnailWire>,
}

impl ThumbnailsWire {
    /// Medium is what list views render; fall back to whatever exists.
    fn preferred_url(self) -> Option<String> {
        [self.medium, self.high, self.default]
            .into_iter()
            .flatten()
            .find_map(|thumb| thumb.url.filter(|u| !u.is_empty()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ThumbnailWire {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct VideoWire {
    pub id: Option<String>,
    pub snippet: Option<SnippetWire>,
    pub content_details: Option<ContentDetailsWire>,
    pub statistics: Option<StatisticsWire>,
    pub status: Option<StatusWire>,
    pub topic_details: Option<TopicDetailsWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ContentDetailsWire {
    pub duration: Option<String>,
}

/// Counters arrive as decimal strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct StatisticsWire {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct StatusWire {
    pub made_for_kids: Option<bool>,
    pub privacy_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct TopicDetailsWire {
    pub relevant_topic_ids: Vec<String>,
    pub topic_categories: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ChannelWire {
    pub id: Option<String>,
    pub statistics: Option<ChannelStatisticsWire>,
    pub branding_settings: Option<BrandingSettingsWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ChannelStatisticsWire {
    pub subscriber_count: Option<String>,
    pub video_count: Option<String>,
    pub view_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BrandingSettingsWire {
    pub channel: Option<BrandingChannelWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BrandingChannelWire {
    pub keywords: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PlaylistListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistWire>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PlaylistWire {
    pub id: Option<String>,
    pub content_details: Option<PlaylistContentDetailsWire>,
    pub status: Option<StatusWire>,
}

/// Unlike video counters, `itemCount` is a JSON number.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PlaylistContentDetailsWire {
    pub item_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorDetail {
    pub reason: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_count(raw: Option<String>) -> Option<u64> {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
}

impl From<SearchItemWire> for SearchResultItem {
    fn from(wire: SearchItemWire) -> Self {
        let resource = wire.id.unwrap_or_default();
        let id = resource.video_id.and_then(|raw| VideoId::parse(&raw));
        let resource_id = non_empty(resource.playlist_id).or(non_empty(resource.channel_id));
        let snippet = wire.snippet.unwrap_or_default();

        SearchResultItem {
            id,
            resource_id,
            title: snippet.title.unwrap_or_default(),
            description: snippet.description.unwrap_or_default(),
            channel_id: snippet.channel_id.unwrap_or_default(),
            channel_title: snippet.channel_title.unwrap_or_default(),
            published_at: non_empty(snippet.published_at),
            thumbnail_url: snippet.thumbnails.and_then(ThumbnailsWire::preferred_url),
            category_id: non_empty(snippet.category_id),
        }
    }
}

impl VideoWire {
    /// `None` when the platform returned an entry without an id.
    pub(crate) fn into_detail(self) -> Option<DetailRecord> {
        let Some(id) = self.id.as_deref().and_then(VideoId::parse) else {
            debug!("dropping detail entry without id");
            return None;
        };

        let snippet = self.snippet.unwrap_or_default();
        let statistics = self.statistics.unwrap_or_default();
        let status = self.status.unwrap_or_default();
        let topics = self.topic_details.unwrap_or_default();

        Some(DetailRecord {
            id,
            category_id: non_empty(snippet.category_id),
            topic_ids: topics.relevant_topic_ids,
            topic_categories: topics.topic_categories,
            made_for_kids: status.made_for_kids,
            view_count: parse_count(statistics.view_count),
            like_count: parse_count(statistics.like_count),
            comment_count: parse_count(statistics.comment_count),
            duration: non_empty(self.content_details.and_then(|c| c.duration)),
            privacy_status: non_empty(status.privacy_status),
            published_at: non_empty(snippet.published_at),
        })
    }
}

impl ChannelWire {
    pub(crate) fn into_detail(self) -> Option<ChannelDetail> {
        let Some(id) = non_empty(self.id) else {
            debug!("dropping channel entry without id");
            return None;
        };
        let statistics = self.statistics.unwrap_or_default();
        let keywords = self
            .branding_settings
            .and_then(|branding| branding.channel)
            .and_then(|channel| non_empty(channel.keywords));

        Some(ChannelDetail {
            id,
            subscriber_count: parse_count(statistics.subscriber_count),
            video_count: parse_count(statistics.video_count),
            view_count: parse_count(statistics.view_count),
            keywords,
        })
    }
}

impl PlaylistWire {
    pub(crate) fn into_detail(self) -> Option<PlaylistDetail> {
        let Some(id) = non_empty(self.id) else {
            debug!("dropping playlist entry without id");
            return None;
        };

        Some(PlaylistDetail {
            id,
            item_count: self.content_details.and_then(|c| c.item_count),
            privacy_status: non_empty(self.status.and_then(|s| s.privacy_status)),
        })
    }
}

/// Map a non-success response onto the failure taxonomy.
pub(crate) fn classify_error(status: u16, body: &str) -> ProviderError {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let reasons: Vec<String> = envelope
        .error
        .errors
        .into_iter()
        .filter_map(|detail| detail.reason)
        .collect();
    let message = envelope
        .error
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| body.chars().take(200).collect());
    let has_reason = |wanted: &[&str]| {
        reasons.iter().any(|reason| wanted.contains(&reason.as_str()))
    };

    if has_reason(&["quotaExceeded", "dailyLimitExceeded"]) {
        ProviderError::QuotaExceeded(message)
    } else if status == 429
        || has_reason(&["rateLimitExceeded", "userRateLimitExceeded"])
    {
        ProviderError::RateLimited
    } else if status == 401 || has_reason(&["keyInvalid", "keyExpired"]) {
        ProviderError::InvalidApiKey
    } else if status == 403 {
        ProviderError::Forbidden(message)
    } else if status >= 500 {
        ProviderError::ServerError { status, message }
    } else {
        ProviderError::ApiError { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_item_maps_snippet_and_video_id() {
        let raw = r#"{
            "kind": "youtube#searchResult",
            "id": { "kind": "youtube#video", "videoId": "dQw4w9WgXcQ" },
            "snippet": {
                "publishedAt": "2009-10-25T06:57:33Z",
                "channelId": "UCuAXFkgsw1L7xaCfnd5JJOw",
                "title": "Never Gonna Give You Up",
                "description": "The official video",
                "thumbnails": {
                    "default": { "url": "https://i.ytimg.com/vi/x/default.jpg" },
                    "medium": { "url": "https://i.ytimg.com/vi/x/mqdefault.jpg" }
                },
                "channelTitle": "Rick Astley"
            }
        }"#;
        let wire: SearchItemWire = serde_json::from_str(raw).unwrap();
        let item = SearchResultItem::from(wire);

        assert_eq!(item.id.as_ref().map(VideoId::as_str), Some("dQw4w9WgXcQ"));
        assert_eq!(item.title, "Never Gonna Give You Up");
        assert_eq!(item.channel_title, "Rick Astley");
        assert_eq!(
            item.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/x/mqdefault.jpg")
        );
        assert_eq!(item.category_id, None);
    }

    #[test]
    fn channel_result_has_no_video_id() {
        let raw = r#"{
            "id": { "kind": "youtube#channel", "channelId": "UC123" },
            "snippet": { "title": "Some channel" }
        }"#;
        let wire: SearchItemWire = serde_json::from_str(raw).unwrap();
        let item = SearchResultItem::from(wire);
        assert!(item.id.is_none());
        assert_eq!(item.resource_id.as_deref(), Some("UC123"));
    }

    #[test]
    fn playlist_result_carries_playlist_id() {
        let raw = r#"{
            "id": { "kind": "youtube#playlist", "playlistId": "PL42" },
            "snippet": { "title": "Mix", "channelId": "UC9", "channelTitle": "Someone" }
        }"#;
        let wire: SearchItemWire = serde_json::from_str(raw).unwrap();
        let item = SearchResultItem::from(wire);
        assert!(item.id.is_none());
        assert_eq!(item.resource_id.as_deref(), Some("PL42"));
        assert_eq!(item.channel_id, "UC9");
    }

    #[test]
    fn channel_maps_statistics_and_keywords() {
        let raw = r#"{
            "id": "UC123",
            "statistics": { "subscriberCount": "3900000", "videoCount": "112", "viewCount": "not a number" },
            "brandingSettings": { "channel": { "keywords": "music \"rick astley\"" } }
        }"#;
        let wire: ChannelWire = serde_json::from_str(raw).unwrap();
        let detail = wire.into_detail().unwrap();
        assert_eq!(detail.id, "UC123");
        assert_eq!(detail.subscriber_count, Some(3_900_000));
        assert_eq!(detail.video_count, Some(112));
        assert_eq!(detail.view_count, None);
        assert_eq!(detail.keywords.as_deref(), Some("music \"rick astley\""));
    }

    #[test]
    fn playlist_maps_item_count_and_privacy() {
        let raw = r#"{
            "id": "PL42",
            "contentDetails": { "itemCount": 27 },
            "status": { "privacyStatus": "public" }
        }"#;
        let wire: PlaylistWire = serde_json::from_str(raw).unwrap();
        let detail = wire.into_detail().unwrap();
        assert_eq!(detail.item_count, Some(27));
        assert_eq!(detail.privacy_status.as_deref(), Some("public"));

        let bare: PlaylistWire = serde_json::from_str(r#"{ "id": " " }"#).unwrap();
        assert!(bare.into_detail().is_none());
    }

    #[test]
    fn video_maps_counters_topics_and_status() {
        let raw = r#"{
            "id": "abc",
            "snippet": { "categoryId": "10" },
            "contentDetails": { "duration": "PT4M13S" },
            "statistics": { "viewCount": "1500", "likeCount": "20" },
            "status": { "privacyStatus": "public", "madeForKids": true },
            "topicDetails": {
                "relevantTopicIds": ["/m/04rlf", "/m/064t9"],
                "topicCategories": ["https://en.wikipedia.org/wiki/Pop_music"]
            }
        }"#;
        let wire: VideoWire = serde_json::from_str(raw).unwrap();
        let detail = wire.into_detail().unwrap();

        assert_eq!(detail.id.as_str(), "abc");
        assert_eq!(detail.category_id.as_deref(), Some("10"));
        assert_eq!(detail.topic_ids, vec!["/m/04rlf", "/m/064t9"]);
        assert_eq!(detail.topic_categories.len(), 1);
        assert_eq!(detail.made_for_kids, Some(true));
        assert_eq!(detail.view_count, Some(1500));
        assert_eq!(detail.like_count, Some(20));
        assert_eq!(detail.comment_count, None);
        assert_eq!(detail.duration.as_deref(), Some("PT4M13S"));
    }

    #[test]
    fn sparse_video_keeps_counters_absent() {
        let raw = r#"{ "id": "xyz", "statistics": { "viewCount": "n/a" } }"#;
        let wire: VideoWire = serde_json::from_str(raw).unwrap();
        let detail = wire.into_detail().unwrap();

        assert_eq!(detail.view_count, None);
        assert_eq!(detail.made_for_kids, None);
        assert!(detail.topic_ids.is_empty());
        assert!(detail.topic_categories.is_empty());
    }

    #[test]
    fn video_without_id_is_dropped() {
        let wire: VideoWire = serde_json::from_str(r#"{ "id": "" }"#).unwrap();
        assert!(wire.into_detail().is_none());
    }

    #[test]
    fn quota_reason_wins_over_status() {
        let body = r#"{"error":{"code":403,"message":"The request cannot be completed because you have exceeded your quota.","errors":[{"reason":"quotaExceeded"}]}}"#;
        assert!(matches!(
            classify_error(403, body),
            ProviderError::QuotaExceeded(_)
        ));
    }

    #[test]
    fn invalid_key_is_detected_from_reason() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","errors":[{"reason":"keyInvalid"}]}}"#;
        assert_eq!(classify_error(400, body), ProviderError::InvalidApiKey);
    }

    #[test]
    fn server_errors_are_transient() {
        let err = classify_error(503, "backend unavailable");
        assert!(err.is_transient());
        assert!(matches!(err, ProviderError::ServerError { status: 503, .. }));
    }

    #[test]
    fn other_client_errors_are_permanent() {
        let body = r#"{"error":{"code":400,"message":"Invalid value for videoCategoryId"}}"#;
        assert_eq!(
            classify_error(400, body),
            ProviderError::ApiError {
                status: 400,
                message: "Invalid value for videoCategoryId".into()
            }
        );
    }
}
