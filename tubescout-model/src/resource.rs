//! Channel and playlist results. These skip the video enrichment path: a
//! search item is paired with the optional lookup record for its id and
//! turned into a summary with a canonical link.

pub const CHANNEL_URL_PREFIX: &str = "https://www.youtube.com/channel/";
pub const PLAYLIST_URL_PREFIX: &str = "https://www.youtube.com/playlist?list=";

/// Canonical channel page. Empty for an empty id.
pub fn channel_url(id: &str) -> String {
    prefixed(CHANNEL_URL_PREFIX, id)
}

/// Canonical playlist page. Empty for an empty id.
pub fn playlist_url(id: &str) -> String {
    prefixed(PLAYLIST_URL_PREFIX, id)
}

fn prefixed(prefix: &str, id: &str) -> String {
    let id = id.trim();
    if id.is_empty() {
        String::new()
    } else {
        format!("{prefix}{id}")
    }
}

/// A lookup record keyed by the id it was requested with.
pub trait ResourceDetail {
    fn resource_id(&self) -> &str;
}

/// Channel statistics and branding from the channel lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelDetail {
    pub id: String,
    pub subscriber_count: Option<u64>,
    pub video_count: Option<u64>,
    pub view_count: Option<u64>,
    pub keywords: Option<String>,
}

impl ChannelDetail {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

impl ResourceDetail for ChannelDetail {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

/// Item count and visibility from the playlist lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaylistDetail {
    pub id: String,
    pub item_count: Option<u64>,
    pub privacy_status: Option<String>,
}

impl PlaylistDetail {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

impl ResourceDetail for PlaylistDetail {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelSummary {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub published_at: Option<String>,
    pub thumbnail_url: Option<String>,
    pub subscriber_count: Option<u64>,
    pub video_count: Option<u64>,
    pub view_count: Option<u64>,
    pub keywords: Option<String>,
    /// The lookup returned a record for this channel.
    pub detail_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaylistSummary {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: Option<String>,
    pub thumbnail_url: Option<String>,
    pub item_count: Option<u64>,
    pub privacy_status: Option<String>,
    pub detail_available: bool,
}
