use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use tubescout_model::{
    ChannelDetail, DetailRecord, PlaylistDetail, SearchQuery, SearchResultItem, VideoId,
};
use url::Url;

use super::traits::PlatformClient;
use super::wire::{
    ChannelListResponse, PlaylistListResponse, SearchListResponse, VideoListResponse,
    classify_error,
};
use super::{MAX_DETAIL_BATCH_SIZE, MAX_SEARCH_RESULTS};
use crate::error::ProviderError;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

const VIDEO_PARTS: &str = "snippet,contentDetails,statistics,status,topicDetails";
const CHANNEL_PARTS: &str = "snippet,statistics,brandingSettings";
const PLAYLIST_PARTS: &str = "snippet,contentDetails,status";

/// The key travels in this header so it never appears in a request URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct YouTubeClientSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl YouTubeClientSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Debug for YouTubeClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClientSettings")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("has_api_key", &!self.api_key.is_empty())
            .finish()
    }
}

/// [`PlatformClient`] backed by the YouTube Data API v3.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    pub fn new(settings: YouTubeClientSettings) -> Result<Self, ProviderError> {
        let api_key = settings.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "YouTube API key is missing".to_string(),
            ));
        }

        // Url::join drops the last segment unless the base ends with '/'.
        let mut base = settings.base_url.trim().trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base).map_err(|err| {
            ProviderError::NotConfigured(format!(
                "invalid API base URL '{}': {err}",
                settings.base_url
            ))
        })?;

        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("tubescout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ProviderError::NotConfigured(err.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<Url, ProviderError> {
        let mut url = self.base_url.join(path).map_err(|err| {
            ProviderError::NotConfigured(format!("invalid endpoint {path}: {err}"))
        })?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_error(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %err, "platform call failed");
            return Err(err);
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ProviderError::ParseError(err.to_string()))
    }
}

/// Query-string pairs for one search call. Unset options are omitted rather
/// than sent empty.
pub(crate) fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("part", "snippet".to_string()),
        ("q", query.query.clone()),
        ("type", query.content_type.api_name().to_string()),
        (
            "maxResults",
            query.max_results.clamp(1, MAX_SEARCH_RESULTS).to_string(),
        ),
        ("order", query.order.api_name().to_string()),
        ("safeSearch", query.safe_search.api_name().to_string()),
    ];

    if let Some(duration) = query.duration {
        params.push(("videoDuration", duration.api_name().to_string()));
    }
    if let Some(definition) = query.definition {
        params.push(("videoDefinition", definition.api_name().to_string()));
    }
    if let Some(category) = query.category_id.as_deref().map(str::trim)
        && !category.is_empty()
    {
        params.push(("videoCategoryId", category.to_string()));
    }
    if let Some(after) = query.published_after {
        params.push((
            "publishedAfter",
            after.to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
    }
    if let Some(before) = query.published_before {
        params.push((
            "publishedBefore",
            before.to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
    }
    if let Some(region) = query.region.as_deref().map(str::trim)
        && !region.is_empty()
    {
        params.push(("regionCode", region.to_ascii_uppercase()));
    }
    if let Some(language) = query.language.as_deref().map(str::trim)
        && !language.is_empty()
    {
        params.push(("relevanceLanguage", language.to_string()));
    }

    params
}

pub(crate) fn detail_params(ids: &[VideoId]) -> Vec<(&'static str, String)> {
    let joined = ids
        .iter()
        .map(VideoId::as_str)
        .collect::<Vec<_>>()
        .join(",");
    vec![("part", VIDEO_PARTS.to_string()), ("id", joined)]
}

fn lookup_params(parts: &str, ids: &[String]) -> Vec<(&'static str, String)> {
    vec![("part", parts.to_string()), ("id", ids.join(","))]
}

fn check_batch_len(len: usize) -> Result<(), ProviderError> {
    if len > MAX_DETAIL_BATCH_SIZE {
        return Err(ProviderError::ApiError {
            status: 400,
            message: format!(
                "{len} ids requested, platform accepts at most {MAX_DETAIL_BATCH_SIZE}"
            ),
        });
    }
    Ok(())
}

#[async_trait]
impl PlatformClient for YouTubeClient {
    async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResultItem>, ProviderError> {
        let url = self.endpoint("search", &search_params(query))?;
        let response: SearchListResponse = self.get_json(url).await?;
        debug!(
            query = %query.query,
            category = ?query.category_id,
            items = response.items.len(),
            "search call returned"
        );
        Ok(response.items.into_iter().map(SearchResultItem::from).collect())
    }

    async fn get_details(
        &self,
        ids: &[VideoId],
    ) -> Result<Vec<DetailRecord>, ProviderError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        check_batch_len(ids.len())?;

        let url = self.endpoint("videos", &detail_params(ids))?;
        let response: VideoListResponse = self.get_json(url).await?;
        debug!(
            requested = ids.len(),
            returned = response.items.len(),
            "detail call returned"
        );
        Ok(response
            .items
            .into_iter()
            .filter_map(|video| video.into_detail())
            .collect())
    }

    async fn get_channels(
        &self,
        ids: &[String],
    ) -> Result<Vec<ChannelDetail>, ProviderError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        check_batch_len(ids.len())?;

        let url = self.endpoint("channels", &lookup_params(CHANNEL_PARTS, ids))?;
        let response: ChannelListResponse = self.get_json(url).await?;
        debug!(
            requested = ids.len(),
            returned = response.items.len(),
            "channel lookup returned"
        );
        Ok(response
            .items
            .into_iter()
            .filter_map(|channel| channel.into_detail())
            .collect())
    }

    async fn get_playlists(
        &self,
        ids: &[String],
    ) -> Result<Vec<PlaylistDetail>, ProviderError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        check_batch_len(ids.len())?;

        let url = self.endpoint("playlists", &lookup_params(PLAYLIST_PARTS, ids))?;
        let response: PlaylistListResponse = self.get_json(url).await?;
        debug!(
            requested = ids.len(),
            returned = response.items.len(),
            "playlist lookup returned"
        );
        Ok(response
            .items
            .into_iter()
            .filter_map(|playlist| playlist.into_detail())
            .collect())
    }
}
