//! Channel and playlist results: one lookup call per batch of ids, merged
//! into summaries. No post-merge filtering applies to these kinds.

use std::collections::{HashMap, HashSet};
use std::future::Future;

use tracing::{debug, info, warn};
use tubescout_model::{
    ChannelDetail, ChannelSummary, ContentType, PlaylistDetail, PlaylistSummary,
    ResourceDetail, SearchResultItem, channel_url, playlist_url,
};

use super::normalize::{UNKNOWN_CHANNEL, UNTITLED, or_placeholder};
use crate::error::{LookupFailure, MalformedItem, ProviderError};
use crate::providers::MAX_DETAIL_BATCH_SIZE;
use crate::retry::{RetryPolicy, with_retry};

/// The item's channel or playlist id, trimmed. `None` when blank.
pub fn resource_id(item: &SearchResultItem) -> Option<&str> {
    item.resource_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// Drop items repeating an earlier resource id. Items without one are kept
/// so they can be reported.
pub fn dedupe_resources(items: Vec<SearchResultItem>) -> Vec<SearchResultItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| match resource_id(item) {
            Some(id) => seen.insert(id.to_string()),
            None => true,
        })
        .collect()
}

pub fn distinct_resource_ids(items: &[SearchResultItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(resource_id)
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Lookup records by id plus the batches that produced nothing.
#[derive(Debug)]
pub struct ResourceLookup<D> {
    pub found: HashMap<String, D>,
    pub batches: usize,
    /// Lookup calls made, including retries.
    pub calls: u32,
    pub failures: Vec<LookupFailure>,
}

impl<D> Default for ResourceLookup<D> {
    fn default() -> Self {
        Self {
            found: HashMap::new(),
            batches: 0,
            calls: 0,
            failures: Vec::new(),
        }
    }
}

impl<D> ResourceLookup<D> {
    pub fn get(&self, id: &str) -> Option<&D> {
        self.found.get(id)
    }
}

/// Look up `ids` in consecutive batches, retrying transient failures.
///
/// Failed batches are collected; a quota/auth failure stops the remaining
/// batches and is returned as the error.
pub async fn lookup_resources<D, F, Fut>(
    content_type: ContentType,
    ids: &[String],
    batch_size: usize,
    policy: &RetryPolicy,
    mut fetch: F,
) -> Result<ResourceLookup<D>, LookupFailure>
where
    D: ResourceDetail,
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<D>, ProviderError>>,
{
    let chunks: Vec<&[String]> = ids.chunks(batch_size.clamp(1, MAX_DETAIL_BATCH_SIZE)).collect();
    let mut lookup = ResourceLookup {
        batches: chunks.len(),
        ..ResourceLookup::default()
    };
    if chunks.is_empty() {
        return Ok(lookup);
    }
    info!(%content_type, ids = ids.len(), batches = chunks.len(), "looking up resources");

    for (index, chunk) in chunks.into_iter().enumerate() {
        let operation = format!("{content_type} lookup batch {index}");
        let (result, attempts) = with_retry(policy, &operation, || fetch(chunk.to_vec())).await;
        lookup.calls += attempts;

        match result {
            Ok(records) => {
                let requested: HashSet<&str> = chunk.iter().map(String::as_str).collect();
                for record in records {
                    let id = record.resource_id().to_string();
                    if !requested.contains(id.as_str()) {
                        debug!(batch = index, %id, "dropping unrequested lookup record");
                        continue;
                    }
                    lookup.found.entry(id).or_insert(record);
                }
            }
            Err(source) => {
                let failure = LookupFailure {
                    content_type,
                    batch_index: index,
                    ids: chunk.to_vec(),
                    attempts,
                    source,
                };
                if failure.source.is_fatal() {
                    warn!(batch = index, error = %failure.source, "lookup rejected; aborting");
                    return Err(failure);
                }
                warn!(
                    batch = index,
                    ids = failure.ids.len(),
                    attempts,
                    error = %failure.source,
                    "lookup batch failed"
                );
                lookup.failures.push(failure);
            }
        }
    }

    Ok(lookup)
}

fn missing_id(item: &SearchResultItem) -> MalformedItem {
    MalformedItem {
        title: item.title.clone(),
    }
}

fn present(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn summarize_channel(
    item: &SearchResultItem,
    detail: Option<&ChannelDetail>,
) -> Result<ChannelSummary, MalformedItem> {
    let id = resource_id(item).ok_or_else(|| missing_id(item))?;
    Ok(ChannelSummary {
        id: id.to_string(),
        url: channel_url(id),
        title: or_placeholder(&item.title, UNTITLED),
        description: item.description.clone(),
        published_at: present(item.published_at.as_ref()),
        thumbnail_url: present(item.thumbnail_url.as_ref()),
        subscriber_count: detail.and_then(|d| d.subscriber_count),
        video_count: detail.and_then(|d| d.video_count),
        view_count: detail.and_then(|d| d.view_count),
        keywords: detail.and_then(|d| present(d.keywords.as_ref())),
        detail_available: detail.is_some(),
    })
}

pub fn summarize_playlist(
    item: &SearchResultItem,
    detail: Option<&PlaylistDetail>,
) -> Result<PlaylistSummary, MalformedItem> {
    let id = resource_id(item).ok_or_else(|| missing_id(item))?;
    Ok(PlaylistSummary {
        id: id.to_string(),
        url: playlist_url(id),
        title: or_placeholder(&item.title, UNTITLED),
        description: item.description.clone(),
        channel_id: item.channel_id.clone(),
        channel_title: or_placeholder(&item.channel_title, UNKNOWN_CHANNEL),
        published_at: present(item.published_at.as_ref()),
        thumbnail_url: present(item.thumbnail_url.as_ref()),
        item_count: detail.and_then(|d| d.item_count),
        privacy_status: detail.and_then(|d| present(d.privacy_status.as_ref())),
        detail_available: detail.is_some(),
    })
}
