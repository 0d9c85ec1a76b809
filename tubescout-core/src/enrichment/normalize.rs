use tracing::debug;
use tubescout_model::{
    CategorySource, DetailRecord, NormalizedRecord, Provenance, SearchResultItem,
    TopicSource, VideoId,
};

use crate::catalog::{lookup_topic, resolve_category};
use crate::error::MalformedItem;
use crate::format::readable_duration;

pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

pub(crate) const UNTITLED: &str = "No title";
pub(crate) const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// Canonical watch URL. Empty for an empty id.
pub fn watch_url(id: &str) -> String {
    let id = id.trim();
    if id.is_empty() {
        String::new()
    } else {
        format!("{WATCH_URL_PREFIX}{id}")
    }
}

/// Label for a legacy topic reference. Wikipedia URLs become their article
/// name; anything else is kept verbatim.
pub fn format_legacy_topic(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if !reference.contains("wikipedia.org/wiki/") {
        return Some(reference.to_string());
    }
    let tail = reference.rsplit('/').next().unwrap_or_default().replace('_', " ");
    let tail = tail.trim();
    (!tail.is_empty()).then(|| tail.to_string())
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Merge one search item with its optional detail record.
///
/// Category comes from the search item first, then the detail. Topic labels
/// come from the current topic ids; legacy references are only consulted
/// when that list is empty.
pub fn normalize(
    item: &SearchResultItem,
    detail: Option<&DetailRecord>,
) -> Result<NormalizedRecord, MalformedItem> {
    let id: VideoId = item.id.clone().ok_or_else(|| MalformedItem {
        title: item.title.clone(),
    })?;

    let (category, category_source) =
        match present(item.category_id.as_deref()) {
            Some(code) => (Some(resolve_category(code)), Some(CategorySource::SearchItem)),
            None => match detail.and_then(|d| present(d.category_id.as_deref())) {
                Some(code) => (Some(resolve_category(code)), Some(CategorySource::Detail)),
                None => (None, None),
            },
        };

    let topic_ids: Vec<String> = detail.map(|d| d.topic_ids.clone()).unwrap_or_default();
    let topic_names: Vec<String> = topic_ids
        .iter()
        .filter_map(|topic| lookup_topic(topic).known())
        .map(str::to_string)
        .collect();

    let legacy_topic_names: Vec<String> = match detail {
        Some(d) if topic_ids.is_empty() => d
            .topic_categories
            .iter()
            .filter_map(|reference| format_legacy_topic(reference))
            .collect(),
        _ => Vec::new(),
    };

    let topic_source = if !topic_ids.is_empty() {
        TopicSource::Current
    } else if !legacy_topic_names.is_empty() {
        TopicSource::Legacy
    } else {
        TopicSource::None
    };

    let inferred_topics: Vec<String> = category
        .iter()
        .filter(|c| c.mapped)
        .map(|c| c.name.clone())
        .collect();

    let provenance = Provenance {
        category: category_source,
        topics: topic_source,
        detail_available: detail.is_some(),
    };

    let duration = detail.and_then(|d| d.duration.clone());
    let duration_readable = duration.as_deref().and_then(readable_duration);
    let published_at = present(item.published_at.as_deref())
        .or_else(|| detail.and_then(|d| present(d.published_at.as_deref())))
        .map(str::to_string);

    debug!(
        id = %id,
        category = ?category.as_ref().map(|c| c.id.as_str()),
        category_source = ?provenance.category,
        topics = ?provenance.topics,
        detail = provenance.detail_available,
        "normalized record"
    );

    Ok(NormalizedRecord {
        url: watch_url(id.as_str()),
        title: or_placeholder(&item.title, UNTITLED),
        description: item.description.clone(),
        channel_id: item.channel_id.clone(),
        channel_title: or_placeholder(&item.channel_title, UNKNOWN_CHANNEL),
        thumbnail_url: item.thumbnail_url.clone(),
        published_at,
        category,
        topic_ids,
        topic_names,
        legacy_topic_names,
        inferred_topics,
        restricted: detail.and_then(|d| d.made_for_kids).unwrap_or(false),
        view_count: detail.and_then(|d| d.view_count),
        like_count: detail.and_then(|d| d.like_count),
        comment_count: detail.and_then(|d| d.comment_count),
        duration,
        duration_readable,
        privacy_status: detail.and_then(|d| d.privacy_status.clone()),
        provenance,
        id,
    })
}
