use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;
use tubescout_core::RunOutcome;
use tubescout_core::catalog;
use tubescout_core::format::{format_count, format_published_date};
use tubescout_model::{
    ChannelSummary, ContentType, NormalizedRecord, PlaylistSummary, SafeSearch,
    SearchOrder, VideoDefinition, VideoDuration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct CodeLabel<'a> {
    id: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct FailedBatch<'a> {
    batch_index: usize,
    ids: Vec<&'a str>,
    attempts: u32,
    error: String,
}

#[derive(Serialize)]
struct FailedSearch<'a> {
    category_id: Option<&'a str>,
    error: String,
}

#[derive(Serialize)]
struct FailedLookup<'a> {
    batch_index: usize,
    ids: &'a [String],
    attempts: u32,
    error: String,
}

fn no_items<T>(items: &&[T]) -> bool {
    items.is_empty()
}

#[derive(Serialize)]
struct Report<'a> {
    content_type: ContentType,
    complete: bool,
    records: &'a [NormalizedRecord],
    #[serde(skip_serializing_if = "no_items")]
    channels: &'a [ChannelSummary],
    #[serde(skip_serializing_if = "no_items")]
    playlists: &'a [PlaylistSummary],
    excluded: usize,
    skipped: usize,
    failed_batches: Vec<FailedBatch<'a>>,
    failed_searches: Vec<FailedSearch<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed_lookups: Vec<FailedLookup<'a>>,
}

pub fn outcome<W: Write>(
    out: &mut W,
    outcome: &RunOutcome,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let report = Report {
                content_type: outcome.content_type,
                complete: outcome.is_complete(),
                records: &outcome.records,
                channels: &outcome.channels,
                playlists: &outcome.playlists,
                excluded: outcome.excluded.len(),
                skipped: outcome.skipped.len(),
                failed_batches: outcome
                    .failed_batches
                    .iter()
                    .map(|failure| FailedBatch {
                        batch_index: failure.batch_index,
                        ids: failure.ids.iter().map(|id| id.as_str()).collect(),
                        attempts: failure.attempts,
                        error: failure.source.to_string(),
                    })
                    .collect(),
                failed_searches: outcome
                    .failed_searches
                    .iter()
                    .map(|failure| FailedSearch {
                        category_id: failure.category_id.as_deref(),
                        error: failure.error.to_string(),
                    })
                    .collect(),
                failed_lookups: outcome
                    .failed_lookups
                    .iter()
                    .map(|failure| FailedLookup {
                        batch_index: failure.batch_index,
                        ids: &failure.ids,
                        attempts: failure.attempts,
                        error: failure.source.to_string(),
                    })
                    .collect(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            if outcome.result_count() == 0 {
                writeln!(out, "No {}s matched.", outcome.content_type)?;
            }
            for (position, record) in outcome.records.iter().enumerate() {
                record_text(out, position + 1, record)?;
            }
            for (position, channel) in outcome.channels.iter().enumerate() {
                channel_text(out, position + 1, channel)?;
            }
            for (position, playlist) in outcome.playlists.iter().enumerate() {
                playlist_text(out, position + 1, playlist)?;
            }
        }
    }
    Ok(())
}

fn record_text<W: Write>(
    out: &mut W,
    position: usize,
    record: &NormalizedRecord,
) -> std::io::Result<()> {
    writeln!(out, "{position:>3}. {}", record.title)?;
    writeln!(out, "     {}", record.url)?;
    writeln!(
        out,
        "     {} | {}",
        record.channel_title,
        format_published_date(record.published_at.as_deref())
    )?;

    let mut stats = Vec::new();
    if let Some(duration) = &record.duration_readable {
        stats.push(duration.clone());
    }
    if let Some(views) = record.view_count {
        stats.push(format!("{} views", format_count(views)));
    }
    if let Some(likes) = record.like_count {
        stats.push(format!("{} likes", format_count(likes)));
    }
    if let Some(comments) = record.comment_count {
        stats.push(format!("{} comments", format_count(comments)));
    }
    if !stats.is_empty() {
        writeln!(out, "     {}", stats.join(" | "))?;
    }

    if let Some(category) = &record.category {
        writeln!(out, "     category: {} ({})", category.name, category.id)?;
    }
    let topics = record.display_topics();
    if !topics.is_empty() {
        writeln!(out, "     topics: {}", topics.join(", "))?;
    } else if !record.inferred_topics.is_empty() {
        writeln!(out, "     topics: {} (inferred)", record.inferred_topics.join(", "))?;
    }
    if record.restricted {
        writeln!(out, "     made for kids")?;
    }
    Ok(())
}

fn channel_text<W: Write>(
    out: &mut W,
    position: usize,
    channel: &ChannelSummary,
) -> std::io::Result<()> {
    writeln!(out, "{position:>3}. {}", channel.title)?;
    writeln!(out, "     {}", channel.url)?;
    if channel.published_at.is_some() {
        writeln!(
            out,
            "     since {}",
            format_published_date(channel.published_at.as_deref())
        )?;
    }
    let mut stats = Vec::new();
    if let Some(subscribers) = channel.subscriber_count {
        stats.push(format!("{} subscribers", format_count(subscribers)));
    }
    if let Some(videos) = channel.video_count {
        stats.push(format!("{} videos", format_count(videos)));
    }
    if let Some(views) = channel.view_count {
        stats.push(format!("{} views", format_count(views)));
    }
    if !stats.is_empty() {
        writeln!(out, "     {}", stats.join(" | "))?;
    }
    if let Some(keywords) = &channel.keywords {
        writeln!(out, "     keywords: {keywords}")?;
    }
    Ok(())
}

fn playlist_text<W: Write>(
    out: &mut W,
    position: usize,
    playlist: &PlaylistSummary,
) -> std::io::Result<()> {
    writeln!(out, "{position:>3}. {}", playlist.title)?;
    writeln!(out, "     {}", playlist.url)?;
    writeln!(
        out,
        "     {} | {}",
        playlist.channel_title,
        format_published_date(playlist.published_at.as_deref())
    )?;
    let mut stats = Vec::new();
    if let Some(items) = playlist.item_count {
        stats.push(format!("{items} items"));
    }
    if let Some(privacy) = &playlist.privacy_status {
        stats.push(privacy.clone());
    }
    if !stats.is_empty() {
        writeln!(out, "     {}", stats.join(" | "))?;
    }
    Ok(())
}

/// Human note for an incomplete run, or `None` when nothing was lost.
pub fn incomplete_note(outcome: &RunOutcome) -> Option<String> {
    if outcome.is_complete() {
        return None;
    }
    let mut parts = Vec::new();
    let missing = outcome.ids_without_detail().count();
    if missing > 0 {
        parts.push(format!(
            "{missing} video(s) lack details after {} failed detail batch(es)",
            outcome.failed_batches.len()
        ));
    }
    for failure in &outcome.failed_searches {
        parts.push(format!(
            "search for category {} failed: {}",
            failure.category_id.as_deref().unwrap_or("-"),
            failure.error
        ));
    }
    let unresolved: usize = outcome.failed_lookups.iter().map(|f| f.ids.len()).sum();
    if unresolved > 0 {
        parts.push(format!(
            "{unresolved} {}(s) lack details after {} failed lookup batch(es)",
            outcome.content_type,
            outcome.failed_lookups.len()
        ));
    }
    if !outcome.skipped.is_empty() {
        parts.push(format!(
            "{} search item(s) had no {} id",
            outcome.skipped.len(),
            outcome.content_type
        ));
    }
    Some(format!("note: results are incomplete; {}", parts.join("; ")))
}

pub fn code_table<W: Write>(
    out: &mut W,
    entries: &[(&str, &str)],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<CodeLabel<'_>> = entries
                .iter()
                .map(|&(id, name)| CodeLabel { id, name })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let width = entries.iter().map(|(id, _)| id.len()).max().unwrap_or(0);
            for (id, name) in entries {
                writeln!(out, "{id:<width$}  {name}")?;
            }
        }
    }
    Ok(())
}

pub fn categories<W: Write>(out: &mut W, format: OutputFormat) -> anyhow::Result<()> {
    code_table(out, catalog::categories(), format)
}

pub fn topics<W: Write>(out: &mut W, format: OutputFormat) -> anyhow::Result<()> {
    code_table(out, catalog::topics(), format)
}

/// The accepted values of each enumerated search option.
pub fn options<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, "order:")?;
    for order in SearchOrder::all() {
        writeln!(out, "  {:<12} {}", order.api_name(), order.label())?;
    }
    writeln!(out, "safe-search:")?;
    for level in SafeSearch::all() {
        writeln!(out, "  {:<12} {}", level.api_name(), level.label())?;
    }
    writeln!(out, "duration:")?;
    for duration in VideoDuration::all() {
        writeln!(out, "  {:<12} {}", duration.api_name(), duration.label())?;
    }
    writeln!(out, "definition:")?;
    for definition in VideoDefinition::all() {
        writeln!(out, "  {:<12} {}", definition.api_name(), definition.label())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubescout_core::enrichment::{normalize, summarize_channel};
    use tubescout_model::{ChannelDetail, DetailRecord, SearchResultItem, VideoId};

    fn sample_outcome() -> RunOutcome {
        let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
        let mut item = SearchResultItem::with_id(id.clone());
        item.title = "Never Gonna Give You Up".into();
        item.channel_title = "Rick Astley".into();
        item.published_at = Some("2009-10-25T06:57:33Z".into());
        let mut detail = DetailRecord::new(id);
        detail.category_id = Some("10".into());
        detail.topic_ids = vec!["/m/04rlf".into()];
        detail.view_count = Some(1_500_000_000);
        detail.duration = Some("PT3M33S".into());

        RunOutcome {
            records: vec![normalize(&item, Some(&detail)).unwrap()],
            ..RunOutcome::default()
        }
    }

    #[test]
    fn text_output_shows_resolved_labels() {
        let mut buf = Vec::new();
        outcome(&mut buf, &sample_outcome(), OutputFormat::Text).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("1. Never Gonna Give You Up"));
        assert!(text.contains("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(text.contains("October 25, 2009"));
        assert!(text.contains("03:33 | 1.5B views"));
        assert!(text.contains("category: Music (10)"));
        assert!(text.contains("topics: Music"));
    }

    #[test]
    fn category_stands_in_for_missing_topics() {
        let mut sample = sample_outcome();
        let record = &mut sample.records[0];
        record.topic_ids.clear();
        record.topic_names.clear();
        record.provenance.topics = tubescout_model::TopicSource::None;

        let mut buf = Vec::new();
        outcome(&mut buf, &sample, OutputFormat::Text).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("topics: Music (inferred)"), "{text}");
    }

    #[test]
    fn json_output_is_a_report() {
        let mut buf = Vec::new();
        outcome(&mut buf, &sample_outcome(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["complete"], true);
        assert_eq!(value["records"][0]["id"], "dQw4w9WgXcQ");
        assert_eq!(value["records"][0]["category"]["name"], "Music");
    }

    fn channel_outcome() -> RunOutcome {
        let mut item = SearchResultItem {
            resource_id: Some("UCuAXFkgsw1L7xaCfnd5JJOw".into()),
            title: "Rick Astley".into(),
            ..SearchResultItem::default()
        };
        item.published_at = Some("2006-09-20T00:00:00Z".into());
        let mut detail = ChannelDetail::new("UCuAXFkgsw1L7xaCfnd5JJOw");
        detail.subscriber_count = Some(3_900_000);
        detail.video_count = Some(112);

        RunOutcome {
            content_type: ContentType::Channel,
            channels: vec![summarize_channel(&item, Some(&detail)).unwrap()],
            ..RunOutcome::default()
        }
    }

    #[test]
    fn channel_text_shows_link_and_counts() {
        let mut buf = Vec::new();
        outcome(&mut buf, &channel_outcome(), OutputFormat::Text).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("1. Rick Astley"));
        assert!(text.contains("https://www.youtube.com/channel/UCuAXFkgsw1L7xaCfnd5JJOw"));
        assert!(text.contains("3.9M subscribers | 112 videos"));
        assert!(!text.contains("matched"));
    }

    #[test]
    fn channel_json_lists_channels() {
        let mut buf = Vec::new();
        outcome(&mut buf, &channel_outcome(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["content_type"], "channel");
        assert_eq!(value["channels"][0]["subscriber_count"], 3_900_000);
        assert!(value.get("playlists").is_none());
    }

    #[test]
    fn empty_playlist_run_says_so() {
        let empty = RunOutcome {
            content_type: ContentType::Playlist,
            ..RunOutcome::default()
        };
        let mut buf = Vec::new();
        outcome(&mut buf, &empty, OutputFormat::Text).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No playlists matched.\n");
    }

    #[test]
    fn complete_outcome_has_no_note() {
        assert!(incomplete_note(&sample_outcome()).is_none());
    }

    #[test]
    fn category_table_aligns_ids() {
        let mut buf = Vec::new();
        code_table(&mut buf, &[("1", "Film"), ("10", "Music")], OutputFormat::Text).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1   Film\n10  Music\n");
    }
}
