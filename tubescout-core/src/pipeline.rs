use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tubescout_model::{
    ChannelSummary, ContentType, FilterSpec, NormalizedRecord, PlaylistSummary,
    ResourceDetail, SearchResultItem, VideoId,
};

use crate::enrichment::{
    BatchCoordinator, DetailFetchSettings, ExclusionReason, FilterDecision,
    dedupe_resources, distinct_resource_ids, evaluate, lookup_resources, normalize,
    resource_id, summarize_channel, summarize_playlist,
};
use crate::error::{
    BatchFailure, LookupFailure, MalformedItem, PipelineError, ProviderError, Result,
};
use crate::providers::PlatformClient;
use crate::retry::with_retry;

/// What to do when some detail batches failed transiently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialResultPolicy {
    /// Return what was built, with the failed batches attached.
    #[default]
    Continue,
    /// Fail the run with [`PipelineError::IncompleteDetails`].
    Abort,
}

impl PartialResultPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartialResultPolicy::Continue => "continue",
            PartialResultPolicy::Abort => "abort",
        }
    }
}

impl fmt::Display for PartialResultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartialResultPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" | "partial" => Ok(PartialResultPolicy::Continue),
            "abort" | "fail" => Ok(PartialResultPolicy::Abort),
            other => Err(format!(
                "unknown partial result policy '{other}' (expected continue or abort)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub detail: DetailFetchSettings,
    pub partial_results: PartialResultPolicy,
}

/// A category search that failed without aborting the run.
#[derive(Debug, Clone)]
pub struct SearchFailure {
    pub category_id: Option<String>,
    pub error: ProviderError,
}

/// Records of one run plus everything that kept the set from being whole.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub content_type: ContentType,
    /// Included video records in search order.
    pub records: Vec<NormalizedRecord>,
    /// Channel results in search order, for channel runs.
    pub channels: Vec<ChannelSummary>,
    /// Playlist results in search order, for playlist runs.
    pub playlists: Vec<PlaylistSummary>,
    pub excluded: Vec<(VideoId, ExclusionReason)>,
    /// Search items that could not be normalized, by position in the
    /// merged search list.
    pub skipped: Vec<(usize, MalformedItem)>,
    pub failed_batches: Vec<BatchFailure>,
    pub failed_searches: Vec<SearchFailure>,
    pub failed_lookups: Vec<LookupFailure>,
    pub search_calls: usize,
    /// Detail or lookup batches issued, excluding retries.
    pub detail_batches: usize,
    pub detail_calls: u32,
}

impl RunOutcome {
    /// No batch, search or item was lost along the way.
    pub fn is_complete(&self) -> bool {
        self.failed_batches.is_empty()
            && self.failed_searches.is_empty()
            && self.failed_lookups.is_empty()
            && self.skipped.is_empty()
    }

    /// Results of the requested kind.
    pub fn result_count(&self) -> usize {
        match self.content_type {
            ContentType::Video => self.records.len(),
            ContentType::Channel => self.channels.len(),
            ContentType::Playlist => self.playlists.len(),
        }
    }

    /// Ids whose details are missing because their batch failed.
    pub fn ids_without_detail(&self) -> impl Iterator<Item = &VideoId> {
        self.failed_batches.iter().flat_map(|failure| failure.ids.iter())
    }
}

/// Search, detail, normalize, filter.
pub struct DiscoveryPipeline {
    client: Arc<dyn PlatformClient>,
    settings: PipelineSettings,
}

impl fmt::Debug for DiscoveryPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryPipeline")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl DiscoveryPipeline {
    pub fn new(client: Arc<dyn PlatformClient>, settings: PipelineSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub async fn run(&self, spec: &FilterSpec) -> Result<RunOutcome> {
        match spec.content_type {
            ContentType::Video => self.run_videos(spec).await,
            ContentType::Channel | ContentType::Playlist => {
                self.run_resources(spec).await
            }
        }
    }

    async fn run_videos(&self, spec: &FilterSpec) -> Result<RunOutcome> {
        let mut outcome = RunOutcome::default();
        let categories = spec.target_categories();
        let fan_out = categories.len() > 1;

        let items = if fan_out {
            self.search_each_category(spec, &categories, &mut outcome).await?
        } else {
            let category = categories.first().copied();
            self.search(spec, category, &mut outcome)
                .await
                .map_err(|source| search_error(category, source))?
        };
        let items = dedupe_items(items);

        let coordinator =
            BatchCoordinator::new(Arc::clone(&self.client), self.settings.detail);
        let fetch = coordinator
            .fetch(&items)
            .await
            .map_err(PipelineError::DetailRejected)?;
        outcome.detail_batches = fetch.batches;
        outcome.detail_calls = fetch.calls;

        if !fetch.is_complete()
            && self.settings.partial_results == PartialResultPolicy::Abort
        {
            return Err(PipelineError::IncompleteDetails(fetch.failures));
        }

        for (position, item) in items.iter().enumerate() {
            let detail = item.id.as_ref().and_then(|id| fetch.get(id));
            let record = match normalize(item, detail) {
                Ok(record) => record,
                Err(malformed) => {
                    warn!(position, error = %malformed, "skipping search item");
                    outcome.skipped.push((position, malformed));
                    continue;
                }
            };
            match evaluate(&record, spec) {
                FilterDecision::Include => outcome.records.push(record),
                FilterDecision::Exclude(reason) => {
                    debug!(id = %record.id, %reason, "record excluded");
                    outcome.excluded.push((record.id, reason));
                }
            }
        }
        outcome.failed_batches = fetch.failures;

        if fan_out {
            outcome.records.truncate(spec.max_results as usize);
        }

        info!(
            query = %spec.query,
            search_calls = outcome.search_calls,
            detail_calls = outcome.detail_calls,
            included = outcome.records.len(),
            excluded = outcome.excluded.len(),
            skipped = outcome.skipped.len(),
            failed_batches = outcome.failed_batches.len(),
            failed_searches = outcome.failed_searches.len(),
            "discovery run finished"
        );

        Ok(outcome)
    }

    /// Channel or playlist run: one search, then a lookup for the returned
    /// ids. Video-only filters are refused before any call.
    async fn run_resources(&self, spec: &FilterSpec) -> Result<RunOutcome> {
        let content_type = spec.content_type;
        if let Some(filter) = spec.video_only_filter() {
            return Err(PipelineError::VideoOnlyFilter {
                content_type,
                filter,
            });
        }

        let mut outcome = RunOutcome {
            content_type,
            ..RunOutcome::default()
        };
        let items = self
            .search(spec, None, &mut outcome)
            .await
            .map_err(|source| search_error(None, source))?;
        let items = dedupe_resources(items);

        let client = Arc::clone(&self.client);
        match content_type {
            ContentType::Channel => {
                let channels = self
                    .collect_resources(&items, &mut outcome, summarize_channel, move |ids| {
                        let client = Arc::clone(&client);
                        async move { client.get_channels(&ids).await }
                    })
                    .await?;
                outcome.channels = channels;
            }
            ContentType::Playlist => {
                let playlists = self
                    .collect_resources(&items, &mut outcome, summarize_playlist, move |ids| {
                        let client = Arc::clone(&client);
                        async move { client.get_playlists(&ids).await }
                    })
                    .await?;
                outcome.playlists = playlists;
            }
            ContentType::Video => {}
        }

        info!(
            query = %spec.query,
            %content_type,
            search_calls = outcome.search_calls,
            lookup_calls = outcome.detail_calls,
            results = outcome.result_count(),
            skipped = outcome.skipped.len(),
            failed_lookups = outcome.failed_lookups.len(),
            "discovery run finished"
        );
        Ok(outcome)
    }

    async fn collect_resources<D, S, F, Fut>(
        &self,
        items: &[SearchResultItem],
        outcome: &mut RunOutcome,
        summarize: fn(&SearchResultItem, Option<&D>) -> std::result::Result<S, MalformedItem>,
        fetch: F,
    ) -> Result<Vec<S>>
    where
        D: ResourceDetail,
        F: FnMut(Vec<String>) -> Fut,
        Fut: Future<Output = std::result::Result<Vec<D>, ProviderError>>,
    {
        let ids = distinct_resource_ids(items);
        let lookup = lookup_resources(
            outcome.content_type,
            &ids,
            self.settings.detail.batch_size,
            &self.settings.detail.retry,
            fetch,
        )
        .await
        .map_err(PipelineError::LookupRejected)?;
        outcome.detail_batches = lookup.batches;
        outcome.detail_calls = lookup.calls;

        if !lookup.failures.is_empty()
            && self.settings.partial_results == PartialResultPolicy::Abort
        {
            return Err(PipelineError::IncompleteLookups(lookup.failures));
        }

        let mut summaries = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let detail = resource_id(item).and_then(|id| lookup.get(id));
            match summarize(item, detail) {
                Ok(summary) => summaries.push(summary),
                Err(malformed) => {
                    warn!(position, error = %malformed, "skipping search item");
                    outcome.skipped.push((position, malformed));
                }
            }
        }
        outcome.failed_lookups = lookup.failures;
        Ok(summaries)
    }

    /// One search per category, concatenated in category order. A failed
    /// category is recorded unless the platform rejected the call outright.
    async fn search_each_category(
        &self,
        spec: &FilterSpec,
        categories: &[&str],
        outcome: &mut RunOutcome,
    ) -> Result<Vec<SearchResultItem>> {
        let mut items = Vec::new();
        for &category in categories {
            match self.search(spec, Some(category), outcome).await {
                Ok(found) => {
                    debug!(category, items = found.len(), "category search returned");
                    items.extend(found);
                }
                Err(source) if source.is_fatal() => {
                    return Err(search_error(Some(category), source));
                }
                Err(error) => {
                    warn!(category, %error, "category search failed");
                    outcome.failed_searches.push(SearchFailure {
                        category_id: Some(category.to_string()),
                        error,
                    });
                }
            }
        }

        if outcome.failed_searches.len() == categories.len()
            && let Some(first) = outcome.failed_searches.first()
        {
            return Err(PipelineError::SearchFailed {
                category_id: first.category_id.clone(),
                source: first.error.clone(),
            });
        }
        Ok(items)
    }

    /// One search call with transient failures retried. Every attempt counts
    /// towards `search_calls`.
    async fn search(
        &self,
        spec: &FilterSpec,
        category: Option<&str>,
        outcome: &mut RunOutcome,
    ) -> std::result::Result<Vec<SearchResultItem>, ProviderError> {
        let query = spec.search_query(category);
        let operation = match category {
            Some(category) => format!("search category {category}"),
            None => "search".to_string(),
        };
        let (result, attempts) = with_retry(&self.settings.detail.retry, &operation, || {
            self.client.search(&query)
        })
        .await;
        outcome.search_calls += attempts as usize;
        result
    }
}

fn search_error(category: Option<&str>, source: ProviderError) -> PipelineError {
    let category_id = category.map(str::to_string);
    if source.is_fatal() {
        PipelineError::SearchRejected {
            category_id,
            source,
        }
    } else {
        PipelineError::SearchFailed {
            category_id,
            source,
        }
    }
}

/// Drop repeated ids, first occurrence wins. Items without an id are kept
/// so normalization can report them.
fn dedupe_items(items: Vec<SearchResultItem>) -> Vec<SearchResultItem> {
    let mut seen: HashSet<VideoId> = HashSet::new();
    items
        .into_iter()
        .filter(|item| match &item.id {
            Some(id) => seen.insert(id.clone()),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::traits::MockPlatformClient;
    use tubescout_model::DetailRecord;

    fn item(id: &str) -> SearchResultItem {
        SearchResultItem::with_id(VideoId::parse(id).unwrap())
    }

    #[tokio::test]
    async fn video_only_filters_are_refused_for_channels() {
        let mut client = MockPlatformClient::new();
        client.expect_search().never();
        let pipeline = DiscoveryPipeline::new(Arc::new(client), PipelineSettings::default());

        let mut spec = FilterSpec::new("rust");
        spec.content_type = ContentType::Channel;
        spec.topic_id = Some("/m/04rlf".into());
        let err = pipeline.run(&spec).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::VideoOnlyFilter {
                content_type: ContentType::Channel,
                filter: "topic"
            }
        ));
        assert_eq!(err.kind(), crate::error::FailureKind::Permanent);
    }

    #[tokio::test]
    async fn channel_search_uses_channel_lookup() {
        let mut client = MockPlatformClient::new();
        client.expect_search().times(1).returning(|query| {
            assert_eq!(query.content_type, ContentType::Channel);
            Ok(vec![SearchResultItem {
                resource_id: Some("UC1".into()),
                title: "Channel one".into(),
                ..SearchResultItem::default()
            }])
        });
        client.expect_get_details().never();
        client.expect_get_channels().times(1).returning(|ids| {
            Ok(ids.iter().map(tubescout_model::ChannelDetail::new).collect())
        });
        let pipeline = DiscoveryPipeline::new(Arc::new(client), PipelineSettings::default());

        let mut spec = FilterSpec::new("rust");
        spec.content_type = ContentType::Channel;
        let outcome = pipeline.run(&spec).await.unwrap();
        assert_eq!(outcome.result_count(), 1);
        assert_eq!(outcome.channels[0].url, "https://www.youtube.com/channel/UC1");
        assert!(outcome.channels[0].detail_available);
        assert!(outcome.records.is_empty());
        assert!(outcome.is_complete());
    }

    #[tokio::test]
    async fn abort_policy_fails_on_partial_details() {
        let mut client = MockPlatformClient::new();
        client
            .expect_search()
            .returning(|_| Ok(vec![item("a"), item("b")]));
        client
            .expect_get_details()
            .returning(|_| Err(ProviderError::Timeout));

        let mut settings = PipelineSettings {
            partial_results: PartialResultPolicy::Abort,
            ..PipelineSettings::default()
        };
        settings.detail.retry = crate::retry::RetryPolicy::none();
        let pipeline = DiscoveryPipeline::new(Arc::new(client), settings);

        match pipeline.run(&FilterSpec::new("q")).await {
            Err(PipelineError::IncompleteDetails(failures)) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].ids.len(), 2);
            }
            other => panic!("expected IncompleteDetails, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_search_items_are_merged_once() {
        let mut client = MockPlatformClient::new();
        client
            .expect_search()
            .returning(|_| Ok(vec![item("a"), item("b"), item("a")]));
        client.expect_get_details().times(1).returning(|ids| {
            assert_eq!(ids.len(), 2);
            Ok(ids.iter().cloned().map(DetailRecord::new).collect())
        });
        let pipeline = DiscoveryPipeline::new(Arc::new(client), PipelineSettings::default());

        let outcome = pipeline.run(&FilterSpec::new("q")).await.unwrap();
        let ids: Vec<_> = outcome.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(outcome.is_complete());
    }

    #[test]
    fn partial_policy_parses() {
        assert_eq!("abort".parse(), Ok(PartialResultPolicy::Abort));
        assert_eq!(" Continue ".parse(), Ok(PartialResultPolicy::Continue));
        assert!("maybe".parse::<PartialResultPolicy>().is_err());
    }
}
