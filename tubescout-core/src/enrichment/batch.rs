use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tubescout_model::{DetailRecord, SearchResultItem, VideoId};

use crate::error::BatchFailure;
use crate::providers::{MAX_DETAIL_BATCH_SIZE, PlatformClient};
use crate::retry::{RetryPolicy, with_retry};

/// Tuning for the detail stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailFetchSettings {
    /// Ids per detail call. Clamped to `1..=50` when partitioning.
    pub batch_size: usize,
    /// Detail calls in flight at once.
    pub max_concurrency: usize,
    /// Applies to search calls as well as detail calls.
    pub retry: RetryPolicy,
}

impl Default for DetailFetchSettings {
    fn default() -> Self {
        Self {
            batch_size: MAX_DETAIL_BATCH_SIZE,
            max_concurrency: 4,
            retry: RetryPolicy::default(),
        }
    }
}

/// Detail map for one run plus the batches that produced nothing.
#[derive(Debug, Default)]
pub struct DetailFetch {
    pub details: HashMap<VideoId, DetailRecord>,
    /// Distinct ids that were asked for.
    pub requested: usize,
    /// Batches issued, excluding retries.
    pub batches: usize,
    /// Detail calls made, including retries.
    pub calls: u32,
    pub failures: Vec<BatchFailure>,
}

impl DetailFetch {
    pub fn get(&self, id: &VideoId) -> Option<&DetailRecord> {
        self.details.get(id)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Distinct ids in first-seen order. Items without an id are skipped.
pub fn distinct_ids(items: &[SearchResultItem]) -> Vec<VideoId> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|item| item.id.as_ref())
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

/// Consecutive chunks of at most `batch_size` ids.
pub fn partition(ids: &[VideoId], batch_size: usize) -> Vec<Vec<VideoId>> {
    let size = batch_size.clamp(1, MAX_DETAIL_BATCH_SIZE);
    ids.chunks(size).map(<[VideoId]>::to_vec).collect()
}

struct BatchSuccess {
    index: usize,
    ids: Vec<VideoId>,
    records: Vec<DetailRecord>,
    attempts: u32,
}

/// Turns search items into an id -> detail map, one platform call per batch.
pub struct BatchCoordinator {
    client: Arc<dyn PlatformClient>,
    settings: DetailFetchSettings,
}

impl std::fmt::Debug for BatchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchCoordinator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl BatchCoordinator {
    pub fn new(client: Arc<dyn PlatformClient>, settings: DetailFetchSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &DetailFetchSettings {
        &self.settings
    }

    /// Fetch details for every distinct id in `items`.
    ///
    /// Transient and permanent batch failures are collected in the returned
    /// [`DetailFetch`]. A quota/auth failure stops the remaining batches and
    /// is returned as the error.
    pub async fn fetch(
        &self,
        items: &[SearchResultItem],
    ) -> Result<DetailFetch, BatchFailure> {
        let ids = distinct_ids(items);
        let chunks = partition(&ids, self.settings.batch_size);
        let mut fetch = DetailFetch {
            requested: ids.len(),
            batches: chunks.len(),
            ..DetailFetch::default()
        };
        if chunks.is_empty() {
            return Ok(fetch);
        }

        info!(
            ids = ids.len(),
            batches = chunks.len(),
            concurrency = self.settings.max_concurrency.max(1),
            "fetching details"
        );

        // `buffered` keeps batch order so the merge is deterministic.
        let mut results = stream::iter(chunks.into_iter().enumerate())
            .map(|(index, chunk)| self.fetch_batch(index, chunk))
            .buffered(self.settings.max_concurrency.max(1));

        while let Some(result) = results.next().await {
            match result {
                Ok(success) => {
                    fetch.calls += success.attempts;
                    merge_batch(&mut fetch.details, success);
                }
                Err(failure) if failure.source.is_fatal() => {
                    warn!(batch = failure.batch_index, error = %failure.source, "detail call rejected; aborting");
                    return Err(failure);
                }
                Err(failure) => {
                    fetch.calls += failure.attempts;
                    warn!(
                        batch = failure.batch_index,
                        ids = failure.ids.len(),
                        attempts = failure.attempts,
                        error = %failure.source,
                        "detail batch failed"
                    );
                    fetch.failures.push(failure);
                }
            }
        }

        Ok(fetch)
    }

    async fn fetch_batch(
        &self,
        index: usize,
        ids: Vec<VideoId>,
    ) -> Result<BatchSuccess, BatchFailure> {
        let operation = format!("detail batch {index}");
        let (result, attempts) = with_retry(&self.settings.retry, &operation, || {
            self.client.get_details(&ids)
        })
        .await;
        match result {
            Ok(records) => Ok(BatchSuccess {
                index,
                ids,
                records,
                attempts,
            }),
            Err(source) => Err(BatchFailure {
                batch_index: index,
                ids,
                attempts,
                source,
            }),
        }
    }
}

fn merge_batch(details: &mut HashMap<VideoId, DetailRecord>, batch: BatchSuccess) {
    let requested: HashSet<&VideoId> = batch.ids.iter().collect();
    let returned = batch.records.len();
    let mut kept = 0usize;
    for record in batch.records {
        if !requested.contains(&record.id) {
            debug!(batch = batch.index, id = %record.id, "dropping unrequested detail");
            continue;
        }
        if details.contains_key(&record.id) {
            continue;
        }
        details.insert(record.id.clone(), record);
        kept += 1;
    }
    debug!(
        batch = batch.index,
        requested = batch.ids.len(),
        returned,
        kept,
        "merged detail batch"
    );
}
