//! Scripted platform client for pipeline integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use tubescout_core::{PlatformClient, ProviderError};
use tubescout_model::{
    ChannelDetail, DetailRecord, PlaylistDetail, SearchQuery, SearchResultItem, VideoId,
};

pub fn vid(raw: &str) -> VideoId {
    VideoId::parse(raw).expect("test ids are non-empty")
}

pub fn search_item(id: &str, title: &str) -> SearchResultItem {
    SearchResultItem {
        title: title.to_string(),
        channel_title: "Test Channel".to_string(),
        ..SearchResultItem::with_id(vid(id))
    }
}

/// A channel or playlist search result.
pub fn resource_item(id: &str, title: &str) -> SearchResultItem {
    SearchResultItem {
        resource_id: Some(id.to_string()),
        title: title.to_string(),
        channel_title: "Test Channel".to_string(),
        ..SearchResultItem::default()
    }
}

/// Answers searches per category and details from a fixed catalog, and
/// records every call it receives.
#[derive(Default)]
pub struct ScriptedClient {
    searches: HashMap<Option<String>, Result<Vec<SearchResultItem>, ProviderError>>,
    search_failures: Mutex<HashMap<Option<String>, Vec<ProviderError>>>,
    details: HashMap<VideoId, DetailRecord>,
    extra_details: Vec<DetailRecord>,
    failing_ids: HashSet<VideoId>,
    detail_error: Option<ProviderError>,
    search_log: Mutex<Vec<SearchQuery>>,
    detail_log: Mutex<Vec<Vec<VideoId>>>,
    channels: HashMap<String, ChannelDetail>,
    playlists: HashMap<String, PlaylistDetail>,
    lookup_error: Option<ProviderError>,
    lookup_log: Mutex<Vec<Vec<String>>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, items: Vec<SearchResultItem>) -> Self {
        self.searches.insert(None, Ok(items));
        self
    }

    pub fn with_category_search(
        mut self,
        category: &str,
        result: Result<Vec<SearchResultItem>, ProviderError>,
    ) -> Self {
        self.searches.insert(Some(category.to_string()), result);
        self
    }

    /// Errors returned, in order, before the scripted result for `category`.
    pub fn with_search_failures(self, category: &str, errors: Vec<ProviderError>) -> Self {
        self.search_failures
            .lock()
            .expect("search failures poisoned")
            .insert(Some(category.to_string()), errors);
        self
    }

    /// Like [`Self::with_search_failures`] for the search without a category.
    pub fn with_uncategorized_search_failures(self, errors: Vec<ProviderError>) -> Self {
        self.search_failures
            .lock()
            .expect("search failures poisoned")
            .insert(None, errors);
        self
    }

    pub fn with_detail(mut self, detail: DetailRecord) -> Self {
        self.details.insert(detail.id.clone(), detail);
        self
    }

    /// A record returned with every batch whether or not it was asked for.
    pub fn with_unrequested_detail(mut self, detail: DetailRecord) -> Self {
        self.extra_details.push(detail);
        self
    }

    /// Any batch containing `id` fails with `error`.
    pub fn failing_batch_with(mut self, id: &str, error: ProviderError) -> Self {
        self.failing_ids.insert(vid(id));
        self.detail_error = Some(error);
        self
    }

    pub fn with_channel(mut self, channel: ChannelDetail) -> Self {
        self.channels.insert(channel.id.clone(), channel);
        self
    }

    pub fn with_playlist(mut self, playlist: PlaylistDetail) -> Self {
        self.playlists.insert(playlist.id.clone(), playlist);
        self
    }

    /// Every channel and playlist lookup fails with `error`.
    pub fn failing_lookups_with(mut self, error: ProviderError) -> Self {
        self.lookup_error = Some(error);
        self
    }

    pub fn lookups(&self) -> Vec<Vec<String>> {
        self.lookup_log.lock().expect("lookup log poisoned").clone()
    }

    fn record_lookup(&self, ids: &[String]) -> Result<(), ProviderError> {
        self.lookup_log
            .lock()
            .expect("lookup log poisoned")
            .push(ids.to_vec());
        match &self.lookup_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    pub fn searches(&self) -> Vec<SearchQuery> {
        self.search_log.lock().expect("search log poisoned").clone()
    }

    pub fn detail_batches(&self) -> Vec<Vec<VideoId>> {
        self.detail_log.lock().expect("detail log poisoned").clone()
    }
}

#[async_trait]
impl PlatformClient for ScriptedClient {
    async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResultItem>, ProviderError> {
        self.search_log
            .lock()
            .expect("search log poisoned")
            .push(query.clone());
        if let Some(pending) = self
            .search_failures
            .lock()
            .expect("search failures poisoned")
            .get_mut(&query.category_id)
            && !pending.is_empty()
        {
            return Err(pending.remove(0));
        }
        self.searches
            .get(&query.category_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_details(
        &self,
        ids: &[VideoId],
    ) -> Result<Vec<DetailRecord>, ProviderError> {
        self.detail_log
            .lock()
            .expect("detail log poisoned")
            .push(ids.to_vec());

        if let Some(error) = &self.detail_error
            && ids.iter().any(|id| self.failing_ids.contains(id))
        {
            return Err(error.clone());
        }

        let mut records: Vec<DetailRecord> = ids
            .iter()
            .filter_map(|id| self.details.get(id).cloned())
            .collect();
        records.extend(self.extra_details.iter().cloned());
        Ok(records)
    }

    async fn get_channels(
        &self,
        ids: &[String],
    ) -> Result<Vec<ChannelDetail>, ProviderError> {
        self.record_lookup(ids)?;
        Ok(ids.iter().filter_map(|id| self.channels.get(id).cloned()).collect())
    }

    async fn get_playlists(
        &self,
        ids: &[String],
    ) -> Result<Vec<PlaylistDetail>, ProviderError> {
        self.record_lookup(ids)?;
        Ok(ids.iter().filter_map(|id| self.playlists.get(id).cloned()).collect())
    }
}
