pub mod sources;

use std::path::PathBuf;
use std::time::Duration;

use tubescout_core::PipelineSettings;
use tubescout_core::enrichment::DetailFetchSettings;
use tubescout_core::{PartialResultPolicy, YouTubeClientSettings};
use tubescout_model::{FilterSpec, SafeSearch, SearchOrder};

/// Fully resolved configuration: defaults, then file, then environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchDefaults,
    pub detail: DetailFetchSettings,
    pub partial_results: PartialResultPolicy,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            detail: self.detail,
            partial_results: self.partial_results,
        }
    }

    /// Settings for the platform client. The key may still be empty;
    /// building the client reports that.
    pub fn client_settings(&self) -> YouTubeClientSettings {
        YouTubeClientSettings {
            api_key: self.api.api_key.clone().unwrap_or_default(),
            base_url: self.api.base_url.clone(),
            timeout: self.api.timeout,
        }
    }

    /// A filter spec for `query` carrying the configured search defaults.
    pub fn filter_spec(&self, query: impl Into<String>) -> FilterSpec {
        let mut spec = FilterSpec::new(query);
        spec.max_results = self.search.max_results;
        spec.order = self.search.order;
        spec.safe_search = self.search.safe_search;
        spec.region = self.search.region.clone();
        spec.language = self.search.language.clone();
        spec
    }

    /// Clamp a caller-provided result count to the configured limit.
    pub fn clamp_max_results(&self, requested: u32) -> u32 {
        requested.clamp(1, self.search.max_results_limit)
    }
}

#[derive(Clone)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("has_api_key", &self.has_api_key())
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDefaults {
    pub max_results: u32,
    pub max_results_limit: u32,
    pub order: SearchOrder,
    pub safe_search: SafeSearch,
    pub region: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
