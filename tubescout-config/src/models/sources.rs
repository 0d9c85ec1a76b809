use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::*;
use crate::util::{non_empty_var, parse_var};

/// Raw configuration as defined in a TOML (or JSON) file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub api: FileApiConfig,
    #[serde(default)]
    pub search: FileSearchConfig,
    #[serde(default)]
    pub detail: FileDetailConfig,
    #[serde(default)]
    pub retry: FileRetryConfig,
}

#[derive(Default, Clone, Deserialize, Serialize)]
pub struct FileApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for FileApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileSearchConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results_limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe_search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDetailConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_results: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileRetryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_base_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_max_ms: Option<u64>,
}

/// Environment-derived configuration values.
///
/// Enumerated settings are kept as raw strings so the loader can report
/// the offending variable when they don't parse.
#[derive(Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub detail_batch_size: Option<usize>,
    pub detail_concurrency: Option<usize>,
    pub partial_results: Option<String>,
    pub max_results: Option<u32>,
    pub retry_max_attempts: Option<u32>,
    pub region: Option<String>,
    pub language: Option<String>,
    pub safe_search: Option<String>,
}

impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfig")
            .field("config_path", &self.config_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("detail_batch_size", &self.detail_batch_size)
            .field("detail_concurrency", &self.detail_concurrency)
            .field("partial_results", &self.partial_results)
            .field("max_results", &self.max_results)
            .field("retry_max_attempts", &self.retry_max_attempts)
            .field("region", &self.region)
            .field("language", &self.language)
            .field("safe_search", &self.safe_search)
            .finish()
    }
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: non_empty_var(ENV_CONFIG_PATH).map(PathBuf::from),
            api_key: non_empty_var(ENV_API_KEY),
            api_base_url: non_empty_var(ENV_API_BASE_URL),
            request_timeout_secs: parse_var(ENV_REQUEST_TIMEOUT_SECS),
            detail_batch_size: parse_var(ENV_DETAIL_BATCH_SIZE),
            detail_concurrency: parse_var(ENV_DETAIL_CONCURRENCY),
            partial_results: non_empty_var(ENV_PARTIAL_RESULTS),
            max_results: parse_var(ENV_MAX_RESULTS),
            retry_max_attempts: parse_var(ENV_RETRY_MAX_ATTEMPTS),
            region: non_empty_var(ENV_REGION),
            language: non_empty_var(ENV_LANGUAGE),
            safe_search: non_empty_var(ENV_SAFE_SEARCH),
        }
    }
}
