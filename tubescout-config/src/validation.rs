use thiserror::Error;
use tubescout_core::providers::MAX_DETAIL_BATCH_SIZE;

use crate::constants::{ENV_API_KEY, MAX_RESULTS_LIMIT};
use crate::models::Config;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("detail max_concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("api timeout_secs must be at least 1")]
    ZeroTimeout,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

/// Reject unusable settings and pull out-of-range ones back into range,
/// recording a warning for each adjustment.
pub fn apply_guard_rails(
    config: &mut Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.detail.max_concurrency == 0 {
        return Err(ConfigGuardRailError::ZeroConcurrency);
    }
    if config.api.timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroTimeout);
    }

    if !config.api.has_api_key() {
        warnings.push_with_hint(
            "No API key configured; searches will fail until one is provided",
            format!("Set {ENV_API_KEY} or add api_key to the [api] section"),
        );
    }

    let batch_size = config.detail.batch_size;
    if !(1..=MAX_DETAIL_BATCH_SIZE).contains(&batch_size) {
        let clamped = batch_size.clamp(1, MAX_DETAIL_BATCH_SIZE);
        warnings.push(format!(
            "detail batch_size {batch_size} is outside 1..={MAX_DETAIL_BATCH_SIZE}; using {clamped}"
        ));
        config.detail.batch_size = clamped;
    }

    let limit = config.search.max_results_limit;
    if !(1..=MAX_RESULTS_LIMIT).contains(&limit) {
        let clamped = limit.clamp(1, MAX_RESULTS_LIMIT);
        warnings.push(format!(
            "search max_results_limit {limit} is outside 1..={MAX_RESULTS_LIMIT}; using {clamped}"
        ));
        config.search.max_results_limit = clamped;
    }

    let limit = config.search.max_results_limit;
    let max_results = config.search.max_results;
    if !(1..=limit).contains(&max_results) {
        let clamped = max_results.clamp(1, limit);
        warnings.push(format!(
            "search default_max_results {max_results} is outside 1..={limit}; using {clamped}"
        ));
        config.search.max_results = clamped;
    }

    if config.detail.retry.max_attempts == 0 {
        warnings.push("retry max_attempts is 0; every call is still attempted once");
        config.detail.retry.max_attempts = 1;
    }

    let retry = config.detail.retry;
    if retry.backoff_base_ms > retry.backoff_max_ms {
        warnings.push_with_hint(
            format!(
                "retry backoff_base_ms {} exceeds backoff_max_ms {}",
                retry.backoff_base_ms, retry.backoff_max_ms
            ),
            "Every retry will wait backoff_max_ms",
        );
    }

    Ok(warnings)
}
