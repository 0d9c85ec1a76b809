//! Environment variable names and built-in defaults.

pub const ENV_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_CONFIG_PATH: &str = "TUBESCOUT_CONFIG_PATH";
pub const ENV_API_BASE_URL: &str = "TUBESCOUT_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "TUBESCOUT_REQUEST_TIMEOUT_SECS";
pub const ENV_DETAIL_BATCH_SIZE: &str = "TUBESCOUT_DETAIL_BATCH_SIZE";
pub const ENV_DETAIL_CONCURRENCY: &str = "TUBESCOUT_DETAIL_CONCURRENCY";
pub const ENV_PARTIAL_RESULTS: &str = "TUBESCOUT_PARTIAL_RESULTS";
pub const ENV_MAX_RESULTS: &str = "TUBESCOUT_MAX_RESULTS";
pub const ENV_RETRY_MAX_ATTEMPTS: &str = "TUBESCOUT_RETRY_MAX_ATTEMPTS";
pub const ENV_REGION: &str = "TUBESCOUT_REGION";
pub const ENV_LANGUAGE: &str = "TUBESCOUT_LANGUAGE";
pub const ENV_SAFE_SEARCH: &str = "TUBESCOUT_SAFE_SEARCH";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RESULTS: u32 = 10;
/// Platform cap on results per search page.
pub const MAX_RESULTS_LIMIT: u32 = 50;
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 4;
