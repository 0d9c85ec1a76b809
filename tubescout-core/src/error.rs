use thiserror::Error;
use tubescout_model::{ContentType, VideoId};

/// How a failed platform call should be treated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connectivity, timeouts, 5xx. Worth retrying; partial results are usable.
    Transient,
    /// The platform refused the call (quota, key, permissions). Fatal for the run.
    QuotaOrAuth,
    /// The call was malformed or the response unreadable. Retrying won't help,
    /// but the failure is scoped to the call that produced it.
    Permanent,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::ServerError { .. }
            | ProviderError::Timeout
            | ProviderError::NetworkError(_) => FailureKind::Transient,
            ProviderError::QuotaExceeded(_)
            | ProviderError::RateLimited
            | ProviderError::InvalidApiKey
            | ProviderError::Forbidden(_)
            | ProviderError::NotConfigured(_) => FailureKind::QuotaOrAuth,
            ProviderError::ApiError { .. } | ProviderError::ParseError(_) => {
                FailureKind::Permanent
            }
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == FailureKind::Transient
    }

    pub fn is_fatal(&self) -> bool {
        self.kind() == FailureKind::QuotaOrAuth
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs stay out of messages that end up in logs and reports.
        let err = err.without_url();
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::ParseError(err.to_string())
        } else {
            ProviderError::NetworkError(err.to_string())
        }
    }
}

/// A search item that cannot become a record because it has no identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("search item has no usable id (title: {title:?})")]
pub struct MalformedItem {
    pub title: String,
}

/// One detail batch that did not produce data.
#[derive(Debug, Clone, Error)]
#[error(
    "detail batch {batch_index} ({count} ids) failed after {attempts} attempt(s): {source}",
    count = .ids.len()
)]
pub struct BatchFailure {
    pub batch_index: usize,
    pub ids: Vec<VideoId>,
    pub attempts: u32,
    pub source: ProviderError,
}

impl BatchFailure {
    pub fn kind(&self) -> FailureKind {
        self.source.kind()
    }

    /// A transient failure that survived every retry.
    pub fn retries_exhausted(&self) -> bool {
        self.attempts > 1 && self.source.is_transient()
    }
}

/// One channel or playlist lookup batch that did not produce data.
#[derive(Debug, Clone, Error)]
#[error(
    "{content_type} lookup batch {batch_index} ({count} ids) failed after {attempts} attempt(s): {source}",
    count = .ids.len()
)]
pub struct LookupFailure {
    pub content_type: ContentType,
    pub batch_index: usize,
    pub ids: Vec<String>,
    pub attempts: u32,
    pub source: ProviderError,
}

impl LookupFailure {
    pub fn kind(&self) -> FailureKind {
        self.source.kind()
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{filter} only applies to videos, not to {content_type} searches")]
    VideoOnlyFilter {
        content_type: ContentType,
        filter: &'static str,
    },

    #[error("search rejected by platform (category {category_id:?}): {source}")]
    SearchRejected {
        category_id: Option<String>,
        source: ProviderError,
    },

    #[error("search failed (category {category_id:?}): {source}")]
    SearchFailed {
        category_id: Option<String>,
        source: ProviderError,
    },

    #[error("detail call rejected by platform: {0}")]
    DetailRejected(#[source] BatchFailure),

    #[error("detail enrichment incomplete: {} batch(es) failed", .0.len())]
    IncompleteDetails(Vec<BatchFailure>),

    #[error("lookup rejected by platform: {0}")]
    LookupRejected(#[source] LookupFailure),

    #[error("lookup incomplete: {} batch(es) failed", .0.len())]
    IncompleteLookups(Vec<LookupFailure>),
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::VideoOnlyFilter { .. } => FailureKind::Permanent,
            PipelineError::SearchRejected { .. }
            | PipelineError::DetailRejected(_)
            | PipelineError::LookupRejected(_) => FailureKind::QuotaOrAuth,
            PipelineError::SearchFailed { source, .. } => source.kind(),
            PipelineError::IncompleteDetails(_) | PipelineError::IncompleteLookups(_) => {
                FailureKind::Transient
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_matches_failure_policy() {
        assert_eq!(ProviderError::Timeout.kind(), FailureKind::Transient);
        assert_eq!(
            ProviderError::ServerError {
                status: 503,
                message: "backend".into()
            }
            .kind(),
            FailureKind::Transient
        );
        assert!(ProviderError::QuotaExceeded("daily".into()).is_fatal());
        assert!(ProviderError::InvalidApiKey.is_fatal());
        assert!(ProviderError::RateLimited.is_fatal());
        assert_eq!(
            ProviderError::ParseError("eof".into()).kind(),
            FailureKind::Permanent
        );
    }

    #[test]
    fn batch_failure_message_names_batch_and_size() {
        let failure = BatchFailure {
            batch_index: 2,
            ids: vec![
                VideoId::parse("a").unwrap(),
                VideoId::parse("b").unwrap(),
            ],
            attempts: 3,
            source: ProviderError::Timeout,
        };
        let message = failure.to_string();
        assert!(message.contains("batch 2"), "{message}");
        assert!(message.contains("2 ids"), "{message}");
        assert!(message.contains("3 attempt"), "{message}");
        assert!(failure.retries_exhausted());
    }
}
