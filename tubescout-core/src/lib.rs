//! Tubescout core: two-stage video discovery.
//!
//! A run issues one coarse search, fetches full metadata for the returned ids
//! in batches, merges both shapes into a [`NormalizedRecord`] and applies the
//! predicates the search endpoint cannot express. Channel and playlist runs
//! take the same search and batched lookup route but end in summaries. The platform is reached
//! only through [`PlatformClient`], so everything past the client is
//! synchronous and testable without a network.
//!
//! [`NormalizedRecord`]: tubescout_model::NormalizedRecord
#![allow(missing_docs)]

pub mod catalog;
pub mod enrichment;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod providers;
pub mod retry;

pub use error::{
    BatchFailure, FailureKind, LookupFailure, MalformedItem, PipelineError, ProviderError,
    Result,
};
pub use pipeline::{
    DiscoveryPipeline, PartialResultPolicy, PipelineSettings, RunOutcome, SearchFailure,
};
pub use providers::{PlatformClient, YouTubeClient, YouTubeClientSettings};
pub use retry::RetryPolicy;
