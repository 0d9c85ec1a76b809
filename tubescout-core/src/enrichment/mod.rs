//! The detail stage: batching, merging and post-merge filtering, plus the
//! lookup path for channel and playlist results.

pub mod batch;
pub mod filter;
pub mod normalize;
pub mod resources;

pub use batch::{BatchCoordinator, DetailFetch, DetailFetchSettings, distinct_ids, partition};
pub use filter::{ExclusionReason, FilterDecision, evaluate};
pub use normalize::{WATCH_URL_PREFIX, format_legacy_topic, normalize, watch_url};
pub use resources::{
    ResourceLookup, dedupe_resources, distinct_resource_ids, lookup_resources, resource_id,
    summarize_channel, summarize_playlist,
};
