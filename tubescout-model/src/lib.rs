//! Core data model definitions shared across Tubescout crates.
#![allow(missing_docs)]

pub mod detail;
pub mod error;
pub mod filter;
pub mod ids;
pub mod record;
pub mod resource;
pub mod search;

pub use detail::DetailRecord;
pub use error::ModelError;
pub use filter::{
    ContentType, FilterSpec, RestrictedPolicy, SafeSearch, SearchOrder,
    VideoDefinition, VideoDuration,
};
pub use ids::VideoId;
pub use record::{
    CategoryInfo, CategorySource, NormalizedRecord, Provenance, TopicSource,
    UNKNOWN_LABEL,
};
pub use resource::{
    ChannelDetail, ChannelSummary, PlaylistDetail, PlaylistSummary, ResourceDetail,
    channel_url, playlist_url,
};
pub use search::{SearchQuery, SearchResultItem};
