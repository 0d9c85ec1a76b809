use async_trait::async_trait;
use tubescout_model::{
    ChannelDetail, DetailRecord, PlaylistDetail, SearchQuery, SearchResultItem, VideoId,
};

use crate::error::ProviderError;

/// The call shapes the pipeline needs from the content platform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Coarse search. Returns items in platform order.
    async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResultItem>, ProviderError>;

    /// Detail lookup for at most
    /// [`MAX_DETAIL_BATCH_SIZE`](super::MAX_DETAIL_BATCH_SIZE) ids.
    /// Ids the platform no longer knows are simply absent from the result.
    async fn get_details(
        &self,
        ids: &[VideoId],
    ) -> Result<Vec<DetailRecord>, ProviderError>;

    /// Channel lookup, same batch limit and absence rule as
    /// [`get_details`](Self::get_details).
    async fn get_channels(
        &self,
        ids: &[String],
    ) -> Result<Vec<ChannelDetail>, ProviderError>;

    async fn get_playlists(
        &self,
        ids: &[String],
    ) -> Result<Vec<PlaylistDetail>, ProviderError>;
}
