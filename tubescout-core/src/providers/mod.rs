pub mod traits;
mod wire;
pub mod youtube;

pub use traits::PlatformClient;
pub use youtube::{YouTubeClient, YouTubeClientSettings};

/// Platform limit on ids per detail call.
pub const MAX_DETAIL_BATCH_SIZE: usize = 50;

/// Platform limit on `maxResults` for one search page.
pub const MAX_SEARCH_RESULTS: u32 = 50;
