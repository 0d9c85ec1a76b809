use crate::ids::VideoId;

/// Full per-video metadata returned by the batched detail call.
///
/// Every field besides `id` is optional on the platform side. Counters stay
/// `None` when omitted; they are never defaulted to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailRecord {
    pub id: VideoId,
    pub category_id: Option<String>,
    /// Current topic schema: Knowledge Graph ids such as `/m/04rlf`.
    pub topic_ids: Vec<String>,
    /// Legacy topic schema: Wikipedia category URLs. Deprecated upstream.
    pub topic_categories: Vec<String>,
    pub made_for_kids: Option<bool>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    /// ISO-8601 duration, e.g. `PT4M13S`.
    pub duration: Option<String>,
    pub privacy_status: Option<String>,
    pub published_at: Option<String>,
}

impl DetailRecord {
    pub fn new(id: VideoId) -> Self {
        Self {
            id,
            category_id: None,
            topic_ids: Vec::new(),
            topic_categories: Vec::new(),
            made_for_kids: None,
            view_count: None,
            like_count: None,
            comment_count: None,
            duration: None,
            privacy_status: None,
            published_at: None,
        }
    }
}
