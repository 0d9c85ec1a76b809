use crate::ids::VideoId;

/// Label paired with a category or topic code that has no table entry.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Resolved category. A record either has no category at all or carries
/// both the code and a label, so a code can never silently lose its label.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    /// `false` when `name` is the [`UNKNOWN_LABEL`] marker.
    pub mapped: bool,
}

impl CategoryInfo {
    pub fn mapped(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mapped: true,
        }
    }

    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: UNKNOWN_LABEL.to_string(),
            mapped: false,
        }
    }
}

/// Which response supplied the resolved category code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CategorySource {
    SearchItem,
    Detail,
}

/// Which topic schema produced the displayable topic labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TopicSource {
    Current,
    Legacy,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Provenance {
    pub category: Option<CategorySource>,
    pub topics: TopicSource,
    pub detail_available: bool,
}

/// Canonical merged record handed to filtering and presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizedRecord {
    pub id: VideoId,
    pub url: String,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<String>,
    pub category: Option<CategoryInfo>,
    /// Current-schema topic ids exactly as returned by the detail call.
    pub topic_ids: Vec<String>,
    /// Labels for `topic_ids`; ids without a table entry have no label.
    pub topic_names: Vec<String>,
    /// Labels derived from legacy topic categories. Only filled when the
    /// current topic list is empty.
    pub legacy_topic_names: Vec<String>,
    /// The mapped category label offered as a topic hint. Never consulted by
    /// the topic filter.
    pub inferred_topics: Vec<String>,
    pub restricted: bool,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub duration: Option<String>,
    pub duration_readable: Option<String>,
    pub privacy_status: Option<String>,
    pub provenance: Provenance,
}

impl NormalizedRecord {
    pub fn category_id(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.id.as_str())
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    /// Labels a renderer should show, taken from whichever schema won.
    pub fn display_topics(&self) -> &[String] {
        match self.provenance.topics {
            TopicSource::Current => &self.topic_names,
            TopicSource::Legacy => &self.legacy_topic_names,
            TopicSource::None => &[],
        }
    }
}
