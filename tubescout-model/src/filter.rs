use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::ModelError;
use crate::search::SearchQuery;

/// Post-merge policy for the restricted (made-for-kids) flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RestrictedPolicy {
    #[default]
    Any,
    Require,
    Exclude,
}

impl RestrictedPolicy {
    pub fn all() -> &'static [RestrictedPolicy] {
        &[
            RestrictedPolicy::Any,
            RestrictedPolicy::Require,
            RestrictedPolicy::Exclude,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RestrictedPolicy::Any => "any",
            RestrictedPolicy::Require => "require",
            RestrictedPolicy::Exclude => "exclude",
        }
    }
}

impl FromStr for RestrictedPolicy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(RestrictedPolicy::Any),
            "require" | "yes" => Ok(RestrictedPolicy::Require),
            "exclude" | "no" => Ok(RestrictedPolicy::Exclude),
            other => Err(ModelError::UnknownOption {
                kind: "restricted policy",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SafeSearch {
    #[default]
    Moderate,
    Strict,
    None,
}

impl SafeSearch {
    pub fn all() -> &'static [SafeSearch] {
        &[SafeSearch::Moderate, SafeSearch::Strict, SafeSearch::None]
    }

    pub fn api_name(&self) -> &'static str {
        match self {
            SafeSearch::Moderate => "moderate",
            SafeSearch::Strict => "strict",
            SafeSearch::None => "none",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SafeSearch::Moderate => "Moderate",
            SafeSearch::Strict => "Strict",
            SafeSearch::None => "None",
        }
    }
}

impl FromStr for SafeSearch {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moderate" => Ok(SafeSearch::Moderate),
            "strict" => Ok(SafeSearch::Strict),
            "none" => Ok(SafeSearch::None),
            other => Err(ModelError::UnknownOption {
                kind: "safe search level",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SearchOrder {
    #[default]
    Relevance,
    Date,
    Rating,
    ViewCount,
    Title,
}

impl SearchOrder {
    pub fn all() -> &'static [SearchOrder] {
        use SearchOrder::*;
        &[Relevance, Date, Rating, ViewCount, Title]
    }

    pub fn api_name(&self) -> &'static str {
        match self {
            SearchOrder::Relevance => "relevance",
            SearchOrder::Date => "date",
            SearchOrder::Rating => "rating",
            SearchOrder::ViewCount => "viewCount",
            SearchOrder::Title => "title",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchOrder::Relevance => "Relevance",
            SearchOrder::Date => "Upload date",
            SearchOrder::Rating => "Rating",
            SearchOrder::ViewCount => "View count",
            SearchOrder::Title => "Title",
        }
    }
}

impl FromStr for SearchOrder {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(SearchOrder::Relevance),
            "date" => Ok(SearchOrder::Date),
            "rating" => Ok(SearchOrder::Rating),
            "viewcount" | "view_count" | "views" => Ok(SearchOrder::ViewCount),
            "title" => Ok(SearchOrder::Title),
            other => Err(ModelError::UnknownOption {
                kind: "search order",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VideoDuration {
    Any,
    Short,
    Medium,
    Long,
}

impl VideoDuration {
    pub fn all() -> &'static [VideoDuration] {
        use VideoDuration::*;
        &[Any, Short, Medium, Long]
    }

    pub fn api_name(&self) -> &'static str {
        match self {
            VideoDuration::Any => "any",
            VideoDuration::Short => "short",
            VideoDuration::Medium => "medium",
            VideoDuration::Long => "long",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoDuration::Any => "Any duration",
            VideoDuration::Short => "Short (< 4 minutes)",
            VideoDuration::Medium => "Medium (4-20 minutes)",
            VideoDuration::Long => "Long (> 20 minutes)",
        }
    }
}

impl FromStr for VideoDuration {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(VideoDuration::Any),
            "short" => Ok(VideoDuration::Short),
            "medium" => Ok(VideoDuration::Medium),
            "long" => Ok(VideoDuration::Long),
            other => Err(ModelError::UnknownOption {
                kind: "video duration",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VideoDefinition {
    Any,
    High,
    Standard,
}

impl VideoDefinition {
    pub fn all() -> &'static [VideoDefinition] {
        &[
            VideoDefinition::Any,
            VideoDefinition::High,
            VideoDefinition::Standard,
        ]
    }

    pub fn api_name(&self) -> &'static str {
        match self {
            VideoDefinition::Any => "any",
            VideoDefinition::High => "high",
            VideoDefinition::Standard => "standard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VideoDefinition::Any => "Any quality",
            VideoDefinition::High => "High Definition",
            VideoDefinition::Standard => "Standard Definition",
        }
    }
}

impl FromStr for VideoDefinition {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(VideoDefinition::Any),
            "high" | "hd" => Ok(VideoDefinition::High),
            "standard" | "sd" => Ok(VideoDefinition::Standard),
            other => Err(ModelError::UnknownOption {
                kind: "video definition",
                value: other.to_string(),
            }),
        }
    }
}

/// Resource kind requested from the search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ContentType {
    #[default]
    Video,
    Channel,
    Playlist,
}

impl ContentType {
    pub fn api_name(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Channel => "channel",
            ContentType::Playlist => "playlist",
        }
    }
}

impl FromStr for ContentType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(ContentType::Video),
            "channel" => Ok(ContentType::Channel),
            "playlist" => Ok(ContentType::Playlist),
            other => Err(ModelError::UnknownOption {
                kind: "content type",
                value: other.to_string(),
            }),
        }
    }
}

macro_rules! display_via {
    ($ty:ty, $method:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.$method())
            }
        }
    };
}

display_via!(RestrictedPolicy, as_str);
display_via!(SafeSearch, api_name);
display_via!(SearchOrder, api_name);
display_via!(VideoDuration, api_name);
display_via!(VideoDefinition, api_name);
display_via!(ContentType, api_name);

/// Everything the user asked for in one discovery run.
///
/// Fields split into two groups: parameters forwarded to the search call
/// (query through `category_ids`) and post-merge predicates (`topic_id`,
/// `restricted`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterSpec {
    pub query: String,
    pub content_type: ContentType,
    pub max_results: u32,
    pub order: SearchOrder,
    pub safe_search: SafeSearch,
    pub duration: Option<VideoDuration>,
    pub definition: Option<VideoDefinition>,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    pub region: Option<String>,
    pub language: Option<String>,
    /// Pre-search filter. More than one id fans out into one search per id.
    pub category_ids: Vec<String>,
    pub topic_id: Option<String>,
    pub restricted: RestrictedPolicy,
}

impl FilterSpec {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            content_type: ContentType::Video,
            max_results: 10,
            order: SearchOrder::default(),
            safe_search: SafeSearch::default(),
            duration: None,
            definition: None,
            published_after: None,
            published_before: None,
            region: None,
            language: None,
            category_ids: Vec::new(),
            topic_id: None,
            restricted: RestrictedPolicy::Any,
        }
    }

    /// Category ids with blanks and duplicates removed, order preserved.
    pub fn target_categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for raw in &self.category_ids {
            let id = raw.trim();
            if !id.is_empty() && !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }

    /// The topic filter, if one was actually set.
    pub fn target_topic(&self) -> Option<&str> {
        self.topic_id
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Name of the first set filter that only makes sense for videos.
    pub fn video_only_filter(&self) -> Option<&'static str> {
        if !self.target_categories().is_empty() {
            Some("category")
        } else if self.target_topic().is_some() {
            Some("topic")
        } else if self.restricted != RestrictedPolicy::Any {
            Some("restricted")
        } else if self.duration.is_some() {
            Some("duration")
        } else if self.definition.is_some() {
            Some("definition")
        } else {
            None
        }
    }

    /// Search-call parameters for one (optional) category.
    pub fn search_query(&self, category_id: Option<&str>) -> SearchQuery {
        SearchQuery {
            query: self.query.clone(),
            content_type: self.content_type,
            max_results: self.max_results,
            order: self.order,
            safe_search: self.safe_search,
            duration: self.duration,
            definition: self.definition,
            category_id: category_id.map(str::to_string),
            published_after: self.published_after,
            published_before: self.published_before,
            region: self.region.clone(),
            language: self.language.clone(),
        }
    }
}
