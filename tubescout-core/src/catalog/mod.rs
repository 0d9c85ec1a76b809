//! Static lookup tables translating platform codes into display labels.
//!
//! Both tables are built once on first use and never mutated, so concurrent
//! pipeline runs share them without locking. A miss is not an error: callers
//! get [`Lookup::Unknown`], whose label is [`UNKNOWN_LABEL`].

mod categories;
mod topics;

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tubescout_model::{CategoryInfo, UNKNOWN_LABEL};

static CATEGORY_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| categories::VIDEO_CATEGORIES.iter().copied().collect());

static TOPIC_INDEX: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| topics::TOPICS.iter().copied().collect());

/// Result of a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Known(&'static str),
    Unknown,
}

impl Lookup {
    pub fn label(&self) -> &'static str {
        match self {
            Lookup::Known(label) => *label,
            Lookup::Unknown => UNKNOWN_LABEL,
        }
    }

    pub fn known(&self) -> Option<&'static str> {
        match self {
            Lookup::Known(label) => Some(*label),
            Lookup::Unknown => None,
        }
    }
}

pub fn lookup_category(code: &str) -> Lookup {
    CATEGORY_INDEX
        .get(code.trim())
        .map_or(Lookup::Unknown, |label| Lookup::Known(*label))
}

pub fn lookup_topic(topic_id: &str) -> Lookup {
    TOPIC_INDEX
        .get(topic_id.trim())
        .map_or(Lookup::Unknown, |label| Lookup::Known(*label))
}

/// Pair a category code with its label, keeping unmapped codes visible.
pub fn resolve_category(code: &str) -> CategoryInfo {
    match lookup_category(code) {
        Lookup::Known(label) => CategoryInfo::mapped(code, label),
        Lookup::Unknown => CategoryInfo::unknown(code),
    }
}

/// All categories in platform order.
pub fn categories() -> &'static [(&'static str, &'static str)] {
    categories::VIDEO_CATEGORIES
}

/// All topics grouped by parent topic.
pub fn topics() -> &'static [(&'static str, &'static str)] {
    topics::TOPICS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn category_codes_are_unique() {
        let codes: HashSet<_> = categories().iter().map(|(c, _)| c).collect();
        assert_eq!(codes.len(), categories().len());
        assert_eq!(CATEGORY_INDEX.len(), categories().len());
    }

    #[test]
    fn topic_ids_are_unique() {
        let ids: HashSet<_> = topics().iter().map(|(id, _)| id).collect();
        assert_eq!(ids.len(), topics().len());
        assert!(topics().len() >= 60);
    }

    #[test]
    fn known_codes_resolve() {
        assert_eq!(lookup_category("10"), Lookup::Known("Music"));
        assert_eq!(lookup_category(" 28 "), Lookup::Known("Science & Technology"));
        assert_eq!(lookup_topic("/m/04rlf"), Lookup::Known("Music"));
        assert_eq!(lookup_topic("/m/0bzvm2").label(), "Gaming");
    }

    #[test]
    fn misses_return_unknown_sentinel() {
        assert_eq!(lookup_category("999"), Lookup::Unknown);
        assert_eq!(lookup_category("999").label(), UNKNOWN_LABEL);
        assert_eq!(lookup_topic("/m/nope").known(), None);
    }

    #[test]
    fn unmapped_category_keeps_raw_code() {
        let info = resolve_category("77");
        assert_eq!(info.id, "77");
        assert_eq!(info.name, UNKNOWN_LABEL);
        assert!(!info.mapped);

        let music = resolve_category("10");
        assert!(music.mapped);
        assert_eq!(music.name, "Music");
    }
}
