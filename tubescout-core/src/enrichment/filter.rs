use std::fmt;

use tubescout_model::{FilterSpec, NormalizedRecord, RestrictedPolicy};

/// Why a record was dropped by [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    TopicMismatch { wanted: String },
    /// The record has no current topic ids to match against.
    MissingTopics { wanted: String },
    RestrictedRequired,
    RestrictedExcluded,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::TopicMismatch { wanted } => {
                write!(f, "topic {wanted} not among the record's topics")
            }
            ExclusionReason::MissingTopics { wanted } => {
                write!(f, "record has no topics to match {wanted}")
            }
            ExclusionReason::RestrictedRequired => {
                f.write_str("restricted content required")
            }
            ExclusionReason::RestrictedExcluded => {
                f.write_str("restricted content excluded")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    Include,
    Exclude(ExclusionReason),
}

impl FilterDecision {
    pub fn is_included(&self) -> bool {
        matches!(self, FilterDecision::Include)
    }
}

/// Post-merge predicates, first failure wins. Category is not re-checked
/// here; it was already applied by the search call.
pub fn evaluate(record: &NormalizedRecord, spec: &FilterSpec) -> FilterDecision {
    match check_topic(record, spec.target_topic())
        .and_then(|()| check_restricted(record, spec.restricted))
    {
        Ok(()) => FilterDecision::Include,
        Err(reason) => FilterDecision::Exclude(reason),
    }
}

fn check_topic(
    record: &NormalizedRecord,
    target: Option<&str>,
) -> Result<(), ExclusionReason> {
    let Some(wanted) = target else {
        return Ok(());
    };
    if record.topic_ids.is_empty() {
        return Err(ExclusionReason::MissingTopics {
            wanted: wanted.to_string(),
        });
    }
    if record.topic_ids.iter().any(|topic| topic.trim() == wanted) {
        Ok(())
    } else {
        Err(ExclusionReason::TopicMismatch {
            wanted: wanted.to_string(),
        })
    }
}

fn check_restricted(
    record: &NormalizedRecord,
    policy: RestrictedPolicy,
) -> Result<(), ExclusionReason> {
    match (policy, record.restricted) {
        (RestrictedPolicy::Require, false) => Err(ExclusionReason::RestrictedRequired),
        (RestrictedPolicy::Exclude, true) => Err(ExclusionReason::RestrictedExcluded),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::normalize;
    use tubescout_model::{DetailRecord, SearchResultItem, VideoId};

    fn record(topics: &[&str], restricted: Option<bool>) -> NormalizedRecord {
        let id = VideoId::parse("abc").unwrap();
        let mut detail = DetailRecord::new(id.clone());
        detail.topic_ids = topics.iter().map(|t| t.to_string()).collect();
        detail.made_for_kids = restricted;
        normalize(&SearchResultItem::with_id(id), Some(&detail)).unwrap()
    }

    #[test]
    fn no_topic_filter_passes_empty_topic_lists() {
        let spec = FilterSpec::new("q");
        assert!(evaluate(&record(&[], None), &spec).is_included());
    }

    #[test]
    fn inferred_topics_do_not_satisfy_the_topic_filter() {
        let id = VideoId::parse("abc").unwrap();
        let mut detail = DetailRecord::new(id.clone());
        detail.category_id = Some("10".into());
        let record = normalize(&SearchResultItem::with_id(id), Some(&detail)).unwrap();
        assert_eq!(record.inferred_topics, vec!["Music"]);

        let mut spec = FilterSpec::new("q");
        spec.topic_id = Some("Music".into());
        assert!(!evaluate(&record, &spec).is_included());
    }

    #[test]
    fn topic_filter_excludes_empty_topic_lists() {
        let mut spec = FilterSpec::new("q");
        spec.topic_id = Some("/m/04rlf".into());
        assert_eq!(
            evaluate(&record(&[], None), &spec),
            FilterDecision::Exclude(ExclusionReason::MissingTopics {
                wanted: "/m/04rlf".into()
            })
        );
        assert!(evaluate(&record(&["/m/04rlf"], None), &spec).is_included());
        assert!(matches!(
            evaluate(&record(&["/m/0bzvm2"], None), &spec),
            FilterDecision::Exclude(ExclusionReason::TopicMismatch { .. })
        ));
    }

    #[test]
    fn restricted_policies() {
        let mut spec = FilterSpec::new("q");
        spec.restricted = RestrictedPolicy::Exclude;
        assert!(!evaluate(&record(&[], Some(true)), &spec).is_included());
        assert!(evaluate(&record(&[], Some(false)), &spec).is_included());
        assert!(evaluate(&record(&[], None), &spec).is_included());

        spec.restricted = RestrictedPolicy::Require;
        assert_eq!(
            evaluate(&record(&[], None), &spec),
            FilterDecision::Exclude(ExclusionReason::RestrictedRequired)
        );
        assert!(evaluate(&record(&[], Some(true)), &spec).is_included());

        spec.restricted = RestrictedPolicy::Any;
        assert!(evaluate(&record(&[], Some(true)), &spec).is_included());
    }

    #[test]
    fn topic_failure_is_reported_before_restricted_failure() {
        let mut spec = FilterSpec::new("q");
        spec.topic_id = Some("/m/04rlf".into());
        spec.restricted = RestrictedPolicy::Require;
        assert!(matches!(
            evaluate(&record(&["/m/0bzvm2"], Some(false)), &spec),
            FilterDecision::Exclude(ExclusionReason::TopicMismatch { .. })
        ));
    }
}
