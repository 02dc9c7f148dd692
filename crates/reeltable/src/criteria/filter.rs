//! Individual filter criteria.
//!
//! Each [`Criterion`] is one independent dimension of the filter. A record
//! passes the filter when it matches every active criterion. Inactive
//! criteria (empty search, empty selections, no window) are never built, so
//! they cannot exclude anything.

use crate::model::{Record, RelationAxis, Status};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// A single active filter condition, borrowed from a [`super::FilterCriteria`].
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion<'a> {
    /// Case-insensitive substring of the display name. Holds the lowercased needle.
    NameContains(String),
    /// At least one of the record's relations on `axis` is in `ids`.
    RelationAny {
        axis: RelationAxis,
        ids: &'a BTreeSet<String>,
    },
    /// Record status is one of the accepted statuses.
    StatusIn(&'a BTreeSet<Status>),
    /// Record was created at or after the given instant.
    CreatedSince(DateTime<Utc>),
}

impl Criterion<'_> {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Criterion::NameContains(needle) => record.name.to_lowercase().contains(needle),
            Criterion::RelationAny { axis, ids } => {
                // No relations means nothing to match against
                record.relations(*axis).iter().any(|id| ids.contains(id))
            }
            Criterion::StatusIn(accepted) => accepted.contains(&record.status),
            Criterion::CreatedSince(start) => record.created_at >= *start,
        }
    }

    pub fn is_status(&self) -> bool {
        matches!(self, Criterion::StatusIn(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn name_search_is_case_insensitive_substring() {
        let record = Record::new("The Dark Knight", "Playlist");
        assert!(Criterion::NameContains("dark kn".into()).matches(&record));
        assert!(!Criterion::NameContains("darkknight".into()).matches(&record));
    }

    #[test]
    fn name_search_treats_pattern_characters_literally() {
        let record = Record::new("Who? (1970)", "Playlist");
        assert!(Criterion::NameContains("? (19".into()).matches(&record));
        assert!(!Criterion::NameContains("w.o".into()).matches(&record));
    }

    #[test]
    fn relation_matches_any_of_the_record_ids() {
        let wanted = ids(&["c2", "c9"]);
        let criterion = Criterion::RelationAny {
            axis: RelationAxis::A,
            ids: &wanted,
        };

        let hit = Record::new("A", "Playlist").with_relations(RelationAxis::A, ["c1", "c2"]);
        let miss = Record::new("B", "Playlist").with_relations(RelationAxis::A, ["c1"]);
        let other_axis = Record::new("C", "Playlist").with_relations(RelationAxis::B, ["c2"]);

        assert!(criterion.matches(&hit));
        assert!(!criterion.matches(&miss));
        assert!(!criterion.matches(&other_axis));
    }

    #[test]
    fn record_without_relations_never_matches_relation_filter() {
        let wanted = ids(&["c1"]);
        let criterion = Criterion::RelationAny {
            axis: RelationAxis::B,
            ids: &wanted,
        };
        assert!(!criterion.matches(&Record::new("Bare", "Playlist")));
    }

    #[test]
    fn status_in_accepts_listed_statuses_only() {
        let accepted: BTreeSet<Status> = ["Done", "Upload"].into_iter().map(Status::from).collect();
        let criterion = Criterion::StatusIn(&accepted);

        assert!(criterion.matches(&Record::new("A", "Done")));
        assert!(!criterion.matches(&Record::new("B", "Playlist")));
        assert!(criterion.is_status());
    }
}
