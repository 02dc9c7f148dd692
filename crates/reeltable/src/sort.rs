//! # Comparator Registry
//!
//! Every sortable column is a [`SortKey`] variant, and each variant knows how
//! to compare two records:
//!
//! | Key | Compared as |
//! |-----|-------------|
//! | `Name`, `Note` | case-insensitive text, missing = `""` |
//! | `Relation(axis)` | case-insensitive text of the joined relation ids |
//! | `CreatedAt` | absolute instant |
//! | `Status` | rank in the [`StatusOrder`], unknown stages last |
//!
//! The direction flips the comparison uniformly, with one exception: a status
//! the order does not know sorts after every known stage in both directions.
//!
//! Sorting uses `sort_by`, which is stable, so ties keep their source order
//! and a re-render never shuffles equal rows.

use crate::model::{Record, RelationAxis, StatusOrder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    Name,
    Status,
    CreatedAt,
    Note,
    Relation(RelationAxis),
}

impl SortKey {
    pub const COLUMNS: [SortKey; 6] = [
        SortKey::Name,
        SortKey::Status,
        SortKey::Relation(RelationAxis::A),
        SortKey::Relation(RelationAxis::B),
        SortKey::CreatedAt,
        SortKey::Note,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Status => "Status",
            SortKey::CreatedAt => "Created",
            SortKey::Note => "Note",
            SortKey::Relation(axis) => axis.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// The active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    /// Newest records first.
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn ascending(key: SortKey) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    /// Header click: the same key flips direction, a new key starts ascending.
    pub fn select(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.toggled();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Compares two records under this key and direction.
    pub fn compare(&self, a: &Record, b: &Record, order: &StatusOrder) -> Ordering {
        if self.key == SortKey::Status {
            return match (order.rank(&a.status), order.rank(&b.status)) {
                (Some(x), Some(y)) => self.direction.apply(x.cmp(&y)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
        }
        self.direction.apply(compare_ascending(self.key, a, b))
    }
}

/// Ascending comparison for every key except `Status`, which needs the rank table.
fn compare_ascending(key: SortKey, a: &Record, b: &Record) -> Ordering {
    match key {
        SortKey::Name => compare_text(&a.name, &b.name),
        SortKey::Note => compare_text(a.note(), b.note()),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::Relation(axis) => {
            compare_text(&a.relations(axis).join(", "), &b.relations(axis).join(", "))
        }
        SortKey::Status => Ordering::Equal,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Stable in-place sort of a record view.
pub fn sort_records(records: &mut [&Record], config: &SortConfig, order: &StatusOrder) {
    records.sort_by(|a, b| config.compare(a, b, order));
}
