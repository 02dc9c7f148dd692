//! # Domain Model
//!
//! This module defines the data the table engine works on: [`Record`], its
//! identifier [`RecordId`], the stage-like [`Status`] and the [`StatusOrder`]
//! rank table that gives statuses their canonical order.
//!
//! ## Records
//!
//! A record is a single row of the table (a movie, a channel). The engine
//! only looks at the fields it filters and sorts on:
//!
//! | Field | Used by |
//! |-------|---------|
//! | `id` | selection, mutations |
//! | `name` | text search, sort |
//! | `status` | status filter, rank sort, bulk status edit |
//! | `relations_a` / `relations_b` | relation filters, bulk relation edit |
//! | `created_at` | time-window filter, sort |
//! | `note` | sort, inline edit |
//!
//! The identifier is assigned once and never changes. Every other field can be
//! patched in place through a [`RecordPatch`].
//!
//! ## Statuses
//!
//! Statuses are plain names rather than a closed Rust enum because records come
//! from the caller and may carry a stage the configuration does not know about.
//! Such a status is not an error: [`StatusOrder::rank`] returns `None` and the
//! comparator sorts it after every known stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Built-in stage order used when the configuration does not provide one.
pub const DEFAULT_STAGES: &[&str] = &[
    "Playlist",
    "Download",
    "Editing",
    "Upload",
    "Scheduled",
    "Done",
];

/// Unique, immutable identifier of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A named stage of a record's lifecycle (e.g. "Playlist", "Done").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(String);

impl Status {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ordered list of known stages. Position in the list is the sort rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOrder {
    stages: Vec<Status>,
}

impl Default for StatusOrder {
    fn default() -> Self {
        Self::new(DEFAULT_STAGES.iter().copied())
    }
}

impl StatusOrder {
    pub fn new<I, S>(stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stages: stages.into_iter().map(Status::new).collect(),
        }
    }

    pub fn stages(&self) -> &[Status] {
        &self.stages
    }

    /// Rank of a status, or `None` when the stage is unknown.
    pub fn rank(&self, status: &Status) -> Option<usize> {
        self.stages.iter().position(|s| s == status)
    }

    pub fn contains(&self, status: &Status) -> bool {
        self.rank(status).is_some()
    }

    /// The stage new records start in.
    pub fn first(&self) -> Option<&Status> {
        self.stages.first()
    }
}

/// One of the two independent category axes a record can relate to.
///
/// In the channel board these are the "3D" and "2D" channels a movie is
/// published on; the engine treats them generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationAxis {
    A,
    B,
}

impl RelationAxis {
    pub const ALL: [RelationAxis; 2] = [RelationAxis::A, RelationAxis::B];

    pub fn label(self) -> &'static str {
        match self {
            RelationAxis::A => "3D",
            RelationAxis::B => "2D",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub relations_a: Vec<String>,
    #[serde(default)]
    pub relations_b: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Record {
    /// Creates a record with a generated id, created now, with no relations.
    pub fn new(name: impl Into<String>, status: impl Into<Status>) -> Self {
        Self {
            id: RecordId::generate(),
            name: name.into(),
            status: status.into(),
            relations_a: Vec::new(),
            relations_b: Vec::new(),
            created_at: Utc::now(),
            note: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_relations<I, S>(mut self, axis: RelationAxis, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.relations_mut(axis) = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn relations(&self, axis: RelationAxis) -> &[String] {
        match axis {
            RelationAxis::A => &self.relations_a,
            RelationAxis::B => &self.relations_b,
        }
    }

    pub fn relations_mut(&mut self, axis: RelationAxis) -> &mut Vec<String> {
        match axis {
            RelationAxis::A => &mut self.relations_a,
            RelationAxis::B => &mut self.relations_b,
        }
    }

    /// The note, with a missing note read as the empty string.
    pub fn note(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }

    /// Applies every field set in `patch`. The id is never touched.
    pub fn apply(&mut self, patch: &RecordPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(status) = &patch.status {
            self.status = status.clone();
        }
        if let Some(ids) = &patch.relations_a {
            self.relations_a = ids.clone();
        }
        if let Some(ids) = &patch.relations_b {
            self.relations_b = ids.clone();
        }
        if let Some(note) = &patch.note {
            // An empty note clears the field
            self.note = if note.is_empty() {
                None
            } else {
                Some(note.clone())
            };
        }
    }
}

/// A partial update to a record. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub status: Option<Status>,
    pub relations_a: Option<Vec<String>>,
    pub relations_b: Option<Vec<String>>,
    pub note: Option<String>,
}

impl RecordPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn status(status: impl Into<Status>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Default::default()
        }
    }

    pub fn relations(axis: RelationAxis, ids: Vec<String>) -> Self {
        let mut patch = Self::default();
        match axis {
            RelationAxis::A => patch.relations_a = Some(ids),
            RelationAxis::B => patch.relations_b = Some(ids),
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.relations_a.is_none()
            && self.relations_b.is_none()
            && self.note.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_ranks_stages_by_position() {
        let order = StatusOrder::default();
        assert_eq!(order.rank(&Status::from("Playlist")), Some(0));
        assert_eq!(order.rank(&Status::from("Done")), Some(5));
        assert_eq!(order.first(), Some(&Status::from("Playlist")));
    }

    #[test]
    fn unknown_status_has_no_rank() {
        let order = StatusOrder::default();
        assert_eq!(order.rank(&Status::from("Archived")), None);
        assert!(!order.contains(&Status::from("done")));
    }

    #[test]
    fn patch_updates_only_given_fields() {
        let mut record = Record::new("Alien", "Playlist")
            .with_id("m1")
            .with_relations(RelationAxis::A, ["c1", "c2"])
            .with_note("classic");

        record.apply(&RecordPatch::relations(RelationAxis::A, vec!["c3".into()]));

        assert_eq!(record.id.as_str(), "m1");
        assert_eq!(record.name, "Alien");
        assert_eq!(record.relations_a, vec!["c3".to_string()]);
        assert_eq!(record.note(), "classic");
    }

    #[test]
    fn empty_note_patch_clears_note() {
        let mut record = Record::new("Alien", "Playlist").with_note("classic");
        record.apply(&RecordPatch::note(""));
        assert_eq!(record.note, None);
        assert_eq!(record.note(), "");
    }

    #[test]
    fn record_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "id": "m1",
            "name": "Heat",
            "status": "Download",
            "created_at": "2024-03-01T10:00:00Z"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::from("m1"));
        assert!(record.relations_a.is_empty());
        assert!(record.relations_b.is_empty());
        assert_eq!(record.note, None);
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(RecordPatch::default().is_empty());
        assert!(!RecordPatch::status("Done").is_empty());
    }
}
