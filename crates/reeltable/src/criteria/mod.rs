//! # Predicate Engine
//!
//! This module turns the user's filter inputs into a single yes/no answer per
//! record.
//!
//! ## Criteria
//!
//! | Criterion | Input | Inactive when |
//! |-----------|-------|---------------|
//! | Search | free text | empty string |
//! | Relation A / B | selected relation ids | no id selected |
//! | Status | accepted statuses | no status selected |
//! | Time window | today / last 7 days / last 30 days | no window |
//!
//! Criteria combine with AND. Inside a relation criterion the record's own
//! relation ids combine with OR: one hit is enough.
//!
//! An inactive criterion is simply not built (see [`FilterCriteria::criteria`]),
//! which is what guarantees that "no filter" never excludes a record.
//!
//! ## Evaluation time
//!
//! [`FilterCriteria::criteria`] takes `now` and resolves the time window
//! boundary on every call. Callers pass the wall clock at evaluation time, so
//! a "today" filter shifts at midnight without anyone touching the criteria.

mod filter;
mod window;

pub use filter::Criterion;
pub use window::TimeWindow;

use crate::model::{Record, RelationAxis, Status};
use chrono::{DateTime, TimeZone};
use std::collections::BTreeSet;

/// The full set of filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub relations_a: BTreeSet<String>,
    pub relations_b: BTreeSet<String>,
    pub statuses: BTreeSet<Status>,
    pub window: Option<TimeWindow>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
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

    pub fn with_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Status>,
    {
        self.statuses = statuses.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn relations(&self, axis: RelationAxis) -> &BTreeSet<String> {
        match axis {
            RelationAxis::A => &self.relations_a,
            RelationAxis::B => &self.relations_b,
        }
    }

    pub fn relations_mut(&mut self, axis: RelationAxis) -> &mut BTreeSet<String> {
        match axis {
            RelationAxis::A => &mut self.relations_a,
            RelationAxis::B => &mut self.relations_b,
        }
    }

    /// True when no criterion is active.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.relations_a.is_empty()
            && self.relations_b.is_empty()
            && self.statuses.is_empty()
            && self.window.is_none()
    }

    /// Builds the active criteria, resolving the time window against `now`.
    pub fn criteria<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<Criterion<'_>> {
        let mut criteria = Vec::new();

        if !self.search.is_empty() {
            criteria.push(Criterion::NameContains(self.search.to_lowercase()));
        }
        for axis in RelationAxis::ALL {
            let ids = self.relations(axis);
            if !ids.is_empty() {
                criteria.push(Criterion::RelationAny { axis, ids });
            }
        }
        if !self.statuses.is_empty() {
            criteria.push(Criterion::StatusIn(&self.statuses));
        }
        if let Some(window) = self.window {
            criteria.push(Criterion::CreatedSince(window.start(now)));
        }

        criteria
    }

    /// Checks a single record against every active criterion.
    ///
    /// Prefer building [`FilterCriteria::criteria`] once when testing many
    /// records; this is a convenience for one-off checks.
    pub fn matches<Tz: TimeZone>(&self, record: &Record, now: &DateTime<Tz>) -> bool {
        matches_all(&self.criteria(now), record)
    }
}

/// AND across criteria. An empty slice accepts everything.
pub fn matches_all(criteria: &[Criterion<'_>], record: &Record) -> bool {
    criteria.iter().all(|c| c.matches(record))
}
