//! # Table Facade
//!
//! [`TableEngine`] is the single entry point a UI talks to. It owns the
//! interaction state (criteria, sort, page, selection, bulk menu, delete
//! prompt) and borrows records from a [`RecordStore`].
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Recomputes** the view on demand by running the pure [`pipeline`]
//! - **Enforces page policy**: any criteria change resets to page 1, a sort
//!   change does not
//! - **Layers Escape**: delete prompt first, then an open bulk menu, then the
//!   selection; one Escape closes one level
//! - **Blocks on delete confirmation**: while the prompt is open, criteria,
//!   selection and bulk intents are ignored so the records being confirmed
//!   cannot change under the dialog
//! - **Dispatches** committed edits and deletions to the store
//!
//! ## What the Facade Does NOT Do
//!
//! - **Rendering**: it returns [`PageView`]s, not strings or widgets
//! - **Persistence**: the store decides what a mutation means
//! - **Retries**: failed store calls are logged and counted, nothing more
//!
//! ## Time
//!
//! Time-window criteria are resolved against the engine's clock every time a
//! view is computed. The clock defaults to [`Local::now`] so "today" means the
//! user's calendar day; tests swap it with [`TableEngine::with_clock`].

use crate::bulk::{delete_records, BulkKind, BulkMenu, CommitReport, DeletePrompt, DeleteReport};
use crate::config::TableConfig;
use crate::criteria::{matches_all, Criterion, FilterCriteria, TimeWindow};
use crate::error::Result;
use crate::model::{RecordId, RecordPatch, RelationAxis, Status, StatusOrder, DEFAULT_STAGES};
use crate::pipeline::{self, PageRequest, PageView};
use crate::selection::Selection;
use crate::sort::{SortConfig, SortKey};
use crate::store::RecordStore;
use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Which context an Escape closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escaped {
    DeleteDialog,
    BulkMenu,
    Selection,
    Nothing,
}

/// Record counts per status under the current non-status criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// One entry per configured stage, in stage order.
    pub stages: Vec<(Status, usize)>,
    /// Records whose status is not a configured stage.
    pub unknown: usize,
}

pub struct TableEngine<S: RecordStore> {
    store: S,
    order: StatusOrder,
    page_size: usize,
    clock: fn() -> DateTime<Local>,
    criteria: FilterCriteria,
    sort: SortConfig,
    page: usize,
    selection: Selection,
    bulk: BulkMenu,
    delete_prompt: DeletePrompt,
}

impl<S: RecordStore> TableEngine<S> {
    pub fn new(store: S, config: &TableConfig) -> Self {
        Self {
            store,
            order: config.status_order(),
            page_size: config.rows_per_page.max(1),
            clock: Local::now,
            criteria: FilterCriteria::default(),
            sort: SortConfig::default(),
            page: 1,
            selection: Selection::new(),
            bulk: BulkMenu::Closed,
            delete_prompt: DeletePrompt::Hidden,
        }
    }

    /// Replaces the wall clock used to resolve time windows.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn status_order(&self) -> &StatusOrder {
        &self.order
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn bulk_menu(&self) -> &BulkMenu {
        &self.bulk
    }

    pub fn delete_prompt(&self) -> DeletePrompt {
        self.delete_prompt
    }

    fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    fn is_confirming(&self) -> bool {
        self.delete_prompt.is_open()
    }

    // --- View ---

    /// The current page, recomputed from the store's records.
    pub fn view(&self) -> PageView<'_> {
        pipeline::view(
            self.store.records(),
            &self.criteria,
            &self.sort,
            &self.order,
            PageRequest::new(self.page, self.page_size),
            &self.now(),
        )
    }

    /// Ids of every record passing the filter, across all pages, in view order.
    pub fn filtered_ids(&self) -> Vec<RecordId> {
        pipeline::filtered(
            self.store.records(),
            &self.criteria,
            &self.sort,
            &self.order,
            &self.now(),
        )
        .into_iter()
        .map(|r| r.id.clone())
        .collect()
    }

    fn filtered_count(&self) -> usize {
        let now = self.now();
        let active = self.criteria.criteria(&now);
        self.store
            .records()
            .iter()
            .filter(|r| matches_all(&active, r))
            .count()
    }

    fn total_pages(&self) -> usize {
        pipeline::total_pages(self.filtered_count(), self.page_size)
    }

    // --- Criteria (each change resets to page 1) ---

    pub fn set_search(&mut self, text: impl Into<String>) {
        if self.is_confirming() {
            return;
        }
        let text = text.into();
        if self.criteria.search != text {
            self.criteria.search = text;
            self.criteria_changed();
        }
    }

    /// Adds or removes one id from a relation filter.
    pub fn toggle_relation_filter(&mut self, axis: RelationAxis, id: impl Into<String>) {
        if self.is_confirming() {
            return;
        }
        let id = id.into();
        let ids = self.criteria.relations_mut(axis);
        if !ids.remove(&id) {
            ids.insert(id);
        }
        self.criteria_changed();
    }

    pub fn set_relation_filter<I, T>(&mut self, axis: RelationAxis, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        if self.is_confirming() {
            return;
        }
        *self.criteria.relations_mut(axis) = ids.into_iter().map(Into::into).collect();
        self.criteria_changed();
    }

    /// Adds or removes one accepted status.
    pub fn toggle_status_filter(&mut self, status: impl Into<Status>) {
        if self.is_confirming() {
            return;
        }
        let status = status.into();
        if !self.criteria.statuses.remove(&status) {
            self.criteria.statuses.insert(status);
        }
        self.criteria_changed();
    }

    pub fn set_status_filter<I, T>(&mut self, statuses: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Status>,
    {
        if self.is_confirming() {
            return;
        }
        self.criteria.statuses = statuses.into_iter().map(Into::into).collect();
        self.criteria_changed();
    }

    pub fn set_window(&mut self, window: Option<TimeWindow>) {
        if self.is_confirming() {
            return;
        }
        self.criteria.window = window;
        self.criteria_changed();
    }

    pub fn clear_filters(&mut self) {
        if self.is_confirming() {
            return;
        }
        self.criteria = FilterCriteria::default();
        self.criteria_changed();
    }

    fn criteria_changed(&mut self) {
        self.page = 1;
        debug!(criteria = ?self.criteria, "filter criteria changed");
    }

    // --- Sort (page is kept) ---

    /// Header click on a sortable column.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort.select(key);
        debug!(key = key.label(), direction = ?self.sort.direction, "sort changed");
    }

    // --- Pagination ---

    /// Jumps to page `page` (at least 1). A page past the end shows nothing.
    pub fn go_to_page(&mut self, page: usize) {
        self.set_page(page.max(1));
    }

    pub fn next_page(&mut self) {
        if self.page < self.total_pages() {
            self.set_page(self.page + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.set_page(self.page - 1);
        }
    }

    fn set_page(&mut self, page: usize) {
        self.page = page;
        debug!(page, "page changed");
    }

    // --- Selection ---

    /// Row checkbox. Returns whether the row is now selected.
    pub fn toggle_row(&mut self, id: &RecordId) -> bool {
        if self.is_confirming() {
            return self.selection.contains(id);
        }
        self.selection.toggle(id)
    }

    /// Header checkbox: all filtered rows, or none.
    pub fn toggle_all(&mut self) {
        if self.is_confirming() {
            return;
        }
        let filtered = self.filtered_ids();
        self.selection.toggle_all(&filtered);
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(self.filtered_count())
    }

    pub fn clear_selection(&mut self) {
        if self.is_confirming() {
            return;
        }
        self.selection.clear();
    }

    // --- Bulk edits ---

    pub fn open_bulk_menu(&mut self, kind: BulkKind) {
        if self.is_confirming() {
            return;
        }
        self.bulk.open(kind);
    }

    pub fn pick_bulk_value(&mut self, value: impl Into<String>) -> bool {
        !self.is_confirming() && self.bulk.pick(value)
    }

    /// Applies the staged value to every selected record, then clears the
    /// selection and closes the menu. `None` when nothing is staged or the
    /// delete prompt is open.
    pub fn commit_bulk(&mut self) -> Option<CommitReport> {
        if self.is_confirming() {
            return None;
        }
        let commit = self.bulk.take_commit()?;
        let ids = self.selection.take();
        Some(commit.apply(&mut self.store, &ids))
    }

    // --- Deletion ---

    /// Opens the delete confirmation. Does nothing without a selection.
    pub fn request_delete(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.bulk.close();
        self.delete_prompt = DeletePrompt::Confirming;
        true
    }

    /// Deletes every selected record and empties the selection.
    pub fn confirm_delete(&mut self) -> Option<DeleteReport> {
        if !self.delete_prompt.is_open() {
            return None;
        }
        self.delete_prompt = DeletePrompt::Hidden;
        let ids = self.selection.take();
        let report = delete_records(&mut self.store, &ids);
        self.page = self.page.min(self.total_pages());
        Some(report)
    }

    /// Closes the confirmation, leaving the selection untouched.
    pub fn cancel_delete(&mut self) -> bool {
        let was_open = self.delete_prompt.is_open();
        self.delete_prompt = DeletePrompt::Hidden;
        was_open
    }

    /// Closes the innermost open context.
    pub fn escape(&mut self) -> Escaped {
        if self.cancel_delete() {
            Escaped::DeleteDialog
        } else if self.bulk.close() {
            Escaped::BulkMenu
        } else if !self.selection.is_empty() {
            self.selection.clear();
            Escaped::Selection
        } else {
            Escaped::Nothing
        }
    }

    // --- Single-record edits ---

    pub fn rename(&mut self, id: &RecordId, name: impl Into<String>) -> Result<()> {
        self.update(id, RecordPatch::name(name))
    }

    pub fn set_note(&mut self, id: &RecordId, note: impl Into<String>) -> Result<()> {
        self.update(id, RecordPatch::note(note))
    }

    pub fn set_status(&mut self, id: &RecordId, status: impl Into<Status>) -> Result<()> {
        self.update(id, RecordPatch::status(status))
    }

    pub fn set_relations(
        &mut self,
        id: &RecordId,
        axis: RelationAxis,
        ids: Vec<String>,
    ) -> Result<()> {
        self.update(id, RecordPatch::relations(axis, ids))
    }

    fn update(&mut self, id: &RecordId, patch: RecordPatch) -> Result<()> {
        self.store.update_record(id, &patch).inspect_err(|e| {
            warn!(error = %e, id = %id, "record update failed");
        })
    }

    /// Hands a pasted blob to the store. New records start in the first
    /// configured stage.
    pub fn add_records(&mut self, raw: &str) -> Result<usize> {
        let status = self
            .order
            .first()
            .cloned()
            .unwrap_or_else(|| Status::new(DEFAULT_STAGES[0]));
        let created = self.store.add_records(raw, &status)?;
        debug!(created, "added records");
        Ok(created)
    }

    // --- Facets ---

    /// Counts per status, ignoring the status criterion itself so every
    /// option in the status multi-select shows what picking it would yield.
    pub fn status_counts(&self) -> StatusCounts {
        let now = self.now();
        let active: Vec<Criterion<'_>> = self
            .criteria
            .criteria(&now)
            .into_iter()
            .filter(|c| !c.is_status())
            .collect();

        let mut counts = vec![0usize; self.order.stages().len()];
        let mut unknown = 0;
        for record in self
            .store
            .records()
            .iter()
            .filter(|r| matches_all(&active, r))
        {
            match self.order.rank(&record.status) {
                Some(rank) => counts[rank] += 1,
                None => unknown += 1,
            }
        }

        StatusCounts {
            stages: self.order.stages().iter().cloned().zip(counts).collect(),
            unknown,
        }
    }

    /// Distinct relation ids present on `axis`, sorted case-insensitively.
    pub fn relation_values(&self, axis: RelationAxis) -> Vec<String> {
        let distinct: BTreeSet<&String> = self
            .store
            .records()
            .iter()
            .flat_map(|r| r.relations(axis))
            .collect();
        let mut values: Vec<String> = distinct.into_iter().cloned().collect();
        values.sort_by_key(|v| v.to_lowercase());
        values
    }
}
