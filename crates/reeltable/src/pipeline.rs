//! # View Pipeline
//!
//! `records + criteria + sort + page → PageView`, in a fixed order:
//!
//! 1. **Filter** with the active [`Criterion`](crate::criteria::Criterion)s
//! 2. **Sort** the survivors with the [`SortConfig`]
//! 3. **Count**: `total_count` is the filtered length, `total_pages` is
//!    `ceil(total_count / page_size)` but never less than 1
//! 4. **Slice** `[(page - 1) * size, page * size)`, clipped to what exists
//!
//! Everything here is a pure function of its inputs. The pipeline borrows
//! the caller's records and never copies them. Deciding *when* to recompute,
//! and resetting the page when filters change, is the caller's job (see
//! [`crate::table`]).

use crate::criteria::{matches_all, FilterCriteria};
use crate::model::{Record, RecordId, StatusOrder};
use crate::sort::{sort_records, SortConfig};
use chrono::{DateTime, TimeZone};
use tracing::debug;

/// A 1-based page number and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: usize,
    pub size: usize,
}

impl PageRequest {
    /// Page numbers below 1 and sizes of 0 are raised to 1.
    pub fn new(number: usize, size: usize) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    fn offset(&self) -> usize {
        (self.number - 1).saturating_mul(self.size)
    }
}

/// One rendered page plus the counts needed for pagination controls.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub records: Vec<&'a Record>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

impl PageView<'_> {
    /// Nothing passed the filter; the UI shows its empty state.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// 1-based inclusive bounds of the rows on this page ("showing 101–200").
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.records.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.records.len() - 1))
    }

    pub fn ids(&self) -> Vec<&RecordId> {
        self.records.iter().map(|r| &r.id).collect()
    }
}

/// Number of pages for `count` rows; an empty result still has one page.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Steps 1 and 2: the filtered, sorted view of every matching record.
pub fn filtered<'a, Tz: TimeZone>(
    records: &'a [Record],
    criteria: &FilterCriteria,
    sort: &SortConfig,
    order: &StatusOrder,
    now: &DateTime<Tz>,
) -> Vec<&'a Record> {
    let active = criteria.criteria(now);
    let mut matched: Vec<&Record> = records
        .iter()
        .filter(|record| matches_all(&active, record))
        .collect();
    sort_records(&mut matched, sort, order);
    matched
}

/// Runs the whole pipeline and returns the requested page.
///
/// A page past the end is not an error: it comes back with no records and
/// the real totals.
pub fn view<'a, Tz: TimeZone>(
    records: &'a [Record],
    criteria: &FilterCriteria,
    sort: &SortConfig,
    order: &StatusOrder,
    page: PageRequest,
    now: &DateTime<Tz>,
) -> PageView<'a> {
    let matched = filtered(records, criteria, sort, order, now);
    let total_count = matched.len();
    let total_pages = total_pages(total_count, page.size);

    let start = page.offset().min(total_count);
    let end = start.saturating_add(page.size).min(total_count);
    let records = matched[start..end].to_vec();

    debug!(
        total = total_count,
        page = page.number,
        pages = total_pages,
        shown = records.len(),
        "recomputed table view"
    );

    PageView {
        records,
        page: page.number,
        page_size: page.size,
        total_count,
        total_pages,
    }
}
