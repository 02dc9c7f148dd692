//! # reeltable
//!
//! An in-memory table engine for a production board: a list of records
//! (movies, channels) that a UI filters, sorts, pages, selects and edits in
//! bulk. The crate holds no rendering code; a UI asks for a [`PageView`] and
//! forwards user intents to the [`TableEngine`].
//!
//! ## Architecture
//!
//! ```text
//!   UI ──intents──▶ TableEngine ──reads──▶ RecordStore
//!                      │   ▲                   ▲
//!            criteria, │   │ PageView          │ update / bulk status /
//!            sort, page│   │                   │ delete / add
//!                      ▼   │                   │
//!                   pipeline (pure) ──────▶ bulk staging
//! ```
//!
//! - [`model`]: records, ids, statuses and the stage rank table
//! - [`criteria`]: the predicate engine (search, relations, status, time window)
//! - [`sort`]: the comparator registry, one ordering per column
//! - [`pipeline`]: filter, then stable sort, then slice a page
//! - [`selection`]: checked rows, independent of paging
//! - [`bulk`]: the staged bulk-edit menu and delete confirmation
//! - [`store`]: the [`RecordStore`] seam and its in-memory implementation
//! - [`table`]: the facade tying it together
//! - [`config`]: page size and stage order, from file or environment
//!
//! ## Pure Core, Effectful Edges
//!
//! Everything under `criteria`, `sort` and `pipeline` is a pure function of
//! its inputs and cannot fail. Store calls are the only fallible operations;
//! their errors are [`TableError`] values.
//!
//! ## Logging
//!
//! The crate emits `tracing` events and never installs a subscriber. Criteria
//! and sort changes log at `debug`, commits and deletions at `info`, failed
//! store calls at `warn`.

pub mod bulk;
pub mod config;
pub mod criteria;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod selection;
pub mod sort;
pub mod store;
pub mod table;

pub use error::{Result, TableError};
pub use model::{Record, RecordId, RecordPatch, RelationAxis, Status, StatusOrder};
pub use pipeline::PageView;
pub use store::RecordStore;
pub use table::TableEngine;
