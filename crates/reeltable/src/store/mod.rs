//! # Record Store
//!
//! The engine never owns the data it shows. It reads records from, and sends
//! mutations to, a [`RecordStore`] supplied by the caller.
//!
//! ## Design Rationale
//!
//! The store is a trait so that:
//! - the engine can be **tested** against [`memory::MemStore`] with no I/O
//! - a UI can back it with whatever it already has (an HTTP client, a
//!   database, a JSON file) without the engine knowing
//!
//! ## Contract
//!
//! - [`RecordStore::records`] is read on every recompute and borrowed, never
//!   copied. Its order is the source order ties fall back to.
//! - Mutations are fire-and-forget from the engine's point of view. A returned
//!   `Err` is logged and the engine moves on; retrying or surfacing the error
//!   further is up to the store.
//! - The engine assumes it is the only writer between computing a view and
//!   committing a change.
//!
//! ## Implementations
//!
//! - [`memory::MemStore`]: a `Vec<Record>` in insertion order. Used by tests
//!   and by callers that keep everything in memory anyway.

use crate::error::Result;
use crate::model::{Record, RecordId, RecordPatch, Status};

pub mod memory;

pub trait RecordStore {
    /// All records, in source order.
    fn records(&self) -> &[Record];

    /// Apply a partial update to one record.
    fn update_record(&mut self, id: &RecordId, patch: &RecordPatch) -> Result<()>;

    /// Set the same status on many records in one call.
    fn bulk_update_status(&mut self, ids: &[RecordId], status: &Status) -> Result<()>;

    /// Remove one record.
    fn delete_record(&mut self, id: &RecordId) -> Result<()>;

    /// Create records from a delimited text blob, each starting in `status`.
    /// Parsing and de-duplication rules belong to the store. Returns how many
    /// records were created.
    fn add_records(&mut self, raw: &str, status: &Status) -> Result<usize>;
}
