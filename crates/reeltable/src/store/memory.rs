use super::RecordStore;
use crate::error::{Result, TableError};
use crate::model::{Record, RecordId, RecordPatch, Status};
use std::collections::HashSet;

/// In-memory record store.
///
/// Records keep insertion order. `add_records` treats the blob as one record
/// per line, with an optional tab separating the name from a note.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    records: Vec<Record>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Loads a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<Record> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    pub fn insert(&mut self, record: Record) -> Result<()> {
        if self.get(&record.id).is_some() {
            return Err(TableError::DuplicateRecord(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn get_mut(&mut self, id: &RecordId) -> Result<&mut Record> {
        self.records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| TableError::RecordNotFound(id.clone()))
    }
}

impl RecordStore for MemStore {
    fn records(&self) -> &[Record] {
        &self.records
    }

    fn update_record(&mut self, id: &RecordId, patch: &RecordPatch) -> Result<()> {
        self.get_mut(id)?.apply(patch);
        Ok(())
    }

    fn bulk_update_status(&mut self, ids: &[RecordId], status: &Status) -> Result<()> {
        // All or nothing: check every id before touching any record
        if let Some(missing) = ids.iter().find(|id| self.get(id).is_none()) {
            return Err(TableError::RecordNotFound(missing.clone()));
        }
        for record in self.records.iter_mut().filter(|r| ids.contains(&r.id)) {
            record.status = status.clone();
        }
        Ok(())
    }

    fn delete_record(&mut self, id: &RecordId) -> Result<()> {
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        if self.records.len() == before {
            return Err(TableError::RecordNotFound(id.clone()));
        }
        Ok(())
    }

    fn add_records(&mut self, raw: &str, status: &Status) -> Result<usize> {
        let mut seen: HashSet<String> = self
            .records
            .iter()
            .map(|r| r.name.to_lowercase())
            .collect();
        let mut created = 0;

        for line in raw.lines() {
            let (name, note) = match line.split_once('\t') {
                Some((name, note)) => (name.trim(), note.trim()),
                None => (line.trim(), ""),
            };
            if name.is_empty() || !seen.insert(name.to_lowercase()) {
                continue;
            }

            let mut record = Record::new(name, status.clone());
            if !note.is_empty() {
                record.note = Some(note.to_string());
            }
            self.records.push(record);
            created += 1;
        }

        Ok(created)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::RelationAxis;
    use chrono::{DateTime, Utc};

    /// Builder for a populated [`MemStore`].
    pub struct StoreFixture {
        pub store: MemStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: MemStore::new(),
            }
        }

        /// Adds `count` records named "Movie 01".."Movie NN" with ids "m1".."mN".
        pub fn with_movies(mut self, count: usize, status: &str) -> Self {
            for i in 1..=count {
                let record =
                    Record::new(format!("Movie {:02}", i), status).with_id(format!("m{}", i));
                self.store.insert(record).unwrap();
            }
            self
        }

        pub fn with_record(mut self, record: Record) -> Self {
            self.store.insert(record).unwrap();
            self
        }

        pub fn with_movie(
            self,
            id: &str,
            name: &str,
            status: &str,
            relations_a: &[&str],
            relations_b: &[&str],
        ) -> Self {
            let record = Record::new(name, status)
                .with_id(id)
                .with_relations(RelationAxis::A, relations_a.iter().copied())
                .with_relations(RelationAxis::B, relations_b.iter().copied());
            self.with_record(record)
        }

        pub fn with_movie_created(self, id: &str, name: &str, created_at: DateTime<Utc>) -> Self {
            let record = Record::new(name, "Playlist")
                .with_id(id)
                .with_created_at(created_at);
            self.with_record(record)
        }

        pub fn build(self) -> MemStore {
            self.store
        }

        pub fn recording(self) -> RecordingStore {
            RecordingStore::new(self.store)
        }
    }

    /// A mutation call as seen by the store.
    #[derive(Debug, Clone, PartialEq)]
    pub enum StoreCall {
        Update(RecordId, RecordPatch),
        BulkStatus(Vec<RecordId>, Status),
        Delete(RecordId),
        Add(String),
    }

    /// Wraps a [`MemStore`] and records every mutation call in order.
    ///
    /// Calls touching `fail_on` return a store error without being applied,
    /// which lets tests exercise the engine's best-effort fan-out.
    pub struct RecordingStore {
        pub inner: MemStore,
        pub calls: Vec<StoreCall>,
        pub fail_on: Option<RecordId>,
    }

    impl RecordingStore {
        pub fn new(inner: MemStore) -> Self {
            Self {
                inner,
                calls: Vec::new(),
                fail_on: None,
            }
        }

        pub fn failing_on(mut self, id: &str) -> Self {
            self.fail_on = Some(RecordId::from(id));
            self
        }

        fn check(&self, id: &RecordId) -> Result<()> {
            if self.fail_on.as_ref() == Some(id) {
                return Err(TableError::Store(format!("Simulated failure for {}", id)));
            }
            Ok(())
        }
    }

    impl RecordStore for RecordingStore {
        fn records(&self) -> &[Record] {
            self.inner.records()
        }

        fn update_record(&mut self, id: &RecordId, patch: &RecordPatch) -> Result<()> {
            self.calls.push(StoreCall::Update(id.clone(), patch.clone()));
            self.check(id)?;
            self.inner.update_record(id, patch)
        }

        fn bulk_update_status(&mut self, ids: &[RecordId], status: &Status) -> Result<()> {
            self.calls
                .push(StoreCall::BulkStatus(ids.to_vec(), status.clone()));
            for id in ids {
                self.check(id)?;
            }
            self.inner.bulk_update_status(ids, status)
        }

        fn delete_record(&mut self, id: &RecordId) -> Result<()> {
            self.calls.push(StoreCall::Delete(id.clone()));
            self.check(id)?;
            self.inner.delete_record(id)
        }

        fn add_records(&mut self, raw: &str, status: &Status) -> Result<usize> {
            self.calls.push(StoreCall::Add(raw.to_string()));
            self.inner.add_records(raw, status)
        }
    }
}
