//! # Bulk Mutation Staging
//!
//! A bulk edit is staged before it is applied. The user opens a bulk menu,
//! picks a value, and only then commits it to every selected record.
//!
//! ## State machine
//!
//! ```text
//!            open(k)                       pick(v)
//!  Closed ───────────► Open{k, None} ─────────────► Open{k, Some(v)}
//!    ▲                   │    │  ▲                     │   │   │
//!    │   open(k) / esc   │    │  └── open(k') ─────────┘   │   │ pick(v')
//!    ├───────────────────┘    └─► Open{k', None}           │   └──► Open{k, Some(v')}
//!    │                                                     │
//!    └──────────── commit (applies v to the selection) ────┘
//! ```
//!
//! - Re-opening the same kind closes the menu; opening another kind switches
//!   to it. Either way the pending value is dropped.
//! - Exactly one value is staged; picking again replaces it.
//! - Commit without a staged value does nothing (the UI disables the button).
//!
//! ## Dispatch
//!
//! A status commit is one `bulk_update_status` call. A relation commit fans
//! out into one `update_record` call per selected id, in selection order,
//! each setting that axis to the single picked id. Failures are logged and
//! counted; the remaining calls still go out.
//!
//! Deleting is a separate confirm/cancel flow, see [`DeletePrompt`].

use crate::model::{RecordId, RecordPatch, RelationAxis, Status};
use crate::store::RecordStore;
use tracing::{info, warn};

/// Which field a bulk menu edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkKind {
    Status,
    Relation(RelationAxis),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BulkMenu {
    #[default]
    Closed,
    Open {
        kind: BulkKind,
        pending: Option<String>,
    },
}

impl BulkMenu {
    pub fn is_open(&self) -> bool {
        matches!(self, BulkMenu::Open { .. })
    }

    pub fn open_kind(&self) -> Option<BulkKind> {
        match self {
            BulkMenu::Open { kind, .. } => Some(*kind),
            BulkMenu::Closed => None,
        }
    }

    pub fn pending(&self) -> Option<&str> {
        match self {
            BulkMenu::Open { pending, .. } => pending.as_deref(),
            BulkMenu::Closed => None,
        }
    }

    /// Whether the commit action is enabled.
    pub fn can_commit(&self) -> bool {
        self.pending().is_some()
    }

    /// Menu trigger clicked: toggles the same kind, switches to another kind.
    pub fn open(&mut self, kind: BulkKind) {
        *self = match self.open_kind() {
            Some(current) if current == kind => BulkMenu::Closed,
            _ => BulkMenu::Open {
                kind,
                pending: None,
            },
        };
    }

    /// Stages `value`, replacing any earlier pick. Ignored while closed.
    pub fn pick(&mut self, value: impl Into<String>) -> bool {
        match self {
            BulkMenu::Open { pending, .. } => {
                *pending = Some(value.into());
                true
            }
            BulkMenu::Closed => false,
        }
    }

    /// Escape: closes the menu and drops the pending value. Returns whether a menu was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        *self = BulkMenu::Closed;
        was_open
    }

    /// Closes the menu and hands back the staged edit, or does nothing when
    /// no value is staged.
    pub fn take_commit(&mut self) -> Option<BulkCommit> {
        let BulkMenu::Open {
            kind,
            pending: Some(value),
        } = self
        else {
            return None;
        };
        let commit = BulkCommit {
            kind: *kind,
            value: std::mem::take(value),
        };
        *self = BulkMenu::Closed;
        Some(commit)
    }
}

/// A staged bulk edit ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkCommit {
    pub kind: BulkKind,
    pub value: String,
}

impl BulkCommit {
    /// Sends the edit for `ids` to the store.
    pub fn apply<S: RecordStore>(&self, store: &mut S, ids: &[RecordId]) -> CommitReport {
        let mut report = CommitReport {
            kind: self.kind,
            value: self.value.clone(),
            targeted: ids.len(),
            calls: 0,
            failures: 0,
        };
        if ids.is_empty() {
            return report;
        }

        match self.kind {
            BulkKind::Status => {
                report.calls = 1;
                let status = Status::new(self.value.clone());
                if let Err(e) = store.bulk_update_status(ids, &status) {
                    warn!(error = %e, count = ids.len(), "bulk status update failed");
                    report.failures = 1;
                }
            }
            BulkKind::Relation(axis) => {
                let patch = RecordPatch::relations(axis, vec![self.value.clone()]);
                for id in ids {
                    report.calls += 1;
                    if let Err(e) = store.update_record(id, &patch) {
                        warn!(error = %e, id = %id, axis = axis.label(), "relation update failed");
                        report.failures += 1;
                    }
                }
            }
        }

        info!(
            kind = ?self.kind,
            value = %self.value,
            targeted = report.targeted,
            failures = report.failures,
            "applied bulk edit"
        );
        report
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub kind: BulkKind,
    pub value: String,
    /// Selected ids the edit was sent for.
    pub targeted: usize,
    /// Store calls issued.
    pub calls: usize,
    /// Store calls that returned an error.
    pub failures: usize,
}

impl CommitReport {
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

/// The blocking "delete N records?" confirmation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletePrompt {
    #[default]
    Hidden,
    Confirming,
}

impl DeletePrompt {
    pub fn is_open(self) -> bool {
        self == DeletePrompt::Confirming
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: Vec<RecordId>,
    pub failures: usize,
}

/// Deletes every id, one call each, in order. Failures are logged and skipped.
pub fn delete_records<S: RecordStore>(store: &mut S, ids: &[RecordId]) -> DeleteReport {
    let mut report = DeleteReport::default();
    for id in ids {
        match store.delete_record(id) {
            Ok(()) => report.deleted.push(id.clone()),
            Err(e) => {
                warn!(error = %e, id = %id, "delete failed");
                report.failures += 1;
            }
        }
    }
    info!(
        deleted = report.deleted.len(),
        failures = report.failures,
        "deleted selected records"
    );
    report
}
