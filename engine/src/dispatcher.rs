use std::sync::Arc;
use std::time::Instant;

use common::JobRecord;
use futures::future::join_all;
use uuid::Uuid;

use crate::error::{BatchError, ItemFailure, RequestFailure, ERROR_TITLE};
use crate::logging::AUDIT_TARGET;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    Delete,
    Cancel,
}

impl BatchKind {
    pub fn verb(self) -> &'static str {
        match self {
            BatchKind::Delete => "delete",
            BatchKind::Cancel => "cancel",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            BatchKind::Delete => "Failed to delete one or more jobs.",
            BatchKind::Cancel => "Failed to cancel one or more jobs.",
        }
    }
}

impl std::fmt::Display for BatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub record: JobRecord,
    pub result: Result<(), RequestFailure>,
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub id: Uuid,
    pub kind: BatchKind,
    pub entries: Vec<BatchEntry>,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|e| e.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|e| !e.is_ok())
    }

    pub fn error(&self) -> Option<BatchError> {
        let failures: Vec<ItemFailure> = self
            .entries
            .iter()
            .filter_map(|entry| match &entry.result {
                Ok(()) => None,
                Err(failure) => Some(ItemFailure {
                    key: entry.record.key(),
                    name: entry.record.name.clone(),
                    failure: failure.clone(),
                }),
            })
            .collect();

        if failures.is_empty() {
            return None;
        }
        Some(BatchError {
            title: ERROR_TITLE,
            message: self.kind.failure_message().to_string(),
            failures,
        })
    }
}

pub struct BatchDispatcher {
    registry: Arc<Registry>,
}

impl BatchDispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// One call per record, all in flight together. Per-item failures are
    /// data in the outcome, never an early return.
    pub async fn run_batch(&self, kind: BatchKind, records: &[JobRecord]) -> BatchOutcome {
        let id = Uuid::new_v4();
        if records.is_empty() {
            log::debug!("Batch {} ({}) has no records, nothing to do", id, kind);
            return BatchOutcome {
                id,
                kind,
                entries: Vec::new(),
            };
        }

        log::info!("Batch {}: {} {} job(s)", id, kind, records.len());
        let started = Instant::now();

        let calls: Vec<_> = records
            .iter()
            .map(|record| async move {
                let client = self.registry.client_for(record.job_type);
                let result = match kind {
                    BatchKind::Delete => client.destroy(record.id).await,
                    BatchKind::Cancel => client.cancel(record.id).await,
                };
                BatchEntry {
                    record: record.clone(),
                    result,
                }
            })
            .collect();

        let entries = join_all(calls).await;

        for entry in &entries {
            match &entry.result {
                Ok(()) => log::info!(target: AUDIT_TARGET, "{} {} {}: ok", id, kind, entry.record.key()),
                Err(e) => log::warn!(target: AUDIT_TARGET, "{} {} {}: {}", id, kind, entry.record.key(), e),
            }
        }

        let outcome = BatchOutcome { id, kind, entries };
        let failed = outcome.failed().count();
        if failed > 0 {
            log::warn!(
                "Batch {} finished in {:?}: {} of {} {} call(s) failed",
                id,
                started.elapsed(),
                failed,
                outcome.len(),
                kind
            );
        } else {
            log::info!("Batch {} finished in {:?}", id, started.elapsed());
        }
        outcome
    }
}
