use common::{JobKey, JobRecord};

use crate::dispatcher::BatchKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Running,
    NoCancelPermission,
    NothingEligible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocker {
    pub key: Option<JobKey>,
    pub name: String,
    pub reason: BlockReason,
}

impl Blocker {
    fn record(record: &JobRecord, reason: BlockReason) -> Self {
        Self {
            key: Some(record.key()),
            name: record.name.clone(),
            reason,
        }
    }

    pub fn describe(&self) -> String {
        let subject = match self.key {
            Some(key) if self.name.is_empty() => key.to_string(),
            Some(key) => format!("{} ({})", key, self.name),
            None => String::new(),
        };
        match self.reason {
            BlockReason::Running => format!("{} is still running and cannot be deleted", subject),
            BlockReason::NoCancelPermission => format!("no permission to cancel {}", subject),
            BlockReason::NothingEligible => "no selected job qualifies".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionGate {
    pub kind: BatchKind,
    pub eligible: Vec<JobRecord>,
    pub blockers: Vec<Blocker>,
}

impl ActionGate {
    pub fn evaluate(kind: BatchKind, selection: &[JobRecord]) -> Self {
        match kind {
            BatchKind::Delete => delete_gate(selection),
            BatchKind::Cancel => cancel_gate(selection),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.blockers.is_empty()
    }
}

pub fn items_to_delete(selection: &[JobRecord]) -> Vec<JobRecord> {
    selection.iter().filter(|r| r.can_delete()).cloned().collect()
}

/// Selected records that expose a cancel link and have not settled yet.
pub fn jobs_to_cancel(selection: &[JobRecord]) -> Vec<JobRecord> {
    selection
        .iter()
        .filter(|r| r.has_cancel_link() && r.status.is_running())
        .cloned()
        .collect()
}

fn delete_gate(selection: &[JobRecord]) -> ActionGate {
    let eligible = items_to_delete(selection);
    // Evaluated over the whole eligible set: one running job disables the control.
    let mut blockers: Vec<Blocker> = eligible
        .iter()
        .filter(|r| r.status.is_running())
        .map(|r| Blocker::record(r, BlockReason::Running))
        .collect();
    if eligible.is_empty() {
        blockers.push(nothing_eligible());
    }
    ActionGate {
        kind: BatchKind::Delete,
        eligible,
        blockers,
    }
}

fn cancel_gate(selection: &[JobRecord]) -> ActionGate {
    let eligible = jobs_to_cancel(selection);
    let mut blockers: Vec<Blocker> = eligible
        .iter()
        .filter(|r| !r.can_cancel())
        .map(|r| Blocker::record(r, BlockReason::NoCancelPermission))
        .collect();
    if eligible.is_empty() {
        blockers.push(nothing_eligible());
    }
    ActionGate {
        kind: BatchKind::Cancel,
        eligible,
        blockers,
    }
}

fn nothing_eligible() -> Blocker {
    Blocker {
        key: None,
        name: String::new(),
        reason: BlockReason::NothingEligible,
    }
}
