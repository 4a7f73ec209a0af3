use serde::Serialize;
use std::fmt;

/// Advisory result of a delete against an eventually-consistent store.
///
/// `RemovalPending` is not a failure: the delete was accepted but a
/// follow-up read still observed the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionOutcome {
    ConfirmedRemoved,
    RemovalPending,
}

impl DeletionOutcome {
    /// Wire flag: 1 when the removal was observed, 0 when still pending.
    pub fn deleted_flag(&self) -> u8 {
        match self {
            DeletionOutcome::ConfirmedRemoved => 1,
            DeletionOutcome::RemovalPending => 0,
        }
    }
}

impl fmt::Display for DeletionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionOutcome::ConfirmedRemoved => write!(f, "confirmed_removed"),
            DeletionOutcome::RemovalPending => write!(f, "removal_pending"),
        }
    }
}
