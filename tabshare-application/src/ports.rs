use crate::error::RecordStoreError;
use std::collections::HashMap;
use tabshare_domain::{Expense, Participant, ParticipantId, Payment};

/// Source of ledger records.
///
/// Every call returns the full, current collection; calling again restarts
/// the sequence from the beginning.
pub trait RecordStore: Send + Sync {
    fn participants(&self) -> Result<Vec<Participant>, RecordStoreError>;
    fn expenses(&self) -> Result<Vec<Expense>, RecordStoreError>;
    fn payments(&self) -> Result<Vec<Payment>, RecordStoreError>;
}

pub trait ParticipantDirectory: Send + Sync {
    fn display_name(&self, id: &ParticipantId) -> Option<&str>;

    /// Display name, falling back to the raw id.
    fn label<'a>(&'a self, id: &'a ParticipantId) -> &'a str {
        self.display_name(id).unwrap_or(id.as_str())
    }
}

impl ParticipantDirectory for HashMap<ParticipantId, String> {
    fn display_name(&self, id: &ParticipantId) -> Option<&str> {
        self.get(id).map(String::as_str)
    }
}

impl ParticipantDirectory for [Participant] {
    fn display_name(&self, id: &ParticipantId) -> Option<&str> {
        self.iter()
            .find(|participant| &participant.id == id)
            .map(|participant| participant.name.as_str())
    }
}

impl ParticipantDirectory for Vec<Participant> {
    fn display_name(&self, id: &ParticipantId) -> Option<&str> {
        self.as_slice().display_name(id)
    }
}
