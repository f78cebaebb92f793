use tabshare_domain::{InternalInconsistency, InvalidExpense, InvalidPayment, RoundingContextError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordStoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed {record}: {detail}")]
    Malformed { record: String, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    RecordStore(#[from] RecordStoreError),
    #[error(transparent)]
    InvalidExpense(#[from] InvalidExpense),
    #[error(transparent)]
    InvalidPayment(#[from] InvalidPayment),
    #[error("settlement plan aborted: {0}")]
    InternalInconsistency(#[from] InternalInconsistency),
    #[error(transparent)]
    RoundingContext(#[from] RoundingContextError),
}
