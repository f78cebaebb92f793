#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger_processor;
pub mod model;
pub mod ports;

pub use error::{LedgerError, RecordStoreError};
pub use ledger_processor::LedgerProcessor;
pub use model::{BalanceReport, BatchPolicy, LedgerBatch, LedgerReport, ParticipantSummary};
pub use ports::{ParticipantDirectory, RecordStore};
