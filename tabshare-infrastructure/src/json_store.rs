use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::{fs, path::Path};
use tabshare_application::{RecordStore, RecordStoreError};
use tabshare_domain::{Expense, Money, Participant, ParticipantId, Payment, SplitMode};

/// Read-only record store over a JSON ledger snapshot.
///
/// The document mirrors the records the entry forms write:
///
/// ```json
/// {
///   "participants": [{ "id": "a", "name": "Ana" }],
///   "expenses": [{
///     "id": "e1", "amount": 90, "paidBy": "a", "involved": ["a", "b"],
///     "splitMode": "ratio", "ratios": { "a": 1, "b": 2 }
///   }],
///   "payments": [{ "id": "p1", "amount": 10, "from": "b", "to": "a" }]
/// }
/// ```
///
/// A stored `split` is only read for manual expenses, where it holds the
/// entered shares; equal and ratio splits are always recomputed.
#[derive(Debug)]
pub struct JsonRecordStore {
    document: LedgerDocument,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerDocument {
    #[serde(default)]
    participants: Vec<ParticipantRecord>,
    #[serde(default)]
    expenses: Vec<ExpenseRecord>,
    #[serde(default)]
    payments: Vec<PaymentRecord>,
}

#[derive(Debug, Deserialize)]
struct ParticipantRecord {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseRecord {
    id: String,
    amount: Decimal,
    paid_by: String,
    involved: Vec<String>,
    #[serde(default)]
    split_mode: SplitModeRecord,
    #[serde(default)]
    ratios: IndexMap<String, Decimal>,
    #[serde(default)]
    split: IndexMap<String, Decimal>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SplitModeRecord {
    #[default]
    Equal,
    Ratio,
    Manual,
}

#[derive(Debug, Deserialize)]
struct PaymentRecord {
    id: String,
    amount: Decimal,
    from: String,
    to: String,
}

impl JsonRecordStore {
    pub fn from_json_str(source: &str) -> Result<Self, RecordStoreError> {
        let document: LedgerDocument =
            serde_json::from_str(source).map_err(|err| RecordStoreError::Malformed {
                record: "ledger document".to_string(),
                detail: err.to_string(),
            })?;
        tracing::debug!(
            participant_count = document.participants.len(),
            expense_count = document.expenses.len(),
            payment_count = document.payments.len(),
            "Ledger document parsed"
        );
        Ok(Self { document })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RecordStoreError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| {
            RecordStoreError::Unavailable(format!("failed to read '{}': {err}", path.display()))
        })?;
        Self::from_json_str(&source)
    }
}

impl ExpenseRecord {
    fn to_expense(&self) -> Expense {
        let split_mode = match self.split_mode {
            SplitModeRecord::Equal => SplitMode::Equal,
            SplitModeRecord::Ratio => SplitMode::Ratio(
                self.ratios
                    .iter()
                    .map(|(id, weight)| (ParticipantId::new(id.as_str()), *weight))
                    .collect(),
            ),
            SplitModeRecord::Manual => SplitMode::Manual(
                self.split
                    .iter()
                    .map(|(id, share)| (ParticipantId::new(id.as_str()), Money::from_decimal(*share)))
                    .collect(),
            ),
        };

        Expense::new(
            self.id.as_str(),
            Money::from_decimal(self.amount),
            self.paid_by.as_str(),
            self.involved.iter().map(String::as_str),
            split_mode,
        )
    }
}

impl RecordStore for JsonRecordStore {
    fn participants(&self) -> Result<Vec<Participant>, RecordStoreError> {
        Ok(self
            .document
            .participants
            .iter()
            .map(|record| Participant::new(record.id.as_str(), record.name.as_str()))
            .collect())
    }

    fn expenses(&self) -> Result<Vec<Expense>, RecordStoreError> {
        Ok(self
            .document
            .expenses
            .iter()
            .map(ExpenseRecord::to_expense)
            .collect())
    }

    fn payments(&self) -> Result<Vec<Payment>, RecordStoreError> {
        Ok(self
            .document
            .payments
            .iter()
            .map(|record| {
                Payment::new(
                    record.id.as_str(),
                    Money::from_decimal(record.amount),
                    record.from.as_str(),
                    record.to.as_str(),
                )
            })
            .collect())
    }
}
