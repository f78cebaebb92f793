use tabshare_application::{RecordStore, RecordStoreError};
use tabshare_domain::{Expense, Participant, Payment};

/// Record store backed by plain vectors.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRecordStore {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
    payments: Vec<Payment>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.participants.push(participant);
        self
    }

    pub fn with_expense(mut self, expense: Expense) -> Self {
        self.expenses.push(expense);
        self
    }

    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payments.push(payment);
        self
    }

    pub fn push_expense(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn push_payment(&mut self, payment: Payment) {
        self.payments.push(payment);
    }
}

impl RecordStore for InMemoryRecordStore {
    fn participants(&self) -> Result<Vec<Participant>, RecordStoreError> {
        Ok(self.participants.clone())
    }

    fn expenses(&self) -> Result<Vec<Expense>, RecordStoreError> {
        Ok(self.expenses.clone())
    }

    fn payments(&self) -> Result<Vec<Payment>, RecordStoreError> {
        Ok(self.payments.clone())
    }
}
