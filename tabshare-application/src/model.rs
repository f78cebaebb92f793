use tabshare_domain::{
    Balances, Expense, InvalidExpense, InvalidPayment, Money, Participant, ParticipantId, Payment,
    ResolvedExpense, Settlement, ValidationWarning,
};

/// What to do with a record that fails validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Abort the whole computation on the first invalid record.
    FailFast,
    /// Skip invalid records and list them in the report.
    #[default]
    CollectAndReport,
}

/// A fully materialised snapshot of the record store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerBatch {
    pub participants: Vec<Participant>,
    pub expenses: Vec<Expense>,
    pub payments: Vec<Payment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantSummary {
    pub id: ParticipantId,
    /// Sum of expense amounts this participant paid for.
    pub paid: Money,
    /// Sum of this participant's shares across all expenses.
    pub share: Money,
    pub sent: Money,
    pub received: Money,
    pub balance: Money,
}

impl ParticipantSummary {
    pub(crate) fn new(id: ParticipantId) -> Self {
        Self {
            id,
            paid: Money::ZERO,
            share: Money::ZERO,
            sent: Money::ZERO,
            received: Money::ZERO,
            balance: Money::ZERO,
        }
    }
}

/// Everything derived from a batch up to (not including) settlement planning.
#[derive(Clone, Debug, PartialEq)]
pub struct BalanceReport {
    pub expenses: Vec<ResolvedExpense>,
    pub warnings: Vec<ValidationWarning>,
    pub rejected_expenses: Vec<InvalidExpense>,
    pub rejected_payments: Vec<InvalidPayment>,
    pub balances: Balances,
    pub summaries: Vec<ParticipantSummary>,
    pub total_spent: Money,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LedgerReport {
    pub balance: BalanceReport,
    pub settlement: Settlement,
}
