#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    Balances, Expense, ExpenseId, InvalidPayment, InvalidPaymentReason, Money, Participant,
    ParticipantId, Payment, PaymentId, ResolvedExpense, Settlement, Split, SplitMode, Transfer,
};
pub use services::{
    BalanceAccumulator, BalanceAggregator, InternalInconsistency, InvalidExpense,
    InvalidExpenseReason, RoundingContext, RoundingContextError, RoundingMode, SettlementPlanner,
    SplitOutcome, SplitResolver, ValidationWarning,
};
