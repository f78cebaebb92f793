pub mod balance_aggregator;
pub mod rounding;
pub mod settlement_planner;
pub mod split_resolver;

pub use balance_aggregator::{BalanceAccumulator, BalanceAggregator};
pub use rounding::{RoundingContext, RoundingContextError, RoundingMode};
pub use settlement_planner::{InternalInconsistency, SettlementPlanner};
pub use split_resolver::{
    InvalidExpense, InvalidExpenseReason, SplitOutcome, SplitResolver, ValidationWarning,
};
