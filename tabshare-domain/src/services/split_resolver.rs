use crate::{
    model::{Expense, ExpenseId, Money, ParticipantId, ResolvedExpense, Split, SplitMode},
    services::{RoundingContext, RoundingContextError},
};
use fxhash::FxHashSet;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidExpenseReason {
    #[error("no participants are involved")]
    EmptyInvolved,
    #[error("amount {0} is negative")]
    NegativeAmount(Money),
    #[error("ratio weights sum to {0}, which cannot be distributed")]
    NonPositiveRatioTotal(Decimal),
    #[error("manual share {share} for {participant} is negative")]
    NegativeManualShare {
        participant: ParticipantId,
        share: Money,
    },
    #[error("amounts exceed the supported range")]
    AmountOutOfRange,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid expense {expense_id}: {reason}")]
pub struct InvalidExpense {
    pub expense_id: ExpenseId,
    pub reason: InvalidExpenseReason,
}

/// Non-fatal findings surfaced alongside a resolved split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Manual shares do not add up to the expense amount; the entered values are kept.
    ManualSplitMismatch {
        expense_id: ExpenseId,
        amount: Money,
        allocated: Money,
    },
}

impl ValidationWarning {
    pub fn expense_id(&self) -> &ExpenseId {
        match self {
            ValidationWarning::ManualSplitMismatch { expense_id, .. } => expense_id,
        }
    }

    /// Amount still missing from the shares (negative when over-allocated).
    pub fn difference(&self) -> Money {
        match self {
            ValidationWarning::ManualSplitMismatch {
                amount, allocated, ..
            } => *amount - *allocated,
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::ManualSplitMismatch {
                expense_id,
                amount,
                allocated,
            } => write!(
                f,
                "manual split of expense {expense_id} allocates {allocated} of {amount}"
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplitOutcome {
    pub expense: ResolvedExpense,
    pub warning: Option<ValidationWarning>,
}

/// Derives per-participant shares from an expense's split mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitResolver {
    context: RoundingContext,
}

impl SplitResolver {
    pub fn new(context: RoundingContext) -> Result<Self, RoundingContextError> {
        Ok(Self {
            context: context.validate()?,
        })
    }

    pub fn context(&self) -> RoundingContext {
        self.context
    }

    /// Resolve the split of one expense.
    ///
    /// Equal and ratio shares are rounded to the context scale and always sum to
    /// the amount exactly: the residue lands on the first involved participant.
    /// Manual shares are taken as entered; a sum mismatch yields a warning.
    pub fn resolve(&self, expense: &Expense) -> Result<SplitOutcome, InvalidExpense> {
        let invalid = |reason| InvalidExpense {
            expense_id: expense.id.clone(),
            reason,
        };

        if expense.amount.is_negative() {
            return Err(invalid(InvalidExpenseReason::NegativeAmount(expense.amount)));
        }
        if expense.amount.exceeds_limit() {
            return Err(invalid(InvalidExpenseReason::AmountOutOfRange));
        }

        let involved = dedup_involved(&expense.involved);
        if involved.is_empty() {
            return Err(invalid(InvalidExpenseReason::EmptyInvolved));
        }

        let (split, warning) = match &expense.split_mode {
            SplitMode::Equal => {
                let weights = vec![Decimal::ONE; involved.len()];
                let split = self
                    .split_by_weights(&involved, &weights, expense.amount)
                    .map_err(invalid)?;
                (split, None)
            }
            SplitMode::Ratio(ratios) => {
                let weights: Vec<Decimal> = involved
                    .iter()
                    .map(|id| {
                        ratios
                            .get(*id)
                            .copied()
                            .filter(|weight| *weight > Decimal::ZERO)
                            .unwrap_or(Decimal::ONE)
                    })
                    .collect();
                let split = self
                    .split_by_weights(&involved, &weights, expense.amount)
                    .map_err(invalid)?;
                (split, None)
            }
            SplitMode::Manual(shares) => {
                let ignored = shares
                    .keys()
                    .filter(|id| !involved.contains(id))
                    .count();
                if ignored > 0 {
                    tracing::debug!(
                        expense_id = %expense.id,
                        ignored,
                        "Manual shares for non-involved participants ignored"
                    );
                }

                let mut split = Split::with_capacity(involved.len());
                for id in &involved {
                    let share = shares.get(*id).copied().unwrap_or(Money::ZERO);
                    if share.is_negative() {
                        return Err(invalid(InvalidExpenseReason::NegativeManualShare {
                            participant: (*id).clone(),
                            share,
                        }));
                    }
                    if share.exceeds_limit() {
                        return Err(invalid(InvalidExpenseReason::AmountOutOfRange));
                    }
                    split.insert((*id).clone(), share);
                }

                let allocated = split
                    .values()
                    .try_fold(Money::ZERO, |acc, share| acc.checked_add(*share))
                    .ok_or_else(|| invalid(InvalidExpenseReason::AmountOutOfRange))?;
                let warning = (allocated != expense.amount).then(|| {
                    tracing::warn!(
                        expense_id = %expense.id,
                        amount = %expense.amount,
                        allocated = %allocated,
                        "Manual split does not add up to the expense amount"
                    );
                    ValidationWarning::ManualSplitMismatch {
                        expense_id: expense.id.clone(),
                        amount: expense.amount,
                        allocated,
                    }
                });
                (split, warning)
            }
        };

        tracing::debug!(
            expense_id = %expense.id,
            split_mode = split_mode_name(&expense.split_mode),
            participant_count = split.len(),
            amount = %expense.amount,
            "Expense split resolved"
        );

        Ok(SplitOutcome {
            expense: ResolvedExpense {
                id: expense.id.clone(),
                payer: expense.payer.clone(),
                amount: expense.amount,
                split,
            },
            warning,
        })
    }

    fn split_by_weights(
        &self,
        involved: &[&ParticipantId],
        weights: &[Decimal],
        amount: Money,
    ) -> Result<Split, InvalidExpenseReason> {
        let total_weight = weights
            .iter()
            .try_fold(Decimal::ZERO, |acc, weight| acc.checked_add(*weight))
            .ok_or(InvalidExpenseReason::AmountOutOfRange)?;
        if total_weight <= Decimal::ZERO {
            return Err(InvalidExpenseReason::NonPositiveRatioTotal(total_weight));
        }

        let amount = amount.as_decimal();
        let mut shares = weights
            .iter()
            .map(|weight| {
                amount
                    .checked_mul(*weight)
                    .and_then(|scaled| scaled.checked_div(total_weight))
                    .map(|exact| self.context.round(exact))
                    .ok_or(InvalidExpenseReason::AmountOutOfRange)
            })
            .collect::<Result<Vec<_>, _>>()?;

        close_remainder(&mut shares, amount);

        Ok(involved
            .iter()
            .zip(shares)
            .map(|(id, share)| ((*id).clone(), Money::from_decimal(share)))
            .collect())
    }
}

/// Involved participants in first-occurrence order, duplicates dropped.
fn dedup_involved(involved: &[ParticipantId]) -> Vec<&ParticipantId> {
    let mut seen: FxHashSet<&ParticipantId> = FxHashSet::default();
    involved.iter().filter(|id| seen.insert(*id)).collect()
}

/// Moves `amount - sum(shares)` onto the leading shares so the total is exact.
///
/// A surplus goes entirely to the first share. A deficit is taken from the first
/// share, spilling to the next ones only where a share would drop below zero.
fn close_remainder(shares: &mut [Decimal], amount: Decimal) {
    let allocated: Decimal = shares.iter().sum();
    let mut remainder = amount - allocated;
    if remainder.is_zero() {
        return;
    }

    if remainder > Decimal::ZERO {
        if let Some(first) = shares.first_mut() {
            *first += remainder;
        }
        return;
    }

    for share in shares.iter_mut() {
        let absorbed = (-remainder).min(*share);
        *share -= absorbed;
        remainder += absorbed;
        if remainder.is_zero() {
            break;
        }
    }
    debug_assert!(remainder.is_zero());
}

fn split_mode_name(mode: &SplitMode) -> &'static str {
    match mode {
        SplitMode::Equal => "equal",
        SplitMode::Ratio(_) => "ratio",
        SplitMode::Manual(_) => "manual",
    }
}
