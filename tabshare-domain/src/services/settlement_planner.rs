use crate::{
    model::{Balances, Money, ParticipantId, Settlement, Transfer},
    services::{RoundingContext, RoundingContextError},
};
use thiserror::Error;

/// Upstream invariant violations detected while planning a settlement.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InternalInconsistency {
    #[error("balances sum to {total} instead of zero")]
    ImbalancedTotal { total: Money },
    #[error("balances are too large to total")]
    TotalOutOfRange,
    #[error("non-positive transfer of {amount} from {from} to {to}")]
    NonPositiveTransfer {
        from: ParticipantId,
        to: ParticipantId,
        amount: Money,
    },
    #[error(
        "matching left {debtor_residual} owed by debtors and {creditor_residual} owed to creditors"
    )]
    UnsettledResidual {
        debtor_residual: Money,
        creditor_residual: Money,
    },
}

/// Greedy debt-netting planner.
///
/// Debtors (most negative first) are matched against creditors (most positive
/// first); each step settles the smaller of the two remaining amounts. Ties keep
/// the balance map's iteration order. The plan is deterministic but does not
/// always use the fewest possible transfers.
#[derive(Clone, Copy, Debug)]
pub struct SettlementPlanner {
    tolerance: Money,
}

impl SettlementPlanner {
    pub fn new(context: RoundingContext) -> Result<Self, RoundingContextError> {
        Ok(Self {
            tolerance: context.validate()?.atomic_unit(),
        })
    }

    pub fn tolerance(&self) -> Money {
        self.tolerance
    }

    /// Plan transfers that zero every balance.
    ///
    /// Takes the balances by reference and returns the post-settlement state
    /// together with the transfer list.
    pub fn plan(&self, balances: &Balances) -> Result<Settlement, InternalInconsistency> {
        let Some(total) = balances
            .values()
            .try_fold(Money::ZERO, |acc, balance| acc.checked_add(*balance))
        else {
            tracing::error!(
                reject_reason = "total_out_of_range",
                member_count = balances.len(),
                "Settlement planning rejected because the balance total overflows"
            );
            return Err(InternalInconsistency::TotalOutOfRange);
        };
        if total.abs() > self.tolerance {
            tracing::error!(
                reject_reason = "input_imbalance",
                member_count = balances.len(),
                total = %total,
                tolerance = %self.tolerance,
                "Settlement planning rejected due to input imbalance"
            );
            return Err(InternalInconsistency::ImbalancedTotal { total });
        }

        // Both sides hold the remaining magnitude, so the matching works on positives.
        let mut creditors: Vec<(&ParticipantId, Money)> = balances
            .iter()
            .filter(|(_, balance)| balance.is_positive())
            .map(|(id, balance)| (id, *balance))
            .collect();
        let mut debtors: Vec<(&ParticipantId, Money)> = balances
            .iter()
            .filter(|(_, balance)| balance.is_negative())
            .map(|(id, balance)| (id, balance.abs()))
            .collect();
        creditors.sort_by(|(_, a), (_, b)| b.cmp(a));
        debtors.sort_by(|(_, a), (_, b)| b.cmp(a));

        let mut transfers = Vec::with_capacity(creditors.len() + debtors.len());
        let (mut d, mut c) = (0usize, 0usize);

        while d < debtors.len() && c < creditors.len() {
            let (debtor, owed) = debtors[d];
            let (creditor, claim) = creditors[c];
            let amount = owed.min(claim);

            if !amount.is_positive() {
                tracing::error!(
                    reject_reason = "non_positive_transfer",
                    from = %debtor,
                    to = %creditor,
                    amount = %amount,
                    "Settlement planning produced a non-positive transfer"
                );
                return Err(InternalInconsistency::NonPositiveTransfer {
                    from: debtor.clone(),
                    to: creditor.clone(),
                    amount,
                });
            }

            transfers.push(Transfer {
                from: debtor.clone(),
                to: creditor.clone(),
                amount,
            });
            debtors[d].1 -= amount;
            creditors[c].1 -= amount;

            if debtors[d].1.is_zero() {
                d += 1;
            }
            if creditors[c].1.is_zero() {
                c += 1;
            }
        }

        if d < debtors.len() || c < creditors.len() {
            let debtor_residual: Money = debtors[d..].iter().map(|(_, owed)| *owed).sum();
            let creditor_residual: Money = creditors[c..].iter().map(|(_, claim)| *claim).sum();
            tracing::error!(
                reject_reason = "unsettled_residual",
                member_count = balances.len(),
                debtor_residual = %debtor_residual,
                creditor_residual = %creditor_residual,
                "Settlement planning left balances unmatched"
            );
            return Err(InternalInconsistency::UnsettledResidual {
                debtor_residual,
                creditor_residual,
            });
        }

        let mut new_balances = balances.clone();
        for transfer in &transfers {
            if let Some(balance) = new_balances.get_mut(&transfer.from) {
                *balance += transfer.amount;
            }
            if let Some(balance) = new_balances.get_mut(&transfer.to) {
                *balance -= transfer.amount;
            }
        }
        debug_assert!(new_balances.values().all(|balance| balance.is_zero()));

        tracing::debug!(
            member_count = balances.len(),
            creditor_count = creditors.len(),
            debtor_count = debtors.len(),
            transfer_count = transfers.len(),
            "Settlement plan built"
        );

        Ok(Settlement {
            new_balances,
            transfers,
        })
    }
}

impl Default for SettlementPlanner {
    fn default() -> Self {
        Self {
            tolerance: RoundingContext::cents_default().atomic_unit(),
        }
    }
}
