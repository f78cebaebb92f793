use crate::{
    error::LedgerError,
    model::{BalanceReport, BatchPolicy, LedgerBatch, LedgerReport, ParticipantSummary},
    ports::RecordStore,
};
use std::fmt;
use tabshare_domain::{
    BalanceAggregator, Balances, Money, ParticipantId, Payment, ResolvedExpense, RoundingContext,
    Settlement, SettlementPlanner, SplitResolver,
};

#[derive(Clone, Copy)]
pub struct LedgerProcessor<'a> {
    store: &'a dyn RecordStore,
    resolver: SplitResolver,
    planner: SettlementPlanner,
    policy: BatchPolicy,
}

impl<'a> LedgerProcessor<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        context: RoundingContext,
        policy: BatchPolicy,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            store,
            resolver: SplitResolver::new(context)?,
            planner: SettlementPlanner::new(context)?,
            policy,
        })
    }

    pub fn policy(&self) -> BatchPolicy {
        self.policy
    }

    /// Snapshot the record store into one immutable batch.
    pub fn load_batch(&self) -> Result<LedgerBatch, LedgerError> {
        let batch = LedgerBatch {
            participants: self.store.participants()?,
            expenses: self.store.expenses()?,
            payments: self.store.payments()?,
        };
        tracing::debug!(
            participant_count = batch.participants.len(),
            expense_count = batch.expenses.len(),
            payment_count = batch.payments.len(),
            "Ledger batch loaded"
        );
        Ok(batch)
    }

    /// Resolve every split and fold the batch into balances.
    pub fn calculate_balances(&self, batch: &LedgerBatch) -> Result<BalanceReport, LedgerError> {
        let mut expenses = Vec::with_capacity(batch.expenses.len());
        let mut warnings = Vec::new();
        let mut rejected_expenses = Vec::new();
        for expense in &batch.expenses {
            match self.resolver.resolve(expense) {
                Ok(outcome) => {
                    expenses.push(outcome.expense);
                    warnings.extend(outcome.warning);
                }
                Err(err) => self.reject(err, &mut rejected_expenses)?,
            }
        }

        let mut payments = Vec::with_capacity(batch.payments.len());
        let mut rejected_payments = Vec::new();
        for payment in &batch.payments {
            match payment.validate() {
                Ok(()) => payments.push(payment),
                Err(err) => self.reject(err, &mut rejected_payments)?,
            }
        }

        let balances = BalanceAggregator::aggregate_with_participants(
            batch.participants.iter().map(|participant| participant.id.clone()),
            &expenses,
            payments.iter().copied(),
        );
        let summaries = summarize(&balances, &expenses, &payments);
        let total_spent = expenses.iter().map(|expense| expense.amount).sum();

        Ok(BalanceReport {
            expenses,
            warnings,
            rejected_expenses,
            rejected_payments,
            balances,
            summaries,
            total_spent,
        })
    }

    pub fn plan_settlement(&self, report: &BalanceReport) -> Result<Settlement, LedgerError> {
        Ok(self.planner.plan(&report.balances)?)
    }

    pub fn build_report(&self, batch: &LedgerBatch) -> Result<LedgerReport, LedgerError> {
        let balance = self.calculate_balances(batch)?;
        let settlement = self.plan_settlement(&balance)?;
        Ok(LedgerReport {
            balance,
            settlement,
        })
    }

    /// Load the current batch and compute the full report from scratch.
    pub fn compute_report(&self) -> Result<LedgerReport, LedgerError> {
        let batch = self.load_batch()?;
        self.build_report(&batch)
    }

    fn reject<E>(&self, err: E, rejected: &mut Vec<E>) -> Result<(), LedgerError>
    where
        E: Into<LedgerError> + fmt::Display,
    {
        match self.policy {
            BatchPolicy::FailFast => Err(err.into()),
            BatchPolicy::CollectAndReport => {
                tracing::warn!(error = %err, "Invalid record skipped");
                rejected.push(err);
                Ok(())
            }
        }
    }
}

fn summarize(
    balances: &Balances,
    expenses: &[ResolvedExpense],
    payments: &[&Payment],
) -> Vec<ParticipantSummary> {
    let mut summaries: Vec<ParticipantSummary> = balances
        .iter()
        .map(|(id, balance)| ParticipantSummary {
            balance: *balance,
            ..ParticipantSummary::new(id.clone())
        })
        .collect();

    for expense in expenses {
        if let Some(summary) = slot(&mut summaries, balances, &expense.payer) {
            summary.paid += expense.amount;
        }
        for (participant, share) in &expense.split {
            if let Some(summary) = slot(&mut summaries, balances, participant) {
                summary.share += *share;
            }
        }
    }
    for payment in payments {
        if let Some(summary) = slot(&mut summaries, balances, &payment.from) {
            summary.sent += payment.amount;
        }
        if let Some(summary) = slot(&mut summaries, balances, &payment.to) {
            summary.received += payment.amount;
        }
    }

    debug_assert!(summaries.iter().all(|summary| {
        summary.paid - summary.share + summary.sent - summary.received == summary.balance
    }));
    summaries
}

fn slot<'s>(
    summaries: &'s mut [ParticipantSummary],
    balances: &Balances,
    id: &ParticipantId,
) -> Option<&'s mut ParticipantSummary> {
    balances
        .get_index_of(id)
        .and_then(|idx| summaries.get_mut(idx))
}
