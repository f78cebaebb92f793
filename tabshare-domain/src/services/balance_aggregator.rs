use crate::model::{Balances, Money, ParticipantId, Payment, ResolvedExpense};

/// Running per-participant balance fold.
///
/// Expenses credit the payer with the full amount and debit every share;
/// payments credit the sender and debit the receiver. The balances sum to zero
/// as long as every split adds up to its expense amount.
///
/// Inputs are expected to have passed `SplitResolver::resolve` and
/// `Payment::validate`, which cap every amount at `Money::max_amount()`.
#[derive(Clone, Debug, Default)]
pub struct BalanceAccumulator {
    balances: Balances,
}

impl BalanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the balance map so every listed participant appears, even at zero.
    pub fn new_with_participants<I>(participants: I) -> Self
    where
        I: IntoIterator<Item = ParticipantId>,
    {
        let balances = participants
            .into_iter()
            .map(|id| (id, Money::ZERO))
            .collect();
        Self { balances }
    }

    pub fn apply_expense(&mut self, expense: &ResolvedExpense) {
        self.adjust(&expense.payer, expense.amount);
        for (participant, share) in &expense.split {
            self.adjust(participant, -*share);
        }
    }

    pub fn apply_payment(&mut self, payment: &Payment) {
        self.adjust(&payment.from, payment.amount);
        self.adjust(&payment.to, -payment.amount);
    }

    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    pub fn into_balances(self) -> Balances {
        self.balances
    }

    fn adjust(&mut self, participant: &ParticipantId, delta: Money) {
        match self.balances.get_mut(participant) {
            Some(balance) => *balance += delta,
            None => {
                self.balances.insert(participant.clone(), delta);
            }
        }
    }
}

/// Folds a full batch of resolved expenses and payments into balances.
pub struct BalanceAggregator;

impl BalanceAggregator {
    pub fn aggregate<'e, 'p, E, P>(expenses: E, payments: P) -> Balances
    where
        E: IntoIterator<Item = &'e ResolvedExpense>,
        P: IntoIterator<Item = &'p Payment>,
    {
        Self::aggregate_with_participants(std::iter::empty(), expenses, payments)
    }

    pub fn aggregate_with_participants<'e, 'p, R, E, P>(
        participants: R,
        expenses: E,
        payments: P,
    ) -> Balances
    where
        R: IntoIterator<Item = ParticipantId>,
        E: IntoIterator<Item = &'e ResolvedExpense>,
        P: IntoIterator<Item = &'p Payment>,
    {
        let mut accumulator = BalanceAccumulator::new_with_participants(participants);
        let mut expense_count = 0usize;
        let mut payment_count = 0usize;

        for expense in expenses {
            accumulator.apply_expense(expense);
            expense_count += 1;
        }
        for payment in payments {
            accumulator.apply_payment(payment);
            payment_count += 1;
        }

        let balances = accumulator.into_balances();
        let total: Money = balances.values().sum();
        tracing::debug!(
            member_count = balances.len(),
            expense_count,
            payment_count,
            total = %total,
            "Balances aggregated"
        );

        balances
    }
}
