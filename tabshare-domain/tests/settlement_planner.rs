mod common;

use common::{build_expense, build_payment, expense_seed, payment_seed};
use proptest::prelude::*;
use std::collections::HashMap;
use tabshare_domain::{
    BalanceAggregator, Expense, Money, ParticipantId, SettlementPlanner, SplitResolver, Transfer,
};

#[test]
fn three_way_dinner_settles_to_payer() {
    let expense = Expense::equal("dinner", Money::from_i64(90), "A", ["A", "B", "C"]);
    let resolved = SplitResolver::default()
        .resolve(&expense)
        .expect("dinner should resolve")
        .expense;
    let balances = BalanceAggregator::aggregate([&resolved], []);

    let settlement = SettlementPlanner::default()
        .plan(&balances)
        .expect("dinner should settle");

    assert_eq!(
        settlement.transfers,
        vec![
            Transfer {
                from: "B".into(),
                to: "A".into(),
                amount: Money::from_i64(30),
            },
            Transfer {
                from: "C".into(),
                to: "A".into(),
                amount: Money::from_i64(30),
            },
        ]
    );
    assert!(settlement.new_balances.values().all(|b| b.is_zero()));
}

proptest! {
    #[test]
    fn settlement_zeroes_every_balance(
        member_count in 1usize..=6,
        expense_seeds in prop::collection::vec(expense_seed(), 0..=30),
        payment_seeds in prop::collection::vec(payment_seed(), 0..=30),
    ) {
        let resolver = SplitResolver::default();
        let expenses: Vec<_> = expense_seeds
            .iter()
            .enumerate()
            .map(|(idx, seed)| {
                resolver
                    .resolve(&build_expense(idx, seed, member_count))
                    .expect("generated expense is valid")
                    .expense
            })
            .collect();
        let payments: Vec<_> = payment_seeds
            .iter()
            .enumerate()
            .map(|(idx, seed)| build_payment(idx, seed, member_count))
            .collect();
        let balances = BalanceAggregator::aggregate(&expenses, &payments);

        let settlement = SettlementPlanner::default()
            .plan(&balances)
            .expect("zero-sum balances always settle");

        let mut outgoing: HashMap<&ParticipantId, Money> = HashMap::new();
        let mut incoming: HashMap<&ParticipantId, Money> = HashMap::new();
        for transfer in &settlement.transfers {
            prop_assert_ne!(&transfer.from, &transfer.to);
            prop_assert!(transfer.amount.is_positive());
            *outgoing.entry(&transfer.from).or_default() += transfer.amount;
            *incoming.entry(&transfer.to).or_default() += transfer.amount;
        }

        for (id, balance) in &balances {
            let sent = outgoing.get(id).copied().unwrap_or_default();
            let received = incoming.get(id).copied().unwrap_or_default();
            if balance.is_negative() {
                prop_assert_eq!(sent, -*balance);
                prop_assert!(received.is_zero());
            } else {
                prop_assert_eq!(received, *balance);
                prop_assert!(sent.is_zero());
            }
        }
        prop_assert!(settlement.new_balances.values().all(|b| b.is_zero()));
    }
}
