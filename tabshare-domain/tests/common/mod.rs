#![allow(dead_code)]

use proptest::prelude::*;
use rust_decimal::Decimal;
use tabshare_domain::{Expense, Money, ParticipantId, Payment, SplitMode};

pub const MEMBERS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

#[derive(Clone, Debug)]
pub struct ExpenseSeed {
    pub cents: i64,
    pub payer: usize,
    pub involved_mask: usize,
    pub mode: u8,
    pub weights: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct PaymentSeed {
    pub cents: i64,
    pub from: usize,
    pub to: usize,
}

pub fn expense_seed() -> impl Strategy<Value = ExpenseSeed> {
    (
        0i64..=1_000_000,
        0usize..MEMBERS.len(),
        1usize..64,
        0u8..3,
        prop::collection::vec(0u8..=5, MEMBERS.len()),
    )
        .prop_map(|(cents, payer, involved_mask, mode, weights)| ExpenseSeed {
            cents,
            payer,
            involved_mask,
            mode,
            weights,
        })
}

pub fn payment_seed() -> impl Strategy<Value = PaymentSeed> {
    (0i64..=500_000, 0usize..MEMBERS.len(), 0usize..MEMBERS.len())
        .prop_map(|(cents, from, to)| PaymentSeed { cents, from, to })
}

fn member(idx: usize, member_count: usize) -> ParticipantId {
    ParticipantId::new(MEMBERS[idx % member_count])
}

/// Builds an expense whose split is always internally consistent: equal, ratio,
/// or manual shares that add up to the amount.
pub fn build_expense(idx: usize, seed: &ExpenseSeed, member_count: usize) -> Expense {
    let mut involved: Vec<ParticipantId> = (0..member_count)
        .filter(|i| seed.involved_mask & (1 << i) != 0)
        .map(|i| ParticipantId::new(MEMBERS[i]))
        .collect();
    if involved.is_empty() {
        involved.push(member(seed.payer, member_count));
    }

    let split_mode = match seed.mode {
        0 => SplitMode::Equal,
        1 => SplitMode::Ratio(
            involved
                .iter()
                .zip(&seed.weights)
                .map(|(id, weight)| (id.clone(), Decimal::from(*weight)))
                .collect(),
        ),
        _ => {
            let count = involved.len() as i64;
            let base = seed.cents / count;
            let first = seed.cents - base * (count - 1);
            SplitMode::Manual(
                involved
                    .iter()
                    .enumerate()
                    .map(|(pos, id)| {
                        let cents = if pos == 0 { first } else { base };
                        (id.clone(), Money::new(cents, 2))
                    })
                    .collect(),
            )
        }
    };

    Expense::new(
        format!("e{idx}"),
        Money::new(seed.cents, 2),
        member(seed.payer, member_count),
        involved,
        split_mode,
    )
}

pub fn build_payment(idx: usize, seed: &PaymentSeed, member_count: usize) -> Payment {
    Payment::new(
        format!("p{idx}"),
        Money::new(seed.cents, 2),
        member(seed.from, member_count),
        member(seed.to, member_count),
    )
}
