use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::{
    borrow::Borrow,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};
use thiserror::Error;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Opaque participant identifier supplied by the record store.
    ParticipantId
);
string_id!(ExpenseId);
string_id!(PaymentId);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Largest accepted expense, share or payment amount (in whole units).
///
/// Any batch built from amounts below this stays far inside `Decimal`'s range,
/// so balance folds cannot overflow.
const AMOUNT_LIMIT: i64 = 1_000_000_000_000_000;

/// Currency-agnostic monetary amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Builds `num * 10^-scale`, e.g. `Money::new(334, 2)` is 3.34.
    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Upper bound on a single record's amount.
    pub fn max_amount() -> Self {
        Self::from_i64(AMOUNT_LIMIT)
    }

    pub fn exceeds_limit(self) -> bool {
        self.0.abs() > Decimal::from(AMOUNT_LIMIT)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn signum(self) -> i64 {
        if self.is_positive() {
            1
        } else if self.is_negative() {
            -1
        } else {
            0
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Participant id -> share owed for one expense, in `involved` order.
pub type Split = IndexMap<ParticipantId, Money>;

/// Participant id -> signed balance (positive: is owed money, negative: owes money).
///
/// Iteration order is first-reference order and is used as the tie-break key
/// when planning settlements.
pub type Balances = IndexMap<ParticipantId, Money>;

#[derive(Clone, Debug, PartialEq)]
pub enum SplitMode {
    Equal,
    /// Weights per participant; missing or non-positive weights count as 1.
    Ratio(IndexMap<ParticipantId, Decimal>),
    /// Shares entered by hand; missing participants owe 0.
    Manual(IndexMap<ParticipantId, Money>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Money,
    pub payer: ParticipantId,
    pub involved: Vec<ParticipantId>,
    pub split_mode: SplitMode,
}

impl Expense {
    pub fn new<I, P>(
        id: impl Into<ExpenseId>,
        amount: Money,
        payer: impl Into<ParticipantId>,
        involved: I,
        split_mode: SplitMode,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Self {
            id: id.into(),
            amount,
            payer: payer.into(),
            involved: involved.into_iter().map(Into::into).collect(),
            split_mode,
        }
    }

    pub fn equal<I, P>(
        id: impl Into<ExpenseId>,
        amount: Money,
        payer: impl Into<ParticipantId>,
        involved: I,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        Self::new(id, amount, payer, involved, SplitMode::Equal)
    }
}

/// A direct transfer already executed outside the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentId,
    pub amount: Money,
    pub from: ParticipantId,
    pub to: ParticipantId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvalidPaymentReason {
    #[error("is negative")]
    NegativeAmount,
    #[error("exceeds the supported maximum")]
    AmountOutOfRange,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid payment {payment_id}: amount {amount} {reason}")]
pub struct InvalidPayment {
    pub payment_id: PaymentId,
    pub amount: Money,
    pub reason: InvalidPaymentReason,
}

impl Payment {
    pub fn new(
        id: impl Into<PaymentId>,
        amount: Money,
        from: impl Into<ParticipantId>,
        to: impl Into<ParticipantId>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn validate(&self) -> Result<(), InvalidPayment> {
        let reason = if self.amount.is_negative() {
            InvalidPaymentReason::NegativeAmount
        } else if self.amount.exceeds_limit() {
            InvalidPaymentReason::AmountOutOfRange
        } else {
            return Ok(());
        };
        Err(InvalidPayment {
            payment_id: self.id.clone(),
            amount: self.amount,
            reason,
        })
    }
}

/// An expense whose split has been derived by the split resolver.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedExpense {
    pub id: ExpenseId,
    pub payer: ParticipantId,
    pub amount: Money,
    pub split: Split,
}

impl ResolvedExpense {
    pub fn allocated(&self) -> Money {
        self.split.values().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settlement {
    pub new_balances: Balances,
    pub transfers: Vec<Transfer>,
}
