//! Rounding configuration shared by split resolution and settlement planning.

use crate::model::Money;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

const MAX_SCALE: u32 = 22;

/// Rounding mode applied to computed shares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoundingMode {
    /// Round half away from zero (e.g., 0.005 -> 0.01 at scale 2).
    #[default]
    HalfUp,
    /// Round half to nearest even number (banker's rounding).
    HalfEven,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// Context for share rounding and settlement tolerance.
///
/// # Example
/// ```
/// use tabshare_domain::services::{RoundingContext, RoundingMode};
///
/// let ctx = RoundingContext {
///     scale: 2, // cents
///     rounding_mode: RoundingMode::HalfUp,
/// };
/// assert_eq!(ctx, RoundingContext::cents_default());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundingContext {
    /// Number of decimal places of the atomic unit (2 for cents).
    pub scale: u32,
    pub rounding_mode: RoundingMode,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RoundingContextError {
    #[error("scale {scale} exceeds the supported maximum of {max_supported}")]
    UnsupportedScale { scale: u32, max_supported: u32 },
}

impl RoundingContext {
    /// Two decimal places, half-up.
    pub fn cents_default() -> Self {
        Self {
            scale: 2,
            rounding_mode: RoundingMode::HalfUp,
        }
    }

    pub fn validate(self) -> Result<Self, RoundingContextError> {
        if self.scale <= MAX_SCALE {
            return Ok(self);
        }
        Err(RoundingContextError::UnsupportedScale {
            scale: self.scale,
            max_supported: MAX_SCALE,
        })
    }

    /// Smallest representable amount, also used as the zero-sum tolerance.
    pub fn atomic_unit(self) -> Money {
        Money::new(1, self.scale)
    }

    pub fn round(self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.scale, self.rounding_mode.strategy())
    }
}

impl Default for RoundingContext {
    fn default() -> Self {
        Self::cents_default()
    }
}
