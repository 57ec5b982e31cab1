//! Catalog Adjustments
//!
//! Applies a catalog's percentage or fixed adjustment to a resolved base
//! price. Only invoked explicitly: catalogs that store already-final
//! amounts are quoted straight from resolution via
//! [`ResolvedPrice::from_record`], while catalogs whose
//! [`Catalog::adjusts`] returns `true` route through here.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    catalogs::{Adjustment, AdjustmentDirection, Catalog},
    quotes::ResolvedPrice,
    records::PriceRecord,
};

/// Errors specific to adjustment arithmetic.
#[derive(Debug, Error, PartialEq)]
pub enum AdjustmentError {
    /// Percentage calculation could not be safely represented.
    #[error("percentage adjustment overflowed or was not representable")]
    PercentConversion,

    /// A fixed increase overflowed the minor unit range.
    #[error("fixed adjustment overflowed the minor unit range")]
    AmountOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Apply a catalog's adjustment to a resolved record.
///
/// Adjustments only move the unit price; the compare-at price and tax
/// treatment carry over unchanged. A decrease that would drive the amount
/// below zero clamps to zero.
///
/// # Errors
///
/// - [`AdjustmentError::PercentConversion`]: percentage math overflowed or
///   produced an unrepresentable amount.
/// - [`AdjustmentError::AmountOverflow`]: a fixed increase left the minor
///   unit range.
/// - [`AdjustmentError::Money`]: a fixed adjustment amount is in a different
///   currency than the record.
pub fn apply_adjustment<'a>(
    record: &PriceRecord<'a>,
    catalog: &Catalog<'a>,
) -> Result<ResolvedPrice<'a>, AdjustmentError> {
    let adjustment = catalog.adjustment();

    let unit_price = match adjustment {
        Adjustment::None => return Ok(ResolvedPrice::from_record(record)),
        Adjustment::Percentage { direction, percent } => {
            let minor = scale_minor(record.unit_price().to_minor_units(), direction, percent)?;

            Money::from_minor(minor, record.unit_price().currency())
        }
        Adjustment::Fixed { direction, amount } => shift_fixed(record, direction, amount)?,
    };

    Ok(ResolvedPrice::adjusted(record, unit_price, adjustment))
}

/// Scale a minor unit amount by `1 ± fraction`, rounding the product
/// half-up. Negative results clamp to zero.
fn scale_minor(
    minor: i64,
    direction: AdjustmentDirection,
    percent: Percentage,
) -> Result<i64, AdjustmentError> {
    let base = Decimal::from_i64(minor).ok_or(AdjustmentError::PercentConversion)?;
    let fraction = percent * Decimal::ONE;

    let factor = match direction {
        AdjustmentDirection::Increase => Decimal::ONE.checked_add(fraction),
        AdjustmentDirection::Decrease => Decimal::ONE.checked_sub(fraction),
    }
    .ok_or(AdjustmentError::PercentConversion)?;

    let scaled = base
        .checked_mul(factor)
        .ok_or(AdjustmentError::PercentConversion)?;

    let rounded = scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let minor = rounded
        .to_i64()
        .ok_or(AdjustmentError::PercentConversion)?;

    Ok(minor.max(0))
}

/// Shift a record's price by a fixed amount in the record's currency.
fn shift_fixed<'a>(
    record: &PriceRecord<'a>,
    direction: AdjustmentDirection,
    amount: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, AdjustmentError> {
    let currency = record.unit_price().currency();

    if amount.currency() != currency {
        return Err(AdjustmentError::Money(MoneyError::CurrencyMismatch {
            expected: currency.iso_alpha_code,
            actual: amount.currency().iso_alpha_code,
        }));
    }

    let base = record.unit_price().to_minor_units();

    let minor = match direction {
        AdjustmentDirection::Increase => base
            .checked_add(amount.to_minor_units())
            .ok_or(AdjustmentError::AmountOverflow)?,
        AdjustmentDirection::Decrease => base.saturating_sub(amount.to_minor_units()).max(0),
    };

    Ok(Money::from_minor(minor, currency))
}
