//! Resolved Prices
//!
//! The output value of a resolution: the winning record's amounts plus the
//! catalog adjustment that produced them, if one was applied. Created
//! per-request and discarded; never persisted.

use rusty_money::{Money, MoneyError, iso::Currency};

use crate::{
    catalogs::Adjustment,
    ids::RecordId,
    records::{PriceRecord, TaxTreatment},
};

/// A price resolved for one variant in one context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPrice<'a> {
    source: RecordId,
    unit_price: Money<'a, Currency>,
    compare_at: Option<Money<'a, Currency>>,
    tax: TaxTreatment,
    adjustment: Option<Adjustment<'a>>,
}

impl<'a> ResolvedPrice<'a> {
    /// Quote a record as-is, with no catalog adjustment.
    ///
    /// This is the path for catalogs that store already-final amounts.
    pub fn from_record(record: &PriceRecord<'a>) -> Self {
        Self {
            source: record.id(),
            unit_price: record.unit_price(),
            compare_at: record.compare_at(),
            tax: record.tax(),
            adjustment: None,
        }
    }

    /// Quote a record with an adjusted unit price.
    ///
    /// Used by the catalog adjuster; `adjustment` records what was applied.
    pub(crate) fn adjusted(
        record: &PriceRecord<'a>,
        unit_price: Money<'a, Currency>,
        adjustment: Adjustment<'a>,
    ) -> Self {
        Self {
            source: record.id(),
            unit_price,
            compare_at: record.compare_at(),
            tax: record.tax(),
            adjustment: Some(adjustment),
        }
    }

    /// Id of the record this price came from.
    pub fn source(&self) -> RecordId {
        self.source
    }

    /// Final unit price.
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Compare-at (was) price carried over from the record.
    pub fn compare_at(&self) -> Option<Money<'a, Currency>> {
        self.compare_at
    }

    /// Tax treatment carried over from the record.
    pub fn tax(&self) -> TaxTreatment {
        self.tax
    }

    /// The catalog adjustment applied, if any.
    pub fn adjustment(&self) -> Option<Adjustment<'a>> {
        self.adjustment
    }

    /// Savings against the compare-at price, when one exists.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the compare-at price is in a different
    /// currency than the unit price.
    pub fn savings(&self) -> Result<Option<Money<'a, Currency>>, MoneyError> {
        match self.compare_at {
            Some(compare_at) => Ok(Some(compare_at.sub(self.unit_price)?)),
            None => Ok(None),
        }
    }
}
