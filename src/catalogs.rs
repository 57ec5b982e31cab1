//! Catalogs
//!
//! A catalog (price list) groups prices for an audience and optionally
//! carries an adjustment applied to base prices at resolution time. A
//! catalog with no adjustment stores already-final amounts; one with an
//! adjustment stores base amounts that need runtime math.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};

use crate::ids::CatalogId;

/// Direction a catalog adjustment moves the base price in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentDirection {
    /// The adjustment raises the base price.
    Increase,

    /// The adjustment lowers the base price.
    Decrease,
}

/// A catalog's price adjustment policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment<'a> {
    /// Amounts are stored final; no runtime math.
    None,

    /// Scale the base price by a percentage (e.g. 20% off).
    Percentage {
        /// Direction of the adjustment.
        direction: AdjustmentDirection,

        /// Fraction of the base price, e.g. `Percentage::from(0.20)` for 20%.
        percent: Percentage,
    },

    /// Shift the base price by a fixed amount.
    Fixed {
        /// Direction of the adjustment.
        direction: AdjustmentDirection,

        /// Amount shifted, in the record's currency.
        amount: Money<'a, Currency>,
    },
}

impl Adjustment<'_> {
    /// Whether this adjustment changes the base price.
    pub fn is_none(&self) -> bool {
        matches!(self, Adjustment::None)
    }
}

/// A price list with its currency and adjustment policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catalog<'a> {
    id: CatalogId,
    currency: &'a Currency,
    is_default: bool,
    adjustment: Adjustment<'a>,
}

impl<'a> Catalog<'a> {
    /// Create a non-default catalog with no adjustment.
    pub fn new(id: CatalogId, currency: &'a Currency) -> Self {
        Self {
            id,
            currency,
            is_default: false,
            adjustment: Adjustment::None,
        }
    }

    /// Mark this catalog as the store default.
    #[must_use]
    pub fn default_catalog(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Attach an adjustment policy.
    #[must_use]
    pub fn with_adjustment(mut self, adjustment: Adjustment<'a>) -> Self {
        self.adjustment = adjustment;
        self
    }

    /// Catalog id.
    pub fn id(&self) -> CatalogId {
        self.id
    }

    /// Currency the catalog prices in.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Whether this is the store default catalog.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// The catalog's adjustment policy.
    pub fn adjustment(&self) -> Adjustment<'a> {
        self.adjustment
    }

    /// Whether resolved base prices need runtime adjustment.
    ///
    /// Catalogs that store already-final amounts return `false`; their
    /// records are served straight from resolution.
    pub fn adjusts(&self) -> bool {
        !self.adjustment.is_none()
    }
}
