//! Price Records
//!
//! Stored price rules, supplied read-only by the external data layer for the
//! duration of one resolution call. A record prices a single variant in a
//! single currency, optionally restricted to a market, site, channel or
//! catalog scope and to a quantity band.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::ids::{CatalogId, ChannelId, MarketId, RecordId, SiteId, VariantId};

/// Errors raised while constructing price records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// A record's unit price was below zero (minor units).
    #[error("record {0} has a negative unit price: {1}")]
    NegativePrice(RecordId, i64),

    /// A quantity band's minimum was zero.
    #[error("quantity band minimum must be at least 1")]
    ZeroMinimumQuantity,

    /// A quantity band's minimum exceeded its maximum.
    #[error("quantity band [{min}, {max}] is empty")]
    EmptyBand {
        /// Lower bound of the rejected band.
        min: u32,
        /// Upper bound of the rejected band.
        max: u32,
    },
}

/// A `[min, max]` quantity band within which a unit price applies.
///
/// `max` of `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityBand {
    min: u32,
    max: Option<u32>,
}

impl QuantityBand {
    /// Create a band from an inclusive minimum and optional inclusive maximum.
    ///
    /// # Errors
    ///
    /// - [`RecordError::ZeroMinimumQuantity`]: `min` is zero.
    /// - [`RecordError::EmptyBand`]: `min` exceeds `max`.
    pub fn new(min: u32, max: Option<u32>) -> Result<Self, RecordError> {
        if min == 0 {
            return Err(RecordError::ZeroMinimumQuantity);
        }

        if let Some(max) = max
            && min > max
        {
            return Err(RecordError::EmptyBand { min, max });
        }

        Ok(Self { min, max })
    }

    /// The unbounded band `[1, ∞)`.
    pub fn any() -> Self {
        Self { min: 1, max: None }
    }

    /// An open-ended band `[min, ∞)`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::ZeroMinimumQuantity`] if `min` is zero.
    pub fn at_least(min: u32) -> Result<Self, RecordError> {
        Self::new(min, None)
    }

    /// Inclusive lower bound.
    pub fn min(&self) -> u32 {
        self.min
    }

    /// Inclusive upper bound, `None` when unbounded.
    pub fn max(&self) -> Option<u32> {
        self.max
    }

    /// Whether the given quantity falls inside the band.
    pub fn contains(&self, quantity: u32) -> bool {
        self.min <= quantity && self.max.is_none_or(|max| quantity <= max)
    }
}

impl Default for QuantityBand {
    fn default() -> Self {
        Self::any()
    }
}

/// How a price treats tax.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxTreatment {
    /// Whether tax is already included in the amount.
    pub included: bool,

    /// Applicable tax rate as a decimal fraction, when known.
    pub rate: Option<Decimal>,
}

impl TaxTreatment {
    /// Tax-exclusive price with no known rate.
    pub fn exclusive() -> Self {
        Self {
            included: false,
            rate: None,
        }
    }

    /// Tax-inclusive price at the given rate.
    pub fn inclusive(rate: Decimal) -> Self {
        Self {
            included: true,
            rate: Some(rate),
        }
    }
}

impl Default for TaxTreatment {
    fn default() -> Self {
        Self::exclusive()
    }
}

/// One stored price rule for a product variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRecord<'a> {
    id: RecordId,
    variant: VariantId,
    market: Option<MarketId>,
    site: Option<SiteId>,
    channel: Option<ChannelId>,
    price_list: Option<CatalogId>,
    unit_price: Money<'a, Currency>,
    compare_at: Option<Money<'a, Currency>>,
    band: QuantityBand,
    tax: TaxTreatment,
    active: bool,
}

impl<'a> PriceRecord<'a> {
    /// Create an active, scope-free record covering all quantities.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NegativePrice`] if the unit price is below zero.
    pub fn new(
        id: RecordId,
        variant: VariantId,
        unit_price: Money<'a, Currency>,
    ) -> Result<Self, RecordError> {
        let minor = unit_price.to_minor_units();

        if minor < 0 {
            return Err(RecordError::NegativePrice(id, minor));
        }

        Ok(Self {
            id,
            variant,
            market: None,
            site: None,
            channel: None,
            price_list: None,
            unit_price,
            compare_at: None,
            band: QuantityBand::any(),
            tax: TaxTreatment::default(),
            active: true,
        })
    }

    /// Restrict the record to a market.
    #[must_use]
    pub fn with_market(mut self, market: MarketId) -> Self {
        self.market = Some(market);
        self
    }

    /// Restrict the record to a site.
    #[must_use]
    pub fn with_site(mut self, site: SiteId) -> Self {
        self.site = Some(site);
        self
    }

    /// Restrict the record to a channel.
    #[must_use]
    pub fn with_channel(mut self, channel: ChannelId) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Restrict the record to a catalog (price list).
    #[must_use]
    pub fn with_price_list(mut self, price_list: CatalogId) -> Self {
        self.price_list = Some(price_list);
        self
    }

    /// Restrict the record to a quantity band.
    #[must_use]
    pub fn with_band(mut self, band: QuantityBand) -> Self {
        self.band = band;
        self
    }

    /// Attach a compare-at (was) price.
    #[must_use]
    pub fn with_compare_at(mut self, compare_at: Money<'a, Currency>) -> Self {
        self.compare_at = Some(compare_at);
        self
    }

    /// Set the tax treatment.
    #[must_use]
    pub fn with_tax(mut self, tax: TaxTreatment) -> Self {
        self.tax = tax;
        self
    }

    /// Mark the record inactive.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Record id.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// The variant this record prices.
    pub fn variant(&self) -> VariantId {
        self.variant
    }

    /// Market scope, if restricted.
    pub fn market(&self) -> Option<MarketId> {
        self.market
    }

    /// Site scope, if restricted.
    pub fn site(&self) -> Option<SiteId> {
        self.site
    }

    /// Channel scope, if restricted.
    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    /// Catalog (price list) scope, if restricted.
    pub fn price_list(&self) -> Option<CatalogId> {
        self.price_list
    }

    /// Unit price in minor units with its currency.
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Compare-at (was) price, if any.
    pub fn compare_at(&self) -> Option<Money<'a, Currency>> {
        self.compare_at
    }

    /// Quantity band this price applies within.
    pub fn band(&self) -> QuantityBand {
        self.band
    }

    /// Tax treatment of the amount.
    pub fn tax(&self) -> TaxTreatment {
        self.tax
    }

    /// Whether the record participates in resolution.
    pub fn is_active(&self) -> bool {
        self.active
    }
}
