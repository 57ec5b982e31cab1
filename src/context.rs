//! Pricing Context
//!
//! Validates and normalises a raw pricing request into an immutable
//! [`PricingContext`] value. Scope ids pass through unchecked; existence
//! checks belong to the data layer.

use rusty_money::{Findable, iso::Currency};
use thiserror::Error;

use crate::ids::{CatalogId, ChannelId, CountryCode, MarketId, SiteId};

/// Errors raised while building a pricing context.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// The currency code is not three ASCII letters.
    #[error("invalid currency code: {0:?}")]
    InvalidCurrency(String),

    /// The currency code is well-formed but not a known ISO 4217 currency.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The requested quantity is zero.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The country code is not two ASCII letters.
    #[error("invalid country code: {0:?}")]
    InvalidCountry(String),
}

/// Raw, caller-supplied pricing request fields, prior to validation.
#[derive(Debug, Clone, Default)]
pub struct RawPricingContext {
    /// Market scope id, if the request is market-scoped.
    pub market: Option<u64>,

    /// Site scope id, if the request is site-scoped.
    pub site: Option<u64>,

    /// Channel scope id, if the request is channel-scoped.
    pub channel: Option<u64>,

    /// Catalog (price list) scope id, if the request is catalog-scoped.
    pub catalog: Option<u64>,

    /// ISO 4217 currency code; the builder's default currency when absent.
    pub currency: Option<String>,

    /// BCP 47 locale tag, passed through untouched.
    pub locale: Option<String>,

    /// ISO 3166-1 alpha-2 country code.
    pub country: Option<String>,

    /// Requested quantity; defaults to 1.
    pub quantity: Option<u32>,
}

/// Builds validated [`PricingContext`] values, substituting a configured
/// default currency when the caller omits one.
#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder {
    default_currency: &'static Currency,
}

impl ContextBuilder {
    /// Create a builder with the given default currency.
    pub fn new(default_currency: &'static Currency) -> Self {
        Self { default_currency }
    }

    /// The currency substituted when a request carries none.
    pub fn default_currency(&self) -> &'static Currency {
        self.default_currency
    }

    /// Validate and normalise a raw request into a [`PricingContext`].
    ///
    /// # Errors
    ///
    /// - [`ContextError::InvalidCurrency`]: currency code is not three ASCII letters.
    /// - [`ContextError::UnknownCurrency`]: currency code is not a known ISO 4217 currency.
    /// - [`ContextError::InvalidQuantity`]: quantity is zero.
    /// - [`ContextError::InvalidCountry`]: country code is not two ASCII letters.
    pub fn build(&self, raw: RawPricingContext) -> Result<PricingContext, ContextError> {
        let currency = match raw.currency {
            Some(code) => lookup_currency(&code)?,
            None => self.default_currency,
        };

        let quantity = match raw.quantity {
            Some(0) => return Err(ContextError::InvalidQuantity),
            Some(quantity) => quantity,
            None => 1,
        };

        let country = match raw.country {
            Some(code) => Some(
                CountryCode::parse(code.trim()).ok_or(ContextError::InvalidCountry(code))?,
            ),
            None => None,
        };

        Ok(PricingContext {
            market: raw.market.map(MarketId),
            site: raw.site.map(SiteId),
            channel: raw.channel.map(ChannelId),
            catalog: raw.catalog.map(CatalogId),
            currency,
            locale: raw.locale,
            country,
            quantity,
        })
    }
}

/// Normalise and resolve an ISO 4217 currency code.
fn lookup_currency(code: &str) -> Result<&'static Currency, ContextError> {
    let normalised = code.trim().to_ascii_uppercase();

    if normalised.len() != 3 || !normalised.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ContextError::InvalidCurrency(code.to_string()));
    }

    Currency::find(&normalised).ok_or(ContextError::UnknownCurrency(normalised))
}

/// An immutable, validated pricing request.
///
/// Carries every dimension a price record may scope itself to, the resolved
/// currency, and the requested quantity. Built once per request via
/// [`ContextBuilder::build`] and never mutated.
#[derive(Debug, Clone)]
pub struct PricingContext {
    market: Option<MarketId>,
    site: Option<SiteId>,
    channel: Option<ChannelId>,
    catalog: Option<CatalogId>,
    currency: &'static Currency,
    locale: Option<String>,
    country: Option<CountryCode>,
    quantity: u32,
}

impl PricingContext {
    /// Market scope of the request, if any.
    pub fn market(&self) -> Option<MarketId> {
        self.market
    }

    /// Site scope of the request, if any.
    pub fn site(&self) -> Option<SiteId> {
        self.site
    }

    /// Channel scope of the request, if any.
    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    /// Catalog (price list) scope of the request, if any.
    pub fn catalog(&self) -> Option<CatalogId> {
        self.catalog
    }

    /// Currency every candidate must be denominated in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Locale tag, if the caller supplied one.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Country of the request, if any.
    pub fn country(&self) -> Option<CountryCode> {
        self.country
    }

    /// Requested quantity, at least 1.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    fn builder() -> ContextBuilder {
        ContextBuilder::new(iso::EUR)
    }

    #[test]
    fn empty_request_uses_defaults() -> TestResult {
        let context = builder().build(RawPricingContext::default())?;

        assert_eq!(context.currency(), iso::EUR);
        assert_eq!(context.quantity(), 1);
        assert_eq!(context.market(), None);
        assert_eq!(context.catalog(), None);

        Ok(())
    }

    #[test]
    fn currency_is_normalised_to_uppercase() -> TestResult {
        let context = builder().build(RawPricingContext {
            currency: Some("usd".to_string()),
            ..RawPricingContext::default()
        })?;

        assert_eq!(context.currency(), iso::USD);

        Ok(())
    }

    #[test]
    fn malformed_currency_is_rejected() {
        let result = builder().build(RawPricingContext {
            currency: Some("EURO".to_string()),
            ..RawPricingContext::default()
        });

        assert!(matches!(result, Err(ContextError::InvalidCurrency(_))));
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let result = builder().build(RawPricingContext {
            currency: Some("ZZZ".to_string()),
            ..RawPricingContext::default()
        });

        assert_eq!(result.err(), Some(ContextError::UnknownCurrency("ZZZ".to_string())));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let result = builder().build(RawPricingContext {
            quantity: Some(0),
            ..RawPricingContext::default()
        });

        assert_eq!(result.err(), Some(ContextError::InvalidQuantity));
    }

    #[test]
    fn scope_ids_pass_through_unchanged() -> TestResult {
        let context = builder().build(RawPricingContext {
            market: Some(7),
            site: Some(2),
            channel: Some(9),
            catalog: Some(3),
            ..RawPricingContext::default()
        })?;

        assert_eq!(context.market(), Some(MarketId(7)));
        assert_eq!(context.site(), Some(SiteId(2)));
        assert_eq!(context.channel(), Some(ChannelId(9)));
        assert_eq!(context.catalog(), Some(CatalogId(3)));

        Ok(())
    }

    #[test]
    fn country_is_normalised_and_validated() -> TestResult {
        let context = builder().build(RawPricingContext {
            country: Some("fr".to_string()),
            ..RawPricingContext::default()
        })?;

        assert_eq!(context.country().map(|c| c.to_string()), Some("FR".to_string()));

        let result = builder().build(RawPricingContext {
            country: Some("FRA".to_string()),
            ..RawPricingContext::default()
        });

        assert!(matches!(result, Err(ContextError::InvalidCountry(_))));

        Ok(())
    }
}
