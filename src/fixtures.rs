//! Price Book Fixtures
//!
//! Loads catalogs and price records from YAML price books, for tests and
//! examples. Money values are strings like `"25.00 EUR"`; percentages are
//! strings like `"20%"`.

use std::{fs, path::Path, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Findable, Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalogs::{Adjustment, AdjustmentDirection, Catalog},
    context::ContextBuilder,
    ids::{CatalogId, ChannelId, MarketId, RecordId, SiteId, VariantId},
    index::CandidateIndex,
    records::{PriceRecord, QuantityBand, RecordError, TaxTreatment},
};

/// Price book parsing errors.
#[derive(Debug, Error)]
pub enum PriceBookError {
    /// IO error reading the price book file.
    #[error("Failed to read price book file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid money format (expected e.g. `"25.00 EUR"`).
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format (expected e.g. `"20%"`).
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Catalog not found.
    #[error("Catalog not found: {0}")]
    CatalogNotFound(String),

    /// A record in the book violated a price record invariant.
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Top-level price book from YAML.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PriceBookFixture {
    /// Currency substituted into contexts that omit one.
    default_currency: String,

    /// Catalog definitions keyed by label.
    #[serde(default)]
    catalogs: FxHashMap<String, CatalogFixture>,

    /// Price record rows.
    records: Vec<RecordFixture>,
}

/// A catalog definition in YAML.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CatalogFixture {
    id: u64,
    currency: String,

    #[serde(default, rename = "default")]
    is_default: bool,

    adjustment: Option<AdjustmentFixture>,
}

/// An adjustment clause in YAML.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AdjustmentFixture {
    /// Percentage adjustment, value like `"20%"`.
    Percentage {
        direction: DirectionFixture,
        value: String,
    },

    /// Fixed adjustment, value like `"5.00 EUR"`.
    Fixed {
        direction: DirectionFixture,
        value: String,
    },
}

/// Adjustment direction in YAML.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DirectionFixture {
    Increase,
    Decrease,
}

impl From<DirectionFixture> for AdjustmentDirection {
    fn from(direction: DirectionFixture) -> Self {
        match direction {
            DirectionFixture::Increase => AdjustmentDirection::Increase,
            DirectionFixture::Decrease => AdjustmentDirection::Decrease,
        }
    }
}

/// A price record row in YAML.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RecordFixture {
    id: u64,
    variant: u64,
    price: String,
    compare_at: Option<String>,
    market: Option<u64>,
    site: Option<u64>,
    channel: Option<u64>,
    price_list: Option<u64>,

    #[serde(default = "default_min_quantity")]
    min_quantity: u32,

    max_quantity: Option<u32>,

    #[serde(default)]
    tax_included: bool,

    tax_rate: Option<Decimal>,

    #[serde(default = "default_active")]
    active: bool,
}

fn default_min_quantity() -> u32 {
    1
}

fn default_active() -> bool {
    true
}

/// A loaded price book: catalogs, price records and a default currency.
#[derive(Debug)]
pub struct PriceBook {
    default_currency: &'static Currency,
    catalogs: FxHashMap<String, Catalog<'static>>,
    records: Vec<PriceRecord<'static>>,
}

impl PriceBook {
    /// Load a price book from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceBookError`] if the file cannot be read or parsed, or
    /// if any row violates a record invariant.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PriceBookError> {
        let contents = fs::read_to_string(path)?;

        Self::parse(&contents)
    }

    /// Parse a price book from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceBookError`] if the YAML cannot be parsed or if any
    /// row violates a record invariant.
    pub fn parse(yaml: &str) -> Result<Self, PriceBookError> {
        let fixture: PriceBookFixture = serde_norway::from_str(yaml)?;

        let default_currency = find_currency(&fixture.default_currency)?;

        let catalogs = fixture
            .catalogs
            .into_iter()
            .map(|(label, catalog)| Ok((label, catalog.try_into()?)))
            .collect::<Result<FxHashMap<_, _>, PriceBookError>>()?;

        let records = fixture
            .records
            .into_iter()
            .map(RecordFixture::try_into_record)
            .collect::<Result<Vec<_>, PriceBookError>>()?;

        Ok(Self {
            default_currency,
            catalogs,
            records,
        })
    }

    /// The book's default currency.
    pub fn default_currency(&self) -> &'static Currency {
        self.default_currency
    }

    /// A context builder seeded with the book's default currency.
    pub fn context_builder(&self) -> ContextBuilder {
        ContextBuilder::new(self.default_currency)
    }

    /// All records in the book, inactive ones included.
    pub fn records(&self) -> &[PriceRecord<'static>] {
        &self.records
    }

    /// Look up a catalog by its label.
    ///
    /// # Errors
    ///
    /// Returns [`PriceBookError::CatalogNotFound`] for unknown labels.
    pub fn catalog(&self, label: &str) -> Result<&Catalog<'static>, PriceBookError> {
        self.catalogs
            .get(label)
            .ok_or_else(|| PriceBookError::CatalogNotFound(label.to_string()))
    }

    /// Every variant priced by the book, sorted.
    pub fn variants(&self) -> Vec<VariantId> {
        let mut variants: Vec<VariantId> = self.records.iter().map(PriceRecord::variant).collect();

        variants.sort_unstable();
        variants.dedup();

        variants
    }

    /// Consume the book into a candidate index over its records.
    pub fn into_index(self) -> CandidateIndex<'static> {
        CandidateIndex::from_records(self.records)
    }
}

impl TryFrom<CatalogFixture> for Catalog<'static> {
    type Error = PriceBookError;

    fn try_from(fixture: CatalogFixture) -> Result<Self, Self::Error> {
        let currency = find_currency(&fixture.currency)?;

        let mut catalog = Catalog::new(CatalogId(fixture.id), currency);

        if fixture.is_default {
            catalog = catalog.default_catalog();
        }

        if let Some(adjustment) = fixture.adjustment {
            catalog = catalog.with_adjustment(adjustment.try_into()?);
        }

        Ok(catalog)
    }
}

impl TryFrom<AdjustmentFixture> for Adjustment<'static> {
    type Error = PriceBookError;

    fn try_from(fixture: AdjustmentFixture) -> Result<Self, Self::Error> {
        match fixture {
            AdjustmentFixture::Percentage { direction, value } => Ok(Adjustment::Percentage {
                direction: direction.into(),
                percent: parse_percent(&value)?,
            }),
            AdjustmentFixture::Fixed { direction, value } => {
                let (minor, currency) = parse_price(&value)?;

                Ok(Adjustment::Fixed {
                    direction: direction.into(),
                    amount: Money::from_minor(minor, currency),
                })
            }
        }
    }
}

impl RecordFixture {
    /// Convert a YAML row into a [`PriceRecord`].
    fn try_into_record(self) -> Result<PriceRecord<'static>, PriceBookError> {
        let (minor, currency) = parse_price(&self.price)?;

        let mut record = PriceRecord::new(
            RecordId(self.id),
            VariantId(self.variant),
            Money::from_minor(minor, currency),
        )?
        .with_band(QuantityBand::new(self.min_quantity, self.max_quantity)?)
        .with_tax(TaxTreatment {
            included: self.tax_included,
            rate: self.tax_rate,
        });

        if let Some(compare_at) = &self.compare_at {
            let (minor, currency) = parse_price(compare_at)?;
            record = record.with_compare_at(Money::from_minor(minor, currency));
        }

        if let Some(market) = self.market {
            record = record.with_market(MarketId(market));
        }

        if let Some(site) = self.site {
            record = record.with_site(SiteId(site));
        }

        if let Some(channel) = self.channel {
            record = record.with_channel(ChannelId(channel));
        }

        if let Some(price_list) = self.price_list {
            record = record.with_price_list(CatalogId(price_list));
        }

        if !self.active {
            record = record.inactive();
        }

        Ok(record)
    }
}

/// Resolve an ISO 4217 code to a currency.
fn find_currency(code: &str) -> Result<&'static Currency, PriceBookError> {
    Currency::find(code).ok_or_else(|| PriceBookError::UnknownCurrency(code.to_string()))
}

/// Parse a money string like `"25.00 EUR"` into minor units and a currency.
fn parse_price(value: &str) -> Result<(i64, &'static Currency), PriceBookError> {
    let mut parts = value.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceBookError::InvalidPrice(value.to_string()));
    };

    let currency = find_currency(code)?;

    let amount =
        Decimal::from_str(amount).map_err(|_| PriceBookError::InvalidPrice(value.to_string()))?;

    let scale = Decimal::from(10u64.pow(currency.exponent));

    let minor = amount
        .checked_mul(scale)
        .ok_or_else(|| PriceBookError::InvalidPrice(value.to_string()))?;

    // Sub-minor-unit amounts ("1.005 EUR") are not representable.
    if !minor.fract().is_zero() {
        return Err(PriceBookError::InvalidPrice(value.to_string()));
    }

    minor
        .to_i64()
        .map(|minor| (minor, currency))
        .ok_or_else(|| PriceBookError::InvalidPrice(value.to_string()))
}

/// Parse a percentage string like `"20%"` into a decimal fraction.
fn parse_percent(value: &str) -> Result<Percentage, PriceBookError> {
    let invalid = || PriceBookError::InvalidPercentage(value.to_string());

    let points = value
        .trim()
        .strip_suffix('%')
        .ok_or_else(invalid)?;

    let points = Decimal::from_str(points.trim()).map_err(|_| invalid())?;

    if points.is_sign_negative() {
        return Err(invalid());
    }

    Ok(Percentage::from(points / Decimal::ONE_HUNDRED))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    const BOOK: &str = r#"
default-currency: EUR

catalogs:
  wholesale:
    id: 3
    currency: EUR
    adjustment:
      type: percentage
      direction: decrease
      value: "20%"
  retail:
    id: 1
    currency: EUR
    default: true

records:
  - id: 1
    variant: 101
    price: "25.00 EUR"
    compare-at: "29.00 EUR"
  - id: 2
    variant: 101
    price: "23.75 EUR"
    market: 7
  - id: 3
    variant: 101
    price: "20.00 EUR"
    min-quantity: 50
  - id: 4
    variant: 102
    price: "9.00 USD"
    tax-included: true
    tax-rate: "0.20"
    active: false
"#;

    #[test]
    fn parses_a_full_book() -> TestResult {
        let book = PriceBook::parse(BOOK)?;

        assert_eq!(book.default_currency(), iso::EUR);
        assert_eq!(book.records().len(), 4);
        assert_eq!(book.variants(), vec![VariantId(101), VariantId(102)]);

        Ok(())
    }

    #[test]
    fn record_rows_carry_their_fields() -> TestResult {
        let book = PriceBook::parse(BOOK)?;

        let market_row = book.records().iter().find(|r| r.id() == RecordId(2));

        assert_eq!(
            market_row.map(PriceRecord::unit_price),
            Some(Money::from_minor(2375, iso::EUR))
        );
        assert_eq!(market_row.and_then(PriceRecord::market), Some(MarketId(7)));

        let inactive_row = book.records().iter().find(|r| r.id() == RecordId(4));

        assert_eq!(inactive_row.map(PriceRecord::is_active), Some(false));
        assert_eq!(inactive_row.map(|r| r.tax().included), Some(true));

        Ok(())
    }

    #[test]
    fn catalogs_parse_their_adjustments() -> TestResult {
        let book = PriceBook::parse(BOOK)?;

        let wholesale = book.catalog("wholesale")?;

        assert!(wholesale.adjusts());
        assert!(matches!(
            wholesale.adjustment(),
            Adjustment::Percentage {
                direction: AdjustmentDirection::Decrease,
                percent,
            } if percent == Percentage::from(0.20)
        ));

        let retail = book.catalog("retail")?;

        assert!(retail.is_default());
        assert!(!retail.adjusts());

        Ok(())
    }

    #[test]
    fn unknown_catalog_label_errors() -> TestResult {
        let book = PriceBook::parse(BOOK)?;

        assert!(matches!(
            book.catalog("missing"),
            Err(PriceBookError::CatalogNotFound(_))
        ));

        Ok(())
    }

    #[test]
    fn inactive_rows_are_dropped_by_the_index() -> TestResult {
        let book = PriceBook::parse(BOOK)?;
        let index = book.into_index();

        assert!(index.candidates(VariantId(102)).is_empty());
        assert_eq!(index.candidates(VariantId(101)).len(), 3);

        Ok(())
    }

    #[test]
    fn sub_minor_unit_price_is_rejected() {
        assert!(matches!(
            parse_price("1.005 EUR"),
            Err(PriceBookError::InvalidPrice(_))
        ));
    }

    #[test]
    fn malformed_prices_are_rejected() {
        assert!(matches!(parse_price("EUR"), Err(PriceBookError::InvalidPrice(_))));
        assert!(matches!(parse_price("1.00"), Err(PriceBookError::InvalidPrice(_))));
        assert!(matches!(
            parse_price("1.00 EUR extra"),
            Err(PriceBookError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_price("abc EUR"),
            Err(PriceBookError::InvalidPrice(_))
        ));
    }

    #[test]
    fn unknown_currency_is_rejected() {
        assert!(matches!(
            parse_price("1.00 ZZZ"),
            Err(PriceBookError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn percent_strings_require_the_suffix() -> TestResult {
        let percent = parse_percent("12.5%")?;

        assert_eq!(percent, Percentage::from(0.125));

        assert!(matches!(
            parse_percent("12.5"),
            Err(PriceBookError::InvalidPercentage(_))
        ));
        assert!(matches!(
            parse_percent("-5%"),
            Err(PriceBookError::InvalidPercentage(_))
        ));

        Ok(())
    }
}
