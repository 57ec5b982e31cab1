//! Meridian prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    adjustments::{AdjustmentError, apply_adjustment},
    bulk::{resolve_bulk, resolve_bulk_indexed},
    catalogs::{Adjustment, AdjustmentDirection, Catalog},
    context::{ContextBuilder, ContextError, PricingContext, RawPricingContext},
    fixtures::{PriceBook, PriceBookError},
    ids::{CatalogId, ChannelId, CountryCode, MarketId, RecordId, SiteId, VariantId},
    index::CandidateIndex,
    quotes::ResolvedPrice,
    records::{PriceRecord, QuantityBand, RecordError, TaxTreatment},
    resolver::{resolve, resolve_tiers},
};
