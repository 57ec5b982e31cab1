//! Bulk Resolution
//!
//! Resolves prices for many variants against one context in a single pass:
//! the candidate set is partitioned by variant once, then each variant is
//! resolved from its own group. Used by list and grid price displays, where
//! per-variant rescans of the full candidate set would be quadratic.

use rustc_hash::FxHashMap;

use crate::{
    context::PricingContext,
    ids::VariantId,
    index::CandidateIndex,
    quotes::ResolvedPrice,
    records::PriceRecord,
    resolver::resolve,
};

/// Resolve each requested variant against the context.
///
/// Variants with no eligible candidate — including variants absent from the
/// record set entirely — map to `None`.
pub fn resolve_bulk<'a>(
    variants: &[VariantId],
    context: &PricingContext,
    records: impl IntoIterator<Item = PriceRecord<'a>>,
) -> FxHashMap<VariantId, Option<ResolvedPrice<'a>>> {
    let index = CandidateIndex::from_records(records);

    resolve_bulk_indexed(variants, context, &index)
}

/// Resolve each requested variant from a prebuilt index.
///
/// Useful when one index serves several contexts (e.g. the same grid
/// rendered per market).
pub fn resolve_bulk_indexed<'a>(
    variants: &[VariantId],
    context: &PricingContext,
    index: &CandidateIndex<'a>,
) -> FxHashMap<VariantId, Option<ResolvedPrice<'a>>> {
    variants
        .iter()
        .map(|&variant| {
            let winner = resolve(variant, context, index.candidates(variant));

            (variant, winner.map(ResolvedPrice::from_record))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use crate::{
        context::{ContextBuilder, RawPricingContext},
        ids::{MarketId, RecordId},
        records::{QuantityBand, RecordError},
    };

    use super::*;

    fn record(id: u64, variant: u64, minor: i64) -> Result<PriceRecord<'static>, RecordError> {
        PriceRecord::new(
            RecordId(id),
            VariantId(variant),
            Money::from_minor(minor, iso::EUR),
        )
    }

    fn test_records() -> Result<Vec<PriceRecord<'static>>, RecordError> {
        Ok(vec![
            record(1, 10, 2500)?,
            record(2, 10, 2375)?.with_market(MarketId(7)),
            record(3, 20, 1200)?,
            record(4, 20, 1000)?.with_band(QuantityBand::at_least(10)?),
            // Variant 30 is only priced in USD.
            PriceRecord::new(RecordId(5), VariantId(30), Money::from_minor(900, iso::USD))?,
        ])
    }

    #[test]
    fn bulk_matches_per_variant_resolution() -> TestResult {
        let records = test_records()?;

        let context = ContextBuilder::new(iso::EUR).build(RawPricingContext {
            market: Some(7),
            quantity: Some(12),
            ..RawPricingContext::default()
        })?;

        let variants = [VariantId(10), VariantId(20), VariantId(30), VariantId(99)];
        let resolved = resolve_bulk(&variants, &context, records.clone());

        for variant in variants {
            let group: Vec<PriceRecord<'_>> = records
                .iter()
                .filter(|r| r.variant() == variant)
                .copied()
                .collect();

            let individual =
                resolve(variant, &context, &group).map(ResolvedPrice::from_record);

            assert_eq!(
                resolved.get(&variant).copied().flatten(),
                individual,
                "bulk and individual resolution disagree for variant {variant}"
            );
        }

        Ok(())
    }

    #[test]
    fn every_requested_variant_is_present_in_the_result() -> TestResult {
        let context = ContextBuilder::new(iso::EUR).build(RawPricingContext::default())?;

        let variants = [VariantId(10), VariantId(99)];
        let resolved = resolve_bulk(&variants, &context, test_records()?);

        assert_eq!(resolved.len(), 2);
        assert!(resolved.get(&VariantId(10)).copied().flatten().is_some());

        // Unpriced variants are present and map to None, not absent.
        assert_eq!(resolved.get(&VariantId(99)), Some(&None));

        Ok(())
    }

    #[test]
    fn out_of_currency_variant_maps_to_none() -> TestResult {
        let context = ContextBuilder::new(iso::EUR).build(RawPricingContext::default())?;

        let resolved = resolve_bulk(&[VariantId(30)], &context, test_records()?);

        assert_eq!(resolved.get(&VariantId(30)), Some(&None));

        Ok(())
    }

    #[test]
    fn indexed_resolution_reuses_one_index_across_contexts() -> TestResult {
        let records = test_records()?;
        let index = CandidateIndex::from_records(records);
        let builder = ContextBuilder::new(iso::EUR);

        let base = builder.build(RawPricingContext::default())?;
        let market = builder.build(RawPricingContext {
            market: Some(7),
            ..RawPricingContext::default()
        })?;

        let base_prices = resolve_bulk_indexed(&[VariantId(10)], &base, &index);
        let market_prices = resolve_bulk_indexed(&[VariantId(10)], &market, &index);

        let minor = |quotes: &FxHashMap<VariantId, Option<ResolvedPrice<'_>>>| {
            quotes
                .get(&VariantId(10))
                .copied()
                .flatten()
                .map(|quote| quote.unit_price().to_minor_units())
        };

        assert_eq!(minor(&base_prices), Some(2500));
        assert_eq!(minor(&market_prices), Some(2375));

        Ok(())
    }
}
