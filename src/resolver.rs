//! Specificity Resolver
//!
//! The core decision step: filter candidates down to those compatible with
//! the request context, rank them by how narrowly their scope matches, and
//! pick the single winner. Pure functions over in-memory slices; resolution
//! is deterministic for any input order.
//!
//! Scope specificity is a bit score over `[price_list, site, market,
//! channel]`: a catalog-scoped price overrides a site-scoped one, which
//! overrides a market-scoped one, which overrides a channel-scoped one,
//! which overrides the scope-free base price. Ties on specificity go to the
//! tightest-fitting quantity tier (highest minimum), then to the lowest
//! record id.

use std::cmp::Reverse;

use smallvec::SmallVec;

use crate::{context::PricingContext, ids::VariantId, records::PriceRecord};

/// Resolve the single applicable price for a variant, if any.
///
/// Returns `None` when no candidate is eligible — a legitimate state (the
/// variant is simply not priced for this context), not an error.
pub fn resolve<'a, 'r>(
    variant: VariantId,
    context: &PricingContext,
    candidates: &'r [PriceRecord<'a>],
) -> Option<&'r PriceRecord<'a>> {
    candidates
        .iter()
        .filter(|record| is_eligible(variant, context, record))
        .max_by_key(|record| {
            (
                specificity(context, record),
                record.band().min(),
                Reverse(record.id()),
            )
        })
}

/// Every candidate for the winning scope, sorted by quantity-band minimum.
///
/// The quantity band is deliberately ignored here: this is the quantity-break
/// table for the scope that would win resolution, so every tier is shown.
/// Candidates from less specific scopes never mix into the table. Sorted
/// ascending by band minimum, then by record id.
pub fn resolve_tiers<'a, 'r>(
    variant: VariantId,
    context: &PricingContext,
    candidates: &'r [PriceRecord<'a>],
) -> SmallVec<[&'r PriceRecord<'a>; 8]> {
    let mut tiers: SmallVec<[&'r PriceRecord<'a>; 8]> = candidates
        .iter()
        .filter(|record| is_scope_eligible(variant, context, record))
        .collect();

    let Some(winning_score) = tiers
        .iter()
        .map(|record| specificity(context, record))
        .max()
    else {
        return SmallVec::new();
    };

    tiers.retain(|record| specificity(context, record) == winning_score);
    tiers.sort_by_key(|record| (record.band().min(), record.id()));

    tiers
}

/// Whether a record can price this request at the requested quantity.
fn is_eligible(variant: VariantId, context: &PricingContext, record: &PriceRecord<'_>) -> bool {
    is_scope_eligible(variant, context, record) && record.band().contains(context.quantity())
}

/// Eligibility without the quantity band: variant, active flag, currency and
/// scope compatibility. A record restricted to a scope the context does not
/// carry is incompatible.
fn is_scope_eligible(
    variant: VariantId,
    context: &PricingContext,
    record: &PriceRecord<'_>,
) -> bool {
    record.variant() == variant
        && record.is_active()
        && record.unit_price().currency() == context.currency()
        && scope_matches(record.market(), context.market())
        && scope_matches(record.site(), context.site())
        && scope_matches(record.channel(), context.channel())
        && scope_matches(record.price_list(), context.catalog())
}

/// An unset record field matches anything; a set one must equal a set
/// context field.
fn scope_matches<T: PartialEq>(record: Option<T>, context: Option<T>) -> bool {
    match record {
        None => true,
        Some(id) => context == Some(id),
    }
}

/// A set record field that equals the set context field scores its bit.
fn scored<T: PartialEq>(record: Option<T>, context: Option<T>) -> bool {
    record.is_some() && record == context
}

/// Scope specificity score: price list 8, site 4, market 2, channel 1.
fn specificity(context: &PricingContext, record: &PriceRecord<'_>) -> u8 {
    let mut score = 0;

    if scored(record.price_list(), context.catalog()) {
        score |= 1 << 3;
    }

    if scored(record.site(), context.site()) {
        score |= 1 << 2;
    }

    if scored(record.market(), context.market()) {
        score |= 1 << 1;
    }

    if scored(record.channel(), context.channel()) {
        score |= 1;
    }

    score
}
