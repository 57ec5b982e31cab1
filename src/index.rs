//! Candidate Index
//!
//! Groups pre-fetched price records by variant so bulk resolution never
//! rescans the full candidate set per variant. Inactive records are dropped
//! here; scope, currency and quantity matching stay with the resolver so it
//! remains testable against a flat list.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{ids::VariantId, records::PriceRecord};

/// Per-variant candidate storage; most variants carry a handful of records.
type Candidates<'a> = SmallVec<[PriceRecord<'a>; 8]>;

/// Active price records grouped by variant.
#[derive(Debug, Default)]
pub struct CandidateIndex<'a> {
    by_variant: FxHashMap<VariantId, Candidates<'a>>,
}

impl<'a> CandidateIndex<'a> {
    /// Build an index from pre-fetched records, discarding inactive ones.
    pub fn from_records(records: impl IntoIterator<Item = PriceRecord<'a>>) -> Self {
        let mut by_variant: FxHashMap<VariantId, Candidates<'a>> = FxHashMap::default();

        for record in records {
            if !record.is_active() {
                continue;
            }

            by_variant.entry(record.variant()).or_default().push(record);
        }

        Self { by_variant }
    }

    /// All active candidates for a variant; empty for unknown variants.
    pub fn candidates(&self, variant: VariantId) -> &[PriceRecord<'a>] {
        self.by_variant
            .get(&variant)
            .map_or(&[], SmallVec::as_slice)
    }

    /// Iterate over the variants that have at least one active record.
    pub fn variants(&self) -> impl Iterator<Item = VariantId> + '_ {
        self.by_variant.keys().copied()
    }

    /// Number of variants with at least one active record.
    pub fn len(&self) -> usize {
        self.by_variant.len()
    }

    /// Whether no variant has an active record.
    pub fn is_empty(&self) -> bool {
        self.by_variant.is_empty()
    }
}
