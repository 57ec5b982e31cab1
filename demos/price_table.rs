//! Price Table Example
//!
//! Loads a YAML price book, builds a pricing context from CLI flags and
//! prints the resolved price for every variant in the book. Pass a catalog
//! label to scope the context to that catalog and apply its adjustment.
//!
//! Run with: `cargo run --example price_table -- --market 7 --quantity 12`

use anyhow::Result;
use clap::Parser;
use tabled::{Table, Tabled};

use meridian::prelude::*;

/// Arguments for the price table example
#[derive(Debug, Parser)]
struct PriceTableArgs {
    /// Path to the price book YAML file
    #[clap(short, long, default_value = "fixtures/books/eu-storefront.yml")]
    book: String,

    /// Market scope id
    #[clap(short, long)]
    market: Option<u64>,

    /// Site scope id
    #[clap(short, long)]
    site: Option<u64>,

    /// Channel scope id
    #[clap(long)]
    channel: Option<u64>,

    /// Catalog label from the price book; scopes the context to it and
    /// applies its adjustment
    #[clap(short, long)]
    catalog: Option<String>,

    /// ISO 4217 currency code (defaults to the book's currency)
    #[clap(long)]
    currency: Option<String>,

    /// Quantity to price at
    #[clap(short, long)]
    quantity: Option<u32>,
}

/// One row of the printed table
#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "Variant")]
    variant: String,

    #[tabled(rename = "Unit price")]
    unit_price: String,

    #[tabled(rename = "Compare at")]
    compare_at: String,

    #[tabled(rename = "Record")]
    record: String,
}

/// Price Table Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = PriceTableArgs::parse();

    let book = PriceBook::from_file(&args.book)?;

    let catalog = match &args.catalog {
        Some(label) => Some(*book.catalog(label)?),
        None => None,
    };

    let context = book.context_builder().build(RawPricingContext {
        market: args.market,
        site: args.site,
        channel: args.channel,
        catalog: catalog.map(|c| c.id().0),
        currency: args.currency.clone(),
        quantity: args.quantity,
        ..RawPricingContext::default()
    })?;

    let variants = book.variants();
    let index = CandidateIndex::from_records(book.records().iter().copied());

    let mut rows = Vec::with_capacity(variants.len());

    for variant in variants {
        let winner = resolve(variant, &context, index.candidates(variant));

        let quote = match (winner, &catalog) {
            (Some(record), Some(catalog)) if catalog.adjusts() => {
                Some(apply_adjustment(record, catalog)?)
            }
            (Some(record), _) => Some(ResolvedPrice::from_record(record)),
            (None, _) => None,
        };

        rows.push(match quote {
            Some(quote) => PriceRow {
                variant: variant.to_string(),
                unit_price: quote.unit_price().to_string(),
                compare_at: match quote.compare_at() {
                    Some(price) => price.to_string(),
                    None => "-".to_string(),
                },
                record: quote.source().to_string(),
            },
            None => PriceRow {
                variant: variant.to_string(),
                unit_price: "no price".to_string(),
                compare_at: "-".to_string(),
                record: "-".to_string(),
            },
        });
    }

    println!(
        "{} @ quantity {} in {}",
        args.book,
        context.quantity(),
        context.currency().iso_alpha_code
    );
    println!("{}", Table::new(rows));

    Ok(())
}
