mod engine;
mod models;
mod pricing;
mod storage;
mod types;

use std::fs;
use std::io::{BufWriter, Write, stderr, stdout};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use serde::Deserialize;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use crate::engine::Reconciler;
use crate::models::ImportBatch;
use crate::pricing::TracingSink;
use crate::storage::{InMemoryPriceStore, InMemoryProductCatalog, InMemoryVendorDirectory, PriceStore};
use crate::types::ScopeId;

const DEFAULT_SCOPE: ScopeId = 1;

#[derive(Debug, Deserialize)]
struct ProductSeed {
    default_code: String,
    name: String
}

#[derive(Debug, Deserialize)]
struct VendorSeed {
    name: String,
    supplier_rank: u32
}

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: Argument handling is deliberately bare; a richer front-end would
    //      reach for the clap crate.
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: vendor-price-reconciler [import].csv [products].csv [vendors].csv [log_level:optional] > [report].csv");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        exit(1);
    }

    let import_path = &args[1];
    let products_path = &args[2];
    let vendors_path = &args[3];
    let log_level = args.get(4)
        .map(|s| parse_log_level(s)).unwrap_or(LevelFilter::ERROR);

    setup_logging(log_level);

    let catalog = Arc::new(InMemoryProductCatalog::new());
    let vendors = Arc::new(InMemoryVendorDirectory::new());
    let prices = Arc::new(InMemoryPriceStore::new());

    let product_count = load_products(products_path, &catalog)?;
    let vendor_count = load_vendors(vendors_path, &vendors)?;
    info!("Loaded {product_count} products and {vendor_count} vendors");

    let sink = Arc::new(TracingSink);
    let reconciler = Reconciler::new(catalog.clone(), vendors.clone(), prices.clone(), DEFAULT_SCOPE, sink.clone());
    let mut batch = ImportBatch::new(fs::read(import_path)?);

    let timer = Instant::now();
    reconciler.preview(&mut batch).await?;
    let summary = reconciler.commit(&mut batch)?;
    let duration = timer.elapsed();

    info!(
        "Reconciled {} rows in: {duration:?} (created {}, updated {}, errors {})",
        batch.lines.len(), summary.created, summary.updated, summary.errors
    );

    let today = Local::now().date_naive();
    let notified = pricing::post_expiry_notices(prices.as_ref(), catalog.as_ref(), vendors.as_ref(), sink.as_ref(), DEFAULT_SCOPE, today);

    if notified > 0 {
        info!("Posted expiry notices for {notified} products");
    }

    let expiring = prices.in_scope(DEFAULT_SCOPE)
        .iter()
        .filter(|record| record.is_expiring_within(today, 30))
        .count();

    info!("Price store now holds {} records ({expiring} expiring within 30 days)", prices.len());

    write_report(&batch, &catalog, &vendors, &prices)?;

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Report output goes to stdout for redirection, so logging must
    //      stay on stderr.
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn load_products(path: &str, catalog: &InMemoryProductCatalog) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut count = 0;

    for result in reader.deserialize::<ProductSeed>() {
        let seed = result?;
        catalog.add(&seed.default_code, &seed.name);
        count += 1;
    }

    Ok(count)
}

fn load_vendors(path: &str, directory: &InMemoryVendorDirectory) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut count = 0;

    for result in reader.deserialize::<VendorSeed>() {
        let seed = result?;
        directory.add(&seed.name, seed.supplier_rank);
        count += 1;
    }

    Ok(count)
}

fn write_report(
    batch: &ImportBatch,
    catalog: &InMemoryProductCatalog,
    vendors: &InMemoryVendorDirectory,
    prices: &InMemoryPriceStore
) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    write_preview(&mut output, batch)?;
    writeln!(output)?;
    writeln!(output, "{}", batch.summary.unwrap_or_default())?;
    writeln!(output)?;

    let records = prices.in_scope(DEFAULT_SCOPE);
    engine::write_price_records(&mut output, &records, catalog, vendors)?;

    output.flush()?;

    Ok(())
}

fn write_preview<W: Write>(output: &mut W, batch: &ImportBatch) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(output);

    writer.write_record([
        "row_number",
        "product_default_code",
        "vendor_name",
        "price",
        "valid_from",
        "valid_to",
        "product_id",
        "vendor_id",
        "action",
        "status",
        "message"
    ])?;

    for line in &batch.lines {
        writer.write_record(&[
            line.row_number.to_string(),
            line.product_default_code.clone(),
            line.vendor_name.clone(),
            line.price.map(|price| price.to_string()).unwrap_or_default(),
            line.valid_from.map(|date| date.to_string()).unwrap_or_default(),
            line.valid_to.map(|date| date.to_string()).unwrap_or_default(),
            line.product_id.map(|id| id.to_string()).unwrap_or_default(),
            line.vendor_id.map(|id| id.to_string()).unwrap_or_default(),
            line.action.as_str().to_string(),
            line.status.as_str().to_string(),
            line.message()
        ])?;
    }

    writer.flush()?;

    Ok(())
}
