use std::str::FromStr;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::parser;
use crate::engine::parser::RawRow;
use crate::models::{BatchState, ImportBatch, ImportError, ImportLine, ImportSummary, LineAction, LineStatus, PriceKey, RowIssue, VendorPriceRecord};
use crate::pricing;
use crate::pricing::NotificationSink;
use crate::storage::{PriceStore, ProductCatalog, VendorDirectory};
use crate::types::ScopeId;

/// Two-phase bulk price reconciler.
///
/// `preview` stages a validated classification of every input row without
/// touching the price store; `commit` applies the staged lines and
/// produces a summary. Malformed rows never reach the store, and one bad
/// row never blocks the rest of the batch.
pub struct Reconciler<C: ProductCatalog, V: VendorDirectory, P: PriceStore> {
    catalog: Arc<C>,
    vendors: Arc<V>,
    prices: Arc<P>,
    scope: ScopeId,
    notifier: Arc<dyn NotificationSink>,
    backpressure: usize
}

impl<C: ProductCatalog, V: VendorDirectory, P: PriceStore> Reconciler<C, V, P> {
    pub fn new(catalog: Arc<C>, vendors: Arc<V>, prices: Arc<P>, scope: ScopeId, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            catalog,
            vendors,
            prices,
            scope,
            notifier,
            backpressure: 256
        }
    }

    /// Parses and classifies the batch, replacing any previously staged
    /// lines. Read-only with respect to the price store, so re-running it
    /// on the same bytes yields the same lines.
    pub async fn preview(&self, batch: &mut ImportBatch) -> Result<(), ImportError> {
        let (sender, mut receiver) = mpsc::channel::<(u32, RawRow)>(self.backpressure);
        let csv_handle = parser::spawn_csv_reader(batch.data.clone(), sender);

        let mut lines = Vec::new();

        while let Some((row_number, raw)) = receiver.recv().await {
            lines.push(self.classify(row_number, raw));
        }

        let encoding = csv_handle.await??;

        batch.encoding = Some(encoding);
        batch.lines = lines;
        batch.summary = None;
        batch.state = BatchState::Preview;

        Ok(())
    }

    /// Runs every validation check in a fixed order without
    /// short-circuiting, so the preview shows all the fields the row
    /// managed to express. Only the last failing check's issue is kept.
    fn classify(&self, row_number: u32, raw: RawRow) -> ImportLine {
        let mut status = LineStatus::Ok;
        let mut issue = None;

        let price = match parse_price(&raw.price) {
            Some(price) => Some(price),
            None => {
                status = LineStatus::Error;
                issue = Some(RowIssue::InvalidPrice);
                None
            }
        };

        let valid_from = match NaiveDate::parse_from_str(&raw.valid_from, parser::DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                status = LineStatus::Error;
                issue = Some(RowIssue::InvalidValidFrom);
                None
            }
        };

        let valid_to = if raw.valid_to.is_empty() {
            None
        } else {
            match NaiveDate::parse_from_str(&raw.valid_to, parser::DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    status = LineStatus::Error;
                    issue = Some(RowIssue::InvalidValidTo);
                    None
                }
            }
        };

        let product = self.catalog.find_by_code(&raw.product_default_code);
        if product.is_none() {
            status = LineStatus::Error;
            issue = Some(RowIssue::ProductNotFound);
        }

        let vendor = self.vendors.find_supplier_by_name(&raw.vendor_name);
        if vendor.is_none() {
            status = LineStatus::Error;
            issue = Some(RowIssue::VendorNotFound);
        }

        if status == LineStatus::Ok {
            if let (Some(from), Some(to)) = (valid_from, valid_to) {
                if to < from {
                    status = LineStatus::Error;
                    issue = Some(RowIssue::ValidToBeforeValidFrom);
                }
            }
        }

        let product_id = product.map(|product| product.product_id);
        let vendor_id = vendor.map(|vendor| vendor.vendor_id);

        let mut action = LineAction::Create;

        if status == LineStatus::Ok {
            if let (Some(product_id), Some(vendor_id), Some(valid_from)) = (product_id, vendor_id, valid_from) {
                let key = PriceKey { product_id, vendor_id, valid_from, scope_id: self.scope };

                if self.prices.find_by_key(&key).is_some() {
                    action = LineAction::Update;
                }
            }
        }

        match issue {
            Some(issue) => warn!("Row [{row_number}] rejected: {issue}"),
            None => debug!("Row [{row_number}] staged for {}", action.as_str())
        }

        ImportLine {
            row_number,
            product_default_code: raw.product_default_code,
            vendor_name: raw.vendor_name,
            price,
            valid_from,
            valid_to,
            product_id,
            vendor_id,
            action,
            status,
            issue
        }
    }

    /// Applies the staged lines in input order and returns the summary.
    ///
    /// Each row is its own unit of work: error lines only bump the error
    /// counter, update lines re-resolve their target at commit time (the
    /// store may have moved since the preview) and fall back to creating
    /// it if it vanished, and a store-level failure on one row does not
    /// roll back rows already applied.
    pub fn commit(&self, batch: &mut ImportBatch) -> Result<ImportSummary, ImportError> {
        if batch.state != BatchState::Preview {
            return Err(ImportError::BatchNotPreviewed);
        }

        let today = Local::now().date_naive();
        let mut summary = ImportSummary::default();

        for line in &batch.lines {
            if line.status == LineStatus::Error {
                summary.errors += 1;
                continue;
            }

            if line.action == LineAction::Skip {
                continue;
            }

            let (Some(product_id), Some(vendor_id), Some(price), Some(valid_from)) =
                (line.product_id, line.vendor_id, line.price, line.valid_from)
            else {
                summary.errors += 1;
                continue;
            };

            let key = PriceKey { product_id, vendor_id, valid_from, scope_id: self.scope };

            let record = match line.action {
                LineAction::Update if self.prices.find_by_key(&key).is_some() => {
                    let updated = self.prices.update(&key, price, line.valid_to)?;
                    summary.updated += 1;
                    debug!("Row [{}] updated existing price record", line.row_number);
                    updated
                }
                _ => {
                    let record = VendorPriceRecord {
                        product_id,
                        vendor_id,
                        scope_id: self.scope,
                        price,
                        valid_from,
                        valid_to: line.valid_to,
                        notes: None
                    };
                    self.prices.insert(record.clone())?;
                    summary.created += 1;
                    debug!("Row [{}] created new price record", line.row_number);
                    record
                }
            };

            pricing::announce_if_best_price(self.prices.as_ref(), self.vendors.as_ref(), self.notifier.as_ref(), &record, today);
        }

        batch.summary = Some(summary);
        batch.state = BatchState::Done;

        Ok(summary)
    }
}

fn parse_price(value: &str) -> Option<Decimal> {
    let price = Decimal::from_str(value).ok()?;

    if price < Decimal::ZERO {
        return None;
    }

    Some(price)
}
