use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::models::VendorPriceRecord;
use crate::pricing::NotificationSink;
use crate::storage::{PriceStore, ProductCatalog, VendorDirectory};
use crate::types::{ProductId, ScopeId};

/// All of a product's price records whose validity interval contains `on`.
pub fn current_prices<P: PriceStore>(prices: &P, product_id: ProductId, scope_id: ScopeId, on: NaiveDate) -> Vec<VendorPriceRecord> {
    prices.prices_for_product(product_id, scope_id)
        .into_iter()
        .filter(|record| record.is_current_on(on))
        .collect()
}

/// The cheapest current price for a product, if any.
///
/// Ties keep the first minimum encountered in store order; nothing
/// stronger is promised, and other store implementations may iterate in
/// a different order.
pub fn best_price<P: PriceStore>(prices: &P, product_id: ProductId, scope_id: ScopeId, on: NaiveDate) -> Option<VendorPriceRecord> {
    let mut best: Option<VendorPriceRecord> = None;

    for record in current_prices(prices, product_id, scope_id, on) {
        match &best {
            Some(current) if record.price >= current.price => {}
            _ => best = Some(record)
        }
    }

    best
}

/// Posts a "new best price" notice when a freshly written record holds
/// the lowest current price for its product.
pub fn announce_if_best_price<P, V>(prices: &P, vendors: &V, sink: &dyn NotificationSink, record: &VendorPriceRecord, on: NaiveDate)
where
    P: PriceStore,
    V: VendorDirectory
{
    let Some(best) = best_price(prices, record.product_id, record.scope_id, on) else {
        return;
    };

    if record.price != best.price {
        return;
    }

    let vendor = vendors.get(record.vendor_id)
        .map(|vendor| vendor.name)
        .unwrap_or_else(|| format!("vendor {}", record.vendor_id));

    sink.post(&format!("New best vendor price: {} at {} from {}", vendor, record.price, record.valid_from));
}

/// Posts one notice per product for prices that expired yesterday.
///
/// Invoked by whatever scheduling the host environment provides; the
/// function itself is a plain synchronous sweep. Returns the number of
/// products notified about.
pub fn post_expiry_notices<P, C, V>(prices: &P, catalog: &C, vendors: &V, sink: &dyn NotificationSink, scope_id: ScopeId, today: NaiveDate) -> usize
where
    P: PriceStore,
    C: ProductCatalog,
    V: VendorDirectory
{
    let yesterday = today - Duration::days(1);
    let mut by_product: BTreeMap<ProductId, Vec<VendorPriceRecord>> = BTreeMap::new();

    for record in prices.in_scope(scope_id) {
        if record.valid_to == Some(yesterday) {
            by_product.entry(record.product_id).or_default().push(record);
        }
    }

    for (product_id, records) in &by_product {
        let product = catalog.get(*product_id)
            .map(|product| product.default_code)
            .unwrap_or_else(|| format!("product {product_id}"));

        let mut body = format!("Vendor prices for {product} expired on {yesterday}:");

        for record in records {
            let vendor = vendors.get(record.vendor_id)
                .map(|vendor| vendor.name)
                .unwrap_or_else(|| format!("vendor {}", record.vendor_id));

            body.push_str(&format!("\n- {}: {} (from {} to {})", vendor, record.price, record.valid_from, yesterday));
        }

        sink.post(&body);
    }

    by_product.len()
}
