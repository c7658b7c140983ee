mod memory;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{PriceKey, Product, Vendor, VendorPriceRecord};
use crate::types::{ProductId, ScopeId, VendorId};

pub use memory::{InMemoryPriceStore, InMemoryProductCatalog, InMemoryVendorDirectory};

/// Product reference data, looked up by exact internal code.
pub trait ProductCatalog: Send + Sync + 'static {
    fn find_by_code(&self, code: &str) -> Option<Product>;
    fn get(&self, product_id: ProductId) -> Option<Product>;
}

/// Vendor reference data, looked up by exact name among supplier-flagged
/// vendors. Ambiguous names resolve to the first match in store order.
pub trait VendorDirectory: Send + Sync + 'static {
    fn find_supplier_by_name(&self, name: &str) -> Option<Vendor>;
    fn get(&self, vendor_id: VendorId) -> Option<Vendor>;
}

/// The authoritative price record store.
///
/// Implementations enforce uniqueness of the price key and the
/// `valid_to >= valid_from` constraint; everything else is the caller's
/// business. Each mutation is its own unit of work.
pub trait PriceStore: Send + Sync + 'static {
    fn find_by_key(&self, key: &PriceKey) -> Option<VendorPriceRecord>;
    fn insert(&self, record: VendorPriceRecord) -> Result<(), StoreError>;
    fn update(&self, key: &PriceKey, price: Decimal, valid_to: Option<NaiveDate>) -> Result<VendorPriceRecord, StoreError>;
    fn prices_for_product(&self, product_id: ProductId, scope_id: ScopeId) -> Vec<VendorPriceRecord>;
    fn in_scope(&self, scope_id: ScopeId) -> Vec<VendorPriceRecord>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("A vendor price for product [{product_id}] and vendor [{vendor_id}] starting {valid_from} already exists in scope [{scope_id}]")]
    DuplicateKey {
        product_id: ProductId,
        vendor_id: VendorId,
        valid_from: NaiveDate,
        scope_id: ScopeId
    },
    #[error("No vendor price for product [{product_id}] and vendor [{vendor_id}] starting {valid_from} in scope [{scope_id}]")]
    NotFound {
        product_id: ProductId,
        vendor_id: VendorId,
        valid_from: NaiveDate,
        scope_id: ScopeId
    },
    #[error("valid_to {valid_to} is before valid_from {valid_from}")]
    InvalidInterval {
        valid_from: NaiveDate,
        valid_to: NaiveDate
    }
}

impl StoreError {
    pub fn duplicate_key(key: &PriceKey) -> Self {
        Self::DuplicateKey {
            product_id: key.product_id,
            vendor_id: key.vendor_id,
            valid_from: key.valid_from,
            scope_id: key.scope_id
        }
    }

    pub fn not_found(key: &PriceKey) -> Self {
        Self::NotFound {
            product_id: key.product_id,
            vendor_id: key.vendor_id,
            valid_from: key.valid_from,
            scope_id: key.scope_id
        }
    }

    pub fn invalid_interval(valid_from: NaiveDate, valid_to: NaiveDate) -> Self {
        Self::InvalidInterval { valid_from, valid_to }
    }
}
