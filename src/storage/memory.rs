use std::cmp::Reverse;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;

use crate::models::{PriceKey, Product, Vendor, VendorPriceRecord};
use crate::storage::{PriceStore, ProductCatalog, StoreError, VendorDirectory};
use crate::types::{ProductId, ScopeId, VendorId};

fn check_interval(valid_from: NaiveDate, valid_to: Option<NaiveDate>) -> Result<(), StoreError> {
    match valid_to {
        Some(valid_to) if valid_to < valid_from => Err(StoreError::invalid_interval(valid_from, valid_to)),
        _ => Ok(())
    }
}

pub struct InMemoryProductCatalog {
    products: DashMap<ProductId, Product>,
    next_id: AtomicU32
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
            next_id: AtomicU32::new(1)
        }
    }

    pub fn add(&self, default_code: &str, name: &str) -> Product {
        let product_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let product = Product {
            product_id,
            default_code: default_code.to_string(),
            name: name.to_string()
        };
        self.products.insert(product_id, product.clone());
        product
    }
}

impl ProductCatalog for InMemoryProductCatalog {
    fn find_by_code(&self, code: &str) -> Option<Product> {
        // Store order is ascending id, so the lowest matching id wins.
        self.products
            .iter()
            .filter(|entry| entry.value().default_code == code)
            .min_by_key(|entry| entry.value().product_id)
            .map(|entry| entry.value().clone())
    }

    fn get(&self, product_id: ProductId) -> Option<Product> {
        self.products.get(&product_id).map(|entry| entry.value().clone())
    }
}

pub struct InMemoryVendorDirectory {
    vendors: DashMap<VendorId, Vendor>,
    next_id: AtomicU32
}

impl InMemoryVendorDirectory {
    pub fn new() -> Self {
        Self {
            vendors: DashMap::new(),
            next_id: AtomicU32::new(1)
        }
    }

    pub fn add(&self, name: &str, supplier_rank: u32) -> Vendor {
        let vendor_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let vendor = Vendor {
            vendor_id,
            name: name.to_string(),
            supplier_rank
        };
        self.vendors.insert(vendor_id, vendor.clone());
        vendor
    }
}

impl VendorDirectory for InMemoryVendorDirectory {
    fn find_supplier_by_name(&self, name: &str) -> Option<Vendor> {
        // Names are not unique; first match in store order (ascending id).
        self.vendors
            .iter()
            .filter(|entry| entry.value().is_supplier() && entry.value().name == name)
            .min_by_key(|entry| entry.value().vendor_id)
            .map(|entry| entry.value().clone())
    }

    fn get(&self, vendor_id: VendorId) -> Option<Vendor> {
        self.vendors.get(&vendor_id).map(|entry| entry.value().clone())
    }
}

pub struct InMemoryPriceStore {
    records: DashMap<PriceKey, VendorPriceRecord>
}

impl InMemoryPriceStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    // Store order: product, vendor, newest validity first.
    fn sorted(&self, mut records: Vec<VendorPriceRecord>) -> Vec<VendorPriceRecord> {
        records.sort_by_key(|record| (record.product_id, record.vendor_id, Reverse(record.valid_from)));
        records
    }
}

impl PriceStore for InMemoryPriceStore {
    fn find_by_key(&self, key: &PriceKey) -> Option<VendorPriceRecord> {
        self.records.get(key).map(|entry| entry.value().clone())
    }

    fn insert(&self, record: VendorPriceRecord) -> Result<(), StoreError> {
        check_interval(record.valid_from, record.valid_to)?;

        match self.records.entry(record.key()) {
            Entry::Occupied(slot) => Err(StoreError::duplicate_key(slot.key())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    fn update(&self, key: &PriceKey, price: Decimal, valid_to: Option<NaiveDate>) -> Result<VendorPriceRecord, StoreError> {
        check_interval(key.valid_from, valid_to)?;

        let Some(mut entry) = self.records.get_mut(key) else {
            return Err(StoreError::not_found(key));
        };

        let record = entry.value_mut();
        record.price = price;
        record.valid_to = valid_to;

        Ok(record.clone())
    }

    fn prices_for_product(&self, product_id: ProductId, scope_id: ScopeId) -> Vec<VendorPriceRecord> {
        let records = self.records
            .iter()
            .filter(|entry| entry.value().product_id == product_id && entry.value().scope_id == scope_id)
            .map(|entry| entry.value().clone())
            .collect();

        self.sorted(records)
    }

    fn in_scope(&self, scope_id: ScopeId) -> Vec<VendorPriceRecord> {
        let records = self.records
            .iter()
            .filter(|entry| entry.value().scope_id == scope_id)
            .map(|entry| entry.value().clone())
            .collect();

        self.sorted(records)
    }
}
