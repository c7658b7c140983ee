use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::types::{ProductId, ScopeId, VendorId};

/// The identity of a vendor price record.
///
/// The store enforces uniqueness over this tuple; two records may only
/// differ in price/validity if at least one key field differs.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct PriceKey {
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    pub valid_from: NaiveDate,
    pub scope_id: ScopeId
}

/// A single vendor price quote for a product, valid over a date interval.
///
/// An absent `valid_to` means the quote is open-ended. Records are only
/// created or overwritten, never deleted, so expired quotes remain
/// available for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorPriceRecord {
    pub product_id: ProductId,
    pub vendor_id: VendorId,
    pub scope_id: ScopeId,
    pub price: Decimal,
    pub valid_from: NaiveDate,
    pub valid_to: Option<NaiveDate>,
    pub notes: Option<String>
}

impl VendorPriceRecord {
    pub fn key(&self) -> PriceKey {
        PriceKey {
            product_id: self.product_id,
            vendor_id: self.vendor_id,
            valid_from: self.valid_from,
            scope_id: self.scope_id
        }
    }

    /// Whether the validity interval contains `date` (both ends inclusive).
    pub fn is_current_on(&self, date: NaiveDate) -> bool {
        match self.valid_to {
            Some(valid_to) => self.valid_from <= date && date <= valid_to,
            None => self.valid_from <= date
        }
    }

    /// Whether the quote expires within the next `days` days of `date`.
    pub fn is_expiring_within(&self, date: NaiveDate, days: i64) -> bool {
        match self.valid_to {
            Some(valid_to) => date <= valid_to && valid_to <= date + Duration::days(days),
            None => false
        }
    }
}
