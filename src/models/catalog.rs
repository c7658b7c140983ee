use crate::types::{ProductId, VendorId};

/// Reference data: a product looked up by its internal reference code.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: ProductId,
    pub default_code: String,
    pub name: String
}

/// Reference data: a partner that may act as a supplier.
///
/// A vendor is supplier-flagged iff `supplier_rank > 0`; import rows only
/// resolve against supplier-flagged vendors.
#[derive(Debug, Clone, PartialEq)]
pub struct Vendor {
    pub vendor_id: VendorId,
    pub name: String,
    pub supplier_rank: u32
}

impl Vendor {
    pub fn is_supplier(&self) -> bool {
        self.supplier_rank > 0
    }
}
