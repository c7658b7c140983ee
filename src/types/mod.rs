pub type ProductId = u32;
pub type VendorId = u32;
pub type ScopeId = u16;
