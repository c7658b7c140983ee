use std::io::Write;

use crate::models::{ImportError, VendorPriceRecord};
use crate::storage::{ProductCatalog, VendorDirectory};

/// Exported columns, declared statically and written in this exact order.
pub const PRICE_EXPORT_COLUMNS: [&str; 6] = ["product_default_code", "vendor_name", "price", "valid_from", "valid_to", "notes"];

/// Writes price records as CSV, resolving references back to the codes
/// and names the import format uses.
pub fn write_price_records<W, C, V>(out: W, records: &[VendorPriceRecord], catalog: &C, vendors: &V) -> Result<(), ImportError>
where
    W: Write,
    C: ProductCatalog,
    V: VendorDirectory
{
    let mut writer = csv::WriterBuilder::new().from_writer(out);

    writer.write_record(PRICE_EXPORT_COLUMNS)?;

    for record in records {
        let code = catalog.get(record.product_id)
            .map(|product| product.default_code)
            .unwrap_or_default();
        let vendor = vendors.get(record.vendor_id)
            .map(|vendor| vendor.name)
            .unwrap_or_default();

        writer.write_record(&[
            code,
            vendor,
            record.price.to_string(),
            record.valid_from.to_string(),
            record.valid_to.map(|date| date.to_string()).unwrap_or_default(),
            record.notes.clone().unwrap_or_default()
        ])?;
    }

    writer.flush()?;

    Ok(())
}
