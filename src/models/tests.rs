use super::{BatchState, ImportBatch, ImportSummary, RowIssue, VendorPriceRecord};

use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn quote(valid_from: &str, valid_to: Option<&str>) -> Result<VendorPriceRecord> {
    Ok(VendorPriceRecord {
        product_id: 1,
        vendor_id: 1,
        scope_id: 1,
        price: Decimal::from_str("19.99")?,
        valid_from: NaiveDate::from_str(valid_from)?,
        valid_to: match valid_to {
            Some(date) => Some(NaiveDate::from_str(date)?),
            None => None
        },
        notes: None
    })
}

#[test]
fn test_current_window_includes_both_boundaries() -> Result<()> {
    let record = quote("2024-01-01", Some("2024-06-30"))?;

    assert!(record.is_current_on(NaiveDate::from_str("2024-01-01")?));
    assert!(record.is_current_on(NaiveDate::from_str("2024-03-15")?));
    assert!(record.is_current_on(NaiveDate::from_str("2024-06-30")?));
    assert!(!record.is_current_on(NaiveDate::from_str("2023-12-31")?));
    assert!(!record.is_current_on(NaiveDate::from_str("2024-07-01")?));

    Ok(())
}

#[test]
fn test_open_ended_record_never_expires() -> Result<()> {
    let record = quote("2024-01-01", None)?;

    assert!(record.is_current_on(NaiveDate::from_str("2099-01-01")?));
    assert!(!record.is_current_on(NaiveDate::from_str("2023-12-31")?));
    assert!(!record.is_expiring_within(NaiveDate::from_str("2024-06-01")?, 30));

    Ok(())
}

#[test]
fn test_expiring_window_flag() -> Result<()> {
    let record = quote("2024-01-01", Some("2024-06-30"))?;

    assert!(record.is_expiring_within(NaiveDate::from_str("2024-06-15")?, 30));
    assert!(record.is_expiring_within(NaiveDate::from_str("2024-06-30")?, 30));
    assert!(!record.is_expiring_within(NaiveDate::from_str("2024-05-01")?, 30));
    assert!(!record.is_expiring_within(NaiveDate::from_str("2024-07-01")?, 30));

    Ok(())
}

#[test]
fn test_price_key_carries_identity_fields() -> Result<()> {
    let record = quote("2024-01-01", None)?;
    let key = record.key();

    assert_eq!(key.product_id, record.product_id);
    assert_eq!(key.vendor_id, record.vendor_id);
    assert_eq!(key.valid_from, record.valid_from);
    assert_eq!(key.scope_id, record.scope_id);

    // Same identity regardless of price or validity end.
    let mut cheaper = record.clone();
    cheaper.price = Decimal::from_str("1.00")?;
    cheaper.valid_to = Some(NaiveDate::from_str("2024-06-30")?);

    assert_eq!(cheaper.key(), key);

    Ok(())
}

#[test]
fn test_new_batch_starts_in_draft() {
    let batch = ImportBatch::new(b"raw bytes".to_vec());

    assert_eq!(batch.state, BatchState::Draft);
    assert!(batch.lines.is_empty());
    assert!(batch.encoding.is_none());
    assert!(batch.summary.is_none());
}

#[test]
fn test_summary_display_is_three_lines() {
    let summary = ImportSummary { created: 3, updated: 1, errors: 2 };

    assert_eq!(summary.to_string(), "Created: 3\nUpdated: 1\nErrors: 2");
}

#[test]
fn test_row_issue_messages_are_stable() {
    let expected = [
        (RowIssue::InvalidPrice, "Invalid price"),
        (RowIssue::InvalidValidFrom, "Invalid valid_from (expected YYYY-MM-DD)"),
        (RowIssue::InvalidValidTo, "Invalid valid_to (expected YYYY-MM-DD)"),
        (RowIssue::ProductNotFound, "Product not found"),
        (RowIssue::VendorNotFound, "Vendor not found or not a supplier"),
        (RowIssue::ValidToBeforeValidFrom, "valid_to is before valid_from")
    ];

    for (issue, message) in expected {
        assert_eq!(issue.to_string(), message);
    }
}
