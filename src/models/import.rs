use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{BatchState, LineAction, LineStatus, RowIssue, SourceEncoding};
use crate::types::{ProductId, VendorId};

/// One uploaded file staged for reconciliation.
///
/// The batch is a staging buffer, not authoritative data: it holds the
/// raw bytes, the staged line classifications produced by a preview, and
/// the summary produced by a commit. It lives only as long as the
/// interactive session that uploaded it.
#[derive(Debug, Clone)]
pub struct ImportBatch {
    pub data: Vec<u8>,
    pub encoding: Option<SourceEncoding>,
    pub lines: Vec<ImportLine>,
    pub state: BatchState,
    pub summary: Option<ImportSummary>
}

impl ImportBatch {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            encoding: None,
            lines: Vec::new(),
            state: BatchState::Draft,
            summary: None
        }
    }
}

/// One classified input row awaiting confirmation.
///
/// Raw fields are kept even when parsing failed part-way so the preview
/// shows everything the file said, not just the first problem. A line
/// with `status == Error` is never applied; a line with `status == Ok`
/// always carries both resolved references and a `valid_from`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportLine {
    /// Source row number, 1-based and counting the header row, so it
    /// matches what the user sees in a spreadsheet.
    pub row_number: u32,
    pub product_default_code: String,
    pub vendor_name: String,
    pub price: Option<Decimal>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub product_id: Option<ProductId>,
    pub vendor_id: Option<VendorId>,
    pub action: LineAction,
    pub status: LineStatus,
    pub issue: Option<RowIssue>
}

impl ImportLine {
    pub fn message(&self) -> String {
        self.issue.map(|issue| issue.to_string()).unwrap_or_default()
    }
}

/// Outcome counts of a committed batch.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ImportSummary {
    pub created: u32,
    pub updated: u32,
    pub errors: u32
}

impl Display for ImportSummary {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "Created: {}\nUpdated: {}\nErrors: {}", self.created, self.updated, self.errors)
    }
}
