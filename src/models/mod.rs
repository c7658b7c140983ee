mod catalog;
mod errors;
mod import;
mod price;
#[cfg(test)]
mod tests;

pub use catalog::{Product, Vendor};
pub use errors::{ImportError, RowIssue};
pub use import::{ImportBatch, ImportLine, ImportSummary};
pub use price::{PriceKey, VendorPriceRecord};

/// Lifecycle of an import batch: uploaded, staged for review, applied.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BatchState {
    Draft,
    Preview,
    Done
}

/// What the commit engine will do with a staged line.
///
/// `Skip` is never assigned by the classifier; it exists for a reviewer
/// to park a line without deleting it from the batch.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LineAction {
    Create,
    Update,
    Skip
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LineStatus {
    Ok,
    Error
}

/// Character encoding the uploaded bytes were decoded with.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SourceEncoding {
    Utf8,
    Windows1252
}

impl LineAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineAction::Create => "create",
            LineAction::Update => "update",
            LineAction::Skip => "skip"
        }
    }
}

impl LineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStatus::Ok => "ok",
            LineStatus::Error => "error"
        }
    }
}
