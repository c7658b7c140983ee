use thiserror::Error;

/// A row-local validation failure.
///
/// These never abort the batch; they are recorded on the line and shown
/// in the preview. Only one issue is kept per row: validation runs every
/// check in a fixed order without short-circuiting, and the last check
/// to fail wins. The display strings are part of the preview contract
/// and must stay stable.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum RowIssue {
    #[error("Invalid price")]
    InvalidPrice,
    #[error("Invalid valid_from (expected YYYY-MM-DD)")]
    InvalidValidFrom,
    #[error("Invalid valid_to (expected YYYY-MM-DD)")]
    InvalidValidTo,
    #[error("Product not found")]
    ProductNotFound,
    #[error("Vendor not found or not a supplier")]
    VendorNotFound,
    #[error("valid_to is before valid_from")]
    ValidToBeforeValidFrom
}

/// A batch-fatal failure: nothing row-level is produced when one of
/// these occurs.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Could not read the import file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse the import file: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required columns: {columns}")]
    MissingColumns {
        columns: String
    },
    #[error("CSV ingestion task failed: {0}")]
    Ingestion(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Store(#[from] crate::storage::StoreError),
    #[error("Batch must be previewed before it can be committed")]
    BatchNotPreviewed
}

impl ImportError {
    pub fn missing_columns(columns: &[&str]) -> Self {
        Self::MissingColumns {
            columns: columns.join(", ")
        }
    }
}
