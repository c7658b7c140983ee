use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, spawn_blocking};
use tracing::debug;

use crate::models::{ImportError, SourceEncoding};

pub const EXPECTED_COLUMNS: [&str; 5] = ["product_default_code", "vendor_name", "price", "valid_from", "valid_to"];

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One raw data row, fields exactly as the file spelled them.
///
/// Every field is defaulted so short rows still surface in the preview
/// with per-field validation messages instead of dying in deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub product_default_code: String,
    #[serde(default)]
    pub vendor_name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub valid_from: String,
    #[serde(default)]
    pub valid_to: String
}

/// Decodes uploaded bytes, trying UTF-8 first and falling back to
/// Windows-1252 (what spreadsheets typically mean by "latin1") rather
/// than failing the batch.
pub fn decode(data: &[u8]) -> (String, SourceEncoding) {
    match std::str::from_utf8(data) {
        Ok(text) => (text.to_string(), SourceEncoding::Utf8),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(data);
            (decoded.into_owned(), SourceEncoding::Windows1252)
        }
    }
}

/// Parses the uploaded bytes on a blocking task, feeding numbered raw
/// rows into `sender`.
///
/// A missing required column or a structural CSV failure is batch-fatal
/// and comes back through the join handle; per-row problems are left for
/// the classifier. Row numbers start at 2 because row 1 is the header.
pub fn spawn_csv_reader(data: Vec<u8>, sender: mpsc::Sender<(u32, RawRow)>) -> JoinHandle<Result<SourceEncoding, ImportError>> {
    spawn_blocking(move || {
        let (text, encoding) = decode(&data);
        debug!("Decoded {} byte import file as {encoding:?}", data.len());

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let missing: Vec<&str> = EXPECTED_COLUMNS
            .iter()
            .filter(|column| !headers.iter().any(|header| header == **column))
            .copied()
            .collect();

        if !missing.is_empty() {
            return Err(ImportError::missing_columns(&missing));
        }

        for (index, result) in reader.deserialize::<RawRow>().enumerate() {
            let row_number = index as u32 + 2;

            if sender.blocking_send((row_number, result?)).is_err() {
                break;
            }
        }

        Ok(encoding)
    })
}
