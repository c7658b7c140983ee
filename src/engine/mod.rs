mod export;
mod parser;
mod reconciler;

pub use export::write_price_records;
pub use reconciler::Reconciler;
