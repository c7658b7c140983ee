mod evaluator;
mod notify;

pub use evaluator::{announce_if_best_price, best_price, current_prices, post_expiry_notices};
pub use notify::{NotificationSink, TracingSink};

#[cfg(test)]
pub use notify::RecordingSink;
