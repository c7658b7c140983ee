use tracing::info;

/// Where price notifications go.
///
/// Delivery (chatter, email, webhooks) belongs to the host environment;
/// this component only hands over a finished body string.
pub trait NotificationSink: Send + Sync + 'static {
    fn post(&self, body: &str);
}

/// Default sink: surfaces notifications through the log stream.
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn post(&self, body: &str) {
        info!("{body}");
    }
}

#[cfg(test)]
pub struct RecordingSink {
    posts: std::sync::Mutex<Vec<String>>
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self {
            posts: std::sync::Mutex::new(Vec::new())
        }
    }

    pub fn posts(&self) -> Vec<String> {
        self.posts.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}

#[cfg(test)]
impl NotificationSink for RecordingSink {
    fn post(&self, body: &str) {
        self.posts.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(body.to_string());
    }
}
