use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

/// Per-call overrides for a single operation
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    /// Send the operation to this URL instead of the client's own
    pub url: Option<Url>,

    /// Extra headers, replacing client defaults with the same name
    pub headers: HeaderMap,

    /// Request timeout for this call only
    pub timeout: Option<Duration>,
}

impl OperationContext {
    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
