// Event construction errors

use thiserror::Error;

/// A notification payload was missing a field its event kind requires
///
/// Fatal only to the single decode that produced it; an already
/// accumulated event stream is never affected.
#[derive(Error, Debug)]
#[error("malformed {method} event: {source}")]
pub struct MalformedEvent {
    method: String,
    #[source]
    source: serde_json::Error,
}

impl MalformedEvent {
    pub(crate) fn new(method: impl Into<String>, source: serde_json::Error) -> Self {
        Self {
            method: method.into(),
            source,
        }
    }

    /// Event name the undecodable payload arrived under
    pub fn method(&self) -> &str {
        &self.method
    }
}
