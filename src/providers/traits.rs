//! Provider trait for remote sentiment inference.
//!
//! A provider performs exactly one request per call and hands back the raw
//! decoded payload. Shape handling belongs to [`crate::interpret`], so that
//! every provider shares the same interpretation rules.

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Provider for text classification over a remote endpoint.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Send `text` to the endpoint and return the raw response.
    ///
    /// JSON responses are returned decoded; anything else comes back as
    /// [`Value::String`]. Non-success statuses are errors.
    async fn infer(&self, text: &str) -> Result<Value>;
}
