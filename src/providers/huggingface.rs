//! HuggingFace Inference API client for text classification.
//!
//! This client uses HuggingFace's serverless inference endpoints.
//! See: <https://huggingface.co/docs/api-inference/index>

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::traits::SentimentProvider;
use crate::{HuginnError, Result};

/// Default base URL for HuggingFace Inference API
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Default sentiment model.
pub const DEFAULT_MODEL: &str = "siebert/sentiment-roberta-large-english";

/// Client for HuggingFace Inference API.
///
/// One POST per call, no local timeout and no retries. The token is optional:
/// anonymous requests work against public models, with tighter rate limits.
#[derive(Clone)]
pub struct HuggingFaceClient {
    api_key: Option<String>,
    model: String,
    http: Client,
    base_url: String,
}

impl std::fmt::Debug for HuggingFaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("authenticated", &self.api_key.is_some())
            .finish()
    }
}

impl HuggingFaceClient {
    /// Create a client for the default model and endpoint.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_MODEL, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom model and base URL (for testing with wiremock).
    ///
    /// Blank tokens are treated as absent; others are trimmed.
    pub fn with_base_url(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("huginn/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HuginnError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(Self {
            api_key,
            model: model.into(),
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_authenticated(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    /// Classify a single text, returning the raw payload.
    pub async fn classify(&self, text: &str) -> Result<Value> {
        let url = self.endpoint();
        debug!(model = %self.model, authenticated = self.api_key.is_some(), "sending inference request");

        let mut request = self.http.post(&url).json(&ClassifyRequest { inputs: text });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let body = response.text().await?;
        let payload = if is_json {
            match serde_json::from_str(&body) {
                Ok(value) => value,
                Err(e) if status.is_success() => return Err(e.into()),
                // Error pages sometimes claim JSON; keep the text for the message path.
                Err(_) => Value::String(body),
            }
        } else {
            Value::String(body)
        };

        if !status.is_success() {
            let err = error_from_payload(status.as_u16(), &payload);
            warn!(model = %self.model, status = status.as_u16(), error = %err, "inference request failed");
            return Err(err);
        }

        Ok(payload)
    }
}

/// Map a failed response to an error, picking out the upstream `error` detail.
fn error_from_payload(status: u16, payload: &Value) -> HuginnError {
    let detail = serde_json::from_value::<ErrorBody>(payload.clone())
        .ok()
        .map(|body| body.error);

    match detail {
        Some(detail) if detail.to_lowercase().contains("loading") => {
            HuginnError::ModelLoading { detail }
        }
        detail => HuginnError::Api { status, detail },
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

// ============================================================================
// Provider Trait Implementation
// ============================================================================

#[async_trait]
impl SentimentProvider for HuggingFaceClient {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn infer(&self, text: &str) -> Result<Value> {
        HuggingFaceClient::classify(self, text).await
    }
}
