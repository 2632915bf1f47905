//! Huginn error types

/// Huginn error types
#[derive(Debug, thiserror::Error)]
pub enum HuginnError {
    // Review source errors
    #[error("no reviews loaded")]
    NoReviews,

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error {status}{}", detail_suffix(.detail))]
    Api { status: u16, detail: Option<String> },

    /// The hosted model is still being loaded by the inference service.
    #[error("model is warming up, retry shortly ({detail})")]
    ModelLoading { detail: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("data error: {0}")]
    DataError(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HuginnError {
    /// Whether the upstream reported that the model is still loading.
    pub fn is_warming_up(&self) -> bool {
        matches!(self, HuginnError::ModelLoading { .. })
    }

    /// Short machine-friendly tag, used as a metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            HuginnError::NoReviews => "no_reviews",
            HuginnError::Http(_) => "http",
            HuginnError::Api { .. } => "api",
            HuginnError::ModelLoading { .. } => "model_loading",
            HuginnError::Json(_) => "json",
            HuginnError::InvalidInput(_) => "invalid_input",
            HuginnError::DataError(_) => "data",
            HuginnError::Configuration(_) => "configuration",
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl From<reqwest::Error> for HuginnError {
    fn from(err: reqwest::Error) -> Self {
        HuginnError::Http(err.to_string())
    }
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;
