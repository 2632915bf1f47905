//! Sentiment classification types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The sentiment assigned to a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// Upstream said `POSITIVE` with a score above the threshold.
    Positive,
    /// Upstream said `NEGATIVE` with a score above the threshold.
    Negative,
    /// Anything else: ambiguous, low-confidence or unrecognized.
    #[default]
    Neutral,
}

impl Sentiment {
    /// Lowercase name, also used as a metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of interpreting one upstream response.
///
/// `score` is whatever numeric score the upstream returned, kept verbatim
/// even when the sentiment collapsed to [`Sentiment::Neutral`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub sentiment: Sentiment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl InferenceResult {
    pub fn new(sentiment: Sentiment, score: Option<f64>) -> Self {
        Self { sentiment, score }
    }
}
