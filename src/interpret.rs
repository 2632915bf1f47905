//! Response interpretation for text-classification endpoints.
//!
//! Hosted text-classification deployments disagree on response shape. For a
//! single input some return a nested list, others a flat one:
//!
//! ```text
//! [[{"label": "POSITIVE", "score": 0.99}, {"label": "NEGATIVE", "score": 0.01}]]
//! [{"label": "POSITIVE", "score": 0.99}]
//! ```
//!
//! [`UpstreamPayload::decode`] recognises both (nested first) and falls back to
//! [`UpstreamPayload::Unrecognized`] for anything else. [`interpret`] then
//! reduces the payload to an [`InferenceResult`]. Interpretation never fails:
//! unexpected shapes become `Neutral` with no score.
//!
//! ```rust
//! use huginn::{Sentiment, interpret};
//! use serde_json::json;
//!
//! let result = interpret(&json!([[{"label": "NEGATIVE", "score": 0.9}]]));
//! assert_eq!(result.sentiment, Sentiment::Negative);
//! assert_eq!(result.score, Some(0.9));
//! ```

use serde_json::{Map, Value};

use crate::types::{InferenceResult, Sentiment};

/// Scores must be strictly above this for a polar label to count.
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

const POSITIVE_LABEL: &str = "POSITIVE";
const NEGATIVE_LABEL: &str = "NEGATIVE";

/// Label and score pulled out of a recognised payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prediction {
    /// Present only when the `label` field is a string.
    pub label: Option<String>,
    /// Present only when the `score` field is a JSON number.
    pub score: Option<f64>,
}

impl Prediction {
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            label: object
                .get("label")
                .and_then(Value::as_str)
                .map(str::to_owned),
            score: object.get("score").filter(|v| v.is_number()).and_then(Value::as_f64),
        }
    }

    /// Reduce to a sentiment. Labels are matched exactly (case-sensitive).
    pub fn sentiment(&self) -> Sentiment {
        let confident = self.score.is_some_and(|s| s > CONFIDENCE_THRESHOLD);
        match self.label.as_deref() {
            Some(POSITIVE_LABEL) if confident => Sentiment::Positive,
            Some(NEGATIVE_LABEL) if confident => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

/// The shapes an upstream classification response can take.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamPayload {
    /// `[[{label, score}, ...], ...]`
    Nested(Prediction),
    /// `[{label, score}, ...]`
    Flat(Prediction),
    /// Anything else.
    Unrecognized,
}

impl UpstreamPayload {
    /// Sniff the payload shape. The nested shape wins when both could apply.
    pub fn decode(value: &Value) -> Self {
        let Some(first) = value.as_array().and_then(|outer| outer.first()) else {
            return UpstreamPayload::Unrecognized;
        };

        if let Some(inner) = first.as_array().and_then(|inner| inner.first())
            && let Some(object) = labelled_object(inner)
        {
            return UpstreamPayload::Nested(Prediction::from_object(object));
        }

        match first
            .as_object()
            .filter(|object| object.get("label").is_some_and(truthy))
        {
            Some(object) => UpstreamPayload::Flat(Prediction::from_object(object)),
            None => UpstreamPayload::Unrecognized,
        }
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            UpstreamPayload::Nested(p) | UpstreamPayload::Flat(p) => Some(p),
            UpstreamPayload::Unrecognized => None,
        }
    }

    /// Short shape name for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            UpstreamPayload::Nested(_) => "nested",
            UpstreamPayload::Flat(_) => "flat",
            UpstreamPayload::Unrecognized => "unrecognized",
        }
    }

    pub fn to_result(&self) -> InferenceResult {
        match self.prediction() {
            Some(p) => InferenceResult::new(p.sentiment(), p.score),
            None => InferenceResult::default(),
        }
    }
}

fn labelled_object(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object().filter(|object| object.contains_key("label"))
}

/// `null`, `false`, `""` and zero count as no label in the flat shape.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Interpret an arbitrary upstream payload.
///
/// The returned score is the upstream score verbatim, whichever sentiment was
/// chosen: a `POSITIVE` at 0.4 yields `Neutral` with `Some(0.4)`.
pub fn interpret(payload: &Value) -> InferenceResult {
    UpstreamPayload::decode(payload).to_result()
}
