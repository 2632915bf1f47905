//! Remote inference providers.
//!
//! Providers only move bytes: they send one text and return the raw
//! payload. Interpretation lives in [`crate::interpret`].

pub mod huggingface;
pub mod traits;

pub use huggingface::HuggingFaceClient;
pub use traits::SentimentProvider;
