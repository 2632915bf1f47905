//! Huginn - product review sentiment over hosted inference APIs
//!
//! Huginn picks a review, sends it to a hosted text-classification model and
//! turns whatever comes back into one of three sentiments with an optional
//! confidence score. Results are kept in a short rolling history.
//!
//! The moving parts:
//! - [`ReviewSource`] supplies texts (built-in samples or a TSV file).
//! - [`SentimentProvider`] sends one text upstream; [`HuggingFaceClient`] is
//!   the hosted implementation.
//! - [`interpret`] reduces the raw payload to an [`InferenceResult`].
//! - [`Session`] owns the state and allows one request in flight at a time.
//! - [`DisplayState`] maps a result to its icon, label and score bar.
//!
//! # Example
//!
//! ```rust,no_run
//! use huginn::{DisplayState, HuggingFaceClient, Outcome, ReviewSource, Session};
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let client = HuggingFaceClient::new(None)?;
//!     let session = Session::new(client, ReviewSource::fallback());
//!
//!     if let Outcome::Classified(entry) = session.analyze_text("Works perfectly.").await? {
//!         let display = DisplayState::from(entry.result());
//!         println!("{} {}", display.appearance.label, display.score_text());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod interpret;
pub mod providers;
pub mod reviews;
pub mod session;
pub mod telemetry;
pub mod types;

pub use config::{Config, TokenStore};
pub use error::{HuginnError, Result};
pub use interpret::{UpstreamPayload, interpret};
pub use providers::{HuggingFaceClient, SentimentProvider};
pub use reviews::{ReviewOrigin, ReviewSource};
pub use session::{Outcome, Session};
pub use types::{
    Appearance, DisplayState, HISTORY_CAPACITY, History, HistoryEntry, InferenceResult, Sentiment,
};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
