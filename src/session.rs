//! The analysis session: one explicit owner for all mutable state.
//!
//! A [`Session`] holds the review source, the rolling history and the most
//! recent result, and drives one request/response cycle per trigger. At most
//! one request is in flight at a time; a trigger that arrives while one is
//! outstanding is dropped and reported as [`Outcome::Ignored`].
//!
//! ```rust,no_run
//! use huginn::{HuggingFaceClient, Outcome, ReviewSource, Session};
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let client = HuggingFaceClient::new(std::env::var("HF_API_KEY").ok())?;
//!     let session = Session::new(client, ReviewSource::fallback());
//!
//!     if let Outcome::Classified(entry) = session.analyze_one().await? {
//!         println!("{} => {}", entry.text, entry.sentiment);
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use rand::Rng;
use tracing::debug;

use crate::interpret::UpstreamPayload;
use crate::providers::SentimentProvider;
use crate::reviews::ReviewSource;
use crate::telemetry;
use crate::types::{History, HistoryEntry, InferenceResult};
use crate::{HuginnError, Result};

/// What a trigger did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A request completed and its result was recorded.
    Classified(HistoryEntry),
    /// Another request was already in flight; nothing was sent.
    Ignored,
}

#[derive(Debug, Default)]
struct SessionState {
    history: History,
    latest: Option<HistoryEntry>,
}

/// Clears the in-flight flag on drop, including on error and unwind.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives classification cycles against a provider.
pub struct Session<P> {
    provider: P,
    reviews: ReviewSource,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
}

impl<P: SentimentProvider> Session<P> {
    pub fn new(provider: P, reviews: ReviewSource) -> Self {
        Self {
            provider,
            reviews,
            state: Mutex::new(SessionState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn reviews(&self) -> &ReviewSource {
        &self.reviews
    }

    /// Whether a request is currently outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Whether a trigger would start a request right now.
    pub fn can_analyze(&self) -> bool {
        !self.reviews.is_empty() && !self.is_busy()
    }

    /// Classify a randomly chosen review.
    pub async fn analyze_one(&self) -> Result<Outcome> {
        let Some(_guard) = self.try_begin() else {
            return Ok(self.ignored());
        };
        let text = {
            let mut rng = rand::rng();
            self.pick(&mut rng)?
        };
        self.run_cycle(text).await.map(Outcome::Classified)
    }

    /// Like [`analyze_one`](Self::analyze_one) with a caller-supplied RNG.
    pub async fn analyze_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Outcome> {
        let Some(_guard) = self.try_begin() else {
            return Ok(self.ignored());
        };
        let text = self.pick(rng)?;
        self.run_cycle(text).await.map(Outcome::Classified)
    }

    /// Classify caller-supplied text.
    pub async fn analyze_text(&self, text: &str) -> Result<Outcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(HuginnError::InvalidInput("text is empty".to_string()));
        }
        let Some(_guard) = self.try_begin() else {
            return Ok(self.ignored());
        };
        self.run_cycle(text.to_string()).await.map(Outcome::Classified)
    }

    /// Snapshot of the history, most recent first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock_state().history.to_vec()
    }

    /// The most recent classification.
    pub fn latest(&self) -> Option<HistoryEntry> {
        self.lock_state().latest.clone()
    }

    fn try_begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    fn ignored(&self) -> Outcome {
        debug!("request already in flight, ignoring trigger");
        metrics::counter!(telemetry::IGNORED_TRIGGERS_TOTAL).increment(1);
        Outcome::Ignored
    }

    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
        self.reviews
            .pick(rng)
            .map(str::to_owned)
            .ok_or(HuginnError::NoReviews)
    }

    async fn run_cycle(&self, text: String) -> Result<HistoryEntry> {
        let provider = self.provider.name().to_string();
        let start = Instant::now();
        let response = self.provider.infer(&text).await;

        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "provider" => provider.clone())
            .record(start.elapsed().as_secs_f64());
        let status = match &response {
            Ok(_) => "ok",
            Err(e) => {
                metrics::counter!(
                    telemetry::REQUEST_ERRORS_TOTAL,
                    "provider" => provider.clone(),
                    "kind" => e.kind()
                )
                .increment(1);
                "error"
            }
        };
        metrics::counter!(telemetry::REQUESTS_TOTAL, "provider" => provider, "status" => status)
            .increment(1);

        let payload = response?;
        let decoded = UpstreamPayload::decode(&payload);
        let result: InferenceResult = decoded.to_result();
        debug!(
            shape = decoded.shape(),
            sentiment = %result.sentiment,
            score = ?result.score,
            "interpreted response"
        );
        metrics::counter!(telemetry::CLASSIFICATIONS_TOTAL, "sentiment" => result.sentiment.as_str())
            .increment(1);

        let entry = HistoryEntry::new(text, result);
        let mut state = self.lock_state();
        state.history.push(entry.clone());
        state.latest = Some(entry.clone());
        Ok(entry)
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
