//! Tests for the analysis session: in-flight guard and history.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use tokio::sync::Notify;

use huginn::{
    HISTORY_CAPACITY, HuginnError, Outcome, Result, ReviewSource, Sentiment, SentimentProvider,
    Session,
};

// ============================================================================
// Mock providers
// ============================================================================

/// Blocks every call until released, counting calls.
struct GatedProvider {
    gate: Arc<Notify>,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl SentimentProvider for GatedProvider {
    fn name(&self) -> &str {
        "gated"
    }

    async fn infer(&self, _text: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(json!([{ "label": "NEGATIVE", "score": 0.8 }]))
    }
}

/// Answers with a label derived from the input text.
struct EchoProvider;

#[async_trait]
impl SentimentProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn infer(&self, text: &str) -> Result<Value> {
        Ok(json!([[{ "label": "POSITIVE", "score": text.len() as f64 / 10.0 }]]))
    }
}

struct FailingProvider {
    calls: AtomicU32,
}

#[async_trait]
impl SentimentProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn infer(&self, _text: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(HuginnError::Api {
            status: 500,
            detail: None,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn second_trigger_while_in_flight_is_ignored() {
    let gate = Arc::new(Notify::new());
    let calls = Arc::new(AtomicU32::new(0));
    let session = Session::new(
        GatedProvider {
            gate: gate.clone(),
            calls: calls.clone(),
        },
        ReviewSource::fallback(),
    );

    let release = async {
        tokio::task::yield_now().await;
        assert!(session.is_busy());
        assert!(!session.can_analyze());
        gate.notify_one();
    };

    // join! polls in order: the first call parks on the gate, the second
    // sees it in flight, then the gate opens.
    let (first, second, ()) = tokio::join!(session.analyze_one(), session.analyze_one(), release);

    assert!(matches!(first.unwrap(), Outcome::Classified(_)));
    assert_eq!(second.unwrap(), Outcome::Ignored);
    assert_eq!(calls.load(Ordering::SeqCst), 1, "no second request issued");
    assert_eq!(session.history().len(), 1);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn guard_is_released_after_completion() {
    let gate = Arc::new(Notify::new());
    let calls = Arc::new(AtomicU32::new(0));
    let session = Session::new(
        GatedProvider {
            gate: gate.clone(),
            calls: calls.clone(),
        },
        ReviewSource::fallback(),
    );

    for _ in 0..3 {
        // Store a permit so the call completes immediately.
        gate.notify_one();
        let outcome = session.analyze_text("Arrived late").await.unwrap();
        assert!(matches!(outcome, Outcome::Classified(_)));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn guard_is_released_after_failure() {
    let session = Session::new(
        FailingProvider {
            calls: AtomicU32::new(0),
        },
        ReviewSource::fallback(),
    );

    for _ in 0..2 {
        let err = session.analyze_one().await.unwrap_err();
        assert_eq!(err.to_string(), "API error 500");
        assert!(!session.is_busy());
    }
    assert_eq!(session.provider().calls.load(Ordering::SeqCst), 2);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn history_keeps_five_most_recent_first() {
    let session = Session::new(EchoProvider, ReviewSource::fallback());

    for text in ["A", "B", "C", "D", "E", "F"] {
        session.analyze_text(text).await.unwrap();
    }

    let history = session.history();
    assert_eq!(history.len(), HISTORY_CAPACITY);
    let texts: Vec<_> = history.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["F", "E", "D", "C", "B"]);
    assert_eq!(session.latest().map(|e| e.text), Some("F".to_string()));
}

#[tokio::test]
async fn low_confidence_keeps_score_in_history() {
    // "abc" -> score 0.3 with a POSITIVE label.
    let session = Session::new(EchoProvider, ReviewSource::fallback());
    let Outcome::Classified(entry) = session.analyze_text("abc").await.unwrap() else {
        panic!("expected a classification");
    };
    assert_eq!(entry.sentiment, Sentiment::Neutral);
    let score = entry.score.expect("score should be kept");
    assert!((score - 0.3).abs() < 1e-9);
}

#[tokio::test]
async fn random_pick_comes_from_source() {
    let reviews = ReviewSource::from_tsv("text\nonly one review\n").unwrap();
    let session = Session::new(EchoProvider, reviews);
    let mut rng = StdRng::seed_from_u64(42);

    let Outcome::Classified(entry) = session.analyze_with_rng(&mut rng).await.unwrap() else {
        panic!("expected a classification");
    };
    assert_eq!(entry.text, "only one review");
}

#[tokio::test]
async fn no_reviews_is_reported() {
    let session = Session::new(EchoProvider, ReviewSource::default());
    assert!(!session.can_analyze());
    assert!(matches!(
        session.analyze_one().await,
        Err(HuginnError::NoReviews)
    ));
    // Explicit text still works without a review source.
    assert!(session.analyze_text("fine").await.is_ok());
}
