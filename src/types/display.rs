//! Presentation state derived from a classification.
//!
//! Each [`Sentiment`] maps to exactly one of three fixed [`Appearance`]s.
//! The score is carried through untouched: `fill_percent` is `score * 100`
//! and is not clamped here. Renderers clamp to whatever their surface allows.

use super::sentiment::{InferenceResult, Sentiment};

/// Fixed visual identity for a sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    /// Font Awesome icon classes.
    pub icon: &'static str,
    /// Terminal glyph.
    pub glyph: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Accent class (`pos`, `neg`, `neu`).
    pub accent: &'static str,
}

pub const POSITIVE: Appearance = Appearance {
    icon: "fa-solid fa-thumbs-up",
    glyph: "👍",
    label: "Positive",
    accent: "pos",
};

pub const NEGATIVE: Appearance = Appearance {
    icon: "fa-solid fa-thumbs-down",
    glyph: "👎",
    label: "Negative",
    accent: "neg",
};

pub const NEUTRAL: Appearance = Appearance {
    icon: "fa-regular fa-circle-question",
    glyph: "❔",
    label: "Neutral / Uncertain",
    accent: "neu",
};

impl Appearance {
    pub fn for_sentiment(sentiment: Sentiment) -> &'static Appearance {
        match sentiment {
            Sentiment::Positive => &POSITIVE,
            Sentiment::Negative => &NEGATIVE,
            Sentiment::Neutral => &NEUTRAL,
        }
    }
}

/// Everything needed to render one result.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub appearance: &'static Appearance,
    pub score: Option<f64>,
}

impl DisplayState {
    /// `(score: 0.987)`, or empty when there is no usable score.
    pub fn score_text(&self) -> String {
        self.usable_score()
            .map(|s| format!("(score: {s:.3})"))
            .unwrap_or_default()
    }

    /// Score bar fill in percent. Not clamped.
    pub fn fill_percent(&self) -> Option<f64> {
        self.usable_score().map(|s| s * 100.0)
    }

    /// Draw a `width`-cell score bar. Out-of-range fills are clamped to the bar.
    pub fn score_bar(&self, width: usize) -> String {
        let fraction = self.fill_percent().unwrap_or(0.0) / 100.0;
        let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
        let mut bar = String::with_capacity(width * 3);
        bar.extend(std::iter::repeat_n('█', filled));
        bar.extend(std::iter::repeat_n('░', width - filled));
        bar
    }

    fn usable_score(&self) -> Option<f64> {
        self.score.filter(|s| !s.is_nan())
    }
}

impl From<InferenceResult> for DisplayState {
    fn from(result: InferenceResult) -> Self {
        Self {
            appearance: Appearance::for_sentiment(result.sentiment),
            score: result.score,
        }
    }
}
