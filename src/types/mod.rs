//! Public types for the Huginn API.

pub mod display;
mod history;
mod sentiment;

pub use display::{Appearance, DisplayState};
pub use history::{HISTORY_CAPACITY, History, HistoryEntry};
pub use sentiment::{InferenceResult, Sentiment};
