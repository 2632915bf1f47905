//! Review sources: the built-in sample list or a tab-separated file.
//!
//! A TSV file must have a header row with a `text` column. Cells are trimmed
//! and rows whose text is blank are dropped.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::info;

use crate::{HuginnError, Result};

/// Sample reviews used when no review file is configured.
pub const FALLBACK_REVIEWS: &[&str] = &[
    "Great product, exactly as described and fast shipping.",
    "Terrible customer service, arrived damaged and no reply.",
    "Quality is excellent, I will buy again.",
    "Not worth the money, very disappointed.",
    "Fast delivery and great packaging.",
    "The size was wrong, but return was easy.",
    "Five stars, works perfectly.",
    "Arrived late and item was scratched.",
    "Amazing value for the price, highly recommended.",
    "Mediocre, expected better performance.",
];

const TEXT_COLUMN: &str = "text";

/// Where a [`ReviewSource`] came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReviewOrigin {
    /// Built by the caller.
    #[default]
    Inline,
    /// [`FALLBACK_REVIEWS`].
    Builtin,
    /// A TSV file on disk.
    File(PathBuf),
}

/// An in-memory set of reviews to draw from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSource {
    reviews: Vec<String>,
    origin: ReviewOrigin,
}

fn malformed(err: csv::Error) -> HuginnError {
    HuginnError::DataError(format!("malformed review file: {err}"))
}

impl ReviewSource {
    pub fn new(reviews: Vec<String>) -> Self {
        Self {
            reviews,
            origin: ReviewOrigin::Inline,
        }
    }

    /// The built-in sample list.
    pub fn fallback() -> Self {
        Self {
            reviews: FALLBACK_REVIEWS.iter().map(|s| s.to_string()).collect(),
            origin: ReviewOrigin::Builtin,
        }
    }

    /// Parse tab-separated content with a `text` column.
    ///
    /// Quoted cells may contain tabs, newlines and `""` escapes. A leading
    /// byte-order mark is ignored.
    pub fn from_tsv(content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Err(HuginnError::DataError("review file is empty".to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(content.as_bytes());

        let column = reader
            .headers()
            .map_err(malformed)?
            .iter()
            .position(|name| name.trim() == TEXT_COLUMN)
            .ok_or_else(|| {
                HuginnError::DataError(format!("review file has no '{TEXT_COLUMN}' column"))
            })?;

        let mut reviews = Vec::new();
        for record in reader.records() {
            let record = record.map_err(malformed)?;
            if let Some(text) = record.get(column).map(str::trim)
                && !text.is_empty()
            {
                reviews.push(text.to_owned());
            }
        }

        Ok(Self::new(reviews))
    }

    /// Read and parse a TSV file.
    pub fn load_tsv(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::DataError(format!("Failed to read review file {path:?}: {e}"))
        })?;
        let mut source = Self::from_tsv(&content)?;
        source.origin = ReviewOrigin::File(path.to_path_buf());
        info!(path = %path.display(), count = source.len(), "loaded reviews");
        Ok(source)
    }

    /// Load from `path` if given, else the built-in list.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_tsv(path),
            None => Ok(Self::fallback()),
        }
    }

    /// Uniformly random review, or `None` when empty.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.reviews.choose(rng).map(String::as_str)
    }

    pub fn origin(&self) -> &ReviewOrigin {
        &self.origin
    }

    /// One-line status for front-ends, worded after where the reviews came from.
    pub fn summary(&self) -> String {
        let count = self.len();
        match &self.origin {
            ReviewOrigin::Builtin => format!("Loaded {count} sample reviews"),
            ReviewOrigin::File(path) => format!("Loaded {count} reviews from {}", path.display()),
            ReviewOrigin::Inline => format!("Loaded {count} reviews"),
        }
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.reviews.iter().map(String::as_str)
    }
}
