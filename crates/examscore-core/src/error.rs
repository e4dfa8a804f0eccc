//! Error types for the scoring engine.
//!
//! Every failure in this crate is local and recoverable. Callers receive one
//! of these values and decide what to show; nothing here ends the process.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::model::ScienceTier;

/// Raw input rejected before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A correct or incorrect count was below zero.
    #[error("{tier} {field} count must not be negative (got {value})")]
    NegativeCount {
        tier: ScienceTier,
        field: CountField,
        value: i64,
    },

    /// correct + incorrect exceeded the configured per-tier question count.
    #[error("{tier} answers total {total}, more than the {max} questions in the tier")]
    ExceedsMaximum {
        tier: ScienceTier,
        total: u64,
        max: u32,
    },

    /// A lesson result was given a blank name.
    #[error("lesson name must not be empty")]
    EmptyLessonName,
}

/// Which of the two answer counts a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountField {
    Correct,
    Incorrect,
}

impl std::fmt::Display for CountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountField::Correct => write!(f, "correct"),
            CountField::Incorrect => write!(f, "incorrect"),
        }
    }
}

/// Errors from a single-period score calculation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// The requested period id is not in the catalog.
    #[error("exam period not found: {0}")]
    PeriodNotFound(String),

    /// The period's standard deviation for a tier cannot normalize a score.
    #[error("period {period_id} has unusable {tier} statistics (standard deviation {std_dev})")]
    InvalidStatistics {
        period_id: String,
        tier: ScienceTier,
        std_dev: f64,
    },
}

impl ScoringError {
    /// Returns `true` for failures that batch scoring skips instead of reporting.
    pub fn is_skippable(&self) -> bool {
        matches!(self, ScoringError::InvalidStatistics { .. })
    }
}

/// Failure to load the reference statistics dataset.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The dataset file could not be read.
    #[error("failed to read statistics dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset was read but is not a valid statistics document.
    #[error("malformed statistics dataset: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from an exam record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A record with this id is already stored.
    #[error("exam record already exists: {0}")]
    DuplicateId(Uuid),

    /// No record with this id is stored.
    #[error("exam record not found: {0}")]
    NotFound(Uuid),

    /// A writer panicked while holding the store lock.
    #[error("exam store lock poisoned")]
    Poisoned,
}
