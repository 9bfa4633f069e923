//! Error types for fsrs-core.

use crate::types::Grade;
use thiserror::Error;

/// Result type alias using FsrsError.
pub type Result<T> = std::result::Result<T, FsrsError>;

/// Errors that can occur while building parameters or scheduling a card.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FsrsError {
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("requested retention must be in (0, 1], got {0}")]
    InvalidRetention(f64),

    #[error("manual grade is not allowed when scheduling")]
    ManualGradeNotAllowed,

    #[error("grade {grade:?} is not valid for {context}")]
    InvalidGrade { grade: Grade, context: String },

    #[error("stability out of range: {0}")]
    InvalidStability(f64),

    #[error("difficulty out of range: {0}")]
    InvalidDifficulty(f64),

    #[error("retrievability out of range: {0}")]
    InvalidRetrievability(f64),

    #[error("invalid learning step: {0}")]
    InvalidStep(String),

    #[error("date out of range: {0}")]
    DateOutOfRange(String),

    #[error("invalid review history: {reason}")]
    InvalidReplay { reason: String },
}

impl FsrsError {
    pub(crate) fn parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    pub(crate) fn grade(grade: Grade, context: impl Into<String>) -> Self {
        Self::InvalidGrade {
            grade,
            context: context.into(),
        }
    }

    pub(crate) fn replay(reason: impl Into<String>) -> Self {
        Self::InvalidReplay {
            reason: reason.into(),
        }
    }
}
