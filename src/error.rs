// Error types for the metronome engine

use thiserror::Error;

/// Failure reported by a UI or audio collaborator (click provider, highlighter, marker)
///
/// Collaborators only carry a message: the engine does not try to recover from
/// them, it aborts the in-flight beat sequence and hands the error to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result type returned by collaborator calls
pub type CollaboratorResult = Result<(), CollaboratorError>;

/// Engine errors
#[derive(Debug, Error)]
pub enum MetronomeError {
    #[error("Invalid duration: {0} is not one of 1, 2, 4, 8, 16, 32")]
    InvalidDuration(u32),

    #[error("Invalid duration code: {0} is outside 0..=5")]
    InvalidDurationCode(u8),

    #[error("Bar {bar} out of range (bar count is {bar_count})")]
    BarOutOfRange { bar: u32, bar_count: usize },

    #[error("Beat index {index} out of range (sequence length is {len})")]
    BeatOutOfRange { index: usize, len: usize },

    #[error("Cannot trim at bar {position}: valid positions are 1..={max}")]
    TrimOutOfRange { position: u32, max: u32 },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Collaborator failed: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config format error: {0}")]
    ConfigFormat(String),
}

impl MetronomeError {
    /// True for the out-of-range family (bar number, beat index, trim position)
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            MetronomeError::BarOutOfRange { .. }
                | MetronomeError::BeatOutOfRange { .. }
                | MetronomeError::TrimOutOfRange { .. }
        )
    }
}

pub type MetronomeResult<T> = Result<T, MetronomeError>;
