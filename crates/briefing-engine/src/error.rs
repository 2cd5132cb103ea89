//! Engine error types.

use thiserror::Error;

/// A shape constraint a topic failed to meet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// Text field longer than allowed
    #[error("{field} is {actual} chars, limit is {limit}")]
    TooLong {
        field: String,
        actual: usize,
        limit: usize,
    },

    /// List with the wrong number of entries
    #[error("{field} has {actual} entries, expected {min}..={max}")]
    Count {
        field: String,
        actual: usize,
        min: usize,
        max: usize,
    },

    /// Required text field is blank
    #[error("{field} is empty")]
    Empty { field: String },

    /// Timeline entry without a backing source
    #[error("timeline entry {index} has no source ids")]
    UnbackedTimelineEntry { index: usize },
}

/// Errors that can occur during an engine run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rule table pattern failed to compile
    #[error("Invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A topic failed output validation; the run must be aborted
    #[error("Topic {topic_id} failed validation: {violation}")]
    Validation {
        topic_id: String,
        violation: Violation,
    },
}
