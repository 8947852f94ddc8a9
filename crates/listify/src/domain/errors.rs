//! Domain-specific errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid line range '{0}' (expected START-END, e.g. 3-7)")]
    MalformedLineRange(String),
    #[error("line range {start}-{end} is empty; lines are numbered from 1 and START must not exceed END")]
    EmptyLineRange { start: usize, end: usize },
}
