use roboarena_shared::{MAX_ROBOTS, MIN_ROBOTS};
use thiserror::Error;

/// Caller mistakes. Malformed commands are sanitized instead of reported.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("match has already ended; call reset() first")]
    MatchEnded,
    #[error("expected {expected} commands (one per robot), got {got}")]
    CommandCount { expected: usize, got: usize },
    #[error("robot count {0} outside {min}..={max}", min = MIN_ROBOTS, max = MAX_ROBOTS)]
    InvalidRoster(usize),
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
