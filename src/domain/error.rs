//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    #[error("no member ID left to assign")]
    IdSpaceExhausted,
}
