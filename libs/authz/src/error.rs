//! Error types for permission checks.

use thiserror::Error;

use crate::authorizer::{Right, SubjectKind};

/// Errors raised by permission checks.
///
/// None of these mean "denied"; they mean the question itself is invalid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The subject kind is not one the authorizer knows.
    #[error("unexpected subject: {0}")]
    UnexpectedSubject(String),

    /// The right is not one the authorizer knows.
    #[error("unknown right: {0}")]
    UnknownRight(String),

    /// The right exists but is not defined for this subject kind.
    #[error("unexpected permission for {subject}: {right}")]
    UnexpectedPermission { subject: SubjectKind, right: Right },
}
