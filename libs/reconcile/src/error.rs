//! Planning errors.

use fleet_id::{InstanceIndex, JobName, ZoneName};
use thiserror::Error;

/// Fatal configuration errors. A pass that hits one of these returns no
/// plans and makes no repository calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Two desired instances of the same job request the same index.
    #[error("job '{job}': index {index} is requested by more than one desired instance")]
    DuplicateIndexHint { job: JobName, index: InstanceIndex },

    /// A newly created instance requests an index held by a reused instance.
    #[error("job '{job}': requested index {index} is already held by a reused instance")]
    IndexHintConflict { job: JobName, index: InstanceIndex },

    /// A hinted desired instance would have to reuse an instance at another index.
    #[error(
        "job '{job}': index hint {index} cannot be honored, it would reuse the instance at index {existing}"
    )]
    IndexHintNotReusable {
        job: JobName,
        index: InstanceIndex,
        existing: InstanceIndex,
    },

    /// Two job requests in one pass name the same job.
    #[error("job '{job}' is requested more than once")]
    DuplicateJob { job: JobName },

    /// A job names an availability zone the deployment does not declare.
    #[error("job '{job}' references unknown availability zone '{zone}'")]
    UnknownZone { job: JobName, zone: ZoneName },
}

/// Errors returned by a planning pass.
///
/// Repository failures are passed through unchanged: `Display` and
/// `source()` are those of the repository error itself.
#[derive(Debug, Error)]
pub enum PlanError<E> {
    /// The desired state is inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The instance repository failed to resolve an instance.
    #[error(transparent)]
    Repository(E),
}

impl<E> PlanError<E> {
    /// Returns true if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns the repository error, if that is what failed.
    pub fn into_repository_error(self) -> Option<E> {
        match self {
            Self::Repository(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("vm service unavailable")]
    struct Unavailable;

    #[test]
    fn test_repository_error_is_transparent() {
        let err: PlanError<Unavailable> = PlanError::Repository(Unavailable);
        assert_eq!(err.to_string(), "vm service unavailable");
        assert!(!err.is_config());
        assert!(err.into_repository_error().is_some());
    }

    #[test]
    fn test_config_error_message() {
        let err: PlanError<Unavailable> = ConfigError::DuplicateIndexHint {
            job: JobName::parse("web").unwrap(),
            index: InstanceIndex::new(2),
        }
        .into();
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "job 'web': index 2 is requested by more than one desired instance"
        );
    }
}
