//! Instance repository interface.
//!
//! The repository turns planning decisions into instance handles:
//! - Attaching to an instance that keeps running
//! - Materializing a brand-new instance
//! - Resolving an instance that is about to be removed
//!
//! The planner never provisions or persists anything itself.

use fleet_id::{InstanceIndex, PassId};

use crate::desired::DesiredInstance;
use crate::existing::{ExistingInstance, InstanceState};

/// Correlation context passed along with every repository call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanContext {
    pub pass_id: PassId,
}

impl PlanContext {
    /// Create a context for a fresh planning pass.
    pub fn new() -> Self {
        Self {
            pass_id: PassId::new(),
        }
    }
}

impl Default for PlanContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves planning outcomes into instance handles.
pub trait InstanceRepository {
    /// Handle for a resolved instance.
    type Instance;

    /// Failure raised by the repository. Passed to the caller unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Attach to an instance that is already running.
    ///
    /// Must be idempotent for the same (desired instance, index).
    fn fetch_existing(
        &self,
        desired: &DesiredInstance,
        state: &InstanceState,
        index: InstanceIndex,
        context: &PlanContext,
    ) -> Result<Self::Instance, Self::Error>;

    /// Materialize a brand-new instance at the given index.
    fn create(
        &self,
        desired: &DesiredInstance,
        index: InstanceIndex,
        context: &PlanContext,
    ) -> Result<Self::Instance, Self::Error>;

    /// Resolve an instance that is marked for removal.
    fn fetch_obsolete(
        &self,
        existing: &ExistingInstance,
        context: &PlanContext,
    ) -> Result<Self::Instance, Self::Error>;
}

impl<R> InstanceRepository for &R
where
    R: InstanceRepository + ?Sized,
{
    type Instance = R::Instance;
    type Error = R::Error;

    fn fetch_existing(
        &self,
        desired: &DesiredInstance,
        state: &InstanceState,
        index: InstanceIndex,
        context: &PlanContext,
    ) -> Result<Self::Instance, Self::Error> {
        (**self).fetch_existing(desired, state, index, context)
    }

    fn create(
        &self,
        desired: &DesiredInstance,
        index: InstanceIndex,
        context: &PlanContext,
    ) -> Result<Self::Instance, Self::Error> {
        (**self).create(desired, index, context)
    }

    fn fetch_obsolete(
        &self,
        existing: &ExistingInstance,
        context: &PlanContext,
    ) -> Result<Self::Instance, Self::Error> {
        (**self).fetch_obsolete(existing, context)
    }
}
