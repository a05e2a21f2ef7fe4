//! Repository that resolves every decision without provisioning anything.

use std::convert::Infallible;

use fleet_reconcile::{
    DesiredInstance, ExistingInstance, InstanceIndex, InstanceRepository, InstanceState,
    PlanContext,
};
use tracing::debug;

/// Handle for an instance a dry run would touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunInstance {
    /// `<job>/<index>`
    pub name: String,
}

impl DryRunInstance {
    fn new(job: &str, index: InstanceIndex) -> Self {
        Self {
            name: format!("{job}/{index}"),
        }
    }
}

/// Names instances instead of creating or fetching them. Never fails.
#[derive(Debug, Default)]
pub struct DryRunRepository;

impl InstanceRepository for DryRunRepository {
    type Instance = DryRunInstance;
    type Error = Infallible;

    fn fetch_existing(
        &self,
        desired: &DesiredInstance,
        _state: &InstanceState,
        index: InstanceIndex,
        context: &PlanContext,
    ) -> Result<DryRunInstance, Infallible> {
        debug!(pass_id = %context.pass_id, job = %desired.job(), %index, "Would keep instance");
        Ok(DryRunInstance::new(desired.job().as_str(), index))
    }

    fn create(
        &self,
        desired: &DesiredInstance,
        index: InstanceIndex,
        context: &PlanContext,
    ) -> Result<DryRunInstance, Infallible> {
        debug!(pass_id = %context.pass_id, job = %desired.job(), %index, "Would create instance");
        Ok(DryRunInstance::new(desired.job().as_str(), index))
    }

    fn fetch_obsolete(
        &self,
        existing: &ExistingInstance,
        context: &PlanContext,
    ) -> Result<DryRunInstance, Infallible> {
        debug!(
            pass_id = %context.pass_id,
            job = %existing.job,
            index = %existing.index,
            "Would delete instance"
        );
        Ok(DryRunInstance::new(existing.job.as_str(), existing.index))
    }
}
