//! Deployment-wide planning pass.
//!
//! Plans every declared job in order, then removes instances of jobs that
//! are no longer declared. The first error aborts the whole pass.

use std::collections::{HashMap, HashSet};

use fleet_id::{DeploymentName, JobName};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::desired::DesiredInstance;
use crate::digest::PlanDigest;
use crate::error::ConfigError;
use crate::existing::{ExistingInstance, StatesByInstance};
use crate::job::Job;
use crate::plan::{InstancePlan, PlanKind};
use crate::planner::{InstancePlanner, PlanResult};
use crate::repository::InstanceRepository;

/// A declared job together with its desired instances.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub job: Job,
    pub desired: Vec<DesiredInstance>,
}

impl JobRequest {
    /// Request `count` unhinted instances of a job.
    pub fn with_count(job: Job, count: usize, deployment: &DeploymentName) -> Self {
        let desired = desired_instances_for(&job.name, count, deployment);
        Self { job, desired }
    }
}

/// Build `count` desired instances of a job with no index hints.
pub fn desired_instances_for(
    job: &JobName,
    count: usize,
    deployment: &DeploymentName,
) -> Vec<DesiredInstance> {
    (0..count)
        .map(|_| DesiredInstance::new(job.clone(), None, deployment.clone()))
        .collect()
}

/// Plans for one declared job.
#[derive(Debug, Clone)]
pub struct JobPlan<I> {
    pub job: JobName,
    pub plans: Vec<InstancePlan<I>>,
}

/// Counts of each outcome in a pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub reused: usize,
    pub created: usize,
    pub obsoleted: usize,
}

impl PlanSummary {
    fn record(&mut self, kind: PlanKind) {
        match kind {
            PlanKind::Reused => self.reused += 1,
            PlanKind::New => self.created += 1,
            PlanKind::Obsolete => self.obsoleted += 1,
        }
    }

    /// Returns true if the pass neither creates nor removes anything.
    pub fn is_converged(&self) -> bool {
        self.created == 0 && self.obsoleted == 0
    }
}

/// The full result of a deployment pass.
#[derive(Debug, Clone)]
pub struct DeploymentPlan<I> {
    /// Per-job plans, in declared job order.
    pub jobs: Vec<JobPlan<I>>,

    /// Removal plans for instances of jobs that are no longer declared.
    pub obsolete_jobs: Vec<InstancePlan<I>>,
}

impl<I> DeploymentPlan<I> {
    /// All plans: declared jobs first, then removed jobs.
    pub fn iter(&self) -> impl Iterator<Item = &InstancePlan<I>> {
        self.jobs
            .iter()
            .flat_map(|job| job.plans.iter())
            .chain(self.obsolete_jobs.iter())
    }

    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for plan in self.iter() {
            summary.record(plan.kind());
        }
        summary
    }

    /// Digest over the decisions of this pass.
    pub fn digest(&self) -> PlanDigest {
        PlanDigest::of_plans(self.iter())
    }

    pub fn into_plans(self) -> Vec<InstancePlan<I>> {
        self.jobs
            .into_iter()
            .flat_map(|job| job.plans)
            .chain(self.obsolete_jobs)
            .collect()
    }
}

impl<R: InstanceRepository> InstancePlanner<R> {
    /// Plan a whole deployment.
    ///
    /// `existing` may contain instances of any job; they are grouped by job
    /// name, keeping input order within each job. Each job may be requested
    /// once.
    #[instrument(skip_all, fields(pass_id = %self.context().pass_id, jobs = requests.len()))]
    pub fn plan_deployment(
        &self,
        requests: &[JobRequest],
        existing: &[ExistingInstance],
        states: &StatesByInstance,
    ) -> PlanResult<DeploymentPlan<R::Instance>, R::Error> {
        let mut declared_names = HashSet::new();
        for request in requests {
            if !declared_names.insert(request.job.name.as_str()) {
                return Err(ConfigError::DuplicateJob {
                    job: request.job.name.clone(),
                }
                .into());
            }
        }

        let mut existing_by_job: HashMap<&str, Vec<ExistingInstance>> = HashMap::new();
        for instance in existing {
            existing_by_job
                .entry(instance.job.as_str())
                .or_default()
                .push(instance.clone());
        }

        let mut jobs = Vec::with_capacity(requests.len());
        for request in requests {
            let job_existing = existing_by_job
                .get(request.job.name.as_str())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let plans =
                self.plan_job_instances(&request.job, &request.desired, job_existing, states)?;
            jobs.push(JobPlan {
                job: request.job.name.clone(),
                plans,
            });
        }

        let declared: Vec<Job> = requests.iter().map(|request| request.job.clone()).collect();
        let obsolete_jobs = self.plan_obsolete_jobs(&declared, existing)?;

        let plan = DeploymentPlan {
            jobs,
            obsolete_jobs,
        };
        let summary = plan.summary();
        debug!(
            reused = summary.reused,
            created = summary.created,
            obsoleted = summary.obsoleted,
            "Deployment plan complete"
        );

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_instances_for() {
        let job = JobName::parse("web").unwrap();
        let deployment = DeploymentName::parse("simple").unwrap();

        let desired = desired_instances_for(&job, 3, &deployment);

        assert_eq!(desired.len(), 3);
        assert!(desired.iter().all(|d| d.job() == &job && d.index_hint().is_none()));
    }

    #[test]
    fn test_summary_converged() {
        let summary = PlanSummary {
            reused: 4,
            created: 0,
            obsoleted: 0,
        };
        assert!(summary.is_converged());

        let summary = PlanSummary {
            created: 1,
            ..summary
        };
        assert!(!summary.is_converged());
    }
}
