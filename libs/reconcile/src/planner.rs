//! Instance planner.
//!
//! For one job, the planner:
//! - Marks instances outside the job's zones obsolete
//! - Reuses compatible instances for desired instances: a hinted request
//!   takes the instance at its hinted index, the rest take the lowest
//!   remaining indices
//! - Creates the remaining desired instances at the lowest free indices
//! - Marks compatible instances beyond the desired count obsolete
//!
//! Plans come back ordered reused, new, obsolete.

use std::collections::{BTreeSet, HashSet};

use fleet_id::InstanceIndex;
use tracing::{debug, instrument, trace};

use crate::desired::{DesiredInstance, Resolution};
use crate::error::{ConfigError, PlanError};
use crate::existing::{ExistingInstance, InstanceState, StatesByInstance};
use crate::index::IndexAllocator;
use crate::job::Job;
use crate::placement;
use crate::plan::InstancePlan;
use crate::repository::{InstanceRepository, PlanContext};

/// Result type for planning passes.
pub type PlanResult<T, E> = Result<T, PlanError<E>>;

/// Plans instances for jobs against an injected repository.
pub struct InstancePlanner<R> {
    repository: R,
    context: PlanContext,
}

impl<R: InstanceRepository> InstancePlanner<R> {
    /// Create a planner for a fresh planning pass.
    pub fn new(repository: R) -> Self {
        Self::with_context(repository, PlanContext::new())
    }

    /// Create a planner that reports under an existing context.
    pub fn with_context(repository: R, context: PlanContext) -> Self {
        Self {
            repository,
            context,
        }
    }

    pub fn context(&self) -> &PlanContext {
        &self.context
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Plan all instances of one job.
    ///
    /// `existing` holds the persisted instances currently belonging to the
    /// job. An instance without an entry in `states` is treated as having
    /// an empty state.
    #[instrument(
        skip_all,
        fields(pass_id = %self.context.pass_id, job = %job.name)
    )]
    pub fn plan_job_instances(
        &self,
        job: &Job,
        desired: &[DesiredInstance],
        existing: &[ExistingInstance],
        states: &StatesByInstance,
    ) -> PlanResult<Vec<InstancePlan<R::Instance>>, R::Error> {
        let (pool, incompatible) = placement::classify(job, existing);

        // Everything that can fail on configuration is settled before the
        // first repository call.
        check_duplicate_hints(job, desired)?;
        let pairing = pair_with_pool(job, desired, &pool)?;
        let new_indices = allocate_new_indices(job, &pairing)?;
        let new_zones = placement::assign_zones(job, pairing.unmatched.len());
        let Pairing {
            reused: reuse,
            unmatched,
            overflow: pool_overflow,
        } = pairing;

        debug!(
            desired = desired.len(),
            existing = existing.len(),
            reused = reuse.len(),
            new = unmatched.len(),
            obsolete = pool_overflow.len() + incompatible.len(),
            "Planning job instances"
        );

        let mut plans = Vec::with_capacity(desired.len() + pool_overflow.len() + incompatible.len());
        let empty_state = InstanceState::empty();

        for &(request, instance) in &reuse {
            let zone = instance
                .availability_zone
                .as_ref()
                .and_then(|name| job.zone(name))
                .cloned();
            let resolved = request.resolved(Resolution {
                availability_zone: zone,
                existing_instance: Some(instance.clone()),
            });
            let state = states.get(instance).unwrap_or(&empty_state);

            trace!(index = %instance.index, "Reusing existing instance");
            let handle = self
                .repository
                .fetch_existing(&resolved, state, instance.index, &self.context)
                .map_err(PlanError::Repository)?;

            plans.push(InstancePlan::Reused {
                desired: resolved,
                existing: instance.clone(),
                index: instance.index,
                instance: handle,
            });
        }

        for ((&request, index), zone) in unmatched.iter().zip(new_indices).zip(new_zones) {
            let resolved = request.resolved(Resolution {
                availability_zone: zone,
                existing_instance: None,
            });

            trace!(
                %index,
                zone = resolved.availability_zone().map(|az| az.name.as_str()),
                "Creating new instance"
            );
            let handle = self
                .repository
                .create(&resolved, index, &self.context)
                .map_err(PlanError::Repository)?;

            plans.push(InstancePlan::New {
                desired: resolved,
                index,
                instance: handle,
            });
        }

        for &instance in pool_overflow.iter().chain(&incompatible) {
            plans.push(self.obsolete(instance)?);
        }

        Ok(plans)
    }

    /// Plan removal of instances whose job is no longer in the deployment.
    ///
    /// Instances of jobs in `jobs` are left to [`Self::plan_job_instances`].
    #[instrument(skip_all, fields(pass_id = %self.context.pass_id))]
    pub fn plan_obsolete_jobs(
        &self,
        jobs: &[Job],
        existing: &[ExistingInstance],
    ) -> PlanResult<Vec<InstancePlan<R::Instance>>, R::Error> {
        let desired_jobs: HashSet<&str> = jobs.iter().map(|job| job.name.as_str()).collect();

        let plans = existing
            .iter()
            .filter(|instance| !desired_jobs.contains(instance.job.as_str()))
            .map(|instance| self.obsolete(instance))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(obsolete = plans.len(), "Planned obsolete jobs");
        Ok(plans)
    }

    fn obsolete(&self, instance: &ExistingInstance) -> PlanResult<InstancePlan<R::Instance>, R::Error> {
        trace!(job = %instance.job, index = %instance.index, "Marking instance obsolete");
        let handle = self
            .repository
            .fetch_obsolete(instance, &self.context)
            .map_err(PlanError::Repository)?;

        Ok(InstancePlan::Obsolete {
            existing: instance.clone(),
            instance: handle,
        })
    }
}

/// How the desired instances of a job line up with its reuse pool.
struct Pairing<'a> {
    /// Reused (request, instance) pairs, in pool order.
    reused: Vec<(&'a DesiredInstance, &'a ExistingInstance)>,

    /// Requests left for creation, in input order.
    unmatched: Vec<&'a DesiredInstance>,

    /// Pool instances nobody asked for, in pool order.
    overflow: Vec<&'a ExistingInstance>,
}

fn check_duplicate_hints(job: &Job, desired: &[DesiredInstance]) -> Result<(), ConfigError> {
    let mut hints = BTreeSet::new();
    for index in desired.iter().filter_map(DesiredInstance::index_hint) {
        if !hints.insert(index) {
            return Err(ConfigError::DuplicateIndexHint {
                job: job.name.clone(),
                index,
            });
        }
    }
    Ok(())
}

/// Pair desired instances with pool instances.
///
/// `min(desired, pool)` instances are reused. Hinted requests first claim
/// the pool instance at their hinted index; unhinted requests then take the
/// lowest remaining instances in input order. A hinted request that would
/// have to take an instance at another index is rejected.
fn pair_with_pool<'a>(
    job: &Job,
    desired: &'a [DesiredInstance],
    pool: &[&'a ExistingInstance],
) -> Result<Pairing<'a>, ConfigError> {
    let capacity = desired.len().min(pool.len());
    let mut claimed_by: Vec<Option<usize>> = vec![None; pool.len()];
    let mut paired = vec![false; desired.len()];

    for (pos, hint) in hinted(desired) {
        let slot = (0..pool.len()).find(|&slot| claimed_by[slot].is_none() && pool[slot].index == hint);
        if let Some(slot) = slot {
            claimed_by[slot] = Some(pos);
            paired[pos] = true;
        }
    }

    let mut free_slots: Vec<usize> = (0..pool.len())
        .filter(|&slot| claimed_by[slot].is_none())
        .rev()
        .collect();
    let mut remaining = capacity - paired.iter().filter(|&&p| p).count();

    for (pos, request) in desired.iter().enumerate() {
        if remaining == 0 {
            break;
        }
        if request.index_hint().is_some() {
            continue;
        }
        if let Some(slot) = free_slots.pop() {
            claimed_by[slot] = Some(pos);
            paired[pos] = true;
            remaining -= 1;
        }
    }

    if remaining > 0 {
        let unpaired_hint = hinted(desired).find(|&(pos, _)| !paired[pos]);
        if let (Some((_, index)), Some(&slot)) = (unpaired_hint, free_slots.last()) {
            return Err(ConfigError::IndexHintNotReusable {
                job: job.name.clone(),
                index,
                existing: pool[slot].index,
            });
        }
    }

    let mut reused = Vec::with_capacity(capacity);
    let mut overflow = Vec::new();
    for (slot, claim) in claimed_by.iter().enumerate() {
        match claim {
            Some(pos) => reused.push((&desired[*pos], pool[slot])),
            None => overflow.push(pool[slot]),
        }
    }

    let unmatched = desired
        .iter()
        .zip(&paired)
        .filter(|(_, &is_paired)| !is_paired)
        .map(|(request, _)| request)
        .collect();

    Ok(Pairing {
        reused,
        unmatched,
        overflow,
    })
}

/// Positions and hints of the hinted requests, in input order.
fn hinted(desired: &[DesiredInstance]) -> impl Iterator<Item = (usize, InstanceIndex)> + '_ {
    desired
        .iter()
        .enumerate()
        .filter_map(|(pos, request)| request.index_hint().map(|hint| (pos, hint)))
}

/// Pick an index for every unmatched desired instance, in input order.
///
/// Hints are honored verbatim; unhinted requests get the lowest indices
/// held neither by a reused instance nor by a hint.
fn allocate_new_indices(job: &Job, pairing: &Pairing<'_>) -> Result<Vec<InstanceIndex>, ConfigError> {
    let mut allocator = IndexAllocator::new(pairing.reused.iter().map(|(_, instance)| instance.index));
    for index in pairing.unmatched.iter().filter_map(|request| request.index_hint()) {
        if !allocator.reserve(index) {
            return Err(ConfigError::IndexHintConflict {
                job: job.name.clone(),
                index,
            });
        }
    }

    Ok(pairing
        .unmatched
        .iter()
        .map(|request| match request.index_hint() {
            Some(index) => index,
            None => allocator.next_free(),
        })
        .collect())
}
