//! Proptest strategies for planning scenarios.

use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use proptest::sample::subsequence;

use fleet_reconcile::{DesiredInstance, ExistingInstance, Job};

use crate::fixtures;

/// Zones a generated job may declare.
pub const JOB_ZONES: [&str; 3] = ["z1", "z2", "z3"];

/// Zones generated instances may be bound to. `old-az` is never declared.
pub const INSTANCE_ZONES: [&str; 4] = ["z1", "z2", "z3", "old-az"];

/// Job name used by generated scenarios.
pub const JOB: &str = "foo-job";

/// Inputs for one `plan_job_instances` call.
#[derive(Debug, Clone)]
pub struct JobScenario {
    pub job: Job,
    pub desired: Vec<DesiredInstance>,
    pub existing: Vec<ExistingInstance>,
}

/// A job declaring an ordered subset of [`JOB_ZONES`], possibly none.
pub fn arb_job() -> impl Strategy<Value = Job> {
    subsequence(JOB_ZONES.to_vec(), 0..=JOB_ZONES.len())
        .prop_map(|zones| fixtures::job(JOB, &zones))
}

/// A zone-agnostic job.
pub fn arb_zoneless_job() -> impl Strategy<Value = Job> {
    Just(fixtures::job(JOB, &[]))
}

/// Existing instances of [`JOB`] with unique indices, in shuffled order.
pub fn arb_existing(max: usize) -> impl Strategy<Value = Vec<ExistingInstance>> {
    btree_set(0u32..(max as u32 * 3).max(1), 0..=max)
        .prop_flat_map(|indices| {
            let count = indices.len();
            (
                Just(indices),
                vec(proptest::option::of(proptest::sample::select(INSTANCE_ZONES.to_vec())), count),
            )
        })
        .prop_map(|(indices, zones)| {
            indices
                .into_iter()
                .zip(zones)
                .map(|(index, zone)| fixtures::existing(JOB, index, zone))
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

/// `0..=max` unhinted desired instances of [`JOB`].
pub fn arb_desired(max: usize) -> impl Strategy<Value = Vec<DesiredInstance>> {
    (0..=max).prop_map(|count| fixtures::desired_many(JOB, count))
}

/// A full scenario for a job that may or may not declare zones.
pub fn arb_scenario() -> impl Strategy<Value = JobScenario> {
    (arb_job(), arb_desired(8), arb_existing(8)).prop_map(|(job, desired, existing)| JobScenario {
        job,
        desired,
        existing,
    })
}

/// A scenario for a zone-agnostic job.
pub fn arb_zoneless_scenario() -> impl Strategy<Value = JobScenario> {
    (arb_zoneless_job(), arb_desired(8), arb_existing(8)).prop_map(|(job, desired, existing)| {
        JobScenario {
            job,
            desired,
            existing,
        }
    })
}
