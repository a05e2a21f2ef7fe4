//! Terse constructors for test data.
//!
//! All constructors panic on invalid names; they are meant for tests only.

use fleet_id::{DeploymentName, InstanceIndex, JobName, ZoneName};
use fleet_reconcile::{AvailabilityZone, DesiredInstance, ExistingInstance, InstanceState, Job};

/// Deployment name used by all fixtures.
pub const DEPLOYMENT: &str = "simple";

pub fn deployment() -> DeploymentName {
    DeploymentName::parse(DEPLOYMENT).expect("fixture deployment name")
}

pub fn job_name(name: &str) -> JobName {
    JobName::parse(name).expect("fixture job name")
}

pub fn zone_name(name: &str) -> ZoneName {
    ZoneName::parse(name).expect("fixture zone name")
}

pub fn zone(name: &str) -> AvailabilityZone {
    AvailabilityZone::new(zone_name(name))
}

/// A job restricted to `zones`; an empty slice makes it zone-agnostic.
pub fn job(name: &str, zones: &[&str]) -> Job {
    Job::with_zones(job_name(name), zones.iter().map(|z| zone(z)).collect())
}

pub fn desired(job: &str, index_hint: Option<u32>) -> DesiredInstance {
    DesiredInstance::new(job_name(job), index_hint.map(InstanceIndex::new), deployment())
}

/// `count` unhinted desired instances of `job`.
pub fn desired_many(job: &str, count: usize) -> Vec<DesiredInstance> {
    (0..count).map(|_| desired(job, None)).collect()
}

pub fn existing(job: &str, index: u32, zone: Option<&str>) -> ExistingInstance {
    ExistingInstance {
        job: job_name(job),
        index: InstanceIndex::new(index),
        availability_zone: zone.map(zone_name),
    }
}

/// A state built from a JSON object literal.
pub fn state(json: serde_json::Value) -> InstanceState {
    match json {
        serde_json::Value::Object(map) => InstanceState::from(map),
        other => panic!("fixture state must be a JSON object, got {other}"),
    }
}
