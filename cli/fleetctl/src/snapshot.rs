//! Deployment snapshots.
//!
//! A snapshot describes what a deployment should look like and what is
//! currently running, in TOML:
//!
//! ```toml
//! deployment = "simple"
//!
//! [[zones]]
//! name = "z1"
//!
//! [[jobs]]
//! name = "web"
//! instances = 3
//! zones = ["z1"]
//! index_hints = [4]
//!
//! [[existing]]
//! job = "web"
//! index = 0
//! zone = "z1"
//! state = { process_state = "running" }
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use fleet_reconcile::{
    AvailabilityZone, DeploymentName, DesiredInstance, ExistingInstance, InstanceIndex,
    InstanceState, Job, JobName, JobRequest, StatesByInstance, ZoneName,
};
use serde::Deserialize;

use crate::error::CliError;

/// A parsed snapshot file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    pub deployment: DeploymentName,

    #[serde(default)]
    pub zones: Vec<AvailabilityZone>,

    #[serde(default)]
    pub jobs: Vec<JobEntry>,

    #[serde(default)]
    pub existing: Vec<ExistingEntry>,
}

/// A declared job.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobEntry {
    pub name: JobName,

    #[serde(default)]
    pub instances: usize,

    /// Zone names, resolved against the deployment's zones.
    #[serde(default)]
    pub zones: Vec<ZoneName>,

    /// Pinned indices. The first requests carry these hints in order; the
    /// rest are unhinted.
    #[serde(default)]
    pub index_hints: Vec<InstanceIndex>,
}

/// A running instance.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExistingEntry {
    pub job: JobName,
    pub index: InstanceIndex,

    #[serde(default)]
    pub zone: Option<ZoneName>,

    #[serde(default)]
    pub state: Option<InstanceState>,
}

/// Planner inputs built from a snapshot.
#[derive(Debug)]
pub struct PlanInputs {
    pub deployment: DeploymentName,
    pub requests: Vec<JobRequest>,
    pub existing: Vec<ExistingInstance>,
    pub states: StatesByInstance,
}

impl Snapshot {
    /// Parse a snapshot from TOML.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid snapshot TOML")
    }

    /// Read and parse a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot: {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to load snapshot: {}", path.display()))
    }

    /// Validate the snapshot and turn it into planner inputs.
    pub fn into_inputs(self) -> Result<PlanInputs, CliError> {
        let mut zone_names = HashSet::new();
        for zone in &self.zones {
            if !zone_names.insert(zone.name.as_str()) {
                return Err(CliError::snapshot(format!(
                    "zone '{}' is declared more than once",
                    zone.name
                )));
            }
        }

        let mut job_names = HashSet::new();
        let mut requests = Vec::with_capacity(self.jobs.len());
        for declared in self.jobs {
            if !job_names.insert(declared.name.clone()) {
                return Err(CliError::snapshot(format!(
                    "job '{}' is declared more than once",
                    declared.name
                )));
            }
            if declared.index_hints.len() > declared.instances {
                return Err(CliError::snapshot(format!(
                    "job '{}' has {} index hints but only {} instances",
                    declared.name,
                    declared.index_hints.len(),
                    declared.instances
                )));
            }

            let job = Job::with_zones_named(declared.name.clone(), &declared.zones, &self.zones)?;
            let unhinted = declared.instances - declared.index_hints.len();
            let mut request = JobRequest::with_count(job, unhinted, &self.deployment);
            request.desired.splice(
                0..0,
                declared.index_hints.iter().map(|index| {
                    DesiredInstance::new(declared.name.clone(), Some(*index), self.deployment.clone())
                }),
            );

            requests.push(request);
        }

        let mut seen = HashSet::new();
        let mut existing = Vec::with_capacity(self.existing.len());
        let mut states = StatesByInstance::new();
        for record in self.existing {
            if !seen.insert((record.job.clone(), record.index)) {
                return Err(CliError::snapshot(format!(
                    "instance {}/{} is listed more than once",
                    record.job, record.index
                )));
            }

            let instance = ExistingInstance {
                job: record.job,
                index: record.index,
                availability_zone: record.zone,
            };
            if let Some(state) = record.state {
                states.insert(instance.clone(), state);
            }
            existing.push(instance);
        }

        Ok(PlanInputs {
            deployment: self.deployment,
            requests,
            existing,
            states,
        })
    }
}
