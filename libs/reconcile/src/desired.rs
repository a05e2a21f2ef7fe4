//! Desired instance requests.
//!
//! A desired instance has two parts:
//!
//! - an identity key (job, optional index hint, deployment): exactly what
//!   the manifest asked for, and the only basis for equality;
//! - a resolution (zone, bound existing instance): what a planning pass
//!   decided for it. Resolving produces a new value with the same key.

use std::hash::{Hash, Hasher};

use fleet_id::{DeploymentName, InstanceIndex, JobName};
use serde::{Deserialize, Serialize};

use crate::existing::ExistingInstance;
use crate::job::AvailabilityZone;

/// Identity of a desired instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DesiredInstanceKey {
    pub job: JobName,

    /// Explicitly requested index, if the manifest pins one.
    #[serde(default)]
    pub index_hint: Option<InstanceIndex>,

    pub deployment: DeploymentName,
}

/// Planner-attached placement for a desired instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub availability_zone: Option<AvailabilityZone>,
    pub existing_instance: Option<ExistingInstance>,
}

/// A request for one instance of a job.
#[derive(Debug, Clone)]
pub struct DesiredInstance {
    key: DesiredInstanceKey,
    resolution: Resolution,
}

impl DesiredInstance {
    /// Create an unresolved request.
    pub fn new(job: JobName, index_hint: Option<InstanceIndex>, deployment: DeploymentName) -> Self {
        Self::from_key(DesiredInstanceKey {
            job,
            index_hint,
            deployment,
        })
    }

    /// Create an unresolved request from an identity key.
    pub fn from_key(key: DesiredInstanceKey) -> Self {
        Self {
            key,
            resolution: Resolution::default(),
        }
    }

    /// Returns a copy of this request carrying the given resolution.
    ///
    /// The identity is unchanged, so the result compares equal to `self`.
    #[must_use]
    pub fn resolved(&self, resolution: Resolution) -> Self {
        Self {
            key: self.key.clone(),
            resolution,
        }
    }

    pub fn key(&self) -> &DesiredInstanceKey {
        &self.key
    }

    pub fn job(&self) -> &JobName {
        &self.key.job
    }

    pub fn index_hint(&self) -> Option<InstanceIndex> {
        self.key.index_hint
    }

    pub fn deployment(&self) -> &DeploymentName {
        &self.key.deployment
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn availability_zone(&self) -> Option<&AvailabilityZone> {
        self.resolution.availability_zone.as_ref()
    }

    pub fn existing_instance(&self) -> Option<&ExistingInstance> {
        self.resolution.existing_instance.as_ref()
    }
}

impl PartialEq for DesiredInstance {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for DesiredInstance {}

impl Hash for DesiredInstance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}
