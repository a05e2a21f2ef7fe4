//! Jobs and availability zones.

use fleet_id::{JobName, ZoneName};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An availability zone an instance can be placed in.
///
/// Cloud properties are opaque to the planner; they are carried so the
/// repository can hand them to whatever provisions the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityZone {
    pub name: ZoneName,

    #[serde(default)]
    pub cloud_properties: serde_json::Map<String, serde_json::Value>,
}

impl AvailabilityZone {
    /// Create a zone with no cloud properties.
    pub fn new(name: ZoneName) -> Self {
        Self {
            name,
            cloud_properties: serde_json::Map::new(),
        }
    }
}

/// A job: a named group of identical instances and the zones they may occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub name: JobName,

    /// Eligible zones in declared order. Empty means zone-agnostic.
    pub availability_zones: Vec<AvailabilityZone>,
}

impl Job {
    /// Create a zone-agnostic job.
    pub fn new(name: JobName) -> Self {
        Self {
            name,
            availability_zones: Vec::new(),
        }
    }

    /// Create a job restricted to the given zones.
    pub fn with_zones(name: JobName, availability_zones: Vec<AvailabilityZone>) -> Self {
        Self {
            name,
            availability_zones,
        }
    }

    /// Build a job from zone names, resolving each against the zones the
    /// deployment declares.
    pub fn with_zones_named<'a, I>(
        name: JobName,
        zone_names: I,
        declared: &[AvailabilityZone],
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a ZoneName>,
    {
        let availability_zones = zone_names
            .into_iter()
            .map(|zone| {
                declared
                    .iter()
                    .find(|az| &az.name == zone)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownZone {
                        job: name.clone(),
                        zone: zone.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name,
            availability_zones,
        })
    }

    /// Returns true if the job accepts instances in any zone.
    pub fn is_zone_agnostic(&self) -> bool {
        self.availability_zones.is_empty()
    }

    /// Look up one of the job's zones by name.
    pub fn zone(&self, name: &ZoneName) -> Option<&AvailabilityZone> {
        self.availability_zones.iter().find(|az| &az.name == name)
    }
}
