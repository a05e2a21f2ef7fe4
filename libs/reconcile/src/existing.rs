//! Persisted instance records as seen by the planner.

use std::collections::HashMap;

use fleet_id::{InstanceIndex, JobName, ZoneName};
use serde::{Deserialize, Serialize};

/// A persisted record of a currently running instance.
///
/// Owned by the persistence layer; the planner only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExistingInstance {
    pub job: JobName,
    pub index: InstanceIndex,

    /// Zone the instance was placed in, if any.
    #[serde(default)]
    pub availability_zone: Option<ZoneName>,
}

impl ExistingInstance {
    /// Create a record with no zone binding.
    pub fn new(job: JobName, index: InstanceIndex) -> Self {
        Self {
            job,
            index,
            availability_zone: None,
        }
    }

    /// Create a record bound to a zone.
    pub fn in_zone(job: JobName, index: InstanceIndex, zone: ZoneName) -> Self {
        Self {
            job,
            index,
            availability_zone: Some(zone),
        }
    }
}

/// Last state an instance reported. Opaque to the planner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceState(serde_json::Map<String, serde_json::Value>);

impl InstanceState {
    /// The empty (unknown) state.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for InstanceState {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

/// Last known state per existing instance. Entries may be missing.
pub type StatesByInstance = HashMap<ExistingInstance, InstanceState>;
