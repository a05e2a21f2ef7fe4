//! Instance plans: the outcome for one instance slot.

use fleet_id::InstanceIndex;
use serde::{Deserialize, Serialize};

use crate::desired::DesiredInstance;
use crate::existing::ExistingInstance;

/// Which of the three outcomes a plan represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// An existing instance is kept and attached to a desired instance.
    Reused,

    /// A new instance is created.
    New,

    /// An existing instance is no longer wanted.
    Obsolete,
}

impl PlanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reused => "reused",
            Self::New => "new",
            Self::Obsolete => "obsolete",
        }
    }
}

impl std::fmt::Display for PlanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The plan for one instance slot.
///
/// `I` is the instance handle produced by the
/// [`InstanceRepository`](crate::InstanceRepository).
#[derive(Debug, Clone)]
pub enum InstancePlan<I> {
    Reused {
        desired: DesiredInstance,
        existing: ExistingInstance,
        index: InstanceIndex,
        instance: I,
    },
    New {
        desired: DesiredInstance,
        index: InstanceIndex,
        instance: I,
    },
    Obsolete {
        existing: ExistingInstance,
        instance: I,
    },
}

impl<I> InstancePlan<I> {
    pub fn kind(&self) -> PlanKind {
        match self {
            Self::Reused { .. } => PlanKind::Reused,
            Self::New { .. } => PlanKind::New,
            Self::Obsolete { .. } => PlanKind::Obsolete,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::New { .. })
    }

    pub fn is_obsolete(&self) -> bool {
        matches!(self, Self::Obsolete { .. })
    }

    pub fn is_reused(&self) -> bool {
        matches!(self, Self::Reused { .. })
    }

    /// The desired instance, absent for obsolete plans.
    pub fn desired_instance(&self) -> Option<&DesiredInstance> {
        match self {
            Self::Reused { desired, .. } | Self::New { desired, .. } => Some(desired),
            Self::Obsolete { .. } => None,
        }
    }

    /// The existing instance, absent for new plans.
    pub fn existing_instance(&self) -> Option<&ExistingInstance> {
        match self {
            Self::Reused { existing, .. } | Self::Obsolete { existing, .. } => Some(existing),
            Self::New { .. } => None,
        }
    }

    /// The index the instance holds after this plan is applied, or held
    /// before it is destroyed.
    pub fn index(&self) -> InstanceIndex {
        match self {
            Self::Reused { index, .. } | Self::New { index, .. } => *index,
            Self::Obsolete { existing, .. } => existing.index,
        }
    }

    pub fn instance(&self) -> &I {
        match self {
            Self::Reused { instance, .. }
            | Self::New { instance, .. }
            | Self::Obsolete { instance, .. } => instance,
        }
    }

    pub fn into_instance(self) -> I {
        match self {
            Self::Reused { instance, .. }
            | Self::New { instance, .. }
            | Self::Obsolete { instance, .. } => instance,
        }
    }
}
