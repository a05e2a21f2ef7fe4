//! Instance planning for a deployment.
//!
//! Given what a deployment should look like and what is actually running,
//! the planner decides for every instance slot whether to reuse an existing
//! instance, create a new one, or mark an existing one obsolete. Key concepts:
//!
//! - **Desired instance**: one requested unit of a job, before matching.
//! - **Existing instance**: a persisted record of a running unit.
//! - **Instance plan**: the outcome for one slot (reused, new, or obsolete).
//!
//! # Invariants
//!
//! - Decisions are deterministic given the same inputs
//! - Existing instances are reused whenever their zone is still acceptable
//! - Indices are preserved on reuse and recycled after destruction
//! - The planner never persists anything; side effects go through an
//!   injected [`InstanceRepository`]

mod deployment;
mod desired;
mod digest;
mod error;
mod existing;
mod index;
mod job;
mod placement;
mod plan;
mod planner;
mod repository;

pub use deployment::{desired_instances_for, DeploymentPlan, JobPlan, JobRequest, PlanSummary};
pub use desired::{DesiredInstance, DesiredInstanceKey, Resolution};
pub use digest::PlanDigest;
pub use error::{ConfigError, PlanError};
pub use existing::{ExistingInstance, InstanceState, StatesByInstance};
pub use index::IndexAllocator;
pub use job::{AvailabilityZone, Job};
pub use placement::{assign_zones, classify, is_compatible};
pub use plan::{InstancePlan, PlanKind};
pub use planner::InstancePlanner;
pub use repository::{InstanceRepository, PlanContext};

pub use fleet_id::{DeploymentName, InstanceIndex, JobName, PassId, ZoneName};
