//! # fleet-testing
//!
//! Test support for the fleet planner:
//!
//! - [`MemoryRepository`]: an in-memory [`InstanceRepository`] that records
//!   every call and can be told to fail
//! - [`fixtures`]: terse constructors for jobs, zones, and instances
//! - [`strategies`]: proptest strategies for planning scenarios

pub mod fixtures;
mod repository;
pub mod strategies;

pub use repository::{Call, FakeInstance, InjectedFailure, MemoryRepository};

#[doc(no_inline)]
pub use fleet_reconcile::InstanceRepository;
