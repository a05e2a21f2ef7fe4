//! # fleet-id
//!
//! Typed names and identifiers for the fleet planner.
//!
//! ## Design Principles
//!
//! - Names are user-controlled labels taken from the deployment manifest
//! - Each kind of name is its own type so a job name can never be passed
//!   where a zone name is expected
//! - Instance indices are plain ordinals, stable for the life of an instance
//! - Planning passes get a system-generated, time-ordered correlation ID
//!
//! ## Pass ID Format
//!
//! Pass IDs use a prefixed format: `{prefix}_{ulid}`, e.g.
//! `pass_01HV4Z2WQXKJNM8GPQY6VBKC3D`.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export ulid for consumers that need raw ULID operations
pub use ulid::Ulid;
