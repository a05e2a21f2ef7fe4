//! # fleet-authz
//!
//! Scope-based permission checks.
//!
//! A caller presents a set of scope strings (from an already-decoded
//! token). Whether those scopes grant a right on a subject is decided by an
//! explicit table of {subject kind, right} -> accepted scope patterns:
//!
//! - `bosh.admin` / `bosh.read`: global rights
//! - `bosh.<director-uuid>.admin` / `.read`: rights on this director only
//! - `bosh.teams.<team>.admin` / `.read`: team rights
//!
//! Asking about a {subject, right} pair that is not in the table is a
//! configuration error, not a denial.

mod authorizer;
mod error;
mod scope;

pub use authorizer::{PermissionAuthorizer, Right, Subject, SubjectKind};
pub use error::AuthzError;
pub use scope::{admin_teams_from_scopes, team_admin_scopes, Level, Scope};
