//! Typed name and ID definitions.
//!
//! Names come from the deployment manifest and are validated on parse.
//! Pass IDs are ULID-based for sortability and uniqueness.

use crate::{define_id, define_name};

// =============================================================================
// Deployment Model
// =============================================================================

define_name!(DeploymentName, "deployment name");
define_name!(JobName, "job name");
define_name!(ZoneName, "availability zone name");

// =============================================================================
// Authorization
// =============================================================================

// Team names are embedded in `bosh.teams.<team>.<right>` scopes.
define_name!(TeamName, "team name", forbid ['.']);

// =============================================================================
// Planning Passes
// =============================================================================

define_id!(PassId, "pass");

// =============================================================================
// Instance Index
// =============================================================================

/// Stable ordinal identity of an instance within its job.
///
/// Indices are preserved when an instance is reused and become free again
/// once the instance is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceIndex(u32);

impl InstanceIndex {
    /// The lowest possible index.
    pub const ZERO: Self = Self(0);

    /// Creates a new InstanceIndex from a u32.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying u32 value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Returns the next index.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for InstanceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for InstanceIndex {
    type Err = crate::IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .map(Self)
            .map_err(|_| crate::IdError::InvalidIndex(s.to_string()))
    }
}

impl From<u32> for InstanceIndex {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl From<InstanceIndex> for u32 {
    fn from(index: InstanceIndex) -> Self {
        index.0
    }
}

impl serde::Serialize for InstanceIndex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for InstanceIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let index = u32::deserialize(deserializer)?;
        Ok(Self(index))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pass_id_roundtrip() {
        let id = PassId::new();
        let s = id.to_string();
        let parsed: PassId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_pass_id_prefix() {
        let id = PassId::new();
        assert!(id.to_string().starts_with("pass_"));
    }

    #[test]
    fn test_pass_id_invalid_prefix() {
        let result: Result<PassId, _> = "job_01HV4Z2WQXKJNM8GPQY6VBKC3D".parse();
        assert!(matches!(
            result.unwrap_err(),
            crate::IdError::InvalidPrefix { .. }
        ));
    }

    #[test]
    fn test_pass_id_missing_separator() {
        let result: Result<PassId, _> = "pass01HV4Z2WQXKJNM8GPQY6VBKC3D".parse();
        assert!(matches!(
            result.unwrap_err(),
            crate::IdError::MissingSeparator
        ));
    }

    #[test]
    fn test_pass_id_invalid_ulid() {
        let result: Result<PassId, _> = "pass_invalid".parse();
        assert!(matches!(result.unwrap_err(), crate::IdError::InvalidUlid(_)));
    }

    #[test]
    fn test_pass_id_sortable() {
        let id1 = PassId::new();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = PassId::new();
        assert!(id1 < id2);
    }

    #[test]
    fn test_job_name_valid() {
        let name = JobName::parse("foo-job").unwrap();
        assert_eq!(name.as_str(), "foo-job");
        assert_eq!(name, "foo-job");
    }

    #[test]
    fn test_job_name_empty() {
        let err = JobName::parse("").unwrap_err();
        assert!(err.is_empty());
        assert_eq!(err.to_string(), "job name cannot be empty");
    }

    #[test]
    fn test_zone_name_rejects_whitespace() {
        let err = ZoneName::parse("zone 1").unwrap_err();
        assert!(matches!(
            err,
            crate::IdError::InvalidCharacter { character: ' ', .. }
        ));
    }

    #[test]
    fn test_team_name_rejects_dot() {
        assert!(TeamName::parse("security").is_ok());
        let err = TeamName::parse("sec.urity").unwrap_err();
        assert!(matches!(
            err,
            crate::IdError::InvalidCharacter { character: '.', .. }
        ));
    }

    #[test]
    fn test_job_name_allows_dot() {
        assert!(JobName::parse("router.v2").is_ok());
    }

    #[test]
    fn test_name_json_rejects_invalid() {
        let result: Result<ZoneName, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());

        let zone: ZoneName = serde_json::from_str("\"z1\"").unwrap();
        assert_eq!(zone.as_str(), "z1");
    }

    #[test]
    fn test_instance_index_next() {
        let index = InstanceIndex::ZERO;
        assert_eq!(index.value(), 0);
        assert_eq!(index.next().value(), 1);
    }

    #[test]
    fn test_instance_index_parse() {
        assert_eq!("77".parse::<InstanceIndex>().unwrap(), InstanceIndex::new(77));
        assert!(matches!(
            "-1".parse::<InstanceIndex>().unwrap_err(),
            crate::IdError::InvalidIndex(_)
        ));
    }

    #[test]
    fn test_instance_index_json() {
        let index: InstanceIndex = serde_json::from_str("3").unwrap();
        assert_eq!(index, InstanceIndex::new(3));
        assert_eq!(serde_json::to_string(&index).unwrap(), "3");
    }

    proptest! {
        #[test]
        fn prop_valid_names_roundtrip(s in "[a-z0-9][a-z0-9._-]{0,30}") {
            let name = JobName::parse(s.clone()).unwrap();
            let parsed: JobName = name.to_string().parse().unwrap();
            prop_assert_eq!(parsed.as_str(), s.as_str());
        }

        #[test]
        fn prop_names_with_whitespace_rejected(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
            let s = format!("{a} {b}");
            prop_assert!(DeploymentName::parse(s).is_err());
        }
    }
}
