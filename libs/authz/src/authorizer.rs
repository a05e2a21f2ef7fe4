//! Permission table and authorizer.

use std::str::FromStr;

use fleet_id::{DeploymentName, TeamName};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthzError;
use crate::scope::{Level, Scope};

/// Kind of thing a right is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Director,
    Deployment,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::Deployment => "deployment",
        }
    }
}

impl std::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectKind {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "director" => Ok(Self::Director),
            "deployment" => Ok(Self::Deployment),
            other => Err(AuthzError::UnexpectedSubject(other.to_string())),
        }
    }
}

/// A right that can be checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Right {
    Admin,
    Read,
    CreateDeployment,
    ListDeployments,
}

impl Right {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Read => "read",
            Self::CreateDeployment => "create_deployment",
            Self::ListDeployments => "list_deployments",
        }
    }
}

impl std::fmt::Display for Right {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Right {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "read" => Ok(Self::Read),
            "create_deployment" => Ok(Self::CreateDeployment),
            "list_deployments" => Ok(Self::ListDeployments),
            other => Err(AuthzError::UnknownRight(other.to_string())),
        }
    }
}

/// What a right is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// The director as a whole.
    Director,

    /// A single deployment and the teams that own it.
    Deployment {
        name: DeploymentName,
        teams: Vec<TeamName>,
    },
}

impl Subject {
    pub fn kind(&self) -> SubjectKind {
        match self {
            Self::Director => SubjectKind::Director,
            Self::Deployment { .. } => SubjectKind::Deployment,
        }
    }

    fn teams(&self) -> &[TeamName] {
        match self {
            Self::Director => &[],
            Self::Deployment { teams, .. } => teams,
        }
    }
}

/// A scope shape that grants a right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grant {
    /// `bosh.<level>`
    Global(Level),
    /// `bosh.<this-director-uuid>.<level>`
    ThisDirector(Level),
    /// `bosh.teams.<any team>.<level>`
    AnyTeam(Level),
    /// `bosh.teams.<team owning the subject>.<level>`
    OwningTeam(Level),
}

use self::Grant::*;
use crate::scope::Level::{Admin, Read};

const DIRECTOR_ADMIN: &[Grant] = &[Global(Admin), ThisDirector(Admin)];

const DIRECTOR_READ: &[Grant] = &[
    Global(Admin),
    ThisDirector(Admin),
    Global(Read),
    ThisDirector(Read),
];

const DIRECTOR_CREATE_DEPLOYMENT: &[Grant] = &[Global(Admin), ThisDirector(Admin), AnyTeam(Admin)];

const DIRECTOR_LIST_DEPLOYMENTS: &[Grant] = &[
    Global(Admin),
    ThisDirector(Admin),
    Global(Read),
    ThisDirector(Read),
    AnyTeam(Admin),
    AnyTeam(Read),
];

const DEPLOYMENT_ADMIN: &[Grant] = &[Global(Admin), ThisDirector(Admin), OwningTeam(Admin)];

const DEPLOYMENT_READ: &[Grant] = &[
    Global(Admin),
    ThisDirector(Admin),
    Global(Read),
    ThisDirector(Read),
    OwningTeam(Admin),
    OwningTeam(Read),
];

/// Scopes accepted for each {subject kind, right}. Pairs not listed are
/// configuration errors.
const PERMISSIONS: &[(SubjectKind, Right, &[Grant])] = &[
    (SubjectKind::Director, Right::Admin, DIRECTOR_ADMIN),
    (SubjectKind::Director, Right::Read, DIRECTOR_READ),
    (SubjectKind::Director, Right::CreateDeployment, DIRECTOR_CREATE_DEPLOYMENT),
    (SubjectKind::Director, Right::ListDeployments, DIRECTOR_LIST_DEPLOYMENTS),
    (SubjectKind::Deployment, Right::Admin, DEPLOYMENT_ADMIN),
    (SubjectKind::Deployment, Right::Read, DEPLOYMENT_READ),
];

/// Decides whether a set of scopes grants a right on a subject.
#[derive(Debug, Clone)]
pub struct PermissionAuthorizer {
    director_uuid: String,
}

impl PermissionAuthorizer {
    /// Create an authorizer for the director with the given UUID.
    pub fn new(director_uuid: impl Into<String>) -> Self {
        Self {
            director_uuid: director_uuid.into(),
        }
    }

    pub fn director_uuid(&self) -> &str {
        &self.director_uuid
    }

    /// Returns whether any of `scopes` grants `right` on `subject`.
    pub fn is_granted<S: AsRef<str>>(
        &self,
        subject: &Subject,
        right: Right,
        scopes: &[S],
    ) -> Result<bool, AuthzError> {
        let kind = subject.kind();
        let grants = PERMISSIONS
            .iter()
            .find(|(k, r, _)| *k == kind && *r == right)
            .map(|(_, _, grants)| *grants)
            .ok_or(AuthzError::UnexpectedPermission {
                subject: kind,
                right,
            })?;

        let granted = scopes.iter().any(|scope| {
            let scope = Scope::parse(scope.as_ref());
            grants.iter().any(|grant| self.matches(*grant, &scope, subject))
        });

        debug!(subject = %kind, %right, granted, "Permission check");
        Ok(granted)
    }

    fn matches(&self, grant: Grant, scope: &Scope, subject: &Subject) -> bool {
        match (grant, scope) {
            (Global(want), Scope::Global(have)) => want == *have,
            (ThisDirector(want), Scope::Director { uuid, level }) => {
                want == *level && uuid == &self.director_uuid
            }
            (AnyTeam(want), Scope::Team { level, .. }) => want == *level,
            (OwningTeam(want), Scope::Team { team, level }) => {
                want == *level && subject.teams().contains(team)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const UUID: &str = "fake-director-uuid";

    fn authorizer() -> PermissionAuthorizer {
        PermissionAuthorizer::new(UUID)
    }

    fn deployment() -> Subject {
        Subject::Deployment {
            name: DeploymentName::parse("favorite").unwrap(),
            teams: vec![TeamName::parse("security").unwrap()],
        }
    }

    #[rstest]
    // director admin
    #[case(Right::Admin, "bosh.admin", true)]
    #[case(Right::Admin, "bosh.fake-director-uuid.admin", true)]
    #[case(Right::Admin, "bosh.unexpected-uuid.admin", false)]
    #[case(Right::Admin, "bosh.teams.security.admin", false)]
    #[case(Right::Admin, "bosh.read", false)]
    #[case(Right::Admin, "bosh.fake-director-uuid.read", false)]
    // director read
    #[case(Right::Read, "bosh.admin", true)]
    #[case(Right::Read, "bosh.fake-director-uuid.admin", true)]
    #[case(Right::Read, "bosh.read", true)]
    #[case(Right::Read, "bosh.fake-director-uuid.read", true)]
    #[case(Right::Read, "bosh.unexpected-uuid.admin", false)]
    #[case(Right::Read, "bosh.unexpected-uuid.read", false)]
    #[case(Right::Read, "bosh.teams.security.admin", false)]
    // director create_deployment
    #[case(Right::CreateDeployment, "bosh.admin", true)]
    #[case(Right::CreateDeployment, "bosh.fake-director-uuid.admin", true)]
    #[case(Right::CreateDeployment, "bosh.teams.security.admin", true)]
    #[case(Right::CreateDeployment, "bosh.read", false)]
    #[case(Right::CreateDeployment, "bosh.fake-director-uuid.read", false)]
    #[case(Right::CreateDeployment, "bosh.unexpected-uuid.admin", false)]
    #[case(Right::CreateDeployment, "bosh.teams.security.read", false)]
    // director list_deployments
    #[case(Right::ListDeployments, "bosh.admin", true)]
    #[case(Right::ListDeployments, "bosh.read", true)]
    #[case(Right::ListDeployments, "bosh.fake-director-uuid.admin", true)]
    #[case(Right::ListDeployments, "bosh.fake-director-uuid.read", true)]
    #[case(Right::ListDeployments, "bosh.teams.security.admin", true)]
    #[case(Right::ListDeployments, "bosh.teams.security.read", true)]
    #[case(Right::ListDeployments, "bosh.unexpected-uuid.admin", false)]
    #[case(Right::ListDeployments, "bosh.unexpected-uuid.read", false)]
    #[case(Right::ListDeployments, "bosh.teams.security.unexpected", false)]
    fn test_director_rights(#[case] right: Right, #[case] scope: &str, #[case] expected: bool) {
        let granted = authorizer()
            .is_granted(&Subject::Director, right, &[scope])
            .unwrap();
        assert_eq!(granted, expected);
    }

    #[rstest]
    // deployment admin
    #[case(Right::Admin, "bosh.admin", true)]
    #[case(Right::Admin, "bosh.fake-director-uuid.admin", true)]
    #[case(Right::Admin, "bosh.teams.security.admin", true)]
    #[case(Right::Admin, "bosh.unexpected-uuid.admin", false)]
    #[case(Right::Admin, "bosh.teams.fraud.admin", false)]
    #[case(Right::Admin, "bosh.teams.security.read", false)]
    #[case(Right::Admin, "bosh.read", false)]
    #[case(Right::Admin, "bosh.fake-director-uuid.read", false)]
    // deployment read
    #[case(Right::Read, "bosh.admin", true)]
    #[case(Right::Read, "bosh.fake-director-uuid.admin", true)]
    #[case(Right::Read, "bosh.read", true)]
    #[case(Right::Read, "bosh.fake-director-uuid.read", true)]
    #[case(Right::Read, "bosh.teams.security.admin", true)]
    #[case(Right::Read, "bosh.teams.security.read", true)]
    #[case(Right::Read, "bosh.unexpected-uuid.admin", false)]
    #[case(Right::Read, "bosh.unexpected-uuid.read", false)]
    #[case(Right::Read, "bosh.teams.fraud.admin", false)]
    fn test_deployment_rights(#[case] right: Right, #[case] scope: &str, #[case] expected: bool) {
        let granted = authorizer()
            .is_granted(&deployment(), right, &[scope])
            .unwrap();
        assert_eq!(granted, expected);
    }

    #[test]
    fn test_any_scope_suffices() {
        let scopes = ["bosh.teams.fraud.admin", "bosh.read"];
        assert!(authorizer()
            .is_granted(&Subject::Director, Right::Read, &scopes)
            .unwrap());
    }

    #[test]
    fn test_no_scopes_denied() {
        let scopes: [&str; 0] = [];
        assert!(!authorizer()
            .is_granted(&Subject::Director, Right::Read, &scopes)
            .unwrap());
    }

    #[rstest]
    #[case(Right::CreateDeployment)]
    #[case(Right::ListDeployments)]
    fn test_undefined_deployment_permission(#[case] right: Right) {
        let err = authorizer()
            .is_granted(&deployment(), right, &["bosh.admin"])
            .unwrap_err();
        assert_eq!(
            err,
            AuthzError::UnexpectedPermission {
                subject: SubjectKind::Deployment,
                right
            }
        );
        assert_eq!(
            err.to_string(),
            format!("unexpected permission for deployment: {right}")
        );
    }

    #[test]
    fn test_unknown_right() {
        let err = "what_I_fancy".parse::<Right>().unwrap_err();
        assert_eq!(err.to_string(), "unknown right: what_I_fancy");
    }

    #[test]
    fn test_unexpected_subject() {
        let err = "subject_I_fancy".parse::<SubjectKind>().unwrap_err();
        assert_eq!(err.to_string(), "unexpected subject: subject_I_fancy");
    }

    #[test]
    fn test_every_pair_either_listed_or_rejected() {
        let rights = [
            Right::Admin,
            Right::Read,
            Right::CreateDeployment,
            Right::ListDeployments,
        ];
        for subject in [Subject::Director, deployment()] {
            for right in rights {
                let listed = PERMISSIONS
                    .iter()
                    .any(|(k, r, _)| *k == subject.kind() && *r == right);
                let result = authorizer().is_granted(&subject, right, &["bosh.admin"]);
                assert_eq!(result.is_ok(), listed, "{} {}", subject.kind(), right);
            }
        }
    }
}
