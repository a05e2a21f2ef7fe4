//! Authorize command (scope-based permission check).

use anyhow::{Context, Result};
use clap::Args;
use fleet_authz::{admin_teams_from_scopes, PermissionAuthorizer, Right, Subject, SubjectKind};
use fleet_id::{DeploymentName, TeamName};
use serde::Serialize;

use crate::error::CliError;
use crate::output::{print_denied, print_info, print_json, print_success, OutputFormat};

use super::CommandContext;

/// Authorize command.
#[derive(Debug, Args)]
pub struct AuthorizeCommand {
    /// Subject kind (director or deployment).
    #[arg(long)]
    subject: String,

    /// Deployment name (required for deployment subjects).
    #[arg(long)]
    deployment: Option<String>,

    /// Team owning the deployment. Repeatable.
    #[arg(long = "team")]
    teams: Vec<String>,

    /// Right to check.
    #[arg(long)]
    right: String,

    /// Scope held by the caller. Repeatable.
    #[arg(long = "scope")]
    scopes: Vec<String>,
}

/// JSON shape of a permission check.
#[derive(Debug, Serialize)]
struct AuthorizeReport {
    director: String,
    subject: SubjectKind,
    right: Right,
    granted: bool,
    admin_teams: Vec<TeamName>,
}

impl AuthorizeCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let report = self.check(&ctx.config.director_uuid)?;

        match ctx.format {
            OutputFormat::Table => {
                let message = format!(
                    "{} on {} (director {})",
                    report.right, report.subject, report.director
                );
                if report.granted {
                    print_success(&message);
                } else {
                    print_denied(&message);
                }
                if !report.admin_teams.is_empty() {
                    let teams: Vec<&str> = report.admin_teams.iter().map(TeamName::as_str).collect();
                    print_info(&format!("Admin of teams: {}", teams.join(", ")));
                }
            }
            OutputFormat::Json => print_json(&report),
        }

        Ok(())
    }

    fn check(&self, director_uuid: &str) -> Result<AuthorizeReport> {
        let kind: SubjectKind = self.subject.parse().map_err(CliError::from)?;
        let right: Right = self.right.parse().map_err(CliError::from)?;
        let subject = self.build_subject(kind)?;

        let authorizer = PermissionAuthorizer::new(director_uuid);
        let granted = authorizer
            .is_granted(&subject, right, &self.scopes)
            .map_err(CliError::from)?;

        Ok(AuthorizeReport {
            director: authorizer.director_uuid().to_string(),
            subject: kind,
            right,
            granted,
            admin_teams: admin_teams_from_scopes(&self.scopes),
        })
    }

    fn build_subject(&self, kind: SubjectKind) -> Result<Subject> {
        match kind {
            SubjectKind::Director => Ok(Subject::Director),
            SubjectKind::Deployment => {
                let name = self.deployment.as_deref().ok_or_else(|| {
                    anyhow::anyhow!("No deployment specified. Use --deployment for deployment subjects.")
                })?;
                let name = DeploymentName::parse(name)
                    .with_context(|| format!("invalid deployment name '{name}'"))?;
                let teams = self
                    .teams
                    .iter()
                    .map(|team| {
                        TeamName::parse(team.as_str())
                            .with_context(|| format!("invalid team name '{team}'"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Subject::Deployment { name, teams })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(subject: &str, deployment: Option<&str>, teams: &[&str]) -> AuthorizeCommand {
        AuthorizeCommand {
            subject: subject.to_string(),
            deployment: deployment.map(str::to_string),
            teams: teams.iter().map(|t| t.to_string()).collect(),
            right: "admin".to_string(),
            scopes: vec![],
        }
    }

    #[test]
    fn test_check_reports_director_and_teams() {
        let mut command = command("deployment", Some("favorite"), &["security"]);
        command.scopes = vec![
            "bosh.teams.security.admin".to_string(),
            "bosh.teams.ops.read".to_string(),
        ];

        let report = command.check("fake-director-uuid").unwrap();

        assert!(report.granted);
        assert_eq!(report.director, "fake-director-uuid");
        assert_eq!(report.admin_teams, vec![TeamName::parse("security").unwrap()]);
    }

    #[test]
    fn test_check_denies_other_director() {
        let mut command = command("director", None, &[]);
        command.scopes = vec!["bosh.other-director.admin".to_string()];

        let report = command.check("fake-director-uuid").unwrap();

        assert!(!report.granted);
    }

    #[test]
    fn test_build_deployment_subject() {
        let subject = command("deployment", Some("favorite"), &["security"])
            .build_subject(SubjectKind::Deployment)
            .unwrap();

        assert_eq!(
            subject,
            Subject::Deployment {
                name: DeploymentName::parse("favorite").unwrap(),
                teams: vec![TeamName::parse("security").unwrap()],
            }
        );
    }

    #[test]
    fn test_deployment_subject_requires_name() {
        let err = command("deployment", None, &[])
            .build_subject(SubjectKind::Deployment)
            .unwrap_err();
        assert!(err.to_string().contains("--deployment"));
    }

    #[test]
    fn test_team_names_validated() {
        let err = command("deployment", Some("favorite"), &["bad.team"])
            .build_subject(SubjectKind::Deployment)
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid team name 'bad.team'");
    }
}
