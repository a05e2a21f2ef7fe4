//! Scope string parsing.

use fleet_id::TeamName;

const ROOT: &str = "bosh";
const TEAMS: &str = "teams";

/// Access level carried by a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Admin,
    Read,
}

impl Level {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "read" => Some(Self::Read),
            _ => None,
        }
    }
}

/// A parsed scope string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// `bosh.<level>`
    Global(Level),

    /// `bosh.<director-uuid>.<level>`
    Director { uuid: String, level: Level },

    /// `bosh.teams.<team>.<level>`
    Team { team: TeamName, level: Level },

    /// Anything else. Never grants anything.
    Unrecognized(String),
}

impl Scope {
    pub fn parse(s: &str) -> Self {
        let parts: Vec<&str> = s.split('.').collect();
        let parsed = match parts.as_slice() {
            [ROOT, level] => Level::parse(level).map(Self::Global),
            [ROOT, TEAMS, team, level] => Level::parse(level).and_then(|level| {
                TeamName::parse(*team)
                    .ok()
                    .map(|team| Self::Team { team, level })
            }),
            [ROOT, TEAMS, _] => None,
            [ROOT, uuid, level] if !uuid.is_empty() => {
                Level::parse(level).map(|level| Self::Director {
                    uuid: (*uuid).to_string(),
                    level,
                })
            }
            _ => None,
        };

        parsed.unwrap_or_else(|| Self::Unrecognized(s.to_string()))
    }
}

/// Team names from `bosh.teams.<team>.admin` scopes, in scope order.
pub fn admin_teams_from_scopes<S: AsRef<str>>(scopes: &[S]) -> Vec<TeamName> {
    scopes
        .iter()
        .filter_map(|scope| match Scope::parse(scope.as_ref()) {
            Scope::Team {
                team,
                level: Level::Admin,
            } => Some(team),
            _ => None,
        })
        .collect()
}

/// The `bosh.teams.<team>.admin` scope for each team.
pub fn team_admin_scopes(teams: &[TeamName]) -> Vec<String> {
    teams
        .iter()
        .map(|team| format!("{ROOT}.{TEAMS}.{team}.admin"))
        .collect()
}
