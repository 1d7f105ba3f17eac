use std::collections::HashSet;
use std::path::Path;

use common::Team;

use crate::error::ConfigurationError;

/// Reads the static team roster.
///
/// The roster is fixed for the lifetime of the process, so anything that
/// would make ranking ambiguous is rejected here rather than at runtime.
#[tracing::instrument]
pub async fn load(path: &Path) -> Result<Vec<Team>, ConfigurationError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let teams = parse(&raw)?;
    tracing::info!("Loaded {} teams", teams.len());

    Ok(teams)
}

pub fn parse(raw: &[u8]) -> Result<Vec<Team>, ConfigurationError> {
    let teams: Vec<Team> = serde_json::from_slice(raw)?;
    validate(&teams)?;
    Ok(teams)
}

fn validate(teams: &[Team]) -> Result<(), ConfigurationError> {
    if teams.is_empty() {
        return Err(ConfigurationError::EmptyRoster);
    }

    let mut ids = HashSet::new();
    let mut tiebreakers = HashSet::new();
    for team in teams {
        if !ids.insert(team.id.as_str()) {
            return Err(ConfigurationError::DuplicateTeamId(team.id.clone()));
        }
        if !tiebreakers.insert(team.tiebreaker_rank) {
            return Err(ConfigurationError::DuplicateTiebreaker(team.tiebreaker_rank));
        }
    }

    Ok(())
}
