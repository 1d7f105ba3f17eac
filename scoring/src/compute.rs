use std::collections::HashMap;

use common::{MedalCount, MedalTableEntry, MedalType, Team, TeamCountryMedals, TeamScore};

pub const GOLD_POINTS: u64 = 3;
pub const SILVER_POINTS: u64 = 2;
pub const BRONZE_POINTS: u64 = 1;

pub fn points_per_medal(medal: MedalType) -> u64 {
    match medal {
        MedalType::Gold => GOLD_POINTS,
        MedalType::Silver => SILVER_POINTS,
        MedalType::Bronze => BRONZE_POINTS,
    }
}

/// Computes the unranked score of every team, in roster order.
///
/// Each pick only counts medals of its own colour. A country missing from
/// `medal_data` counts as zero medals; if a code appears more than once the
/// last entry wins.
#[tracing::instrument(skip_all, fields(teams = teams.len(), countries = medal_data.len()))]
pub fn calculate_scores(teams: &[Team], medal_data: &[MedalTableEntry]) -> Vec<TeamScore> {
    let lookup: HashMap<&str, &MedalCount> = medal_data
        .iter()
        .map(|entry| (entry.country.code.as_str(), &entry.medals))
        .collect();

    teams.iter().map(|team| score_team(team, &lookup)).collect()
}

fn score_team(team: &Team, lookup: &HashMap<&str, &MedalCount>) -> TeamScore {
    let gold = country_medals(team, MedalType::Gold, lookup);
    let silver = country_medals(team, MedalType::Silver, lookup);
    let bronze = country_medals(team, MedalType::Bronze, lookup);

    TeamScore {
        team: team.clone(),
        total_points: gold.points + silver.points + bronze.points,
        gold_country_medals: gold,
        silver_country_medals: silver,
        bronze_country_medals: bronze,
        rank: None,
    }
}

fn country_medals(
    team: &Team,
    medal: MedalType,
    lookup: &HashMap<&str, &MedalCount>,
) -> TeamCountryMedals {
    let country = team.pick(medal);
    let count = lookup
        .get(country.code.as_str())
        .map(|medals| medals.get(medal))
        .unwrap_or(0);

    TeamCountryMedals {
        country: country.clone(),
        medal_type: medal,
        count,
        points: u64::from(count) * points_per_medal(medal),
    }
}
