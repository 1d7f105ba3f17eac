use std::cmp::Ordering;

use common::TeamScore;

/// Leaderboard order: points, then the gold, silver and bronze pick counts
/// (all descending), then `tiebreaker_rank` ascending.
pub fn compare(a: &TeamScore, b: &TeamScore) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| {
            b.gold_country_medals
                .count
                .cmp(&a.gold_country_medals.count)
        })
        .then_with(|| {
            b.silver_country_medals
                .count
                .cmp(&a.silver_country_medals.count)
        })
        .then_with(|| {
            b.bronze_country_medals
                .count
                .cmp(&a.bronze_country_medals.count)
        })
        .then_with(|| a.team.tiebreaker_rank.cmp(&b.team.tiebreaker_rank))
}

/// Sorts the scores and assigns dense ranks starting at 1.
///
/// With unique tiebreaker ranks across the roster every rank is distinct.
pub fn rank_teams(mut scores: Vec<TeamScore>) -> Vec<TeamScore> {
    scores.sort_by(compare);

    for (position, score) in scores.iter_mut().enumerate() {
        score.rank = Some(position as u32 + 1);
    }

    if let Some(leader) = scores.first() {
        tracing::debug!(
            leader = %leader.team.id,
            points = leader.total_points,
            "Ranked {} teams",
            scores.len()
        );
    }

    scores
}
