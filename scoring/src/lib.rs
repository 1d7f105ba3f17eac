//! Turns a medal table into a ranked leaderboard.
//!
//! Everything in here is pure: no I/O, no clocks, inputs are never mutated.

pub mod compute;
pub mod rank;

pub use compute::calculate_scores;
pub use rank::rank_teams;

/// Scores and ranks `teams` against `medal_data` in one go.
pub fn leaderboard(
    teams: &[common::Team],
    medal_data: &[common::MedalTableEntry],
) -> Vec<common::TeamScore> {
    rank_teams(calculate_scores(teams, medal_data))
}
