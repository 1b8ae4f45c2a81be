use std::collections::BTreeMap;

use super::rank::{ensure_unique_entries, latest_rank_changes, min_rank, rank_trajectory, TrajectoryPoint};
use crate::error::StandingsError;
use crate::scoring::{EventCounts, PointBreakdown, ScoredEntry};

/// A player's aggregate over one cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub player: String,
    pub rank: u32,
    pub games_played: u32,
    pub games_won: u32,
    pub counts: EventCounts,
    pub goals_conceded: u32,
    /// Per-category sums
    pub points: PointBreakdown,
    pub rank_change: i32,
}

impl PlayerSummary {
    fn empty(player: &str) -> Self {
        Self {
            player: player.to_string(),
            rank: 0,
            games_played: 0,
            games_won: 0,
            counts: EventCounts::default(),
            goals_conceded: 0,
            points: PointBreakdown::default(),
            rank_change: 0,
        }
    }

    /// Wins over games played, 0 when no games were played.
    pub fn win_ratio(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64
        }
    }

    pub fn total(&self) -> f64 {
        self.points.total()
    }

    pub fn points_mean(&self) -> PointBreakdown {
        self.points.mean_over(self.games_played)
    }

    pub fn points_per_game(&self) -> f64 {
        self.points_mean().total()
    }

    pub fn goals_per_game(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.counts.goals as f64 / self.games_played as f64
        }
    }
}

/// Rankings and trajectory for one cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct Standings {
    /// Sorted by rank, then player name
    pub summaries: Vec<PlayerSummary>,
    pub trajectory: Vec<TrajectoryPoint>,
}

/// Aggregate a cohort of scored entries into ranked player summaries.
///
/// An empty cohort yields empty standings. Duplicate (player, date) rows
/// are rejected rather than summed.
pub fn build_standings(entries: &[ScoredEntry]) -> Result<Standings, StandingsError> {
    ensure_unique_entries(entries.iter().map(|e| (e.player.as_str(), e.date)))?;

    let mut by_player: BTreeMap<&str, PlayerSummary> = BTreeMap::new();
    for entry in entries {
        let summary = by_player
            .entry(entry.player.as_str())
            .or_insert_with(|| PlayerSummary::empty(&entry.player));
        summary.games_played += 1;
        if entry.is_win() {
            summary.games_won += 1;
        }
        summary.counts.add(&entry.counts);
        summary.goals_conceded += entry.goals_conceded;
        summary.points.add(&entry.points);
    }

    let trajectory = rank_trajectory(entries);
    let changes = latest_rank_changes(&trajectory);

    let mut summaries: Vec<PlayerSummary> = by_player.into_values().collect();
    let totals: Vec<f64> = summaries.iter().map(|s| s.total()).collect();
    for (summary, rank) in summaries.iter_mut().zip(min_rank(&totals)) {
        summary.rank = rank;
        summary.rank_change = changes.get(&summary.player).copied().unwrap_or(0);
    }
    summaries.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.player.cmp(&b.player)));

    Ok(Standings {
        summaries,
        trajectory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{MatchFormat, Team};
    use crate::scoring::{Outcome, Position};
    use chrono::NaiveDate;

    fn scored(player: &str, day: u32, points: f64, outcome: Outcome) -> ScoredEntry {
        ScoredEntry {
            player: player.to_string(),
            date: NaiveDate::from_ymd_opt(2023, 4, day).unwrap(),
            season: 1,
            gameweek: day,
            format: MatchFormat::Medium,
            team: Team::TeamB,
            position: Position::Midfielder,
            counts: EventCounts {
                goals: 1,
                ..Default::default()
            },
            goal_difference: 0,
            goals_conceded: 2,
            outcome,
            points: PointBreakdown {
                participation: 2.0,
                goals: points - 2.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_aggregates_and_ratios() {
        let entries = vec![
            scored("Anna", 1, 10.0, Outcome::Win),
            scored("Anna", 2, 6.0, Outcome::Loss),
            scored("Anna", 3, 4.0, Outcome::Win),
            scored("Bea", 1, 8.0, Outcome::Draw),
        ];
        let standings = build_standings(&entries).unwrap();
        let anna = &standings.summaries[0];

        assert_eq!(anna.player, "Anna");
        assert_eq!(anna.games_played, 3);
        assert_eq!(anna.games_won, 2);
        assert!((anna.win_ratio() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(anna.counts.goals, 3);
        assert_eq!(anna.goals_conceded, 6);
        assert_eq!(anna.total(), 20.0);
        assert_eq!(anna.points.participation, 6.0);
        assert_eq!(anna.points_mean().participation, 2.0);
        assert!((anna.points_per_game() - 20.0 / 3.0).abs() < 1e-9);
        assert_eq!(anna.goals_per_game(), 1.0);

        let bea = &standings.summaries[1];
        assert_eq!(bea.games_won, 0);
        assert_eq!(bea.win_ratio(), 0.0);
    }

    #[test]
    fn test_ranks_tied_totals() {
        let entries = vec![
            scored("Carla", 1, 50.0, Outcome::Win),
            scored("Anna", 1, 50.0, Outcome::Win),
            scored("Bea", 1, 40.0, Outcome::Loss),
        ];
        let standings = build_standings(&entries).unwrap();
        let ranked: Vec<_> = standings
            .summaries
            .iter()
            .map(|s| (s.player.as_str(), s.rank))
            .collect();
        assert_eq!(ranked, vec![("Anna", 1), ("Carla", 1), ("Bea", 3)]);
    }

    #[test]
    fn test_rank_change_attached_to_summary() {
        let entries = vec![
            scored("Anna", 1, 10.0, Outcome::Win),
            scored("Bea", 1, 5.0, Outcome::Loss),
            scored("Bea", 2, 10.0, Outcome::Win),
        ];
        let standings = build_standings(&entries).unwrap();
        let bea = standings.summaries.iter().find(|s| s.player == "Bea").unwrap();
        let anna = standings.summaries.iter().find(|s| s.player == "Anna").unwrap();
        assert_eq!(bea.rank, 1);
        assert_eq!(bea.rank_change, 1);
        assert_eq!(anna.rank_change, 0);
    }

    #[test]
    fn test_empty_cohort() {
        let standings = build_standings(&[]).unwrap();
        assert!(standings.summaries.is_empty());
        assert!(standings.trajectory.is_empty());
    }

    #[test]
    fn test_zero_games_guards() {
        let summary = PlayerSummary::empty("Ghost");
        assert_eq!(summary.win_ratio(), 0.0);
        assert_eq!(summary.points_per_game(), 0.0);
        assert_eq!(summary.goals_per_game(), 0.0);
    }

    #[test]
    fn test_duplicate_rows_rejected() {
        let entries = vec![
            scored("Anna", 1, 10.0, Outcome::Win),
            scored("Anna", 1, 10.0, Outcome::Win),
        ];
        let err = build_standings(&entries).unwrap_err();
        assert!(matches!(err, StandingsError::DuplicateEntry { .. }));
    }
}
