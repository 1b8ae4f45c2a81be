use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

use super::formatter::format_win_ratio;
use crate::fantasy::{FantasyPick, FantasyStanding};
use crate::games::GameRecord;
use crate::scoring::ScoredEntry;
use crate::standings::{round2, PlayerSummary, TrajectoryPoint};
use crate::tiers::TierAssignment;

/// An output table row with a fixed header line.
///
/// `HEADERS` must list the serde names of the fields in declaration order.
pub trait CsvRow: Serialize {
    const HEADERS: &'static [&'static str];
}

/// Serialize `rows` as CSV to `path`, replacing any previous file atomically.
///
/// The header line is always written, so an empty slice still yields a
/// readable table.
pub fn write_csv<T: CsvRow>(path: &Path, rows: &[T]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(&mut file);
        writer
            .write_record(T::HEADERS)
            .with_context(|| format!("Failed to write header to {}", path.display()))?;
        for row in rows {
            writer
                .serialize(row)
                .with_context(|| format!("Failed to write row to {}", path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", path.display()))?;
    }

    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct GameRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Season")]
    pub season: u32,
    #[serde(rename = "Gameweek")]
    pub gameweek: u32,
    #[serde(rename = "Match Type")]
    pub match_type: &'static str,
    #[serde(rename = "Winning Team")]
    pub winning_team: String,
    #[serde(rename = "Team A Goals")]
    pub team_a_goals: u32,
    #[serde(rename = "Team B Goals")]
    pub team_b_goals: u32,
    #[serde(rename = "Number of Players")]
    pub players: u32,
}

impl CsvRow for GameRow {
    const HEADERS: &'static [&'static str] = &[
        "Date", "Season", "Gameweek", "Match Type", "Winning Team", "Team A Goals",
        "Team B Goals", "Number of Players",
    ];
}

impl From<&GameRecord> for GameRow {
    fn from(game: &GameRecord) -> Self {
        Self {
            date: game.date,
            season: game.season,
            gameweek: game.gameweek,
            match_type: game.format.label(),
            winning_team: game.winner.to_string(),
            team_a_goals: game.team_a_goals,
            team_b_goals: game.team_b_goals,
            players: game.headcount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PointsRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Season")]
    pub season: u32,
    #[serde(rename = "Gameweek")]
    pub gameweek: u32,
    #[serde(rename = "Match Type")]
    pub match_type: &'static str,
    #[serde(rename = "Position")]
    pub position: &'static str,
    #[serde(rename = "Goals")]
    pub goals: u32,
    #[serde(rename = "Own Goals")]
    pub own_goals: u32,
    #[serde(rename = "SPL Bonus")]
    pub league_bonus: u32,
    #[serde(rename = "MVP")]
    pub mvp: u32,
    #[serde(rename = "Friend Referrals")]
    pub referrals: u32,
    #[serde(rename = "Penalty")]
    pub penalties: u32,
    #[serde(rename = "Goal Difference")]
    pub goal_difference: i32,
    #[serde(rename = "Game Outcome")]
    pub outcome: String,
    #[serde(rename = "Goals Conceded")]
    pub goals_conceded: u32,
    #[serde(rename = "Participation Points")]
    pub participation_points: f64,
    #[serde(rename = "Goal Points")]
    pub goal_points: f64,
    #[serde(rename = "Own Goal Points")]
    pub own_goal_points: f64,
    #[serde(rename = "SPL Bonus Points")]
    pub league_bonus_points: f64,
    #[serde(rename = "MVP Points")]
    pub mvp_points: f64,
    #[serde(rename = "Friend Referrals Points")]
    pub referral_points: f64,
    #[serde(rename = "Penalty Points")]
    pub penalty_points: f64,
    #[serde(rename = "Goalkeeper Points")]
    pub goalkeeper_points: f64,
    #[serde(rename = "Defensive Score Points")]
    pub defensive_points: f64,
    #[serde(rename = "Midfield Score")]
    pub midfield_points: f64,
    #[serde(rename = "Game Outcome Points")]
    pub outcome_points: f64,
    #[serde(rename = "Total Points")]
    pub total_points: f64,
}

impl CsvRow for PointsRow {
    const HEADERS: &'static [&'static str] = &[
        "Date", "Player", "Team", "Season", "Gameweek", "Match Type", "Position", "Goals",
        "Own Goals", "SPL Bonus", "MVP", "Friend Referrals", "Penalty", "Goal Difference",
        "Game Outcome", "Goals Conceded", "Participation Points", "Goal Points",
        "Own Goal Points", "SPL Bonus Points", "MVP Points", "Friend Referrals Points",
        "Penalty Points", "Goalkeeper Points", "Defensive Score Points", "Midfield Score",
        "Game Outcome Points", "Total Points",
    ];
}

impl From<&ScoredEntry> for PointsRow {
    fn from(entry: &ScoredEntry) -> Self {
        let p = &entry.points;
        Self {
            date: entry.date,
            player: entry.player.clone(),
            team: entry.team.to_string(),
            season: entry.season,
            gameweek: entry.gameweek,
            match_type: entry.format.label(),
            position: entry.position.name(),
            goals: entry.counts.goals,
            own_goals: entry.counts.own_goals,
            league_bonus: entry.counts.league_bonus,
            mvp: entry.counts.mvp,
            referrals: entry.counts.referrals,
            penalties: entry.counts.penalties,
            goal_difference: entry.goal_difference,
            outcome: entry.outcome.to_string(),
            goals_conceded: entry.goals_conceded,
            participation_points: round2(p.participation),
            goal_points: round2(p.goals),
            own_goal_points: round2(p.own_goals),
            league_bonus_points: round2(p.league_bonus),
            mvp_points: round2(p.mvp),
            referral_points: round2(p.referrals),
            penalty_points: round2(p.penalties),
            goalkeeper_points: round2(p.goalkeeper),
            defensive_points: round2(p.defensive),
            midfield_points: round2(p.midfield),
            outcome_points: round2(p.outcome),
            total_points: round2(entry.total()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Rank")]
    pub rank: u32,
    #[serde(rename = "Games Played")]
    pub games_played: u32,
    #[serde(rename = "Games Won")]
    pub games_won: u32,
    #[serde(rename = "Win Ratio")]
    pub win_ratio: String,
    #[serde(rename = "Penalties")]
    pub penalties: u32,
    #[serde(rename = "Friend Referrals")]
    pub referrals: u32,
    #[serde(rename = "Own Goals")]
    pub own_goals: u32,
    #[serde(rename = "Goals Conceded")]
    pub goals_conceded: u32,
    #[serde(rename = "MVP")]
    pub mvp: u32,
    #[serde(rename = "SPL Bonus")]
    pub league_bonus: u32,
    #[serde(rename = "GoalxG")]
    pub goals_per_game: f64,
    #[serde(rename = "Total Goals")]
    pub goals: u32,
    #[serde(rename = "Participation Points")]
    pub participation_points: f64,
    #[serde(rename = "Goal Points")]
    pub goal_points: f64,
    #[serde(rename = "Own Goal Points")]
    pub own_goal_points: f64,
    #[serde(rename = "SPL Bonus Points")]
    pub league_bonus_points: f64,
    #[serde(rename = "MVP Points")]
    pub mvp_points: f64,
    #[serde(rename = "Friend Referrals Points")]
    pub referral_points: f64,
    #[serde(rename = "Penalty Points")]
    pub penalty_points: f64,
    #[serde(rename = "Goalkeeper Points")]
    pub goalkeeper_points: f64,
    #[serde(rename = "Defensive Score Points")]
    pub defensive_points: f64,
    #[serde(rename = "Midfield Score")]
    pub midfield_points: f64,
    #[serde(rename = "Game Outcome Points")]
    pub outcome_points: f64,
    #[serde(rename = "PointsxG")]
    pub points_per_game: f64,
    #[serde(rename = "Total")]
    pub total: f64,
    #[serde(rename = "Rank Change")]
    pub rank_change: i32,
}

impl CsvRow for SummaryRow {
    const HEADERS: &'static [&'static str] = &[
        "Player", "Rank", "Games Played", "Games Won", "Win Ratio", "Penalties",
        "Friend Referrals", "Own Goals", "Goals Conceded", "MVP", "SPL Bonus", "GoalxG",
        "Total Goals", "Participation Points", "Goal Points", "Own Goal Points",
        "SPL Bonus Points", "MVP Points", "Friend Referrals Points", "Penalty Points",
        "Goalkeeper Points", "Defensive Score Points", "Midfield Score", "Game Outcome Points",
        "PointsxG", "Total", "Rank Change",
    ];
}

impl From<&PlayerSummary> for SummaryRow {
    fn from(s: &PlayerSummary) -> Self {
        let p = &s.points;
        Self {
            player: s.player.clone(),
            rank: s.rank,
            games_played: s.games_played,
            games_won: s.games_won,
            win_ratio: format_win_ratio(s.win_ratio()),
            penalties: s.counts.penalties,
            referrals: s.counts.referrals,
            own_goals: s.counts.own_goals,
            goals_conceded: s.goals_conceded,
            mvp: s.counts.mvp,
            league_bonus: s.counts.league_bonus,
            goals_per_game: round2(s.goals_per_game()),
            goals: s.counts.goals,
            participation_points: round2(p.participation),
            goal_points: round2(p.goals),
            own_goal_points: round2(p.own_goals),
            league_bonus_points: round2(p.league_bonus),
            mvp_points: round2(p.mvp),
            referral_points: round2(p.referrals),
            penalty_points: round2(p.penalties),
            goalkeeper_points: round2(p.goalkeeper),
            defensive_points: round2(p.defensive),
            midfield_points: round2(p.midfield),
            outcome_points: round2(p.outcome),
            points_per_game: round2(s.points_per_game()),
            total: round2(s.total()),
            rank_change: s.rank_change,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrajectoryRow {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Cumulative Points")]
    pub cumulative: f64,
    #[serde(rename = "Rank")]
    pub rank: u32,
    #[serde(rename = "Rank Change")]
    pub rank_change: i32,
}

impl CsvRow for TrajectoryRow {
    const HEADERS: &'static [&'static str] = &["Player", "Date", "Cumulative Points", "Rank", "Rank Change"];
}

impl From<&TrajectoryPoint> for TrajectoryRow {
    fn from(point: &TrajectoryPoint) -> Self {
        Self {
            player: point.player.clone(),
            date: point.date,
            cumulative: round2(point.cumulative),
            rank: point.rank,
            rank_change: point.rank_change,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TierRow {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Tier")]
    pub tier: usize,
    #[serde(rename = "Price (in $M)")]
    pub price: u32,
    #[serde(rename = "Games Played")]
    pub games_played: u32,
    #[serde(rename = "Total Points")]
    pub total_points: f64,
    #[serde(rename = "Average Points per Game")]
    pub points_per_game: f64,
}

impl CsvRow for TierRow {
    const HEADERS: &'static [&'static str] = &["Player", "Tier", "Price (in $M)", "Games Played", "Total Points", "Average Points per Game"];
}

impl From<&TierAssignment> for TierRow {
    fn from(a: &TierAssignment) -> Self {
        Self {
            player: a.player.clone(),
            tier: a.tier,
            price: a.price,
            games_played: a.games_played,
            total_points: round2(a.total_points),
            points_per_game: round2(a.points_per_game),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FantasyStandingRow {
    #[serde(rename = "Rank")]
    pub rank: u32,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Total Points")]
    pub total: f64,
    #[serde(rename = "Points per Pick")]
    pub average_per_pick: f64,
}

impl CsvRow for FantasyStandingRow {
    const HEADERS: &'static [&'static str] = &["Rank", "Team", "Owner", "Total Points", "Points per Pick"];
}

impl From<&FantasyStanding> for FantasyStandingRow {
    fn from(s: &FantasyStanding) -> Self {
        Self {
            rank: s.rank,
            team: s.team.clone(),
            owner: s.owner.clone(),
            total: round2(s.total),
            average_per_pick: round2(s.average_per_pick),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FantasyPickRow {
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Owner")]
    pub owner: String,
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Points")]
    pub points: f64,
}

impl CsvRow for FantasyPickRow {
    const HEADERS: &'static [&'static str] = &["Team", "Owner", "Player", "Points"];
}

impl From<&FantasyPick> for FantasyPickRow {
    fn from(p: &FantasyPick) -> Self {
        Self {
            team: p.team.clone(),
            owner: p.owner.clone(),
            player: p.player.clone(),
            points: round2(p.points),
        }
    }
}

/// Convert a slice of domain values into output rows.
pub fn rows<'a, S: 'a, R: From<&'a S>>(items: &'a [S]) -> Vec<R> {
    items.iter().map(R::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{MatchFormat, Team};
    use crate::scoring::{EventCounts, Outcome, PointBreakdown, Position};
    use std::env;
    use std::fs;

    fn summary() -> PlayerSummary {
        PlayerSummary {
            player: "Ada".to_string(),
            rank: 1,
            games_played: 3,
            games_won: 2,
            counts: EventCounts {
                goals: 4,
                ..Default::default()
            },
            goals_conceded: 5,
            points: PointBreakdown {
                participation: 6.0,
                goals: 4.0,
                outcome: 6.0,
                ..Default::default()
            },
            rank_change: -1,
        }
    }

    #[test]
    fn test_summary_row_presentation() {
        let row = SummaryRow::from(&summary());
        assert_eq!(row.win_ratio, "67%");
        assert_eq!(row.goals_per_game, 1.33);
        assert_eq!(row.points_per_game, 5.33);
        assert_eq!(row.total, 16.0);
        assert_eq!(row.rank_change, -1);
    }

    #[test]
    fn test_write_csv_headers_and_rows() {
        let dir = env::temp_dir().join("spl_standings_writer_test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("total.csv");

        let table: Vec<SummaryRow> = rows(&[summary()]);
        write_csv(&path, &table).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("Player,Rank,Games Played,Games Won,Win Ratio"));
        assert!(header.ends_with("PointsxG,Total,Rank Change"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("Ada,1,3,2,67%"));
        assert!(row.ends_with(",-1"));
        assert!(lines.next().is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_csv_empty_table_keeps_header() {
        let dir = env::temp_dir().join("spl_standings_writer_empty_test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fantasy_teams.csv");

        write_csv::<FantasyPickRow>(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Team,Owner,Player,Points\n");

        let _ = fs::remove_dir_all(&dir);
    }

    /// Header line serde would emit for `row`.
    fn serde_header<T: Serialize>(row: &T) -> String {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(row).unwrap();
        let bytes = writer.into_inner().unwrap();
        String::from_utf8(bytes).unwrap().lines().next().unwrap().to_string()
    }

    fn assert_headers_match<T: CsvRow>(row: &T) {
        assert_eq!(serde_header(row), T::HEADERS.join(","));
    }

    #[test]
    fn test_headers_match_field_names() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 2).unwrap();

        assert_headers_match(&GameRow {
            date,
            season: 1,
            gameweek: 1,
            match_type: "5-a-side",
            winning_team: "Draw".to_string(),
            team_a_goals: 1,
            team_b_goals: 1,
            players: 10,
        });
        let entry = ScoredEntry {
            player: "Ada".to_string(),
            date,
            season: 1,
            gameweek: 1,
            format: MatchFormat::Small,
            team: Team::TeamA,
            position: Position::Forward,
            counts: EventCounts::default(),
            goal_difference: 0,
            goals_conceded: 1,
            outcome: Outcome::Draw,
            points: PointBreakdown::default(),
        };
        assert_headers_match(&PointsRow::from(&entry));
        assert_headers_match(&SummaryRow::from(&summary()));
        assert_headers_match(&TrajectoryRow {
            player: "Ada".to_string(),
            date,
            cumulative: 3.0,
            rank: 1,
            rank_change: 0,
        });
        assert_headers_match(&TierRow {
            player: "Ada".to_string(),
            tier: 0,
            price: 2,
            games_played: 1,
            total_points: 3.0,
            points_per_game: 3.0,
        });
        assert_headers_match(&FantasyStandingRow {
            rank: 1,
            team: "Reds".to_string(),
            owner: "Gil".to_string(),
            total: 3.0,
            average_per_pick: 3.0,
        });
        assert_headers_match(&FantasyPickRow {
            team: "Reds".to_string(),
            owner: "Gil".to_string(),
            player: "Ada".to_string(),
            points: 3.0,
        });
    }

    #[test]
    fn test_write_csv_replaces_previous_file() {
        let dir = env::temp_dir().join("spl_standings_writer_replace_test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("trajectory_total.csv");
        fs::write(&path, "stale").unwrap();

        let point = TrajectoryPoint {
            player: "Bo".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 3, 2).unwrap(),
            cumulative: 7.456,
            rank: 2,
            rank_change: 0,
        };
        let table: Vec<TrajectoryRow> = rows(&[point]);
        write_csv(&path, &table).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Player,Date,Cumulative Points,Rank,Rank Change\nBo,2023-03-02,7.46,2,0\n"
        );

        let _ = fs::remove_dir_all(&dir);
    }
}
