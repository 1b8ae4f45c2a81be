use chrono::NaiveDate;
use std::collections::HashMap;

use super::config::RuleTable;
use super::factors::{defensive_score, midfield_score, Outcome, Position};
use crate::dataset::{AttendanceRow, RosterRow};
use crate::error::StandingsError;
use crate::games::{GameRecord, MatchFormat, Team};

/// Raw per-game event counts for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub goals: u32,
    pub own_goals: u32,
    pub league_bonus: u32,
    pub mvp: u32,
    pub referrals: u32,
    pub penalties: u32,
}

impl EventCounts {
    pub fn add(&mut self, other: &EventCounts) {
        self.goals += other.goals;
        self.own_goals += other.own_goals;
        self.league_bonus += other.league_bonus;
        self.mvp += other.mvp;
        self.referrals += other.referrals;
        self.penalties += other.penalties;
    }
}

/// Itemized points for one or more games.
///
/// There is no stored total; [`PointBreakdown::total`] is always the sum
/// of the category fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointBreakdown {
    pub participation: f64,
    pub goals: f64,
    pub own_goals: f64,
    pub league_bonus: f64,
    pub mvp: f64,
    pub referrals: f64,
    pub penalties: f64,
    pub goalkeeper: f64,
    pub defensive: f64,
    pub midfield: f64,
    pub outcome: f64,
}

impl PointBreakdown {
    pub const LABELS: [&'static str; 11] = [
        "Participation Points",
        "Goal Points",
        "Own Goal Points",
        "SPL Bonus Points",
        "MVP Points",
        "Friend Referrals Points",
        "Penalty Points",
        "Goalkeeper Points",
        "Defensive Score Points",
        "Midfield Score",
        "Game Outcome Points",
    ];

    /// Category values in [`PointBreakdown::LABELS`] order.
    pub fn values(&self) -> [f64; 11] {
        [
            self.participation,
            self.goals,
            self.own_goals,
            self.league_bonus,
            self.mvp,
            self.referrals,
            self.penalties,
            self.goalkeeper,
            self.defensive,
            self.midfield,
            self.outcome,
        ]
    }

    pub fn total(&self) -> f64 {
        self.values().iter().sum()
    }

    pub fn add(&mut self, other: &PointBreakdown) {
        self.participation += other.participation;
        self.goals += other.goals;
        self.own_goals += other.own_goals;
        self.league_bonus += other.league_bonus;
        self.mvp += other.mvp;
        self.referrals += other.referrals;
        self.penalties += other.penalties;
        self.goalkeeper += other.goalkeeper;
        self.defensive += other.defensive;
        self.midfield += other.midfield;
        self.outcome += other.outcome;
    }

    /// Per-game means; all zero when `games` is zero.
    pub fn mean_over(&self, games: u32) -> PointBreakdown {
        if games == 0 {
            return PointBreakdown::default();
        }
        let n = games as f64;
        PointBreakdown {
            participation: self.participation / n,
            goals: self.goals / n,
            own_goals: self.own_goals / n,
            league_bonus: self.league_bonus / n,
            mvp: self.mvp / n,
            referrals: self.referrals / n,
            penalties: self.penalties / n,
            goalkeeper: self.goalkeeper / n,
            defensive: self.defensive / n,
            midfield: self.midfield / n,
            outcome: self.outcome / n,
        }
    }
}

/// A player's attendance with team and position resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerGameEntry {
    pub player: String,
    pub date: NaiveDate,
    pub team: Team,
    pub position: Position,
    pub counts: EventCounts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry {
    pub player: String,
    pub date: NaiveDate,
    pub season: u32,
    pub gameweek: u32,
    pub format: MatchFormat,
    pub team: Team,
    pub position: Position,
    pub counts: EventCounts,
    pub goal_difference: i32,
    pub goals_conceded: u32,
    pub outcome: Outcome,
    pub points: PointBreakdown,
}

impl ScoredEntry {
    pub fn total(&self) -> f64 {
        self.points.total()
    }

    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }
}

/// Score a single entry against its fixture.
///
/// The rule table is always passed in; a format without rules fails.
pub fn calculate_points(
    entry: &PlayerGameEntry,
    game: &GameRecord,
    rules: &RuleTable,
) -> Result<ScoredEntry, StandingsError> {
    let format_rules = rules.rules_for(game.format)?;
    let counts = entry.counts;
    let goal_difference = game.goal_difference(entry.team);
    let goals_conceded = game.goals_conceded(entry.team);
    let outcome = Outcome::from_goal_difference(goal_difference);

    let points = PointBreakdown {
        participation: format_rules.participation,
        goals: counts.goals as f64 * format_rules.goal,
        own_goals: counts.own_goals as f64 * format_rules.own_goal,
        league_bonus: counts.league_bonus as f64 * format_rules.league_bonus,
        mvp: counts.mvp as f64 * format_rules.mvp,
        referrals: counts.referrals as f64 * format_rules.referrals,
        penalties: counts.penalties as f64 * format_rules.penalty,
        goalkeeper: if entry.position == Position::Goalkeeper {
            format_rules.goalkeeper
        } else {
            0.0
        },
        defensive: defensive_score(entry.position, format_rules.defensive_base, goals_conceded),
        midfield: midfield_score(entry.position, goal_difference),
        outcome: format_rules.outcome_bonus(outcome),
    };

    Ok(ScoredEntry {
        player: entry.player.clone(),
        date: entry.date,
        season: game.season,
        gameweek: game.gameweek,
        format: game.format,
        team: entry.team,
        position: entry.position,
        counts,
        goal_difference,
        goals_conceded,
        outcome,
        points,
    })
}

/// Resolve a raw attendance row: the per-game override wins, else the
/// player's roster default for the game's format.
pub fn resolve_entry(
    row: &AttendanceRow,
    format: MatchFormat,
    roster: &HashMap<String, RosterRow>,
) -> Result<PlayerGameEntry, StandingsError> {
    let team = Team::parse(&row.team).ok_or_else(|| StandingsError::UnknownTeam {
        player: row.player.clone(),
        date: row.date,
        team: row.team.clone(),
    })?;

    let raw_position = match &row.game_position {
        Some(p) => p.as_str(),
        None => roster
            .get(&row.player)
            .and_then(|r| match format {
                MatchFormat::Small => r.position_small.as_deref(),
                MatchFormat::Medium => r.position_medium.as_deref(),
                MatchFormat::Large => r.position_large.as_deref(),
            })
            .ok_or_else(|| StandingsError::MissingPosition {
                player: row.player.clone(),
                format,
            })?,
    };
    let position =
        Position::parse(raw_position).ok_or_else(|| StandingsError::UnrecognizedPosition {
            player: row.player.clone(),
            date: row.date,
            position: raw_position.to_string(),
        })?;

    Ok(PlayerGameEntry {
        player: row.player.clone(),
        date: row.date,
        team,
        position,
        counts: EventCounts {
            goals: row.goals,
            own_goals: row.own_goals,
            league_bonus: row.league_bonus,
            mvp: row.mvp,
            referrals: row.referrals,
            penalties: row.penalties,
        },
    })
}

/// Score every attendance row. Output is ordered by date, then input order.
pub fn score_attendance(
    attendance: &[AttendanceRow],
    games: &[GameRecord],
    roster: &HashMap<String, RosterRow>,
    rules: &RuleTable,
) -> Result<Vec<ScoredEntry>, StandingsError> {
    let by_date: HashMap<NaiveDate, &GameRecord> = games.iter().map(|g| (g.date, g)).collect();

    let mut scored = attendance
        .iter()
        .map(|row| {
            let game = by_date
                .get(&row.date)
                .ok_or_else(|| StandingsError::OrphanAttendance {
                    player: row.player.clone(),
                    date: row.date,
                })?;
            let entry = resolve_entry(row, game.format, roster)?;
            calculate_points(&entry, game, rules)
        })
        .collect::<Result<Vec<_>, _>>()?;

    scored.sort_by_key(|e| e.date);
    crate::standings::ensure_unique_entries(scored.iter().map(|e| (e.player.as_str(), e.date)))?;
    Ok(scored)
}
