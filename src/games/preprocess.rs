use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::format::{FormatBreakpoints, MatchFormat};
use super::season::SeasonCalendar;
use crate::dataset::{AttendanceRow, FixtureRow};
use crate::error::StandingsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Team {
    TeamA,
    TeamB,
}

impl Team {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Team A" => Some(Team::TeamA),
            "Team B" => Some(Team::TeamB),
            _ => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::TeamA => f.write_str("Team A"),
            Team::TeamB => f.write_str("Team B"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Winner {
    TeamA,
    TeamB,
    Draw,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::TeamA => f.write_str("Team A"),
            Winner::TeamB => f.write_str("Team B"),
            Winner::Draw => f.write_str("Draw"),
        }
    }
}

/// A normalized fixture. One per played game date.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub team_a_goals: u32,
    pub team_b_goals: u32,
    pub winner: Winner,
    pub season: u32,
    pub gameweek: u32,
    pub format: MatchFormat,
    pub headcount: u32,
}

impl GameRecord {
    /// Goals scored by `team` minus goals scored by its opponent.
    pub fn goal_difference(&self, team: Team) -> i32 {
        let (own, other) = match team {
            Team::TeamA => (self.team_a_goals, self.team_b_goals),
            Team::TeamB => (self.team_b_goals, self.team_a_goals),
        };
        own as i32 - other as i32
    }

    /// Goals scored against `team`.
    pub fn goals_conceded(&self, team: Team) -> u32 {
        match team {
            Team::TeamA => self.team_b_goals,
            Team::TeamB => self.team_a_goals,
        }
    }
}

pub fn winner_of(team_a_goals: u32, team_b_goals: u32) -> Winner {
    use std::cmp::Ordering;
    match team_a_goals.cmp(&team_b_goals) {
        Ordering::Greater => Winner::TeamA,
        Ordering::Less => Winner::TeamB,
        Ordering::Equal => Winner::Draw,
    }
}

/// Normalize the raw fixture list into one [`GameRecord`] per fixture.
///
/// Fixtures are ordered by date (input order breaks ties, though duplicate
/// dates are rejected). Gameweeks count up from 1 within each season.
/// Attendance rows are only counted here; they are validated further by
/// the scoring stage.
pub fn preprocess_games(
    fixtures: &[FixtureRow],
    attendance: &[AttendanceRow],
    calendar: &SeasonCalendar,
    breakpoints: &FormatBreakpoints,
) -> Result<Vec<GameRecord>, StandingsError> {
    let mut seen_dates = HashSet::new();
    for fixture in fixtures {
        if !seen_dates.insert(fixture.date) {
            return Err(StandingsError::DuplicateFixture { date: fixture.date });
        }
    }

    crate::standings::ensure_unique_entries(
        attendance.iter().map(|row| (row.player.as_str(), row.date)),
    )?;

    let mut headcounts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for row in attendance {
        if !seen_dates.contains(&row.date) {
            return Err(StandingsError::OrphanAttendance {
                player: row.player.clone(),
                date: row.date,
            });
        }
        *headcounts.entry(row.date).or_default() += 1;
    }

    let mut ordered: Vec<&FixtureRow> = fixtures.iter().collect();
    ordered.sort_by_key(|f| f.date);

    let mut gameweeks: BTreeMap<u32, u32> = BTreeMap::new();
    let mut games = Vec::with_capacity(ordered.len());
    for fixture in ordered {
        let headcount = match headcounts.get(&fixture.date) {
            Some(&n) => n,
            None => return Err(StandingsError::NoAttendance { date: fixture.date }),
        };
        let season = calendar.season_of(fixture.date);
        let gameweek = gameweeks.entry(season).or_default();
        *gameweek += 1;

        games.push(GameRecord {
            date: fixture.date,
            team_a_goals: fixture.team_a_goals,
            team_b_goals: fixture.team_b_goals,
            winner: winner_of(fixture.team_a_goals, fixture.team_b_goals),
            season,
            gameweek: *gameweek,
            format: breakpoints.classify(headcount),
            headcount,
        });
    }

    Ok(games)
}
