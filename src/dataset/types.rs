use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of `games.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FixtureRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Team A Goals")]
    pub team_a_goals: u32,
    #[serde(rename = "Team B Goals")]
    pub team_b_goals: u32,
}

/// One row of `points.csv`: a player's attendance and raw events for a game.
///
/// `team` and `game_position` stay as text here; the scoring stage
/// validates them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AttendanceRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Game Position", default, deserialize_with = "empty_as_none")]
    pub game_position: Option<String>,
    #[serde(rename = "Goals", default, deserialize_with = "empty_as_zero")]
    pub goals: u32,
    #[serde(rename = "Own Goals", default, deserialize_with = "empty_as_zero")]
    pub own_goals: u32,
    #[serde(rename = "SPL Bonus", default, deserialize_with = "empty_as_zero")]
    pub league_bonus: u32,
    #[serde(rename = "MVP", default, deserialize_with = "empty_as_zero")]
    pub mvp: u32,
    #[serde(rename = "Friend Referrals", default, deserialize_with = "empty_as_zero")]
    pub referrals: u32,
    #[serde(rename = "Penalty", default, deserialize_with = "empty_as_zero")]
    pub penalties: u32,
}

/// One row of `players.csv`: default positions per match format.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RosterRow {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Position 5-a-side", default, deserialize_with = "empty_as_none")]
    pub position_small: Option<String>,
    #[serde(rename = "Position 7-a-side", default, deserialize_with = "empty_as_none")]
    pub position_medium: Option<String>,
    #[serde(rename = "Position 11-a-side", default, deserialize_with = "empty_as_none")]
    pub position_large: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

fn empty_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(0),
        Some(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
