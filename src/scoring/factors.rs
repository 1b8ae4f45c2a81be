use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Defensive,
    Midfielder,
    Outfield,
    Forward,
    Offensive,
}

impl Position {
    /// Parse a position exactly as written in the sheets.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Goalkeeper" => Some(Position::Goalkeeper),
            "Defender" => Some(Position::Defender),
            "Defensive" => Some(Position::Defensive),
            "Midfielder" => Some(Position::Midfielder),
            "Outfield" => Some(Position::Outfield),
            "Forward" => Some(Position::Forward),
            "Offensive" => Some(Position::Offensive),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Defensive => "Defensive",
            Position::Midfielder => "Midfielder",
            Position::Outfield => "Outfield",
            Position::Forward => "Forward",
            Position::Offensive => "Offensive",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn from_goal_difference(goal_difference: i32) -> Self {
        use std::cmp::Ordering;
        match goal_difference.cmp(&0) {
            Ordering::Greater => Outcome::Win,
            Ordering::Equal => Outcome::Draw,
            Ordering::Less => Outcome::Loss,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => f.write_str("Win"),
            Outcome::Draw => f.write_str("Draw"),
            Outcome::Loss => f.write_str("Loss"),
        }
    }
}

fn floor_at_zero(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Credit for keeping goals out: `defensive_base - goals_conceded`,
/// halved (rounded up) for midfield roles, nothing for attackers.
pub fn defensive_score(position: Position, defensive_base: f64, goals_conceded: u32) -> f64 {
    let raw = defensive_base - goals_conceded as f64;
    match position {
        Position::Goalkeeper | Position::Defender | Position::Defensive => floor_at_zero(raw),
        Position::Midfielder | Position::Outfield => floor_at_zero((raw / 2.0).ceil()),
        Position::Forward | Position::Offensive => 0.0,
    }
}

/// Credit for a positive goal difference; halved (rounded up) for forwards.
pub fn midfield_score(position: Position, goal_difference: i32) -> f64 {
    let raw = goal_difference as f64;
    match position {
        Position::Midfielder | Position::Offensive | Position::Outfield => floor_at_zero(raw),
        Position::Forward => floor_at_zero((raw / 2.0).ceil()),
        Position::Goalkeeper | Position::Defender | Position::Defensive => 0.0,
    }
}
