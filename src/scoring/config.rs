use std::collections::{BTreeMap, HashMap};

use crate::error::StandingsError;
use crate::games::MatchFormat;

use super::factors::Outcome;

pub const PARTICIPATION: &str = "Participation";
pub const GOAL: &str = "Goal";
pub const OWN_GOAL: &str = "Own Goal";
pub const LEAGUE_BONUS: &str = "SPL Bonus";
pub const MVP: &str = "MVP";
pub const REFERRALS: &str = "Friend Referrals";
pub const PENALTY: &str = "Penalty";
pub const GOALKEEPER_SCORE: &str = "Goalkeeper Score";
pub const DEFENSIVE_SCORE: &str = "Defensive Score";
pub const WIN: &str = "Win";
pub const DRAW: &str = "Draw";
pub const LOSS: &str = "Loss";

/// Every parameter row the rule table must define for each format.
pub const PARAMETER_KEYS: [&str; 12] = [
    PARTICIPATION,
    GOAL,
    OWN_GOAL,
    LEAGUE_BONUS,
    MVP,
    REFERRALS,
    PENALTY,
    GOALKEEPER_SCORE,
    DEFENSIVE_SCORE,
    WIN,
    DRAW,
    LOSS,
];

/// Raw parameter sheet: parameter name -> format label -> value.
pub type ParameterSheet = BTreeMap<String, BTreeMap<String, f64>>;

/// Coefficients and thresholds for a single match format.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRules {
    /// Flat points for turning up
    pub participation: f64,
    pub goal: f64,
    /// Usually negative
    pub own_goal: f64,
    pub league_bonus: f64,
    pub mvp: f64,
    pub referrals: f64,
    pub penalty: f64,
    /// Flat bonus when playing in goal
    pub goalkeeper: f64,
    /// Clean-sheet credit before goals conceded are subtracted
    pub defensive_base: f64,
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}

impl FormatRules {
    pub fn outcome_bonus(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Win => self.win,
            Outcome::Draw => self.draw,
            Outcome::Loss => self.loss,
        }
    }

    /// Value for a parameter row name, as written in the sheet.
    pub fn get(&self, key: &str) -> Option<f64> {
        let value = match key {
            PARTICIPATION => self.participation,
            GOAL => self.goal,
            OWN_GOAL => self.own_goal,
            LEAGUE_BONUS => self.league_bonus,
            MVP => self.mvp,
            REFERRALS => self.referrals,
            PENALTY => self.penalty,
            GOALKEEPER_SCORE => self.goalkeeper,
            DEFENSIVE_SCORE => self.defensive_base,
            WIN => self.win,
            DRAW => self.draw,
            LOSS => self.loss,
            _ => return None,
        };
        Some(value)
    }
}

/// Scoring rules keyed by match format. Loaded once per league and only
/// read while scoring.
///
/// Example `parameters.csv`:
/// ```text
/// Parameter,5-a-side,7-a-side,11-a-side
/// Participation,2,2,2
/// Goal,1,1.5,2
/// Defensive Score,3,4,5
/// ...
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable {
    formats: HashMap<MatchFormat, FormatRules>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: MatchFormat, rules: FormatRules) -> Self {
        self.formats.insert(format, rules);
        self
    }

    /// Build the table from a parameter sheet.
    ///
    /// Unknown parameter rows and unknown format columns are rejected, and
    /// every format column must define all [`PARAMETER_KEYS`].
    pub fn from_sheet(table: &str, sheet: &ParameterSheet) -> Result<Self, StandingsError> {
        for key in sheet.keys() {
            if !PARAMETER_KEYS.contains(&key.as_str()) {
                return Err(StandingsError::UnknownParameter {
                    table: table.to_string(),
                    key: key.clone(),
                });
            }
        }

        let mut labels: Vec<&String> = sheet.values().flat_map(|row| row.keys()).collect();
        labels.sort();
        labels.dedup();

        let mut rules = RuleTable::new();
        for label in labels {
            let format = MatchFormat::from_label(label).ok_or_else(|| {
                StandingsError::UnknownFormatLabel {
                    table: table.to_string(),
                    label: label.clone(),
                }
            })?;
            let lookup = |key: &str| -> Result<f64, StandingsError> {
                sheet
                    .get(key)
                    .and_then(|row| row.get(label))
                    .copied()
                    .ok_or_else(|| StandingsError::MissingRule {
                        format,
                        key: key.to_string(),
                    })
            };
            let format_rules = FormatRules {
                participation: lookup(PARTICIPATION)?,
                goal: lookup(GOAL)?,
                own_goal: lookup(OWN_GOAL)?,
                league_bonus: lookup(LEAGUE_BONUS)?,
                mvp: lookup(MVP)?,
                referrals: lookup(REFERRALS)?,
                penalty: lookup(PENALTY)?,
                goalkeeper: lookup(GOALKEEPER_SCORE)?,
                defensive_base: lookup(DEFENSIVE_SCORE)?,
                win: lookup(WIN)?,
                draw: lookup(DRAW)?,
                loss: lookup(LOSS)?,
            };
            rules.formats.insert(format, format_rules);
        }

        Ok(rules)
    }

    /// Rules for `format`. A missing format is a configuration error,
    /// never a silent default.
    pub fn rules_for(&self, format: MatchFormat) -> Result<&FormatRules, StandingsError> {
        self.formats
            .get(&format)
            .ok_or(StandingsError::MissingFormat(format))
    }

    /// Formats present, in Small..Large order.
    pub fn formats(&self) -> Vec<MatchFormat> {
        MatchFormat::ALL
            .into_iter()
            .filter(|f| self.formats.contains_key(f))
            .collect()
    }
}
