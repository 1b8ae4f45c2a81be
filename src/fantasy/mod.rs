use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::standings::{min_rank, PlayerSummary};

/// Which cohort's totals score fantasy picks.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct FantasyConfig {
    /// `None` scores picks with all-time totals
    pub season: Option<u32>,
}

impl Default for FantasyConfig {
    fn default() -> Self {
        Self { season: Some(2) }
    }
}

/// One fantasy team and the league players it picked.
#[derive(Debug, Clone, PartialEq)]
pub struct FantasyTeam {
    pub owner: String,
    pub name: String,
    pub picks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FantasyPick {
    pub team: String,
    pub owner: String,
    pub player: String,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FantasyStanding {
    pub rank: u32,
    pub team: String,
    pub owner: String,
    pub total: f64,
    pub average_per_pick: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FantasyTable {
    /// Sorted by rank, then team name
    pub standings: Vec<FantasyStanding>,
    /// Picks in team order, then pick order
    pub picks: Vec<FantasyPick>,
    /// Picked names with no summary in the cohort; they score 0
    pub unknown_players: Vec<String>,
}

/// Score every fantasy team by the summed totals of its picks.
pub fn fantasy_standings(teams: &[FantasyTeam], summaries: &[PlayerSummary]) -> FantasyTable {
    let totals: HashMap<&str, f64> = summaries
        .iter()
        .map(|s| (s.player.as_str(), s.total()))
        .collect();

    let mut unknown = BTreeSet::new();
    let mut picks = Vec::new();
    let mut standings = Vec::with_capacity(teams.len());
    for team in teams {
        let mut total = 0.0;
        for player in &team.picks {
            let points = match totals.get(player.as_str()) {
                Some(&points) => points,
                None => {
                    unknown.insert(player.clone());
                    0.0
                }
            };
            total += points;
            picks.push(FantasyPick {
                team: team.name.clone(),
                owner: team.owner.clone(),
                player: player.clone(),
                points,
            });
        }
        let average_per_pick = if team.picks.is_empty() {
            0.0
        } else {
            total / team.picks.len() as f64
        };
        standings.push(FantasyStanding {
            rank: 0,
            team: team.name.clone(),
            owner: team.owner.clone(),
            total,
            average_per_pick,
        });
    }

    let team_totals: Vec<f64> = standings.iter().map(|s| s.total).collect();
    for (standing, rank) in standings.iter_mut().zip(min_rank(&team_totals)) {
        standing.rank = rank;
    }
    standings.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.team.cmp(&b.team)));

    FantasyTable {
        standings,
        picks,
        unknown_players: unknown.into_iter().collect(),
    }
}
