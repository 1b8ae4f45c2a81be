use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::StandingsError;
use crate::scoring::ScoredEntry;

/// Round to 2 decimals, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Rank values descending; ties share a rank and the next distinct value
/// gets `1 + count strictly ahead`. `[50, 50, 40]` ranks as `[1, 1, 3]`.
///
/// Values are compared at 2 decimals, as they are published.
pub fn min_rank(values: &[f64]) -> Vec<u32> {
    let values: Vec<f64> = values.iter().map(|&v| round2(v)).collect();
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0; values.len()];
    let mut previous: Option<(f64, u32)> = None;
    for (position, &idx) in order.iter().enumerate() {
        let rank = match previous {
            Some((value, rank)) if value == values[idx] => rank,
            _ => position as u32 + 1,
        };
        ranks[idx] = rank;
        previous = Some((values[idx], rank));
    }
    ranks
}

/// Reject a cohort in which any player appears twice on the same date.
pub fn ensure_unique_entries<'a>(
    entries: impl IntoIterator<Item = (&'a str, NaiveDate)>,
) -> Result<(), StandingsError> {
    let mut seen = HashSet::new();
    for (player, date) in entries {
        if !seen.insert((player, date)) {
            return Err(StandingsError::DuplicateEntry {
                player: player.to_string(),
                date,
            });
        }
    }
    Ok(())
}

/// A player's standing right after one of their games.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPoint {
    pub player: String,
    pub date: NaiveDate,
    pub cumulative: f64,
    pub rank: u32,
    /// Previous rank minus this rank: positive means the player climbed.
    /// Zero on a player's first game.
    pub rank_change: i32,
}

/// Replay a cohort in date order. After each game date every player seen
/// so far is ranked by cumulative total, and each player who played that
/// day gets a trajectory point.
///
/// Points are ordered by date, then player name.
pub fn rank_trajectory(entries: &[ScoredEntry]) -> Vec<TrajectoryPoint> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ScoredEntry>> = BTreeMap::new();
    for entry in entries {
        by_date.entry(entry.date).or_default().push(entry);
    }

    let mut cumulative: BTreeMap<&str, f64> = BTreeMap::new();
    let mut last_rank: HashMap<&str, u32> = HashMap::new();
    let mut points = Vec::with_capacity(entries.len());

    for (date, mut played) in by_date {
        for entry in &played {
            *cumulative.entry(entry.player.as_str()).or_default() += entry.total();
        }

        let names: Vec<&str> = cumulative.keys().copied().collect();
        let totals: Vec<f64> = cumulative.values().copied().collect();
        let ranks: HashMap<&str, u32> = names.into_iter().zip(min_rank(&totals)).collect();

        played.sort_by(|a, b| a.player.cmp(&b.player));
        for entry in played {
            let player = entry.player.as_str();
            let rank = ranks[player];
            let rank_change = last_rank
                .get(player)
                .map(|&previous| previous as i32 - rank as i32)
                .unwrap_or(0);
            last_rank.insert(player, rank);
            points.push(TrajectoryPoint {
                player: entry.player.clone(),
                date,
                cumulative: cumulative[player],
                rank,
                rank_change,
            });
        }
    }

    points
}

/// Most recent rank change per player.
pub fn latest_rank_changes(trajectory: &[TrajectoryPoint]) -> HashMap<String, i32> {
    let mut latest = HashMap::new();
    for point in trajectory {
        latest.insert(point.player.clone(), point.rank_change);
    }
    latest
}
