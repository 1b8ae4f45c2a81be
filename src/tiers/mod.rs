pub mod kmeans;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::standings::PlayerSummary;

/// Draft-tier clustering settings.
///
/// Example YAML:
/// ```yaml
/// tiers:
///   season: 1
///   min_clusters: 3
///   max_clusters: 5
///   price_max: 10
///   price_min: 2
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct TierConfig {
    pub enabled: bool,
    /// Season to cluster; `None` clusters the all-time cohort
    pub season: Option<u32>,
    pub min_clusters: usize,
    pub max_clusters: usize,
    /// k-means runs per candidate k
    pub restarts: usize,
    pub seed: u64,
    pub price_max: u32,
    pub price_min: u32,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            season: Some(1),
            min_clusters: 3,
            max_clusters: 5,
            restarts: 10,
            seed: 42,
            price_max: 10,
            price_min: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierAssignment {
    pub player: String,
    /// 0 is the cheapest tier
    pub tier: usize,
    /// Price in $M
    pub price: u32,
    pub games_played: u32,
    pub total_points: f64,
    pub points_per_game: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierSummary {
    pub tier: usize,
    pub price: u32,
    pub players: usize,
    pub avg_total_points: f64,
    pub avg_games_played: f64,
    pub avg_points_per_game: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TierTable {
    /// Sorted by tier, then total points descending, then player
    pub assignments: Vec<TierAssignment>,
    pub tiers: Vec<TierSummary>,
}

fn features(summary: &PlayerSummary) -> Vec<f64> {
    vec![
        summary.total(),
        summary.points.goals,
        summary.points.defensive,
        summary.points.midfield,
        summary.points.mvp,
        summary.games_played as f64,
        summary.points_per_game(),
    ]
}

/// Evenly spaced prices from `max` down to `min`, rounded.
fn price_ladder(max: u32, min: u32, k: usize) -> Vec<u32> {
    if k == 1 {
        return vec![max];
    }
    let step = (max as f64 - min as f64) / (k - 1) as f64;
    (0..k)
        .map(|i| (max as f64 - step * i as f64).round_ties_even() as u32)
        .collect()
}

/// Group players into price tiers.
///
/// Players are clustered on standardized aggregate stats; clusters are
/// then ordered by mean (total, games, points per game) and priced down
/// the ladder from the strongest. Tier ids run 0..k-1 in ascending price,
/// so they never depend on the ids the clustering happened to assign.
pub fn assign_tiers(summaries: &[PlayerSummary], config: &TierConfig) -> TierTable {
    if summaries.is_empty() {
        return TierTable::default();
    }

    let scaled = kmeans::standardize(&summaries.iter().map(features).collect::<Vec<_>>());
    let max_k = config.max_clusters.min(summaries.len()).max(1);
    let min_k = config.min_clusters.clamp(1, max_k);

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let fits: Vec<_> = (min_k..=max_k)
        .map(|k| kmeans::fit(&scaled, k, config.restarts, &mut rng))
        .collect();
    let inertias: Vec<f64> = fits.iter().map(|f| f.inertia).collect();
    let k = kmeans::choose_k(&inertias, min_k);
    let fit = &fits[k - min_k];

    // (cluster id, players, mean total, mean games, mean ppg)
    let mut clusters: Vec<(usize, usize, f64, f64, f64)> = (0..k)
        .map(|cluster| {
            let members: Vec<&PlayerSummary> = summaries
                .iter()
                .zip(&fit.labels)
                .filter(|(_, label)| **label == cluster)
                .map(|(s, _)| s)
                .collect();
            let n = members.len().max(1) as f64;
            (
                cluster,
                members.len(),
                members.iter().map(|s| s.total()).sum::<f64>() / n,
                members.iter().map(|s| s.games_played as f64).sum::<f64>() / n,
                members.iter().map(|s| s.points_per_game()).sum::<f64>() / n,
            )
        })
        .filter(|c| c.1 > 0)
        .collect();
    clusters.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(Ordering::Equal)
            .then(b.3.partial_cmp(&a.3).unwrap_or(Ordering::Equal))
            .then(b.4.partial_cmp(&a.4).unwrap_or(Ordering::Equal))
            .then(a.0.cmp(&b.0))
    });

    let prices = price_ladder(config.price_max, config.price_min, clusters.len());
    let cheapest = clusters.len() - 1;
    let mut tier_of = vec![0usize; k];
    let mut tiers: Vec<TierSummary> = clusters
        .iter()
        .enumerate()
        .map(|(strength, c)| {
            let tier = cheapest - strength;
            tier_of[c.0] = tier;
            TierSummary {
                tier,
                price: prices[strength],
                players: c.1,
                avg_total_points: c.2,
                avg_games_played: c.3,
                avg_points_per_game: c.4,
            }
        })
        .collect();
    tiers.reverse();

    let mut assignments: Vec<TierAssignment> = summaries
        .iter()
        .zip(&fit.labels)
        .map(|(summary, label)| {
            let tier = tier_of[*label];
            TierAssignment {
                player: summary.player.clone(),
                tier,
                price: tiers[tier].price,
                games_played: summary.games_played,
                total_points: summary.total(),
                points_per_game: summary.points_per_game(),
            }
        })
        .collect();
    assignments.sort_by(|a, b| {
        a.tier
            .cmp(&b.tier)
            .then(b.total_points.partial_cmp(&a.total_points).unwrap_or(Ordering::Equal))
            .then_with(|| a.player.cmp(&b.player))
    });

    TierTable { assignments, tiers }
}
