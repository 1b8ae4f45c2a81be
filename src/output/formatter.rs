use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::PointBreakdown;
use crate::standings::{round2, PlayerSummary};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Win ratio as an integer percentage, ties to even: 0.666 -> "67%", 0.125 -> "12%"
pub fn format_win_ratio(ratio: f64) -> String {
    format!("{}%", (ratio * 100.0).round_ties_even() as i64)
}

/// Signed rank change: "+2", "-1", "0"
pub fn format_rank_change(change: i32) -> String {
    if change > 0 {
        format!("+{}", change)
    } else {
        change.to_string()
    }
}

/// Points with at most 2 decimals and no trailing zeros: 12.5, 3, -0.25
pub fn format_points(value: f64) -> String {
    let formatted = format!("{:.2}", round2(value));
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a cohort's standings as an aligned table:
/// rank, player, games, win ratio, total, points per game, rank change.
///
/// The player column shrinks to fit the terminal; pipes get full names.
pub fn format_leaderboard(summaries: &[PlayerSummary], use_colors: bool) -> String {
    format_leaderboard_with_width(summaries, use_colors, get_terminal_width())
}

fn format_leaderboard_with_width(
    summaries: &[PlayerSummary],
    use_colors: bool,
    term_width: Option<usize>,
) -> String {
    if summaries.is_empty() {
        return "No games played.".to_string();
    }

    // "999." + "  GP" + "  Win%" + "   Total" + "    PPG" + "  Chg" + gaps
    let fixed_width = 4 + 5 + 6 + 10 + 8 + 6 + 2;
    let longest = summaries
        .iter()
        .map(|s| s.player.chars().count())
        .max()
        .unwrap_or(0)
        .max("Player".len());
    let name_width = match term_width {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    };

    let header = format!(
        "{:>4}  {:<name_width$} {:>4} {:>5} {:>9} {:>7} {:>5}",
        "#",
        "Player",
        "GP",
        "Win%",
        "Total",
        "PPG",
        "Chg",
        name_width = name_width
    );
    let mut lines = vec![if use_colors {
        header.dimmed().to_string()
    } else {
        header
    }];

    for s in summaries {
        let rank = format!("{:>3}.", s.rank);
        let name = format!(
            "{:<name_width$}",
            truncate_name(&s.player, name_width),
            name_width = name_width
        );
        let stats = format!(
            "{:>4} {:>5} {:>9} {:>7}",
            s.games_played,
            format_win_ratio(s.win_ratio()),
            format_points(s.total()),
            format_points(s.points_per_game()),
        );
        let change = format!("{:>5}", format_rank_change(s.rank_change));

        let line = if use_colors {
            let change = match s.rank_change {
                c if c > 0 => change.green().to_string(),
                c if c < 0 => change.red().to_string(),
                _ => change.dimmed().to_string(),
            };
            format!("{}  {} {} {}", rank.dimmed(), name.bold(), stats, change)
        } else {
            format!("{}  {} {} {}", rank, name, stats, change)
        };
        lines.push(line);
    }

    lines.join("\n")
}

/// Format standings as tab-separated values for scripting
/// Columns: rank, player, games, wins, win ratio, total, rank change (no headers, no colors)
pub fn format_leaderboard_tsv(summaries: &[PlayerSummary]) -> String {
    summaries
        .iter()
        .map(|s| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                s.rank,
                s.player,
                s.games_played,
                s.games_won,
                format_win_ratio(s.win_ratio()),
                format_points(s.total()),
                s.rank_change
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Serialize)]
struct LeaderboardEntry<'a> {
    rank: u32,
    player: &'a str,
    games_played: u32,
    games_won: u32,
    win_ratio: f64,
    total: f64,
    points_per_game: f64,
    rank_change: i32,
    points: BTreeMap<&'static str, f64>,
    points_mean: BTreeMap<&'static str, f64>,
}

fn by_label(points: &PointBreakdown) -> BTreeMap<&'static str, f64> {
    PointBreakdown::LABELS
        .iter()
        .zip(points.values())
        .map(|(label, value)| (*label, round2(value)))
        .collect()
}

/// Format standings as a pretty-printed JSON array, with per-category sums
/// and means keyed by column label.
pub fn format_leaderboard_json(summaries: &[PlayerSummary]) -> Result<String> {
    let entries: Vec<LeaderboardEntry> = summaries
        .iter()
        .map(|s| LeaderboardEntry {
            rank: s.rank,
            player: &s.player,
            games_played: s.games_played,
            games_won: s.games_won,
            win_ratio: round2(s.win_ratio()),
            total: round2(s.total()),
            points_per_game: round2(s.points_per_game()),
            rank_change: s.rank_change,
            points: by_label(&s.points),
            points_mean: by_label(&s.points_mean()),
        })
        .collect();
    serde_json::to_string_pretty(&entries).context("Failed to serialize leaderboard")
}
