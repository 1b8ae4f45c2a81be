use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Config;
use crate::dataset::{discover_leagues, league_name, load_league, LeagueDataset};
use crate::fantasy::{fantasy_standings, FantasyTable};
use crate::games::{preprocess_games, GameRecord, MatchFormat};
use crate::output::{
    rows, write_csv, CsvRow, FantasyPickRow, FantasyStandingRow, GameRow, PointsRow, SummaryRow,
    TierRow, TrajectoryRow,
};
use crate::scoring::{score_attendance, validate_rule_table, ScoredEntry};
use crate::standings::{build_standings, cohorts_of, Cohort, PlayerSummary, Standings};
use crate::tiers::{assign_tiers, TierTable};

/// Standings of one cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortReport {
    pub cohort: Cohort,
    pub standings: Standings,
}

/// Everything derived from one league's records.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueReport {
    pub name: String,
    pub games: Vec<GameRecord>,
    pub entries: Vec<ScoredEntry>,
    /// Seasons ascending, then all-time
    pub cohorts: Vec<CohortReport>,
    pub tiers: Option<TierTable>,
    pub fantasy: Option<FantasyTable>,
}

impl LeagueReport {
    /// Summaries of `cohort`; empty when the league has no games in it.
    pub fn summaries(&self, cohort: Cohort) -> &[PlayerSummary] {
        self.cohorts
            .iter()
            .find(|c| c.cohort == cohort)
            .map(|c| c.standings.summaries.as_slice())
            .unwrap_or(&[])
    }
}

/// Run the preprocess, score and aggregate stages over a loaded league.
pub fn process_league(league: &LeagueDataset, config: &Config, verbose: bool) -> Result<LeagueReport> {
    let name = &league.name;
    let start = Instant::now();

    let games = preprocess_games(
        &league.fixtures,
        &league.attendance,
        &config.seasons,
        &config.match_formats,
    )
    .with_context(|| format!("{}: preprocessing games failed", name))?;

    if verbose {
        eprintln!("[{}] {} games, {} attendance rows", name, games.len(), league.attendance.len());
    }

    let used: BTreeSet<MatchFormat> = games.iter().map(|g| g.format).collect();
    let used: Vec<MatchFormat> = used.into_iter().collect();
    if let Err(errors) = validate_rule_table(&league.rules, &used) {
        anyhow::bail!("{}: invalid rule table:\n  - {}", name, errors.join("\n  - "));
    }

    let entries = score_attendance(&league.attendance, &games, &league.roster, &league.rules)
        .with_context(|| format!("{}: scoring failed", name))?;

    if verbose {
        eprintln!("[{}] Scored {} entries", name, entries.len());
    }

    let mut cohorts = Vec::new();
    for cohort in cohorts_of(&entries) {
        let standings = build_standings(&cohort.select(&entries))
            .with_context(|| format!("{}: building {} standings failed", name, cohort))?;
        if verbose {
            eprintln!("[{}] {}: {} players", name, cohort, standings.summaries.len());
        }
        cohorts.push(CohortReport { cohort, standings });
    }

    let mut report = LeagueReport {
        name: name.clone(),
        games,
        entries,
        cohorts,
        tiers: None,
        fantasy: None,
    };

    if config.tiers.enabled {
        let cohort = Cohort::from_season(config.tiers.season);
        let table = assign_tiers(report.summaries(cohort), &config.tiers);
        if verbose {
            eprintln!(
                "[{}] {} players in {} tiers ({})",
                name,
                table.assignments.len(),
                table.tiers.len(),
                cohort
            );
        }
        report.tiers = Some(table);
    }

    if let Some(teams) = &league.fantasy {
        let cohort = Cohort::from_season(config.fantasy.season);
        let table = fantasy_standings(teams, report.summaries(cohort));
        if verbose {
            eprintln!("[{}] {} fantasy teams ({})", name, table.standings.len(), cohort);
            for player in &table.unknown_players {
                eprintln!("[{}]   Fantasy pick '{}' has no games in {}", name, player, cohort);
            }
        }
        report.fantasy = Some(table);
    }

    if verbose {
        eprintln!("[{}] Processed in {:?}", name, start.elapsed());
    }

    Ok(report)
}

/// Load and process the league stored in `dir`.
pub fn run_league(dir: &Path, config: &Config, verbose: bool) -> Result<LeagueReport> {
    let league = load_league(dir).with_context(|| format!("Failed to load league at {}", dir.display()))?;
    process_league(&league, config, verbose)
}

fn save<T: CsvRow>(dir: &Path, file: &str, table: &[T], written: &mut Vec<PathBuf>) -> Result<()> {
    let path = dir.join(file);
    write_csv(&path, table)?;
    written.push(path);
    Ok(())
}

/// Write every table of `report` under `output_dir/<league>/`.
/// Returns the written paths in write order.
pub fn write_league_outputs(report: &LeagueReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = output_dir.join(&report.name);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut written = Vec::new();
    let games: Vec<GameRow> = rows(&report.games);
    save(&dir, "games.csv", &games, &mut written)?;
    let points: Vec<PointsRow> = rows(&report.entries);
    save(&dir, "points.csv", &points, &mut written)?;

    for c in &report.cohorts {
        let slug = c.cohort.slug();
        let summaries: Vec<SummaryRow> = rows(&c.standings.summaries);
        save(&dir, &format!("{}.csv", slug), &summaries, &mut written)?;
        let trajectory: Vec<TrajectoryRow> = rows(&c.standings.trajectory);
        save(&dir, &format!("trajectory_{}.csv", slug), &trajectory, &mut written)?;
    }

    if let Some(tiers) = report.tiers.as_ref().filter(|t| !t.assignments.is_empty()) {
        let table: Vec<TierRow> = rows(&tiers.assignments);
        save(&dir, "tiers.csv", &table, &mut written)?;
    }

    if let Some(fantasy) = &report.fantasy {
        let standings: Vec<FantasyStandingRow> = rows(&fantasy.standings);
        save(&dir, "fantasy_standings.csv", &standings, &mut written)?;
        let picks: Vec<FantasyPickRow> = rows(&fantasy.picks);
        save(&dir, "fantasy_teams.csv", &picks, &mut written)?;
    }

    Ok(written)
}

/// League directories to process: all discovered ones, or just `only`.
pub fn select_leagues(config: &Config, only: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut dirs = discover_leagues(&config.input_dir)
        .with_context(|| format!("Failed to scan {}", config.input_dir.display()))?;
    if let Some(name) = only {
        dirs.retain(|d| league_name(d) == name);
        if dirs.is_empty() {
            anyhow::bail!("League '{}' not found under {}", name, config.input_dir.display());
        }
    }
    Ok(dirs)
}

/// Process leagues in parallel, optionally writing their outputs.
///
/// Leagues are independent, so they run on the rayon pool; results come
/// back in directory order and the first failing league (in that order)
/// is reported.
pub fn run_all(config: &Config, dirs: &[PathBuf], write: bool, verbose: bool) -> Result<Vec<LeagueReport>> {
    let results: Vec<Result<LeagueReport>> = dirs
        .par_iter()
        .map(|dir| {
            let report = run_league(dir, config, verbose)?;
            if write {
                let written = write_league_outputs(&report, &config.output_dir)?;
                if verbose {
                    eprintln!("[{}] Wrote {} files", report.name, written.len());
                }
            }
            Ok(report)
        })
        .collect();

    results.into_iter().collect()
}
