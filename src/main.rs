use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use spl_standings::config::Config;
use spl_standings::error::{ErrorKind, StandingsError};
use spl_standings::standings::Cohort;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process every league and write its tables (default if no subcommand)
    Run {
        /// Only process the league with this directory name
        #[arg(short, long)]
        league: Option<String>,
    },
    /// Print the ranked standings of one league
    Leaderboard {
        /// League directory name under the input directory
        league: String,
        /// Season to rank (all-time if omitted)
        #[arg(short, long)]
        season: Option<u32>,
        /// Only show the first N players
        #[arg(short, long)]
        top: Option<usize>,
        /// Tab-separated output for scripting
        #[arg(long, conflicts_with = "json")]
        tsv: bool,
        /// JSON output with per-category sums and means
        #[arg(long)]
        json: bool,
    },
    /// Load and validate every league without writing anything
    Check,
    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "spl-standings")]
#[command(about = "League scoring and standings builder", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/spl-standings/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Exit code for a failed run: typed data errors anywhere in the chain
/// map to EXIT_DATA, bare I/O failures to EXIT_IO.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.chain().any(|e| e.downcast_ref::<StandingsError>().is_some()) {
        EXIT_DATA
    } else if err.chain().any(|e| e.downcast_ref::<std::io::Error>().is_some()) {
        EXIT_IO
    } else {
        EXIT_DATA
    }
}

fn fail(err: anyhow::Error) -> ! {
    let label = match err.chain().find_map(|e| e.downcast_ref::<StandingsError>()) {
        Some(typed) if typed.kind() == ErrorKind::Schema => "Schema error",
        Some(_) => "Data error",
        None => "Error",
    };
    eprintln!("{}: {:#}", label, err);
    std::process::exit(exit_code_for(&err));
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run { league: None });
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { force } = command {
        let path = match config_path.map(Ok).unwrap_or_else(spl_standings::config::get_config_path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        if let Err(e) = spl_standings::config::write_default_config(&path, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Config written to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match spl_standings::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = spl_standings::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.verbose {
        eprintln!("Input: {}", config.input_dir.display());
        eprintln!("Output: {}", config.output_dir.display());
    }

    match command {
        Commands::Run { league } => run(&config, league.as_deref(), true, cli.verbose),
        Commands::Check => run(&config, None, false, cli.verbose),
        Commands::Leaderboard {
            league,
            season,
            top,
            tsv,
            json,
        } => leaderboard(&config, &league, season, top, tsv, json, cli.verbose),
        Commands::Init { .. } => unreachable!("handled before config load"),
    }

    if cli.verbose {
        eprintln!();
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(EXIT_SUCCESS);
}

fn run(config: &Config, league: Option<&str>, write: bool, verbose: bool) {
    let dirs = match spl_standings::pipeline::select_leagues(config, league) {
        Ok(d) => d,
        Err(e) => fail(e),
    };
    if dirs.is_empty() {
        eprintln!("No leagues found under {}", config.input_dir.display());
        eprintln!("Each league needs its own directory containing games.csv, parameters.csv, points.csv and players.csv");
        std::process::exit(EXIT_IO);
    }
    if verbose {
        eprintln!("Found {} leagues", dirs.len());
    }

    let reports = match spl_standings::pipeline::run_all(config, &dirs, write, verbose) {
        Ok(r) => r,
        Err(e) => fail(e),
    };

    for report in &reports {
        let players = report.summaries(Cohort::AllTime).len();
        if write {
            println!(
                "{}: {} games, {} players -> {}",
                report.name,
                report.games.len(),
                players,
                config.output_dir.join(&report.name).display()
            );
        } else {
            println!("{}: ok ({} games, {} players)", report.name, report.games.len(), players);
        }
    }
}

fn leaderboard(
    config: &Config,
    league: &str,
    season: Option<u32>,
    top: Option<usize>,
    tsv: bool,
    json: bool,
    verbose: bool,
) {
    let dir = config.input_dir.join(league);
    let report = match spl_standings::pipeline::run_league(&dir, config, verbose) {
        Ok(r) => r,
        Err(e) => fail(e),
    };

    let cohort = Cohort::from_season(season);
    let summaries = report.summaries(cohort);
    let shown = &summaries[..top.unwrap_or(summaries.len()).min(summaries.len())];

    if tsv {
        let output = spl_standings::output::format_leaderboard_tsv(shown);
        if !output.is_empty() {
            println!("{}", output);
        }
    } else if json {
        match spl_standings::output::format_leaderboard_json(shown) {
            Ok(output) => println!("{}", output),
            Err(e) => fail(e),
        }
    } else {
        let use_colors = spl_standings::output::should_use_colors();
        println!("{} {}", report.name, cohort);
        println!("{}", spl_standings::output::format_leaderboard(shown, use_colors));
    }
}
