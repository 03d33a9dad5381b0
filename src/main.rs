use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use championship_desk::api::{build_router, state::AppState};
use championship_desk::calculate::{
    build_bracket, champion, championship_standings, group_by_round, round_progress,
    FinalOutcome,
};
use championship_desk::client::{
    ChampionshipBackend, DebouncedSearch, HttpBackend, InMemoryBackend, SearchOutcome,
};
use championship_desk::config::AppConfig;
use championship_desk::models::{Championship, ChampionshipId};
use championship_desk::parse_duration;

#[derive(Parser)]
#[command(name = "championship-desk")]
#[command(about = "Standings and round progression for university sports championships")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Backend base URL (overrides the config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where a championship snapshot comes from.
#[derive(Args)]
struct Source {
    /// Championship id on the backend
    #[arg(long)]
    championship: Option<String>,

    /// Read from a local JSON snapshot instead of the backend
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Serve a local JSON snapshot instead of the backend
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Print the points table
    Standings {
        #[command(flatten)]
        source: Source,
    },

    /// Print matches grouped by round, final first
    Rounds {
        #[command(flatten)]
        source: Source,

        /// Print the bracket from the first round up to the final instead
        #[arg(long)]
        bracket: bool,
    },

    /// Print round progress, the next-round gate and the champion
    Status {
        #[command(flatten)]
        source: Source,
    },

    /// Search teams by name, one query per line on stdin
    Search {
        /// Settle delay before a query is sent (e.g. "300ms")
        #[arg(long)]
        settle: Option<String>,

        /// Search a local JSON snapshot instead of the backend
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(url) = cli.backend_url {
        config.backend.base_url = url;
        config.validate()?;
    }

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    tracing::debug!("Starting championship-desk v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve {
            host,
            port,
            snapshot,
        } => {
            let backend = open_backend(&config, snapshot.as_deref()).await?;
            tracing::info!("Using {} backend", backend.name());

            let app = build_router(AppState::new(backend), &config.server.cors_origin);
            let addr = format!(
                "{}:{}",
                host.unwrap_or(config.server.host),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}/api", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Standings { source } => {
            let championship = load(&config, &source).await?;
            print_standings(&championship);
        }
        Commands::Rounds { source, bracket } => {
            let championship = load(&config, &source).await?;
            if bracket {
                print_bracket(&championship);
            } else {
                print_rounds(&championship);
            }
        }
        Commands::Status { source } => {
            let championship = load(&config, &source).await?;
            print_status(&championship);
        }
        Commands::Search { settle, snapshot } => {
            let settle = match settle {
                Some(raw) => parse_duration(&raw)
                    .with_context(|| format!("invalid --settle duration: {}", raw))?,
                None => Duration::from_millis(config.search.settle_ms),
            };
            let backend = open_backend(&config, snapshot.as_deref()).await?;
            run_search(backend, settle).await?;
        }
    }

    Ok(())
}

async fn open_backend(
    config: &AppConfig,
    snapshot: Option<&Path>,
) -> Result<Arc<dyn ChampionshipBackend>> {
    match snapshot {
        Some(path) => {
            let backend = InMemoryBackend::from_file(path)
                .await
                .with_context(|| format!("reading snapshot {}", path.display()))?;
            Ok(Arc::new(backend))
        }
        None => Ok(Arc::new(HttpBackend::new(&config.backend)?)),
    }
}

/// Resolve the championship named by `source`. A snapshot holding a single
/// championship needs no id.
async fn load(config: &AppConfig, source: &Source) -> Result<Championship> {
    let backend = open_backend(config, source.snapshot.as_deref()).await?;

    let id = match (&source.championship, &source.snapshot) {
        (Some(id), _) => ChampionshipId::new(id.as_str()),
        (None, Some(_)) => {
            let listed = backend.list_championships().await?;
            match listed.as_slice() {
                [only] => only.id.clone(),
                [] => bail!("snapshot holds no championships"),
                _ => {
                    let ids: Vec<String> = listed.iter().map(|c| c.id.to_string()).collect();
                    bail!(
                        "snapshot holds several championships, pick one with --championship ({})",
                        ids.join(", ")
                    )
                }
            }
        }
        (None, None) => bail!("--championship is required unless --snapshot is given"),
    };

    Ok(backend.fetch_championship(&id).await?)
}

fn print_header(championship: &Championship) {
    println!("\n=== {} ({}) ===", championship.name, championship.status);
}

fn print_standings(championship: &Championship) {
    print_header(championship);
    println!(
        "{:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
        "Pos", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for row in championship_standings(championship) {
        println!(
            "{:>3}  {:<28} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>+4} {:>4}",
            row.position,
            row.team_name,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.points
        );
    }
}

fn print_rounds(championship: &Championship) {
    print_header(championship);
    let directory = championship.directory();
    let groups = group_by_round(&championship.matches);
    let active = groups.active().map(|g| g.round.clone());

    for group in groups.ranked() {
        let marker = if active.as_ref() == Some(&group.round) {
            " (active)"
        } else {
            ""
        };
        println!(
            "\n{}{}  {}/{} finished",
            group.round,
            marker,
            group.finished_count(),
            group.matches.len()
        );
        for m in &group.matches {
            let score = match (m.goals_a, m.goals_b) {
                (Some(a), Some(b)) => format!("{} - {}", a, b),
                _ => "vs".to_string(),
            };
            println!(
                "  #{:<5} {:>24} {:^7} {:<24} {}",
                m.id.to_string(),
                directory.name_of(m.team_a_id.as_ref()),
                score,
                directory.name_of(m.team_b_id.as_ref()),
                m.status
            );
        }
    }
}

fn print_bracket(championship: &Championship) {
    print_header(championship);
    let bracket = build_bracket(championship);

    for round in &bracket.rounds {
        let state = if round.complete { "complete" } else { "open" };
        println!("\n{} [{}]", round.round, state);
        for m in &round.matches {
            let score = m
                .score
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "vs".to_string());
            let winner = m.winner.as_deref().unwrap_or("-");
            println!(
                "  {} {} {}  -> {}",
                m.team_a, score, m.team_b, winner
            );
        }
    }
    if let Some(name) = &bracket.champion {
        println!("\nChampion: {}", name);
    }
}

fn print_status(championship: &Championship) {
    print_header(championship);
    let progress = round_progress(championship);

    match &progress.active_round {
        Some(round) => println!(
            "Active round:     {} ({}/{} finished)",
            round, progress.finished_matches, progress.total_matches
        ),
        None => println!("Active round:     none (no matches yet)"),
    }
    println!("Round complete:   {}", progress.round_complete);
    println!("Next round ready: {}", progress.can_request_next_round);

    match (&progress.final_outcome, champion(championship)) {
        (FinalOutcome::Decided { .. }, Some(team)) => println!("Champion:         {}", team.name),
        (FinalOutcome::Decided { champion: id }, None) => {
            println!("Champion:         team {} (not in roster)", id)
        }
        (FinalOutcome::Ambiguous { matches }, _) => {
            println!("Final:            ambiguous ({} matches labeled final)", matches)
        }
        (FinalOutcome::Pending, _) => println!("Final:            pending"),
        (FinalOutcome::Absent, _) => println!("Final:            not played yet"),
    }
}

fn print_outcome(outcome: &SearchOutcome) {
    if let Some(err) = &outcome.error {
        println!("{:?}: error: {}", outcome.query, err);
        return;
    }
    println!("{:?}: {} team(s)", outcome.query, outcome.teams.len());
    for team in &outcome.teams {
        match &team.program {
            Some(program) => println!("  {:<6} {} ({})", team.id.to_string(), team.name, program),
            None => println!("  {:<6} {}", team.id.to_string(), team.name),
        }
    }
}

/// Feed stdin lines through the debounced search and print each result that
/// is applied. Returns once stdin is closed and the last query has answered.
async fn run_search(backend: Arc<dyn ChampionshipBackend>, settle: Duration) -> Result<()> {
    let mut search = DebouncedSearch::new(backend, settle);
    let mut results = search.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut last_submit: Option<u64> = None;
    let mut answered = true;
    let mut eof = false;

    while !(eof && answered) {
        tokio::select! {
            line = lines.next_line(), if !eof => match line? {
                Some(query) => {
                    last_submit = Some(search.submit(query));
                    answered = false;
                }
                None => eof = true,
            },
            changed = results.changed() => {
                changed?;
                let outcome = results.borrow_and_update().clone();
                if let Some(outcome) = outcome {
                    answered = last_submit == Some(outcome.generation);
                    print_outcome(&outcome);
                }
            }
        }
    }

    Ok(())
}
