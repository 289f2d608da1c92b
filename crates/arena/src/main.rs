//! Arena CLI
//!
//! Run matches between engines and report results.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use arena::{EngineSpec, MatchConfig, MatchRunner, TournamentResults};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Play search engines against each other on Tzaar")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the round robin described by a TOML match file
    Run {
        config: PathBuf,
        /// Override games per pairing
        #[arg(long)]
        games: Option<u32>,
        /// Override the results path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Play two engines given as `alphabeta[:DEPTH]`, `mcts[:MS]` or `random[:SEED]`
    Match {
        engine1: String,
        engine2: String,
        #[arg(long, default_value_t = 10)]
        games: u32,
        /// Wall-clock limit per move
        #[arg(long)]
        time_ms: Option<u64>,
        #[arg(long, default_value = tzaar::VARIANT_FIXED)]
        variant: String,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the report of a saved results file
    Report { results: PathBuf },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(config: MatchConfig) -> Result<()> {
    let runner = MatchRunner::new(config);
    let results = runner.run()?;
    println!("{}", results.generate_report());

    if let Some(path) = &runner.config().output {
        results
            .save(path)
            .with_context(|| format!("saving results to {}", path.display()))?;
        info!(path = %path.display(), "results written");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Run { config, games, out } => {
            let mut match_config = MatchConfig::load(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            if let Some(games) = games {
                match_config.games = games;
            }
            if out.is_some() {
                match_config.output = out;
            }
            match_config.validate()?;
            run(match_config)
        }
        Command::Match {
            engine1,
            engine2,
            games,
            time_ms,
            variant,
            seed,
            out,
        } => {
            if engine1 == engine2 {
                bail!("engines must differ; give one a seed or depth suffix");
            }
            let config = MatchConfig {
                variant,
                games,
                seed,
                time_per_move_ms: time_ms,
                output: out,
                engines: vec![EngineSpec::parse_short(&engine1)?, EngineSpec::parse_short(&engine2)?],
                ..MatchConfig::default()
            };
            config.validate()?;
            run(config)
        }
        Command::Report { results } => {
            let loaded = TournamentResults::load(&results)
                .with_context(|| format!("reading {}", results.display()))?;
            println!("{}", loaded.generate_report());
            Ok(())
        }
    }
}
