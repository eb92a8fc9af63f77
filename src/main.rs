use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;

use hazard_sim::{
    engine::{Engine, EngineSettings, DEFAULT_TOTAL_TURNS},
    presenter::{OutputFormat, Presenter},
    Catalog,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Turn-based regional hazard simulation")]
struct Cli {
    /// Seed for the random source (drawn from entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Run every turn without waiting for Enter
    #[arg(long)]
    no_pause: bool,

    /// Output format for turn reports
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let catalog = Catalog::builtin().context("Failed to load built-in hazard catalog")?;
    let seed = cli.seed.unwrap_or_else(rand::random::<u64>);
    tracing::info!(
        seed,
        regions = catalog.region_count(),
        hazards = catalog.hazard_count(),
        "starting simulation"
    );

    let settings = EngineSettings {
        total_turns: DEFAULT_TOTAL_TURNS,
        seed,
    };
    let mut engine = Engine::with_settings(catalog, settings);
    let total_turns = engine.total_turns();
    // Prompts only make sense for a human reading text.
    let interactive = !cli.no_pause && cli.format == OutputFormat::Text;

    let stdout = io::stdout();
    let mut presenter = Presenter::new(stdout.lock(), cli.format);
    presenter.welcome(total_turns)?;
    if interactive {
        wait_for_enter("Press Enter to start...")?;
    }

    while !engine.is_finished() {
        let report = engine.advance_turn()?;
        presenter.turn(&report, total_turns)?;
        if interactive {
            wait_for_enter("\nPress Enter to continue...")?;
        }
    }

    presenter.status(&engine.snapshot(), total_turns)?;
    presenter.farewell()?;
    Ok(())
}

fn wait_for_enter(prompt: &str) -> Result<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{prompt}")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(())
}
