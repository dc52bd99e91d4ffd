//! Kioku CLI
//!
//! Terminal vocabulary trainer on top of the Kioku half-life scheduler.

mod commands;
mod config;
mod store;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kioku_core::ReviewScheduler;

use crate::commands::Context;
use crate::store::JsonFileStore;

/// Kioku - half-life spaced repetition for vocabulary
#[derive(Parser)]
#[command(name = "kioku")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Spaced-repetition vocabulary trainer")]
#[command(long_about = "Kioku schedules vocabulary reviews with a half-life memory model.\n\nItems closest to being forgotten are shown first; each answer updates the item's half-life and next due date.")]
struct Cli {
    /// Custom data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Catalog JSON file (defaults to the built-in deck)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Learner whose records are used (env: KIOKU_LEARNER)
    #[arg(long, global = true)]
    learner: Option<String>,

    /// Scheduler config JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List decks with card counts
    Decks,

    /// Show the queue a study session would present
    Due {
        /// Deck (category) name
        deck: String,
        /// Override the learner's daily limit
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Study a deck interactively
    Study {
        /// Deck (category) name
        deck: String,
        /// Grade yourself 1-5 instead of answering multiple choice
        #[arg(long)]
        self_grade: bool,
        /// Seed for option shuffling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Apply a single rating to an item
    Review {
        /// Item id
        item: u32,
        /// Grade: 1=again 2=hard 3=good 4=easy 5=perfect
        #[arg(allow_negative_numbers = true)]
        grade: i32,
    },

    /// Show what each grade would do to an item
    Preview {
        /// Item id
        item: u32,
    },

    /// Show or set the daily session limit
    Limit {
        /// New limit (1-100)
        value: Option<u32>,
    },

    /// Show review statistics
    Stats,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let data_dir = config::resolve_data_dir(cli.data_dir)?;
    let catalog = match &cli.catalog {
        Some(path) => JsonFileStore::read_catalog(path)?,
        None => JsonFileStore::builtin_catalog()?,
    };
    let scheduler = ReviewScheduler::new(config::load_scheduler_config(cli.config.as_deref())?)?;

    let ctx = Context {
        store: JsonFileStore::open(data_dir, catalog)?,
        scheduler,
        learner: config::resolve_learner(cli.learner),
    };
    tracing::info!(
        data_dir = %ctx.store.root().display(),
        learner = %ctx.learner,
        "Kioku v{} ready",
        kioku_core::VERSION
    );

    match cli.command {
        Commands::Decks => commands::run_decks(&ctx),
        Commands::Due { deck, limit } => commands::run_due(&ctx, &deck, limit),
        Commands::Study {
            deck,
            self_grade,
            seed,
        } => commands::run_study(&ctx, &deck, self_grade, seed),
        Commands::Review { item, grade } => commands::run_review(&ctx, item, grade),
        Commands::Preview { item } => commands::run_preview(&ctx, item),
        Commands::Limit { value } => commands::run_limit(&ctx, value),
        Commands::Stats => commands::run_stats(&ctx),
    }
}
