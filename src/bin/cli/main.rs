mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use recall_lib::flashcards::Difficulty;

#[derive(Parser)]
#[command(name = "recall-cli", about = "Spaced repetition review scheduler", version)]
struct Cli {
    /// Deck file to read and update
    #[arg(long, global = true, default_value = "deck.json")]
    deck: PathBuf,

    /// Study config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Add a card to the deck
    Add {
        question: String,
        answer: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, value_enum, default_value = "medium")]
        difficulty: DifficultyArg,
        /// Attach the card to a knowledge node, creating it if needed
        #[arg(long)]
        topic: Option<String>,
    },

    /// List cards due for review
    Due {
        /// Maximum cards to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Record a review of one card
    Review {
        /// Card id (or unique prefix)
        card: String,
        /// Quality 0-5; values outside the range are clamped
        #[arg(allow_hyphen_values = true)]
        quality: i32,
    },

    /// Show the interval each rating would give a card
    Preview {
        /// Card id (or unique prefix)
        card: String,
    },

    /// Show deck statistics
    Stats,

    /// Show knowledge node strengths
    Strength,

    /// Study the due queue interactively
    Study,

    /// Revert the most recent review
    Undo,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let mut app = app::App::new(cli.deck, cli.config.as_deref())?;

    match cli.command {
        Command::Add { question, answer, category, difficulty, topic } => {
            commands::add::run(
                &mut app,
                question,
                answer,
                category,
                difficulty.into(),
                topic.as_deref(),
                &cli.format,
            )?;
        }
        Command::Due { limit } => {
            commands::due::run(&app, limit, &cli.format, use_color)?;
        }
        Command::Review { card, quality } => {
            commands::review::run(&mut app, &card, quality, &cli.format, use_color)?;
        }
        Command::Preview { card } => {
            commands::preview::run(&app, &card, &cli.format)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
        Command::Strength => {
            commands::strength::run(&app, &cli.format, use_color)?;
        }
        Command::Study => {
            commands::study::run(&mut app, &cli.format, use_color)?;
        }
        Command::Undo => {
            commands::undo::run(&mut app, &cli.format)?;
        }
    }

    Ok(())
}
