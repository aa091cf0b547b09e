//! vocalmath CLI — spoken arithmetic drills from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vocalmath", version, about = "Spoken arithmetic drills")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive drill
    Play {
        /// Difficulty level (1-9), overrides the config
        #[arg(long)]
        difficulty: Option<u32>,

        /// Number of problems, overrides the config
        #[arg(long)]
        rounds: Option<usize>,

        /// Seed for a reproducible problem sequence
        #[arg(long)]
        seed: Option<u64>,

        /// Read problems aloud through the configured synthesizer
        #[arg(long)]
        speak: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write a JSON report to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print generated problems with their answers
    Generate {
        /// Difficulty level (1-9)
        #[arg(long, default_value = "1")]
        difficulty: u32,

        /// Number of problems
        #[arg(long, default_value = "5")]
        count: usize,

        /// Seed for a reproducible problem sequence
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Resolve a spoken answer into a number
    Resolve {
        /// Recognized text, e.g. "minus forty two"
        #[arg(required = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Check a spoken answer against a problem
    Check {
        /// Problem in canonical or display form, e.g. "84 / 7"
        #[arg(long)]
        expression: String,

        /// Spoken answer, e.g. "twelve"
        #[arg(long)]
        answer: String,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vocalmath=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            difficulty,
            rounds,
            seed,
            speak,
            config,
            output,
        } => commands::play::execute(difficulty, rounds, seed, speak, config, output).await,
        Commands::Generate {
            difficulty,
            count,
            seed,
            format,
        } => commands::generate::execute(difficulty, count, seed, format),
        Commands::Resolve { text } => commands::resolve::execute(text),
        Commands::Check { expression, answer } => commands::check::execute(expression, answer),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
