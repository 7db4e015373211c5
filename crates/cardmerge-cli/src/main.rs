//! cardmerge CLI — imports staged flashcards into collection files.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cardmerge",
    version,
    about = "Merge staged flashcard records into a collection file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the staging file into its target collection (the default)
    Import(ImportArgs),

    /// Build a staging file from raw card sides
    Convert {
        /// JSON array of {"front", "back"} card sides
        #[arg(long)]
        input: PathBuf,

        /// Target collection name written as the staging Source
        #[arg(long)]
        source: String,

        /// Staging file to write
        #[arg(long, default_value = "import.json")]
        output: PathBuf,
    },

    /// Check a collection file for missing terms and duplicates
    Validate {
        /// Collection file to check
        #[arg(long)]
        file: PathBuf,

        /// Field holding the records (default from config)
        #[arg(long)]
        record_field: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter cardmerge.toml
    Init,
}

#[derive(Args, Default)]
pub struct ImportArgs {
    /// Staging file (default: import.json)
    #[arg(long)]
    staging: Option<PathBuf>,

    /// Directory holding <Source>.json targets (default: .)
    #[arg(long)]
    target_dir: Option<PathBuf>,

    /// Field holding the records in the target, e.g. Data or quizSrc
    #[arg(long)]
    record_field: Option<String>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show planned changes without writing the target
    #[arg(long)]
    dry_run: bool,

    /// Exit with status 2 if the target file is missing
    #[arg(long)]
    strict: bool,

    /// Print the outcome as JSON instead of progress lines
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cardmerge=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => commands::import::execute(ImportArgs::default()),
        Some(Commands::Import(args)) => commands::import::execute(args),
        Some(Commands::Convert {
            input,
            source,
            output,
        }) => commands::convert::execute(input, source, output),
        Some(Commands::Validate {
            file,
            record_field,
            config,
        }) => commands::validate::execute(file, record_field, config),
        Some(Commands::Init) => commands::init::execute(),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}
