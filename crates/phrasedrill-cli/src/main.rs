//! phrasedrill CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "phrasedrill", version, about = "Adaptive language drill")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a drill session (Ctrl-C toggles casual mode, Ctrl-D quits)
    Drill {
        /// Number of questions
        #[arg(long, short = 'n')]
        count: Option<usize>,

        /// Question types to draw from (e.g. "vocabulary,idiom")
        #[arg(long)]
        types: Option<String>,

        /// Ask for count and types before starting
        #[arg(long, short = 'i')]
        interactive: bool,

        /// Start in casual mode: records are not updated
        #[arg(long)]
        casual: bool,

        /// Run the recall review after scoring
        #[arg(long)]
        review: bool,

        /// Directory for session reports
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Reset every record to its initial state
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Copy the records file
    Backup {
        /// Target file
        #[arg(long)]
        to: PathBuf,

        /// Overwrite an existing target without asking
        #[arg(long)]
        yes: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check the corpus and its records
    Validate {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show per-type statistics and the hardest items
    Stats {
        /// Number of hardest items to list
        #[arg(long, default_value = "10")]
        top: usize,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and material files
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("phrasedrill=warn,phrasedrill_core=warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Drill {
            count,
            types,
            interactive,
            casual,
            review,
            report_dir,
            config,
        } => {
            commands::drill::execute(commands::drill::DrillArgs {
                count,
                types,
                interactive,
                casual,
                review,
                report_dir,
                config,
            })
            .await
        }
        Commands::Reset { yes, config } => commands::reset::execute(yes, config),
        Commands::Backup { to, yes, config } => commands::backup::execute(to, yes, config),
        Commands::Validate { config } => commands::validate::execute(config),
        Commands::Stats { top, config } => commands::stats::execute(top, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
