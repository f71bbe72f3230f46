//! annotator CLI
//!
//! Command-line front end: opens annotation sessions and runs the
//! one-shot `show`, `export` and `stats` commands.

use std::{path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{config::SessionConfig, mode::AnnotationMode, repl::AnnotationSession};

mod basic;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "ANNOTATOR_LOG";

/// annotator - label reasoning traces stored as JSON Lines
#[derive(Parser, Debug)]
#[command(name = "annotator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Annotation mode: judgment (Yes/No) or behavior (four counts)
    #[arg(long, global = true, default_value = "judgment")]
    mode: AnnotationMode,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the session commands
#[derive(Args, Debug)]
struct SessionArgs {
    /// Directory for annotated_output.jsonl and annotated_output.csv
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Write both output files after every annotation
    #[arg(long)]
    autosave: bool,

    /// Wrap width for record display
    #[arg(long, default_value = "100")]
    width: u16,

    /// Disable colored prompt
    #[arg(long)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate a JSON Lines file interactively
    Annotate {
        /// Path to the JSON Lines file
        path: PathBuf,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Start an empty session; use `load` or `demo` inside
    Repl {
        /// Start with the built-in example record
        #[arg(long)]
        demo: bool,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Print one record with its reasoning span
    Show {
        /// Path to the JSON Lines file
        path: PathBuf,
        /// Record index (clamped to the dataset)
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        index: i64,
        /// Print the record as JSON instead
        #[arg(long)]
        raw: bool,
    },
    /// Add missing annotation fields and write both output files
    Export {
        /// Path to the JSON Lines file
        path: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Print annotation progress for a file
    Stats {
        /// Path to the JSON Lines file
        path: PathBuf,
        /// Also print the overview table
        #[arg(long)]
        table: bool,
    },
}

impl SessionArgs {
    fn into_config(self, mode: AnnotationMode) -> SessionConfig {
        SessionConfig::default()
            .with_mode(mode)
            .with_output_dir(self.output_dir)
            .with_autosave(self.autosave)
            .with_display_width(self.width)
            .with_color(!self.no_color)
    }
}

/// Install the stderr log subscriber
///
/// `--verbose` forces `debug`; otherwise the filter comes from
/// [`LOG_ENV`], defaulting to `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the annotator CLI.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mode = cli.mode;
    let result = match cli.command {
        Commands::Annotate { path, session } => {
            let config = session.into_config(mode);
            AnnotationSession::new(config).and_then(|mut session| {
                let path = path.to_string_lossy();
                print!("{}", session.load_path(&path)?);
                crate::repl::run(session)
            })
        }
        Commands::Repl { demo, session } => {
            let config = session.into_config(mode);
            AnnotationSession::new(config).and_then(|mut session| {
                if demo {
                    print!("{}", session.execute(crate::repl::ReplCommand::Demo)?);
                }
                crate::repl::run(session)
            })
        }
        Commands::Show { path, index, raw } => basic::cmd_show(&path, mode, index, raw),
        Commands::Export { path, output_dir } => basic::cmd_export(&path, mode, &output_dir),
        Commands::Stats { path, table } => basic::cmd_stats(&path, mode, table),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
