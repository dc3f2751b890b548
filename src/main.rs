mod calc;
mod cmd;
mod data;
mod ui;

use crate::calc::Month;
use clap::{Parser, Subcommand};
use flexi_logger::{FileSpec, LogSpecification, Logger};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "monthgrid", about = "month calendar with swipe paging and day marks")]
struct Cli {
    /// Path to the data directory containing config.yaml (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Write log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Month to open, as YYYY-MM (default: current month)
    #[arg(long)]
    month: Option<Month>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default config.yaml into the data directory
    Init,
    /// Print one month's grid without starting the interactive calendar
    Grid {
        /// Month to print, as YYYY-MM (default: --month or the current month)
        month: Option<Month>,
        /// Date to show as marked (YYYY-MM-DD); may be repeated
        #[arg(long = "mark")]
        marks: Vec<String>,
        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _logger = build_logger(cli.log_file.as_deref())?.start()?;

    // Resolve data_dir to an absolute path so file I/O works regardless of
    // future directory changes within the process.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, writing default config...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    match cli.command {
        None => cmd::root::run(cli.month),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Grid { month, marks, json }) => {
            cmd::grid::run(month.or(cli.month), &marks, json)
        }
    }
}

/// The calendar owns the terminal, so without a log file only errors reach
/// stderr and `RUST_LOG` is not consulted.
fn build_logger(log_file: Option<&std::path::Path>) -> anyhow::Result<Logger> {
    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    Ok(match log_file {
        Some(path) => Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?
            .log_to_file(FileSpec::try_from(path)?)
            .print_message(),
        None => Logger::with(console_log_spec()),
    })
}

fn console_log_spec() -> LogSpecification {
    LogSpecification::error()
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
