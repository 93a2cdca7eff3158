// DexTracker - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Tracker startup (history load, default stat log)
// 4. Subcommand dispatch, or the interactive shell when none is given

mod shell;

// Re-export modules from the library crate so that `shell.rs` and other
// binary-side code can use `crate::app::...`, `crate::core::...` etc.
pub use dextracker::app;

pub use dextracker::core;
pub use dextracker::platform;
pub use dextracker::util;

use crate::app::history_store::HistoryStore;
use crate::app::tracker::Tracker;
use crate::core::filter::{self, ListFilter};
use crate::core::lookup::LookupOutcome;
use crate::core::model::{Entry, Side, Source};
use crate::util::error::{DexError, ExportError};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

/// DexTracker - track which Pokémon are yours and which are enemies.
///
/// Reads a pipe-delimited stat log, looks entries up by (partial) name, and
/// remembers each one you classify across runs.
#[derive(Parser, Debug)]
#[command(name = "DexTracker", version, about)]
struct Cli {
    /// Stat log to load (defaults to the configured log file).
    #[arg(short = 'l', long = "log", global = true)]
    log: Option<PathBuf>,

    /// History JSON file (defaults to the platform data directory).
    #[arg(long = "history", global = true)]
    history: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List classified and logged entries by section.
    List {
        /// Case-insensitive substring of the name.
        #[arg(short = 'f', long = "filter")]
        filter: Option<String>,

        /// Regular expression matched against the name.
        #[arg(short = 'r', long = "regex")]
        regex: Option<String>,

        /// Only show these sections (repeatable).
        #[arg(short = 's', long = "section", value_enum)]
        section: Vec<SourceArg>,
    },

    /// Look up an entry, asking whether it is yours on first sight.
    Search {
        /// Full or partial name.
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Classify a log entry without being prompted.
    Classify {
        /// Full or partial name.
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        /// Which side the entry belongs to.
        #[arg(long = "as", value_enum)]
        side: SideArg,
    },

    /// Forget every classification.
    ClearHistory {
        /// Do not ask for confirmation.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Write entries to a CSV or JSON file.
    Export {
        /// Which collection to export.
        #[arg(long = "source", value_enum, default_value = "log")]
        source: SourceArg,

        /// Output format.
        #[arg(long = "format", value_enum, default_value = "csv")]
        format: FormatArg,

        /// Output file.
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// Case-insensitive substring of the name.
        #[arg(short = 'f', long = "filter")]
        filter: Option<String>,

        /// Case-insensitive substring of the TYPE field.
        #[arg(short = 't', long = "type")]
        type_filter: Option<String>,
    },

    /// Interactive shell (the default).
    Shell,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SourceArg {
    Mine,
    Enemy,
    Log,
}

impl From<SourceArg> for Source {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Mine => Source::Mine,
            SourceArg::Enemy => Source::Enemy,
            SourceArg::Log => Source::Log,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SideArg {
    Mine,
    Enemy,
}

impl From<SideArg> for Side {
    fn from(arg: SideArg) -> Self {
        match arg {
            SideArg::Mine => Side::Mine,
            SideArg::Enemy => Side::Enemy,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Csv,
    Json,
}

fn main() {
    let cli = Cli::parse();

    // Config must be read before logging starts: it may set the level.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (config, config_warnings) = platform::config::load_config(&platform_paths);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "DexTracker starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let history_path = cli
        .history
        .clone()
        .unwrap_or_else(|| config.history_file.clone());
    let mut tracker = Tracker::open(HistoryStore::new(history_path));

    let result = run(cli, &config, &mut tracker);

    if let Err(e) = tracker.close() {
        tracing::warn!(error = %e, "History could not be saved on exit");
        eprintln!("Warning: {e}");
    }

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(
    cli: Cli,
    config: &platform::config::AppConfig,
    tracker: &mut Tracker,
) -> util::error::Result<()> {
    let command = cli.command.unwrap_or(Command::Shell);

    if !matches!(command, Command::ClearHistory { .. }) {
        load_startup_log(tracker, cli.log.as_deref(), &config.log_file)?;
    }

    match command {
        Command::List {
            filter,
            regex,
            section,
        } => {
            let mut list_filter = ListFilter {
                text_search: filter.unwrap_or_default(),
                sources: section.into_iter().map(Source::from).collect(),
                ..Default::default()
            };
            list_filter.set_regex(regex.as_deref().unwrap_or(""))?;
            let sections = filter::apply_to_listing(tracker.listing(), &list_filter);
            print!("{}", crate::core::display::render_listing(&sections));
        }

        Command::Search { name } => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut output = io::stdout();
            let mut prompt = shell::TerminalPrompt {
                input: &mut input,
                output: &mut output,
            };
            let outcome = tracker.lookup(&name.join(" "), &mut prompt);
            print!("{}", shell::describe_outcome(&outcome));
        }

        Command::Classify { name, side } => {
            let outcome = tracker.classify_name(&name.join(" "), side.into());
            if let LookupOutcome::Found {
                source: source @ (Source::Mine | Source::Enemy),
                entry,
                ..
            } = &outcome
            {
                println!("{} is already in {source} history.", entry.name());
            }
            print!("{}", shell::describe_outcome(&outcome));
        }

        Command::ClearHistory { yes } => {
            if !yes && !confirm("Clear Player and Enemy history? This cannot be undone. [y/N]: ")
            {
                println!("Kept history.");
                return Ok(());
            }
            tracker.clear_history()?;
            println!("History cleared.");
        }

        Command::Export {
            source,
            format,
            output,
            filter,
            type_filter,
        } => {
            let list_filter = ListFilter {
                text_search: filter.unwrap_or_default(),
                type_search: type_filter.unwrap_or_default(),
                ..Default::default()
            };
            let map = match Source::from(source) {
                Source::Mine => tracker.history().mine(),
                Source::Enemy => tracker.history().enemy(),
                Source::Log => tracker.log(),
            };
            let entries: Vec<_> = filter::apply_to_map(map, &list_filter)
                .into_iter()
                .map(|(_, entry)| entry)
                .collect();
            let count = export_to(&entries, format, &output)?;
            println!("Exported {count} entries to {}", output.display());
        }

        Command::Shell => {
            let stdin = io::stdin();
            let mut shell = shell::Shell::new(stdin.lock(), io::stdout());
            shell.run(tracker).map_err(|e| DexError::Io {
                path: PathBuf::from("<stdin>"),
                operation: "run interactive shell",
                source: e,
            })?;
        }
    }

    Ok(())
}

/// Load the stat log given on the command line, or the configured default.
///
/// An explicit `--log` must load; a missing default log just starts empty.
fn load_startup_log(
    tracker: &mut Tracker,
    explicit: Option<&Path>,
    default: &Path,
) -> Result<(), DexError> {
    if let Some(path) = explicit {
        tracker.load_log(path)?;
        return Ok(());
    }

    if !default.exists() {
        tracing::info!(path = %default.display(), "Default stat log not found; starting empty");
        return Ok(());
    }
    if let Err(e) = tracker.load_log(default) {
        tracing::warn!(error = %e, "Default stat log could not be loaded");
        eprintln!("Warning: {e}");
    }
    Ok(())
}

fn export_to(
    entries: &[&Entry],
    format: FormatArg,
    output: &Path,
) -> Result<usize, DexError> {
    let file = std::fs::File::create(output).map_err(|e| ExportError::Io {
        path: output.to_path_buf(),
        source: e,
    })?;
    let writer = BufWriter::new(file);
    let count = match format {
        FormatArg::Csv => crate::core::export::export_csv(entries, writer, output)?,
        FormatArg::Json => crate::core::export::export_json(entries, writer, output)?,
    };
    Ok(count)
}

fn confirm(question: &str) -> bool {
    print!("{question}");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
