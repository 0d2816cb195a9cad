//! pslog CLI
//!
//! Command-line front end for the printer inventory and service log.
//! Every invocation opens (or creates) the data file, runs one command,
//! and exits.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pslog_core::{Config, HoursSort, Store};

mod commands;
mod logging;
mod output;
mod prompt;

use commands::printer::PrinterDetails;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "pslog")]
#[command(about = "pslog - 3D printer inventory and service log")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Data file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage printers
    Printer {
        #[command(subcommand)]
        command: PrinterCommands,
    },
    /// Manage service notes
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show data file location and counts
    Status,
}

#[derive(Subcommand)]
enum PrinterCommands {
    /// List all printers
    #[command(alias = "ls")]
    List {
        /// Sort by hours: none, asc or desc
        #[arg(short, long)]
        sort: Option<HoursSort>,
    },
    /// Show printer details (including service log)
    Show {
        /// Printer database id
        id: i64,
    },
    /// Add a new printer
    #[command(alias = "create")]
    Add {
        /// Unique printer ID
        #[arg(long)]
        printer_id: String,
        #[command(flatten)]
        details: PrinterDetails,
    },
    /// Edit a printer; omitted fields keep their value
    Edit {
        /// Printer database id
        id: i64,
        /// New printer ID
        #[arg(long)]
        printer_id: Option<String>,
        #[command(flatten)]
        details: PrinterDetails,
    },
    /// Delete a printer and all its notes
    #[command(alias = "rm")]
    Delete {
        /// Printer database id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Copy a printer under a new printer ID
    #[command(alias = "dup")]
    Duplicate {
        /// Printer database id
        id: i64,
    },
    /// Print the first unused printer ID derived from BASE
    UniqueId {
        /// Candidate printer ID
        base: String,
    },
}

#[derive(Subcommand)]
enum LogCommands {
    /// List notes for a printer (newest first)
    #[command(alias = "ls")]
    List {
        /// Printer database id
        printer: i64,
    },
    /// Add a note to a printer
    #[command(alias = "add")]
    Create {
        /// Printer database id
        printer: i64,
        /// Note text
        text: String,
    },
    /// Replace the text of a note
    Edit {
        /// Note id
        log_id: i64,
        /// New note text
        text: String,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note id
        log_id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, database_file, default_sort, log_level, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    logging::init(&config);

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path());
    let store = Store::open(&db_path)
        .map_err(commands::report)
        .with_context(|| format!("Failed to open data file {:?}", db_path))?;

    match cli.command {
        Commands::Printer { command } => handle_printer_command(command, &store, &config, &output),
        Commands::Log { command } => handle_log_command(command, &store, &output),
        Commands::Status => commands::status::show(&store, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_printer_command(
    command: PrinterCommands,
    store: &Store,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        PrinterCommands::List { sort } => {
            commands::printer::list(store, sort.unwrap_or(config.default_sort), output)
        }
        PrinterCommands::Show { id } => commands::printer::show(store, id, output),
        PrinterCommands::Add {
            printer_id,
            details,
        } => commands::printer::add(store, details.into_input(printer_id), output),
        PrinterCommands::Edit {
            id,
            printer_id,
            details,
        } => commands::printer::edit(store, id, printer_id, details, output),
        PrinterCommands::Delete { id, yes } => commands::printer::delete(store, id, yes, output),
        PrinterCommands::Duplicate { id } => commands::printer::duplicate(store, id, output),
        PrinterCommands::UniqueId { base } => commands::printer::unique_id(store, &base, output),
    }
}

fn handle_log_command(command: LogCommands, store: &Store, output: &Output) -> Result<()> {
    match command {
        LogCommands::List { printer } => commands::log::list(store, printer, output),
        LogCommands::Create { printer, text } => commands::log::add(store, printer, &text, output),
        LogCommands::Edit { log_id, text } => commands::log::edit(store, log_id, &text, output),
        LogCommands::Delete { log_id, yes } => commands::log::delete(store, log_id, yes, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
