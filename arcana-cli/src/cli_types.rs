//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arcana")]
#[command(about = "Install, search and convert spellbooks", long_about = None)]
pub(crate) struct Cli {
    /// Spell database file (overrides ARCANA_DB and settings.toml)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filter options for `find`. List-valued fields accept `(a, b, 'c')`.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct FilterArgs {
    /// Book name contains
    #[arg(short, long)]
    pub book: Option<String>,

    /// Spell name contains
    #[arg(short, long)]
    pub name: Option<String>,

    /// Category contains
    #[arg(long)]
    pub category: Option<String>,

    /// Range contains
    #[arg(long)]
    pub range: Option<String>,

    /// Duration contains
    #[arg(long)]
    pub duration: Option<String>,

    /// Casting time contains
    #[arg(long)]
    pub casting_time: Option<String>,

    /// Description contains
    #[arg(long)]
    pub description: Option<String>,

    /// Exact level, or a list such as "(1, 3)"
    #[arg(short, long)]
    pub level: Option<String>,

    /// Ritual flag (true/yes/y, anything else is false)
    #[arg(short, long)]
    pub ritual: Option<String>,

    /// Guild flag (true/yes/y, anything else is false)
    #[arg(short, long)]
    pub guild: Option<String>,

    /// School contains, or a list such as "(evocation, abjuration)"
    #[arg(short, long)]
    pub school: Option<String>,

    /// Caster contains, or a list such as "(wizard, warlock)"
    #[arg(short, long)]
    pub caster: Option<String>,

    /// Search every text field at once
    #[arg(short = 'G', long)]
    pub general: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Replace the database contents with the spellbooks in a directory
    Install {
        /// Directory containing .xml / .xml.gz spellbooks
        source_dir: PathBuf,
    },

    /// Remove every spell from the database (the file is kept)
    Clean,

    /// Find spells matching filter criteria
    Find {
        #[command(flatten)]
        filters: FilterArgs,

        /// Sort column, optionally with direction (e.g., "level desc")
        #[arg(long)]
        sort: Option<String>,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Print the full entry for result number N (1-based)
        #[arg(long, value_name = "N")]
        show: Option<usize>,
    },

    /// Show database statistics
    Info,

    /// Convert XML spellbooks to the .sbk text format
    Convert {
        /// Directory containing .xml / .xml.gz spellbooks
        source_dir: PathBuf,

        /// Directory the .sbk files are written to (created if missing)
        dest_dir: PathBuf,

        /// Write gzip-compressed .sbk.gz files
        #[arg(long)]
        compress: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the resolved database path and the settings file
    Show,

    /// Print the settings file path
    Path,

    /// Save the default database path in settings.toml
    SetDb {
        /// Database file path
        path: PathBuf,
    },
}
