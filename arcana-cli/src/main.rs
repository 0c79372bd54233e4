//! arcana CLI
//!
//! Command-line interface for installing, searching and converting spellbooks.

mod cli_types;
mod commands;
mod error;
mod logger;
mod settings;
mod spinner;
mod table;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;
pub(crate) use logger::log_blank;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        log::logger().flush();
        std::process::exit(1);
    }
    log::logger().flush();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let quiet = cli.quiet;

    match cli.command {
        Commands::Install { source_dir } => {
            let (db_path, _) = settings::resolve_db_path(cli.db);
            commands::install::run_install(&db_path, &source_dir, quiet)
        }
        Commands::Clean => {
            let (db_path, _) = settings::resolve_db_path(cli.db);
            commands::clean::run_clean(&db_path)
        }
        Commands::Find {
            filters,
            sort,
            limit,
            show,
        } => {
            let (db_path, _) = settings::resolve_db_path(cli.db);
            commands::find::run_find(&db_path, filters, sort, limit, show)
        }
        Commands::Info => {
            let (db_path, _) = settings::resolve_db_path(cli.db);
            commands::info::run_info(&db_path)
        }
        Commands::Convert {
            source_dir,
            dest_dir,
            compress,
        } => commands::convert::run_convert(&source_dir, &dest_dir, compress, quiet),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                commands::config::run_config_show(cli.db);
                Ok(())
            }
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
            ConfigAction::SetDb { path } => commands::config::run_config_set_db(&path),
        },
    }
}
