//! hotel-deposit CLI
//!
//! Command-line interface for importing and browsing hotel deposit policies.

mod cli_types;
mod commands;
mod error;
mod logging;
mod settings;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;
pub(crate) use logging::log_blank;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to set up logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let db = cli.db;
    let json = cli.json;

    match cli.command {
        Commands::Import {
            file,
            format,
            fail_fast,
            skip_errors,
        } => commands::import::run_import(
            db,
            file,
            format,
            fail_fast,
            skip_errors,
            cli.quiet,
            json,
        ),
        Commands::Admin { action } => commands::admin::run_admin(db, action, json),
        Commands::Search { query } => commands::query::run_search(db, &query, json),
        Commands::Hotels { filter } => commands::query::run_hotels(db, filter, json),
        Commands::Hotel { slug } => commands::query::run_hotel(db, &slug, json),
        Commands::Brands { brand, top } => commands::query::run_brands(db, brand, top, json),
        Commands::Cities => commands::query::run_cities(db, json),
        Commands::Policies => commands::query::run_policies(db, json),
        Commands::Stats => commands::stats::run_stats(db, json),
        Commands::History { limit } => commands::query::run_history(db, limit, json),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                commands::config::run_config_show(db);
                Ok(())
            }
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
            ConfigAction::SetDb { path } => commands::config::run_config_set_db(Some(path)),
            ConfigAction::ClearDb => commands::config::run_config_set_db(None),
        },
    }
}
