use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;
use crate::settings::{self, DB_ENV_VAR};

/// Show the settings file and where the database path resolves to.
pub(crate) fn run_config_show(db: Option<PathBuf>) {
    let path = settings::settings_path();

    log::info!(
        "{}",
        "hotel-deposit Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let (db_path, source) = settings::resolve_db_path(db);
    log::info!(
        "  Database:      {} {}",
        db_path.display().if_supports_color(Stdout, |t| t.cyan()),
        format!("({source})").if_supports_color(Stdout, |t| t.dimmed()),
    );
    if std::env::var_os(DB_ENV_VAR).is_some() {
        log::info!("  {} is set", DB_ENV_VAR);
    }

    if let Some(contents) = settings::load_settings_string() {
        crate::log_blank();
        for line in contents.lines() {
            log::info!("    {}", line);
        }
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings::settings_path().display());
}

/// Save or clear the database path.
pub(crate) fn run_config_set_db(path: Option<PathBuf>) -> Result<(), CliError> {
    let absolute = match path {
        Some(p) if p.is_relative() => Some(std::env::current_dir()?.join(p)),
        other => other,
    };
    settings::save_db_path(absolute.as_deref())
        .map_err(|e| CliError::config(format!("Failed to write settings: {e}")))?;

    match absolute {
        Some(p) => log::info!(
            "  {} Database path set to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            p.display(),
        ),
        None => log::info!(
            "  {} Database path cleared",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        ),
    }
    Ok(())
}
