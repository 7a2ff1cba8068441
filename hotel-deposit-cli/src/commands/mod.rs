pub(crate) mod admin;
pub(crate) mod config;
pub(crate) mod import;
pub(crate) mod query;
pub(crate) mod stats;

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde::Serialize;

use crate::CliError;
use crate::settings::resolve_db_path;

/// Resolve the database path and open it, creating the schema if needed.
pub(crate) fn open_db(flag: Option<PathBuf>) -> Result<(Connection, PathBuf), CliError> {
    let (path, source) = resolve_db_path(flag);
    log::debug!("Using database {} (from {})", path.display(), source);
    ensure_parent(&path)?;
    let conn = hotel_deposit_db::open_database(&path).map_err(|source| CliError::Open {
        path: path.display().to_string(),
        source,
    })?;
    Ok((conn, path))
}

/// Create the database's parent directory so the default location works on
/// first run.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    println!("{text}");
    Ok(())
}

/// Truncate a string to a maximum width, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}

/// `"City, ST"`, or whichever half is present.
pub(crate) fn location(city: Option<&str>, state: Option<&str>) -> String {
    match (city, state) {
        (Some(c), Some(s)) => format!("{c}, {s}"),
        (Some(c), None) => c.to_string(),
        (None, Some(s)) => s.to_string(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_str("Grand Hotel", 20), "Grand Hotel");
        assert_eq!(truncate_str("Grand Hotel", 8), "Grand...");
        assert_eq!(truncate_str("Hôtel Café Royal", 8), "Hôtel...");
        assert_eq!(truncate_str("abcdef", 2), "ab");
    }

    #[test]
    fn location_joins_present_parts() {
        assert_eq!(location(Some("Oakland"), Some("CA")), "Oakland, CA");
        assert_eq!(location(None, Some("CA")), "CA");
        assert_eq!(location(None, None), "");
    }
}
