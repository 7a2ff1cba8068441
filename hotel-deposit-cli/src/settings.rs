//! Settings file location and database path resolution.
//!
//! The settings file is `<config_dir>/hotel-deposit/settings.toml`. Only the
//! `[database] path` key is read or written here; other keys are preserved.

use std::io;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the configured database path.
pub(crate) const DB_ENV_VAR: &str = "HOTEL_DEPOSIT_DB";

/// Canonical path to the settings file.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("hotel-deposit").join("settings.toml")
}

/// Database location used when nothing else is configured.
pub(crate) fn default_db_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("hotel-deposit").join("deposits.db")
}

/// Where the database path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DbPathSource {
    Flag,
    Env,
    Settings,
    Default,
}

impl std::fmt::Display for DbPathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "--db"),
            Self::Env => write!(f, "{DB_ENV_VAR}"),
            Self::Settings => write!(f, "settings.toml"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Resolve the database path using a priority chain:
///
/// 1. `--db` flag
/// 2. `HOTEL_DEPOSIT_DB` environment variable
/// 3. `[database] path` in `settings.toml`
/// 4. `<data_dir>/hotel-deposit/deposits.db`
pub(crate) fn resolve_db_path(flag: Option<PathBuf>) -> (PathBuf, DbPathSource) {
    let env = std::env::var_os(DB_ENV_VAR).map(PathBuf::from);
    let saved = std::fs::read_to_string(settings_path())
        .ok()
        .and_then(|contents| db_path_from_settings(&contents));
    pick_db_path(flag, env, saved)
}

fn pick_db_path(
    flag: Option<PathBuf>,
    env: Option<PathBuf>,
    saved: Option<PathBuf>,
) -> (PathBuf, DbPathSource) {
    let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();
    if let Some(p) = flag.filter(non_empty) {
        return (p, DbPathSource::Flag);
    }
    if let Some(p) = env.filter(non_empty) {
        return (p, DbPathSource::Env);
    }
    if let Some(p) = saved {
        return (p, DbPathSource::Settings);
    }
    (default_db_path(), DbPathSource::Default)
}

/// Read `database.path` from settings text, if set.
fn db_path_from_settings(contents: &str) -> Option<PathBuf> {
    let doc: toml::Value = contents.parse().ok()?;
    let path = doc.get("database")?.get("path")?.as_str()?;
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Save (or clear) the database path in `settings.toml`.
pub(crate) fn save_db_path(path: Option<&Path>) -> io::Result<()> {
    let settings = settings_path();
    let existing = std::fs::read_to_string(&settings).ok();
    let serialized = update_db_path(existing.as_deref(), path)?;

    // Write atomically
    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, &settings)?;

    Ok(())
}

/// Apply a `database.path` change to settings text, keeping every other key.
fn update_db_path(existing: Option<&str>, path: Option<&Path>) -> io::Result<String> {
    let mut doc: toml::Value = existing
        .and_then(|contents| contents.parse().ok())
        .unwrap_or_else(|| toml::Value::Table(Default::default()));

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let database = table
        .entry("database")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let db_table = database
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[database] is not a table"))?;

    match path {
        Some(p) => {
            db_table.insert(
                "path".to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            db_table.remove("path");
        }
    }

    toml::to_string_pretty(&doc).map_err(io::Error::other)
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub(crate) fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_everything() {
        let (path, source) = pick_db_path(
            Some("flag.db".into()),
            Some("env.db".into()),
            Some("saved.db".into()),
        );
        assert_eq!(path, PathBuf::from("flag.db"));
        assert_eq!(source, DbPathSource::Flag);
    }

    #[test]
    fn env_then_settings_then_default() {
        let (path, source) = pick_db_path(None, Some("env.db".into()), Some("saved.db".into()));
        assert_eq!((path, source), (PathBuf::from("env.db"), DbPathSource::Env));

        let (path, source) = pick_db_path(None, Some("".into()), Some("saved.db".into()));
        assert_eq!((path, source), (PathBuf::from("saved.db"), DbPathSource::Settings));

        let (path, source) = pick_db_path(None, None, None);
        assert_eq!(source, DbPathSource::Default);
        assert!(path.ends_with("hotel-deposit/deposits.db"));
    }

    #[test]
    fn reads_database_path() {
        let text = "[database]\npath = \"/srv/deposits.db\"\n";
        assert_eq!(db_path_from_settings(text), Some(PathBuf::from("/srv/deposits.db")));
        assert_eq!(db_path_from_settings("[database]\npath = \"\"\n"), None);
        assert_eq!(db_path_from_settings("[other]\nx = 1\n"), None);
        assert_eq!(db_path_from_settings("not = [valid"), None);
    }

    #[test]
    fn update_preserves_other_keys() {
        let text = "[ui]\ntheme = \"dark\"\n\n[database]\npath = \"old.db\"\n";
        let updated = update_db_path(Some(text), Some(Path::new("new.db"))).unwrap();
        assert_eq!(db_path_from_settings(&updated), Some(PathBuf::from("new.db")));
        assert!(updated.contains("theme = \"dark\""));

        let cleared = update_db_path(Some(&updated), None).unwrap();
        assert_eq!(db_path_from_settings(&cleared), None);
        assert!(cleared.contains("theme = \"dark\""));
    }

    #[test]
    fn update_starts_fresh_from_garbage() {
        let updated = update_db_path(Some("{{{"), Some(Path::new("a.db"))).unwrap();
        assert_eq!(db_path_from_settings(&updated), Some(PathBuf::from("a.db")));
    }
}
