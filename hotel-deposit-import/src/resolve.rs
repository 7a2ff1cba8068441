//! Brand lookup-or-create.

use hotel_deposit_db::operations;
use rusqlite::Connection;

use crate::error::ImportError;

/// Resolve a brand name to its id, creating the brand on first reference.
///
/// A missing or blank name resolves to `None` without touching the store.
/// Names match exactly; `"Hilton"` and `"hilton"` are distinct brands.
pub fn resolve_brand(conn: &Connection, brand_name: Option<&str>) -> Result<Option<i64>, ImportError> {
    match brand_name {
        Some(name) if !name.trim().is_empty() => Ok(Some(operations::upsert_brand(conn, name)?)),
        _ => Ok(None),
    }
}
