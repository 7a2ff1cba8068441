//! Write operations for brands, hotels, policies, and the import log.
//!
//! Every upsert is a single `INSERT … ON CONFLICT … DO UPDATE … RETURNING id`
//! statement, so the row identity comes back from the same statement that
//! wrote it.

use hotel_deposit_catalog::types::*;
use rusqlite::types::Value;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
}

impl OperationError {
    /// True for uniqueness, CHECK, NOT NULL, and foreign key violations.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation
        )
    }

    fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

// ── Conflict Resolution ─────────────────────────────────────────────────────

/// A hotel column that may be rewritten when an upsert hits an existing slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelField {
    Name,
    Brand,
    Address,
    City,
    State,
    Zip,
    Country,
    Phone,
}

impl HotelField {
    fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Brand => "brand_id",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::Zip => "zip",
            Self::Country => "country",
            Self::Phone => "phone",
        }
    }
}

/// How an eligible field is rewritten on conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Take the incoming value, even when it is null.
    Replace,
    /// Take the incoming value unless it is null.
    KeepExistingIfNull,
}

/// The set of hotel fields eligible for overwrite when a slug already exists.
/// Fields not in the set keep their stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictFields {
    fields: Vec<(HotelField, Overwrite)>,
}

impl ConflictFields {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn with(mut self, field: HotelField, overwrite: Overwrite) -> Self {
        self.fields.retain(|(f, _)| *f != field);
        self.fields.push((field, overwrite));
        self
    }

    /// File imports: rename, and attach a brand without ever clearing one.
    pub fn file_import() -> Self {
        Self::new()
            .with(HotelField::Name, Overwrite::Replace)
            .with(HotelField::Brand, Overwrite::KeepExistingIfNull)
    }

    /// Administrative imports additionally refresh location and contact data.
    pub fn admin() -> Self {
        Self::file_import()
            .with(HotelField::Address, Overwrite::KeepExistingIfNull)
            .with(HotelField::City, Overwrite::Replace)
            .with(HotelField::State, Overwrite::Replace)
            .with(HotelField::Zip, Overwrite::KeepExistingIfNull)
            .with(HotelField::Phone, Overwrite::KeepExistingIfNull)
    }

    pub fn get(&self, field: HotelField) -> Option<Overwrite> {
        self.fields.iter().find(|(f, _)| *f == field).map(|(_, o)| *o)
    }

    fn set_clause(&self) -> String {
        let mut parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, overwrite)| {
                let col = field.column();
                match overwrite {
                    Overwrite::Replace => format!("{col} = excluded.{col}"),
                    Overwrite::KeepExistingIfNull => {
                        format!("{col} = COALESCE(excluded.{col}, {col})")
                    }
                }
            })
            .collect();
        parts.push("updated_at = datetime('now')".to_string());
        parts.join(",\n             ")
    }
}

impl Default for ConflictFields {
    fn default() -> Self {
        Self::file_import()
    }
}

// ── Brand Operations ────────────────────────────────────────────────────────

/// Insert a brand if absent and return its id either way.
pub fn upsert_brand(conn: &Connection, brand_name: &str) -> Result<i64, OperationError> {
    let id = conn.query_row(
        "INSERT INTO brands (brand_name) VALUES (?1)
         ON CONFLICT(brand_name) DO UPDATE SET brand_name = excluded.brand_name
         RETURNING id",
        params![brand_name],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Find a brand id by exact name.
pub fn find_brand_by_name(conn: &Connection, brand_name: &str) -> Result<Option<i64>, OperationError> {
    let id = conn
        .query_row(
            "SELECT id FROM brands WHERE brand_name = ?1",
            params![brand_name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Delete a brand. Hotels that referenced it keep existing with no brand.
pub fn delete_brand(conn: &Connection, id: i64) -> Result<(), OperationError> {
    let changed = conn.execute("DELETE FROM brands WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(OperationError::not_found("brand", id));
    }
    Ok(())
}

// ── Hotel Operations ────────────────────────────────────────────────────────

/// Insert a hotel, or update the fields in `on_conflict` if its slug exists.
///
/// Returns the hotel id, or `None` if the statement produced no row.
pub fn upsert_hotel(
    conn: &Connection,
    hotel: &NewHotel,
    on_conflict: &ConflictFields,
) -> Result<Option<i64>, OperationError> {
    let sql = format!(
        "INSERT INTO hotels (name, brand_id, address, city, state, zip, country, phone, slug)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(slug) DO UPDATE SET
             {}
         RETURNING id",
        on_conflict.set_clause()
    );
    let id = conn
        .query_row(
            &sql,
            params![
                hotel.name,
                hotel.brand_id,
                hotel.address,
                hotel.city,
                hotel.state,
                hotel.zip,
                hotel.country,
                hotel.phone,
                hotel.slug,
            ],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Insert a new hotel. An existing slug is a constraint violation.
pub fn insert_hotel(conn: &Connection, hotel: &NewHotel) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO hotels (name, brand_id, address, city, state, zip, country, phone, slug)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            hotel.name,
            hotel.brand_id,
            hotel.address,
            hotel.city,
            hotel.state,
            hotel.zip,
            hotel.country,
            hotel.phone,
            hotel.slug,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Rewrite every field of an existing hotel.
pub fn update_hotel(conn: &Connection, id: i64, hotel: &NewHotel) -> Result<(), OperationError> {
    let changed = conn.execute(
        "UPDATE hotels SET name = ?2, brand_id = ?3, address = ?4, city = ?5, state = ?6,
             zip = ?7, country = ?8, phone = ?9, slug = ?10, updated_at = datetime('now')
         WHERE id = ?1",
        params![
            id,
            hotel.name,
            hotel.brand_id,
            hotel.address,
            hotel.city,
            hotel.state,
            hotel.zip,
            hotel.country,
            hotel.phone,
            hotel.slug,
        ],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found("hotel", id));
    }
    Ok(())
}

/// Delete a hotel and, by cascade, its policy.
pub fn delete_hotel(conn: &Connection, id: i64) -> Result<(), OperationError> {
    let changed = conn.execute("DELETE FROM hotels WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(OperationError::not_found("hotel", id));
    }
    Ok(())
}

/// Find a hotel id by slug.
pub fn find_hotel_id_by_slug(conn: &Connection, slug: &str) -> Result<Option<i64>, OperationError> {
    let id = conn
        .query_row(
            "SELECT id FROM hotels WHERE slug = ?1",
            params![slug],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

pub fn hotel_exists(conn: &Connection, id: i64) -> Result<bool, OperationError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM hotels WHERE id = ?1)",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Load a stored hotel row by slug.
pub fn find_hotel(conn: &Connection, slug: &str) -> Result<Option<Hotel>, OperationError> {
    let hotel = conn
        .query_row(
            "SELECT id, name, brand_id, address, city, state, zip, country, phone, slug,
                    created_at, updated_at
             FROM hotels WHERE slug = ?1",
            params![slug],
            |row| {
                Ok(Hotel {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    brand_id: row.get(2)?,
                    address: row.get(3)?,
                    city: row.get(4)?,
                    state: row.get(5)?,
                    zip: row.get(6)?,
                    country: row.get(7)?,
                    phone: row.get(8)?,
                    slug: row.get(9)?,
                    created_at: row.get(10)?,
                    updated_at: row.get(11)?,
                })
            },
        )
        .optional()?;
    Ok(hotel)
}

// ── Policy Operations ───────────────────────────────────────────────────────

/// Insert a hotel's policy, or replace all of its fields wholesale.
///
/// Raw values are bound as given; the table's CHECK constraints reject
/// amounts and hold durations that are not numeric.
pub fn upsert_policy(
    conn: &Connection,
    hotel_id: i64,
    policy: &NewPolicy,
    last_updated: &str,
) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO policies (hotel_id, deposit_amount, is_percentage, hold_duration_days,
             refund_terms, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(hotel_id) DO UPDATE SET
             deposit_amount = excluded.deposit_amount,
             is_percentage = excluded.is_percentage,
             hold_duration_days = excluded.hold_duration_days,
             refund_terms = excluded.refund_terms,
             last_updated = excluded.last_updated",
        params![
            hotel_id,
            raw_to_sql(&policy.deposit_amount),
            policy.is_percentage,
            policy.hold_duration_days.as_ref().map(raw_to_sql),
            policy.refund_terms,
            last_updated,
        ],
    )?;
    Ok(())
}

/// Find the current policy of a hotel.
pub fn find_policy(conn: &Connection, hotel_id: i64) -> Result<Option<Policy>, OperationError> {
    let policy = conn
        .query_row(
            "SELECT id, hotel_id, deposit_amount, is_percentage, hold_duration_days,
                    refund_terms, last_updated
             FROM policies WHERE hotel_id = ?1",
            params![hotel_id],
            |row| {
                Ok(Policy {
                    id: row.get(0)?,
                    hotel_id: row.get(1)?,
                    deposit_amount: row.get(2)?,
                    is_percentage: row.get(3)?,
                    hold_duration_days: row.get(4)?,
                    refund_terms: row.get(5)?,
                    last_updated: row.get(6)?,
                })
            },
        )
        .optional()?;
    Ok(policy)
}

// ── Import Log Operations ───────────────────────────────────────────────────

/// Insert an import log entry. Returns the generated ID.
pub fn insert_import_log(conn: &Connection, log: &ImportLog) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO import_log (source_type, source_name, imported_at,
             records_created, records_updated, records_skipped)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            log.source_type,
            log.source_name,
            log.imported_at,
            log.records_created,
            log.records_updated,
            log.records_skipped,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn raw_to_sql(value: &RawValue) -> Value {
    match value {
        RawValue::Integer(i) => Value::Integer(*i),
        RawValue::Float(f) => Value::Real(*f),
        RawValue::Text(s) => Value::Text(s.clone()),
    }
}
