//! Read queries for the deposit database.
//!
//! Provides search, paging, per-slug lookup, brand and city listings, and
//! store-wide analytics. Nothing here writes.

use hotel_deposit_catalog::types::*;
use rusqlite::{Connection, OptionalExtension, params};

use crate::operations::OperationError;

/// Shortest query `search_hotels` will run.
pub const MIN_SEARCH_LEN: usize = 2;
/// Maximum number of search hits.
pub const SEARCH_LIMIT: u32 = 20;
/// Default page size for `list_hotels`.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

const HOTEL_VIEW_SELECT: &str = "SELECT h.id, h.name, h.city, h.state, h.slug, b.brand_name,
        p.deposit_amount, p.is_percentage, p.hold_duration_days, p.refund_terms,
        p.last_updated
 FROM hotels h
 LEFT JOIN brands b ON h.brand_id = b.id
 LEFT JOIN policies p ON h.id = p.hotel_id";

// ── Hotel Lookups ───────────────────────────────────────────────────────────

/// Search hotels by name or city (case-insensitive substring).
///
/// Name matches rank ahead of city-only matches. Queries shorter than
/// [`MIN_SEARCH_LEN`] return nothing.
pub fn search_hotels(conn: &Connection, query: &str) -> Result<Vec<HotelView>, OperationError> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_LEN {
        return Ok(Vec::new());
    }
    let pattern = format!("%{}%", query);
    let mut stmt = conn.prepare(&format!(
        "{HOTEL_VIEW_SELECT}
         WHERE LOWER(h.name) LIKE LOWER(?1) OR LOWER(h.city) LIKE LOWER(?1)
         ORDER BY CASE WHEN LOWER(h.name) LIKE LOWER(?1) THEN 1 ELSE 2 END, h.name
         LIMIT {SEARCH_LIMIT}"
    ))?;
    let rows = stmt.query_map(params![pattern], row_to_hotel_view)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Optional substring filters for [`list_hotels`].
#[derive(Debug, Clone, Default)]
pub struct HotelFilter {
    pub city: Option<String>,
    pub brand: Option<String>,
}

/// List one page of hotels ordered by name. `page` is 1-based.
pub fn list_hotels(
    conn: &Connection,
    filter: &HotelFilter,
    page: u32,
    limit: u32,
) -> Result<HotelPage, OperationError> {
    let page = page.max(1);
    let limit = limit.max(1);
    let offset = (page - 1) as i64 * limit as i64;

    let city = filter.city.as_ref().map(|c| format!("%{c}%"));
    let brand = filter.brand.as_ref().map(|b| format!("%{b}%"));
    let where_clause = "WHERE (?1 IS NULL OR LOWER(h.city) LIKE LOWER(?1))
           AND (?2 IS NULL OR LOWER(b.brand_name) LIKE LOWER(?2))";

    let mut stmt = conn.prepare(&format!(
        "{HOTEL_VIEW_SELECT}
         {where_clause}
         ORDER BY h.name LIMIT ?3 OFFSET ?4"
    ))?;
    let hotels = stmt
        .query_map(params![city, brand, limit, offset], row_to_hotel_view)?
        .collect::<Result<Vec<_>, _>>()?;

    let total: i64 = conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM hotels h
             LEFT JOIN brands b ON h.brand_id = b.id
             {where_clause}"
        ),
        params![city, brand],
        |row| row.get(0),
    )?;

    Ok(HotelPage {
        hotels,
        total,
        page,
        total_pages: (total as u64).div_ceil(limit as u64) as u32,
    })
}

/// Full joined read of one hotel.
pub fn find_hotel_by_slug(
    conn: &Connection,
    slug: &str,
) -> Result<Option<HotelDetail>, OperationError> {
    let detail = conn
        .query_row(
            "SELECT h.id, h.name, h.address, h.city, h.state, h.zip, h.country, h.phone,
                    h.slug, b.id, b.brand_name, p.id, p.deposit_amount, p.is_percentage,
                    p.hold_duration_days, p.refund_terms, p.last_updated
             FROM hotels h
             LEFT JOIN brands b ON h.brand_id = b.id
             LEFT JOIN policies p ON h.id = p.hotel_id
             WHERE h.slug = ?1",
            params![slug],
            |row| {
                Ok(HotelDetail {
                    id: row.get(0)?,
                    hotel_name: row.get(1)?,
                    address: row.get(2)?,
                    city: row.get(3)?,
                    state: row.get(4)?,
                    zip: row.get(5)?,
                    country: row.get(6)?,
                    phone: row.get(7)?,
                    slug: row.get(8)?,
                    brand_id: row.get(9)?,
                    brand_name: row.get(10)?,
                    policy_id: row.get(11)?,
                    deposit_amount: row.get(12)?,
                    is_percentage: row.get(13)?,
                    hold_duration_days: row.get(14)?,
                    refund_terms: row.get(15)?,
                    last_updated: row.get(16)?,
                })
            },
        )
        .optional()?;
    Ok(detail)
}

// ── Brand Queries ───────────────────────────────────────────────────────────

/// List all brands with their hotel counts, ordered by name.
pub fn list_brands(conn: &Connection) -> Result<Vec<BrandSummary>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.brand_name, COUNT(h.id)
         FROM brands b
         LEFT JOIN hotels h ON b.id = h.brand_id
         GROUP BY b.id
         ORDER BY b.brand_name",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(BrandSummary {
            id: row.get(0)?,
            brand_name: row.get(1)?,
            hotel_count: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Hotels of the first brand matching `brand_name` (case-insensitive),
/// ordered by city then name.
pub fn hotels_for_brand(
    conn: &Connection,
    brand_name: &str,
) -> Result<Vec<HotelView>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "{HOTEL_VIEW_SELECT}
         WHERE h.brand_id = (
             SELECT id FROM brands WHERE LOWER(brand_name) = LOWER(?1) ORDER BY id LIMIT 1
         )
         ORDER BY h.city, h.name"
    ))?;
    let rows = stmt.query_map(params![brand_name], row_to_hotel_view)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── City Queries ────────────────────────────────────────────────────────────

/// The 50 city/state pairs with the most hotels.
pub fn list_cities(conn: &Connection) -> Result<Vec<CitySummary>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT city, state, COUNT(*) AS hotel_count
         FROM hotels
         GROUP BY city, state
         ORDER BY hotel_count DESC, city
         LIMIT 50",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(CitySummary {
            city: row.get(0)?,
            state: row.get(1)?,
            hotel_count: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Policy Queries ──────────────────────────────────────────────────────────

/// All policies ordered by id.
pub fn list_policies(conn: &Connection) -> Result<Vec<Policy>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, hotel_id, deposit_amount, is_percentage, hold_duration_days,
                refund_terms, last_updated
         FROM policies ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Policy {
            id: row.get(0)?,
            hotel_id: row.get(1)?,
            deposit_amount: row.get(2)?,
            is_percentage: row.get(3)?,
            hold_duration_days: row.get(4)?,
            refund_terms: row.get(5)?,
            last_updated: row.get(6)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Store-wide totals and the average fixed deposit.
pub fn deposit_analytics(conn: &Connection) -> Result<DepositAnalytics, OperationError> {
    let analytics = conn.query_row(
        "SELECT
             (SELECT COUNT(*) FROM hotels),
             (SELECT COUNT(*) FROM policies),
             (SELECT COUNT(*) FROM brands),
             (SELECT AVG(deposit_amount) FROM policies WHERE is_percentage = 0)",
        [],
        |row| {
            Ok(DepositAnalytics {
                total_hotels: row.get(0)?,
                total_policies: row.get(1)?,
                total_brands: row.get(2)?,
                avg_deposit: row.get(3)?,
            })
        },
    )?;
    Ok(analytics)
}

// ── Import Log Queries ──────────────────────────────────────────────────────

/// List recent import logs, newest first.
pub fn list_import_logs(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<ImportLog>, OperationError> {
    let limit = limit.unwrap_or(20);
    let mut stmt = conn.prepare(&format!(
        "SELECT id, source_type, source_name, imported_at,
                records_created, records_updated, records_skipped
         FROM import_log ORDER BY id DESC LIMIT {limit}"
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok(ImportLog {
            id: row.get(0)?,
            source_type: row.get(1)?,
            source_name: row.get(2)?,
            imported_at: row.get(3)?,
            records_created: row.get(4)?,
            records_updated: row.get(5)?,
            records_skipped: row.get(6)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Row Mapping Helpers ─────────────────────────────────────────────────────

fn row_to_hotel_view(row: &rusqlite::Row<'_>) -> rusqlite::Result<HotelView> {
    Ok(HotelView {
        id: row.get(0)?,
        hotel_name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        slug: row.get(4)?,
        brand_name: row.get(5)?,
        deposit_amount: row.get(6)?,
        is_percentage: row.get(7)?,
        hold_duration_days: row.get(8)?,
        refund_terms: row.get(9)?,
        last_updated: row.get(10)?,
    })
}
