//! Data model types for the deposit catalog.
//!
//! These types represent the persistent catalog schema (brands, hotels,
//! policies, import tracking), the normalized import records that feed it,
//! and the joined rows handed to read-side consumers.

use serde::{Deserialize, Serialize};

use crate::display::format_deposit;
use crate::features::DepositRecord;

/// Default country applied when a record does not name one.
pub const DEFAULT_COUNTRY: &str = "USA";

// ── Brand ───────────────────────────────────────────────────────────────────

/// A hotel brand. `brand_name` is the whole identity (exact match).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub brand_name: String,
    pub created_at: String,
}

// ── Hotel ───────────────────────────────────────────────────────────────────

/// A stored hotel row, identified by its slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub brand_id: Option<i64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: String,
    pub phone: Option<String>,
    pub slug: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Hotel fields as written by an insert or upsert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewHotel {
    pub name: String,
    pub brand_id: Option<i64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: String,
    pub phone: Option<String>,
    pub slug: String,
}

// ── Policy ──────────────────────────────────────────────────────────────────

/// The current deposit policy of a hotel (at most one per hotel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: i64,
    pub hotel_id: i64,
    /// Currency amount, or percentage points when `is_percentage` is set.
    pub deposit_amount: f64,
    pub is_percentage: bool,
    pub hold_duration_days: Option<i64>,
    pub refund_terms: Option<String>,
    pub last_updated: String,
}

impl DepositRecord for Policy {
    fn deposit_amount(&self) -> Option<f64> {
        Some(self.deposit_amount)
    }

    fn is_percentage(&self) -> bool {
        self.is_percentage
    }
}

/// Policy fields as written by an upsert. Values stay uncoerced so that the
/// store gets the final say on malformed input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPolicy {
    pub deposit_amount: RawValue,
    pub is_percentage: bool,
    pub hold_duration_days: Option<RawValue>,
    pub refund_terms: Option<String>,
}

// ── Import Records ──────────────────────────────────────────────────────────

/// A loosely typed scalar lifted from an input file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Interpret the value as a float, parsing text if needed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the value as an integer. Floats are truncated; text must
    /// start with an integer (`"3 nights"` → 3).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Self::Float(_) => None,
            Self::Text(s) => {
                let s = s.trim();
                let end = s
                    .char_indices()
                    .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
                    .map_or(s.len(), |(i, _)| i);
                s[..end].parse().ok()
            }
        }
    }
}

/// Policy sub-fields of an import record, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPolicy {
    pub deposit_amount: RawValue,
    pub is_percentage: bool,
    pub hold_duration_days: Option<RawValue>,
    pub refund_terms: Option<String>,
}

/// A normalized hotel record, the unit of work of the import pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelRecord {
    pub name: String,
    pub brand: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: String,
    pub phone: Option<String>,
    pub slug: String,
    /// Present only when the source supplied a deposit amount.
    pub policy: Option<RawPolicy>,
}

// ── Import Tracking ─────────────────────────────────────────────────────────

/// Log entry for one committed import batch.
#[derive(Debug, Clone, Serialize)]
pub struct ImportLog {
    pub id: i64,
    pub source_type: String,
    pub source_name: String,
    pub imported_at: String,
    pub records_created: i64,
    pub records_updated: i64,
    pub records_skipped: i64,
}

// ── Read Rows ───────────────────────────────────────────────────────────────

/// A hotel joined with its brand and policy, as listed by search and paging.
#[derive(Debug, Clone, Serialize)]
pub struct HotelView {
    pub id: i64,
    pub hotel_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub slug: String,
    pub brand_name: Option<String>,
    pub deposit_amount: Option<f64>,
    pub is_percentage: Option<bool>,
    pub hold_duration_days: Option<i64>,
    pub refund_terms: Option<String>,
    pub last_updated: Option<String>,
}

impl HotelView {
    /// Human-readable deposit, `None` when the hotel has no policy.
    pub fn deposit_display(&self) -> Option<String> {
        self.deposit_amount
            .map(|amount| format_deposit(amount, self.is_percentage.unwrap_or(false)))
    }
}

impl DepositRecord for HotelView {
    fn deposit_amount(&self) -> Option<f64> {
        self.deposit_amount
    }

    fn is_percentage(&self) -> bool {
        self.is_percentage.unwrap_or(false)
    }
}

/// Full per-hotel read: every hotel field plus brand and policy.
#[derive(Debug, Clone, Serialize)]
pub struct HotelDetail {
    pub id: i64,
    pub hotel_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: String,
    pub phone: Option<String>,
    pub slug: String,
    pub brand_id: Option<i64>,
    pub brand_name: Option<String>,
    pub policy_id: Option<i64>,
    pub deposit_amount: Option<f64>,
    pub is_percentage: Option<bool>,
    pub hold_duration_days: Option<i64>,
    pub refund_terms: Option<String>,
    pub last_updated: Option<String>,
}

impl HotelDetail {
    pub fn deposit_display(&self) -> Option<String> {
        self.deposit_amount
            .map(|amount| format_deposit(amount, self.is_percentage.unwrap_or(false)))
    }
}

/// One page of hotels plus paging totals.
#[derive(Debug, Clone, Serialize)]
pub struct HotelPage {
    pub hotels: Vec<HotelView>,
    pub total: i64,
    pub page: u32,
    pub total_pages: u32,
}

/// A brand with the number of hotels referencing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandSummary {
    pub id: i64,
    pub brand_name: String,
    pub hotel_count: i64,
}

/// A city/state pair with its hotel count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySummary {
    pub city: Option<String>,
    pub state: Option<String>,
    pub hotel_count: i64,
}

/// Store-wide totals for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepositAnalytics {
    pub total_hotels: i64,
    pub total_policies: i64,
    pub total_brands: i64,
    /// Mean of fixed (non-percentage) deposits, `None` when there are none.
    pub avg_deposit: Option<f64>,
}
