//! Merge one normalized record into the store.
//!
//! The hotel is upserted by slug under an explicit [`ConflictFields`] set,
//! then its policy (if the record carries one) is replaced wholesale.

use hotel_deposit_catalog::types::{HotelRecord, NewHotel, NewPolicy, RawPolicy, RawValue};
use hotel_deposit_db::operations::{self, ConflictFields};
use rusqlite::Connection;

use crate::error::ImportError;

/// Hold duration applied by lenient coercion when none can be read.
pub const DEFAULT_HOLD_DAYS: i64 = 1;

/// How policy values are prepared before they reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Bind values as supplied. The store decides whether they are numeric.
    Strict,
    /// Parse amounts to floats and hold days to integers, defaulting hold
    /// days to [`DEFAULT_HOLD_DAYS`]. Unparseable amounts are still bound
    /// raw so the store rejects them.
    Lenient,
}

/// Result of upserting one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// The hotel's id, or `None` if the upsert matched no row.
    pub hotel_id: Option<i64>,
    /// True if the slug was unseen before this record.
    pub created: bool,
    pub policy_written: bool,
}

/// Prepare a record's policy for writing.
pub fn coerce_policy(policy: &RawPolicy, coercion: Coercion) -> NewPolicy {
    let (deposit_amount, hold_duration_days) = match coercion {
        Coercion::Strict => (
            policy.deposit_amount.clone(),
            policy.hold_duration_days.clone(),
        ),
        Coercion::Lenient => {
            let amount = match policy.deposit_amount.as_f64() {
                Some(f) => RawValue::Float(f),
                None => policy.deposit_amount.clone(),
            };
            let days = policy
                .hold_duration_days
                .as_ref()
                .and_then(RawValue::as_i64)
                .unwrap_or(DEFAULT_HOLD_DAYS);
            (amount, Some(RawValue::Integer(days)))
        }
    };

    NewPolicy {
        deposit_amount,
        is_percentage: policy.is_percentage,
        hold_duration_days,
        refund_terms: policy.refund_terms.clone(),
    }
}

/// Upsert a record's hotel and, when it carries one, its policy.
///
/// `brand_id` must already be resolved. A `None` brand never clears a stored
/// brand as long as `on_conflict` keeps brand as `KeepExistingIfNull`.
pub fn upsert_record(
    conn: &Connection,
    record: &HotelRecord,
    brand_id: Option<i64>,
    on_conflict: &ConflictFields,
    coercion: Coercion,
) -> Result<UpsertOutcome, ImportError> {
    let existed = operations::find_hotel_id_by_slug(conn, &record.slug)?.is_some();

    let hotel = NewHotel {
        name: record.name.clone(),
        brand_id,
        address: record.address.clone(),
        city: record.city.clone(),
        state: record.state.clone(),
        zip: record.zip.clone(),
        country: record.country.clone(),
        phone: record.phone.clone(),
        slug: record.slug.clone(),
    };

    let Some(hotel_id) = operations::upsert_hotel(conn, &hotel, on_conflict)? else {
        return Ok(UpsertOutcome {
            hotel_id: None,
            created: false,
            policy_written: false,
        });
    };

    let mut policy_written = false;
    if let Some(raw) = &record.policy {
        let policy = coerce_policy(raw, coercion);
        operations::upsert_policy(conn, hotel_id, &policy, &now_rfc3339())?;
        policy_written = true;
    }

    Ok(UpsertOutcome {
        hotel_id: Some(hotel_id),
        created: !existed,
        policy_written,
    })
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(amount: RawValue, days: Option<RawValue>) -> RawPolicy {
        RawPolicy {
            deposit_amount: amount,
            is_percentage: false,
            hold_duration_days: days,
            refund_terms: None,
        }
    }

    #[test]
    fn lenient_parses_text() {
        let p = coerce_policy(
            &raw(RawValue::Text("49.99".into()), Some(RawValue::Text("3".into()))),
            Coercion::Lenient,
        );
        assert_eq!(p.deposit_amount, RawValue::Float(49.99));
        assert_eq!(p.hold_duration_days, Some(RawValue::Integer(3)));
    }

    #[test]
    fn lenient_defaults_hold_days() {
        let p = coerce_policy(&raw(RawValue::Integer(10), None), Coercion::Lenient);
        assert_eq!(p.hold_duration_days, Some(RawValue::Integer(DEFAULT_HOLD_DAYS)));

        let p = coerce_policy(
            &raw(RawValue::Integer(10), Some(RawValue::Text("soon".into()))),
            Coercion::Lenient,
        );
        assert_eq!(p.hold_duration_days, Some(RawValue::Integer(DEFAULT_HOLD_DAYS)));
    }

    #[test]
    fn lenient_keeps_unparseable_amount_raw() {
        let p = coerce_policy(&raw(RawValue::Text("abc".into()), None), Coercion::Lenient);
        assert_eq!(p.deposit_amount, RawValue::Text("abc".into()));
    }

    #[test]
    fn strict_passes_values_through() {
        let p = coerce_policy(&raw(RawValue::Text("12".into()), None), Coercion::Strict);
        assert_eq!(p.deposit_amount, RawValue::Text("12".into()));
        assert_eq!(p.hold_duration_days, None);
    }
}
