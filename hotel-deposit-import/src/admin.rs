//! Administrative, programmatic entry points.
//!
//! Every call opens and commits its own transaction. Errors are returned to
//! the caller; nothing is partially applied.

use hotel_deposit_catalog::types::{DEFAULT_COUNTRY, NewHotel, NewPolicy, RawValue};
use hotel_deposit_catalog::hotel_slug;
use hotel_deposit_db::operations::{self, OperationError};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::coordinator::{Batch, BatchOptions, ImportStats, SourceFormat, run_batch};
use crate::error::ImportError;
use crate::normalize::RawRecord;
use crate::upsert::now_rfc3339;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    Import(#[from] ImportError),
}

impl From<OperationError> for AdminError {
    fn from(e: OperationError) -> Self {
        Self::Import(e.into())
    }
}

impl From<rusqlite::Error> for AdminError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Import(e.into())
    }
}

/// A bulk payload: brand names plus hotel objects with nested `policy`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminPayload {
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub hotels: Vec<Map<String, Value>>,
}

impl AdminPayload {
    pub fn from_json_str(content: &str) -> Result<Self, ImportError> {
        serde_json::from_str(content)
            .map_err(|e| ImportError::format(format!("invalid admin payload: {e}")))
    }
}

/// Deposit policy fields as entered by an administrator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolicyInput {
    pub deposit_amount: f64,
    #[serde(default)]
    pub is_percentage: bool,
    pub hold_duration_days: Option<i64>,
    pub refund_terms: Option<String>,
}

impl PolicyInput {
    fn to_new_policy(&self) -> NewPolicy {
        NewPolicy {
            deposit_amount: RawValue::Float(self.deposit_amount),
            is_percentage: self.is_percentage,
            hold_duration_days: self.hold_duration_days.map(RawValue::Integer),
            refund_terms: self.refund_terms.clone(),
        }
    }
}

/// Hotel fields as entered by an administrator. The slug is always derived.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HotelInput {
    pub name: String,
    pub brand_id: Option<i64>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub policy: Option<PolicyInput>,
}

impl HotelInput {
    fn to_new_hotel(&self) -> Result<NewHotel, ImportError> {
        if self.name.trim().is_empty() {
            return Err(ImportError::validation("missing required field `name`"));
        }
        Ok(NewHotel {
            name: self.name.clone(),
            brand_id: self.brand_id,
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip: self.zip.clone(),
            country: self
                .country
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            phone: self.phone.clone(),
            slug: hotel_slug(&self.name, self.city.as_deref()),
        })
    }
}

/// Import a bulk payload in one transaction. The first failing record
/// rolls back the whole payload.
pub fn import_payload(
    conn: &mut Connection,
    payload: &AdminPayload,
) -> Result<ImportStats, AdminError> {
    let batch = Batch {
        source_name: "admin payload".to_string(),
        format: SourceFormat::Json,
        brands: payload.brands.clone(),
        records: payload.hotels.iter().cloned().map(RawRecord::Json).collect(),
    };
    Ok(run_batch(conn, &batch, &BatchOptions::admin(), None)?)
}

/// Create a hotel, and its policy when given. An existing slug is a
/// conflict. Returns the new hotel's slug.
pub fn create_hotel(conn: &mut Connection, input: &HotelInput) -> Result<String, AdminError> {
    let hotel = input.to_new_hotel()?;
    let tx = conn.transaction()?;
    let hotel_id = operations::insert_hotel(&tx, &hotel)?;
    if let Some(policy) = &input.policy {
        operations::upsert_policy(&tx, hotel_id, &policy.to_new_policy(), &now_rfc3339())?;
    }
    tx.commit()?;
    log::info!("Created hotel {} ({})", hotel.name, hotel.slug);
    Ok(hotel.slug)
}

/// Rewrite every field of a hotel and recompute its slug. The policy is
/// replaced when given and left alone otherwise. Returns the new slug.
pub fn update_hotel(
    conn: &mut Connection,
    id: i64,
    input: &HotelInput,
) -> Result<String, AdminError> {
    let hotel = input.to_new_hotel()?;
    let tx = conn.transaction()?;
    operations::update_hotel(&tx, id, &hotel).map_err(|e| not_found(e, "hotel", id))?;
    if let Some(policy) = &input.policy {
        operations::upsert_policy(&tx, id, &policy.to_new_policy(), &now_rfc3339())?;
    }
    tx.commit()?;
    Ok(hotel.slug)
}

/// Delete a hotel. Its policy goes with it.
pub fn delete_hotel(conn: &mut Connection, id: i64) -> Result<(), AdminError> {
    let tx = conn.transaction()?;
    operations::delete_hotel(&tx, id).map_err(|e| not_found(e, "hotel", id))?;
    tx.commit()?;
    Ok(())
}

/// Create or replace a hotel's policy.
pub fn set_policy(
    conn: &mut Connection,
    hotel_id: i64,
    policy: &PolicyInput,
) -> Result<(), AdminError> {
    let tx = conn.transaction()?;
    if !operations::hotel_exists(&tx, hotel_id)? {
        return Err(AdminError::NotFound {
            entity: "hotel",
            id: hotel_id,
        });
    }
    operations::upsert_policy(&tx, hotel_id, &policy.to_new_policy(), &now_rfc3339())?;
    tx.commit()?;
    Ok(())
}

/// Create a brand if it does not exist yet. Returns its id either way.
pub fn create_brand(conn: &mut Connection, brand_name: &str) -> Result<i64, AdminError> {
    if brand_name.trim().is_empty() {
        return Err(ImportError::validation("brand name must not be empty").into());
    }
    let tx = conn.transaction()?;
    let id = operations::upsert_brand(&tx, brand_name)?;
    tx.commit()?;
    Ok(id)
}

/// Delete a brand. Hotels that referenced it are left without a brand.
pub fn delete_brand(conn: &mut Connection, id: i64) -> Result<(), AdminError> {
    let tx = conn.transaction()?;
    operations::delete_brand(&tx, id).map_err(|e| not_found(e, "brand", id))?;
    tx.commit()?;
    Ok(())
}

fn not_found(e: OperationError, entity: &'static str, id: i64) -> AdminError {
    match e {
        OperationError::NotFound { .. } => AdminError::NotFound { entity, id },
        other => other.into(),
    }
}
