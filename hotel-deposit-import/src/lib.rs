//! Import hotel, brand, and deposit policy records into the catalog database.
//!
//! This crate owns the reconciliation logic: normalizing JSON and tabular
//! records, resolving brands, upserting hotels and policies under explicit
//! conflict rules, and running whole batches inside one transaction.

pub mod admin;
pub mod coordinator;
pub mod error;
pub mod normalize;
pub mod progress;
pub mod resolve;
pub mod upsert;

pub use admin::{AdminError, AdminPayload, HotelInput, PolicyInput};
pub use coordinator::{
    Batch, BatchOptions, FailurePolicy, ImportStats, SourceFormat, import_file, import_into,
    import_json_str, import_tabular_str, run_batch,
};
pub use error::ImportError;
pub use normalize::{RawRecord, normalize_json, normalize_row, parse_tabular};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
pub use resolve::resolve_brand;
pub use upsert::{Coercion, DEFAULT_HOLD_DAYS, UpsertOutcome, coerce_policy, upsert_record};
