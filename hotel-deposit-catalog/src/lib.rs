//! Hotel deposit catalog data model, slug derivation, and deposit helpers.
//!
//! This crate defines the persistent data model for the deposit catalog
//! without any database dependencies. Consumers can use these types directly
//! for display or pass them to `hotel-deposit-db` for persistence.

pub mod display;
pub mod features;
pub mod slug;
pub mod types;

pub use display::format_deposit;
pub use features::{
    DepositRecord, DepositStats, average_deposit, deposit_stats, filter_by_deposit_amount,
    filter_by_deposit_percentage, parse_amount, sort_by_deposit_amount,
    top_brands_by_hotel_count,
};
pub use slug::{hotel_slug, slugify};
pub use types::*;
