//! SQLite persistence layer for the hotel deposit catalog.
//!
//! Provides schema creation, upsert operations, and query APIs
//! backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    ConflictFields, HotelField, OperationError, Overwrite, delete_brand, delete_hotel,
    find_brand_by_name, find_hotel, find_hotel_id_by_slug, find_policy, hotel_exists, insert_hotel,
    insert_import_log, update_hotel, upsert_brand, upsert_hotel, upsert_policy,
};
pub use queries::{
    DEFAULT_PAGE_SIZE, HotelFilter, deposit_analytics, find_hotel_by_slug, hotels_for_brand,
    list_brands, list_cities, list_hotels, list_import_logs, list_policies, search_hotels,
};
pub use schema::{SchemaError, open_database, open_memory};
