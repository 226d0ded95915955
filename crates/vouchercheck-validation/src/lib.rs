//! Voucher code validation against the per-store validation table.
//!
//! This table is a second, independent data source: it is not reconciled
//! with the discovery catalog, and the same retailer can carry different
//! codes in each. Keeping the two apart is deliberate.

mod lookup;
mod table;

pub use lookup::{
    active_for_store, active_for_store_at, all_active, all_active_at, validate, validate_at,
    CodeStatus,
};
pub use table::{
    load_validation, normalize_store_key, ValidationError, ValidationRecord, ValidationSource,
    ValidationTable,
};
