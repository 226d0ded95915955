use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("failed to read validation table at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse validation table: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid validation table: {0}")]
    Validation(String),
}

/// Where a record's validity claim came from. All current data is
/// self-asserted (`manual_verification` or `affiliate_network`); no live
/// retailer check exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationSource {
    RetailerApi,
    AffiliateNetwork,
    ManualVerification,
}

impl std::fmt::Display for ValidationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationSource::RetailerApi => write!(f, "retailer_api"),
            ValidationSource::AffiliateNetwork => write!(f, "affiliate_network"),
            ValidationSource::ManualVerification => write!(f, "manual_verification"),
        }
    }
}

/// One store code in the validation table.
///
/// `expires` IS compared against the clock at query time (unlike the
/// discovery catalog's decorative expiry text). `last_validated` is the
/// instant the record was authored, not the time of any live check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub code: String,
    pub discount: String,
    pub description: String,
    pub expires: DateTime<Utc>,
    pub min_spend: Decimal,
    pub max_uses: Option<u32>,
    pub eligibility: String,
    pub terms: String,
    pub valid: bool,
    pub source: ValidationSource,
    pub last_validated: DateTime<Utc>,
}

/// Per-store code lists, keyed by normalized store key.
///
/// Loaded once at startup and never mutated; record state never transitions
/// in storage — expiry is computed against the caller's clock at query time.
#[derive(Debug, Deserialize)]
pub struct ValidationTable {
    pub stores: BTreeMap<String, Vec<ValidationRecord>>,
}

/// Normalize a store name into a table key: lowercase, ASCII letters only.
///
/// `"B&Q"` → `"bq"`, `"John Lewis"` → `"johnlewis"`.
#[must_use]
pub fn normalize_store_key(store: &str) -> String {
    store
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect()
}

/// Load and validate the validation table from a YAML file.
///
/// # Errors
///
/// Returns `ValidationError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_validation(path: &Path) -> Result<ValidationTable, ValidationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ValidationError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let table: ValidationTable = serde_yaml::from_str(&content)?;

    validate_table(&table)?;

    Ok(table)
}

fn validate_table(table: &ValidationTable) -> Result<(), ValidationError> {
    for (store, records) in &table.stores {
        if store.is_empty() {
            return Err(ValidationError::Validation(
                "store key must be non-empty".to_string(),
            ));
        }
        if *store != normalize_store_key(store) {
            return Err(ValidationError::Validation(format!(
                "store key '{store}' is not normalized; expected '{}'",
                normalize_store_key(store)
            )));
        }

        let mut seen_codes = HashSet::new();
        for record in records {
            if record.code.trim().is_empty() {
                return Err(ValidationError::Validation(format!(
                    "store '{store}' has a record with an empty code"
                )));
            }
            if record.min_spend < Decimal::ZERO {
                return Err(ValidationError::Validation(format!(
                    "code '{}' for store '{store}' has a negative min_spend",
                    record.code
                )));
            }
            if !seen_codes.insert(record.code.to_lowercase()) {
                return Err(ValidationError::Validation(format!(
                    "duplicate code '{}' for store '{store}'",
                    record.code
                )));
            }
        }
    }

    Ok(())
}
