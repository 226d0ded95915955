use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::table::{normalize_store_key, ValidationRecord, ValidationSource, ValidationTable};

/// Outcome of checking one store code.
///
/// Unknown stores and unmatched codes produce the not-found shape — `valid`
/// false with empty descriptive fields — rather than an error. The only
/// states are found-valid, found-expired, found-invalid, and not-found.
#[derive(Debug, Clone, Serialize)]
pub struct CodeStatus {
    pub valid: bool,
    pub discount: String,
    pub description: String,
    pub expires: Option<DateTime<Utc>>,
    pub min_spend: Option<Decimal>,
    pub max_uses: Option<u32>,
    pub eligibility: String,
    pub terms: String,
    pub last_validated: Option<DateTime<Utc>>,
    pub source: Option<ValidationSource>,
}

impl CodeStatus {
    fn not_found() -> Self {
        Self {
            valid: false,
            discount: String::new(),
            description: String::new(),
            expires: None,
            min_spend: None,
            max_uses: None,
            eligibility: String::new(),
            terms: String::new(),
            last_validated: None,
            source: None,
        }
    }

    fn from_record(record: &ValidationRecord, now: DateTime<Utc>) -> Self {
        Self {
            valid: record.valid && now <= record.expires,
            discount: record.discount.clone(),
            description: record.description.clone(),
            expires: Some(record.expires),
            min_spend: Some(record.min_spend),
            max_uses: record.max_uses,
            eligibility: record.eligibility.clone(),
            terms: record.terms.clone(),
            last_validated: Some(record.last_validated),
            source: Some(record.source),
        }
    }
}

/// Check whether `code` is currently redeemable at `store`.
#[must_use]
pub fn validate(table: &ValidationTable, store: &str, code: &str) -> CodeStatus {
    validate_at(table, store, code, Utc::now())
}

/// Clock-pinned variant of [`validate`].
///
/// The store name is normalized before lookup and the code match is
/// case-insensitive exact. A found code is valid iff its stored flag is set
/// and `now` has not passed its expiry.
#[must_use]
pub fn validate_at(
    table: &ValidationTable,
    store: &str,
    code: &str,
    now: DateTime<Utc>,
) -> CodeStatus {
    let key = normalize_store_key(store);
    let Some(records) = table.stores.get(&key) else {
        return CodeStatus::not_found();
    };

    records
        .iter()
        .find(|record| record.code.eq_ignore_ascii_case(code))
        .map_or_else(CodeStatus::not_found, |record| {
            CodeStatus::from_record(record, now)
        })
}

/// All of a store's currently-active records, in table order.
#[must_use]
pub fn active_for_store(table: &ValidationTable, store: &str) -> Vec<ValidationRecord> {
    active_for_store_at(table, store, Utc::now())
}

/// Clock-pinned variant of [`active_for_store`]. Unknown stores yield an
/// empty list.
#[must_use]
pub fn active_for_store_at(
    table: &ValidationTable,
    store: &str,
    now: DateTime<Utc>,
) -> Vec<ValidationRecord> {
    let key = normalize_store_key(store);
    table
        .stores
        .get(&key)
        .map(|records| {
            records
                .iter()
                .filter(|record| record.valid && now <= record.expires)
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Every store's currently-active records, store-key order then table order.
#[must_use]
pub fn all_active(table: &ValidationTable) -> Vec<(String, ValidationRecord)> {
    all_active_at(table, Utc::now())
}

/// Clock-pinned variant of [`all_active`].
#[must_use]
pub fn all_active_at(
    table: &ValidationTable,
    now: DateTime<Utc>,
) -> Vec<(String, ValidationRecord)> {
    table
        .stores
        .iter()
        .flat_map(|(store, records)| {
            records
                .iter()
                .filter(|record| record.valid && now <= record.expires)
                .map(|record| (store.clone(), record.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn record(code: &str, valid: bool, expires: &str) -> ValidationRecord {
        ValidationRecord {
            code: code.to_string(),
            discount: "\u{a3}25 off".to_string(),
            description: "\u{a3}25 off large kitchen appliances".to_string(),
            expires: expires.parse().expect("test expiry"),
            min_spend: Decimal::new(299, 0),
            max_uses: None,
            eligibility: "New and existing customers".to_string(),
            terms: "One use per customer.".to_string(),
            valid,
            source: ValidationSource::ManualVerification,
            last_validated: "2026-07-01T09:00:00Z".parse().expect("test timestamp"),
        }
    }

    fn fixture_table() -> ValidationTable {
        ValidationTable {
            stores: BTreeMap::from([
                (
                    "currys".to_string(),
                    vec![record("SAVE25", true, "2026-12-31T23:59:59Z")],
                ),
                (
                    "argos".to_string(),
                    vec![
                        record("HOME20", true, "2026-09-30T23:59:59Z"),
                        record("TECH10", true, "2026-03-31T23:59:59Z"),
                        record("PULLED5", false, "2026-12-31T23:59:59Z"),
                    ],
                ),
            ]),
        }
    }

    fn at(raw: &str) -> DateTime<Utc> {
        raw.parse().expect("test instant")
    }

    #[test]
    fn known_code_before_expiry_is_valid() {
        let table = fixture_table();
        let status = validate_at(&table, "Currys", "SAVE25", at("2026-08-07T12:00:00Z"));
        assert!(status.valid);
        assert_eq!(status.discount, "\u{a3}25 off");
        assert_eq!(status.min_spend, Some(Decimal::new(299, 0)));
        assert_eq!(status.source, Some(ValidationSource::ManualVerification));
    }

    #[test]
    fn known_code_after_expiry_is_invalid_but_found() {
        let table = fixture_table();
        let status = validate_at(&table, "Currys", "SAVE25", at("2027-01-01T00:00:00Z"));
        assert!(!status.valid);
        // Found-expired still carries the stored fields.
        assert_eq!(status.discount, "\u{a3}25 off");
        assert!(status.expires.is_some());
    }

    #[test]
    fn stored_invalid_flag_wins_over_future_expiry() {
        let table = fixture_table();
        let status = validate_at(&table, "Argos", "PULLED5", at("2026-08-07T12:00:00Z"));
        assert!(!status.valid);
        assert!(status.expires.is_some());
    }

    #[test]
    fn unknown_code_returns_not_found_sentinel() {
        let table = fixture_table();
        let status = validate_at(&table, "Currys", "NOTACODE", at("2026-08-07T12:00:00Z"));
        assert!(!status.valid);
        assert!(status.discount.is_empty());
        assert!(status.description.is_empty());
        assert_eq!(status.expires, None);
        assert_eq!(status.min_spend, None);
        assert_eq!(status.source, None);
    }

    #[test]
    fn unknown_store_returns_not_found_sentinel() {
        let table = fixture_table();
        let status = validate_at(&table, "Woolworths", "SAVE25", at("2026-08-07T12:00:00Z"));
        assert!(!status.valid);
        assert!(status.discount.is_empty());
    }

    #[test]
    fn store_and_code_matching_ignore_case_and_punctuation() {
        let table = ValidationTable {
            stores: BTreeMap::from([(
                "bq".to_string(),
                vec![record("BANDQ5", true, "2026-12-31T23:59:59Z")],
            )]),
        };
        let status = validate_at(&table, "B&Q", "bandq5", at("2026-08-07T12:00:00Z"));
        assert!(status.valid);
    }

    #[test]
    fn active_for_store_drops_records_as_the_clock_passes_expiry() {
        let table = fixture_table();

        let before = active_for_store_at(&table, "Argos", at("2026-03-01T00:00:00Z"));
        let codes: Vec<&str> = before.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["HOME20", "TECH10"]);

        // TECH10 expires 2026-03-31; only HOME20 survives.
        let after = active_for_store_at(&table, "Argos", at("2026-06-01T00:00:00Z"));
        let codes: Vec<&str> = after.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["HOME20"]);
    }

    #[test]
    fn active_for_store_excludes_invalid_records() {
        let table = fixture_table();
        let active = active_for_store_at(&table, "Argos", at("2026-08-07T12:00:00Z"));
        assert!(active.iter().all(|r| r.code != "PULLED5"));
    }

    #[test]
    fn active_for_unknown_store_is_empty() {
        let table = fixture_table();
        assert!(active_for_store_at(&table, "Woolworths", at("2026-08-07T12:00:00Z")).is_empty());
    }

    #[test]
    fn all_active_spans_stores_in_key_order() {
        let table = fixture_table();
        let active = all_active_at(&table, at("2026-08-07T12:00:00Z"));
        let pairs: Vec<(&str, &str)> = active
            .iter()
            .map(|(store, record)| (store.as_str(), record.code.as_str()))
            .collect();
        assert_eq!(pairs, vec![("argos", "HOME20"), ("currys", "SAVE25")]);
    }

    #[test]
    fn expiry_boundary_instant_is_still_valid() {
        let table = fixture_table();
        let status = validate_at(&table, "Currys", "SAVE25", at("2026-12-31T23:59:59Z"));
        assert!(status.valid);
    }

    #[test]
    fn validate_against_shipped_table() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("validation.yaml");
        let table = crate::table::load_validation(&path).expect("load shipped table");

        let status = validate_at(&table, "Currys", "SAVE25", at("2026-08-07T12:00:00Z"));
        assert!(status.valid);
        assert_eq!(status.discount, "\u{a3}25 off");
        assert_eq!(status.min_spend, Some(Decimal::new(299, 0)));
    }
}
