use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vouchercheck_core::Category;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read voucher catalog at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse voucher catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid voucher catalog: {0}")]
    Validation(String),
}

/// A discoverable voucher offer.
///
/// `expires` is the retailer's human-readable expiry text and is never
/// compared against the clock in the discovery path; only the separate
/// validation table enforces expiry. `verified` is asserted by the data
/// file, not by any live check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherRecord {
    pub id: String,
    pub title: String,
    pub discount: String,
    pub retailer: String,
    pub code: String,
    pub expires: String,
    pub category: Category,
    pub terms: String,
    pub verified: bool,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_spend: Option<String>,
}

/// The full voucher catalog: the main offer pool plus per-city
/// location-exclusive lists used only for backfill.
///
/// Loaded once at startup and held immutable; list order is catalog
/// insertion order and is observable in results.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub vouchers: Vec<VoucherRecord>,
    #[serde(default)]
    pub locations: BTreeMap<String, Vec<VoucherRecord>>,
}

/// Load and validate the voucher catalog from a YAML file.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let catalog: CatalogFile = serde_yaml::from_str(&content)?;

    validate_catalog(&catalog)?;

    Ok(catalog)
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), CatalogError> {
    let mut seen_ids = HashSet::new();

    let location_records = catalog.locations.iter().flat_map(|(city, records)| {
        records.iter().map(move |record| (Some(city.as_str()), record))
    });
    let all_records = catalog
        .vouchers
        .iter()
        .map(|record| (None, record))
        .chain(location_records);

    for (city, record) in all_records {
        let context = city.map_or_else(
            || format!("voucher '{}'", record.id),
            |city| format!("voucher '{}' (location '{city}')", record.id),
        );

        for (field, value) in [
            ("id", &record.id),
            ("title", &record.title),
            ("retailer", &record.retailer),
            ("code", &record.code),
        ] {
            if value.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "{context} has an empty {field}"
                )));
            }
        }

        if !seen_ids.insert(record.id.clone()) {
            return Err(CatalogError::Validation(format!(
                "duplicate voucher id: '{}'",
                record.id
            )));
        }
    }

    for city in catalog.locations.keys() {
        if city.trim().is_empty() {
            return Err(CatalogError::Validation(
                "location key must be non-empty".to_string(),
            ));
        }
        if *city != city.to_lowercase() {
            return Err(CatalogError::Validation(format!(
                "location key '{city}' must be lowercase"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, retailer: &str, category: Category) -> VoucherRecord {
        VoucherRecord {
            id: id.to_string(),
            title: format!("{retailer} offer"),
            discount: "10% off".to_string(),
            retailer: retailer.to_string(),
            code: "TEST10".to_string(),
            expires: "31 December 2026".to_string(),
            category,
            terms: "Online only.".to_string(),
            verified: true,
            url: "https://example.com".to_string(),
            min_spend: None,
        }
    }

    #[test]
    fn validate_accepts_well_formed_catalog() {
        let catalog = CatalogFile {
            vouchers: vec![
                record("karcher_cleaning_2025", "Karcher", Category::Cleaning),
                record("currys_kitchen_2025", "Currys", Category::Kitchen),
            ],
            locations: BTreeMap::from([(
                "plymouth".to_string(),
                vec![record("plymouth_trade_2025", "Local Trade Co", Category::Trade)],
            )]),
        };
        assert!(validate_catalog(&catalog).is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_id_across_pools() {
        let catalog = CatalogFile {
            vouchers: vec![record("dup_2025", "Karcher", Category::Cleaning)],
            locations: BTreeMap::from([(
                "bristol".to_string(),
                vec![record("dup_2025", "Local Trade Co", Category::General)],
            )]),
        };
        let err = validate_catalog(&catalog).unwrap_err();
        assert!(err.to_string().contains("duplicate voucher id"));
    }

    #[test]
    fn validate_rejects_empty_retailer() {
        let mut bad = record("karcher_cleaning_2025", "Karcher", Category::Cleaning);
        bad.retailer = "   ".to_string();
        let catalog = CatalogFile {
            vouchers: vec![bad],
            locations: BTreeMap::new(),
        };
        let err = validate_catalog(&catalog).unwrap_err();
        assert!(err.to_string().contains("empty retailer"));
    }

    #[test]
    fn validate_rejects_uppercase_location_key() {
        let catalog = CatalogFile {
            vouchers: vec![],
            locations: BTreeMap::from([(
                "Plymouth".to_string(),
                vec![record("plymouth_general_2025", "Local Co", Category::General)],
            )]),
        };
        let err = validate_catalog(&catalog).unwrap_err();
        assert!(err.to_string().contains("must be lowercase"));
    }

    #[test]
    fn min_spend_is_optional_in_yaml() {
        let yaml = "
vouchers:
  - id: currys_kitchen_2025
    title: \u{a3}25 off large kitchen appliances
    discount: \u{a3}25 off
    retailer: Currys
    code: SAVE25
    expires: 31 December 2026
    category: kitchen
    terms: Online orders only.
    verified: true
    url: https://www.currys.co.uk
    min_spend: \u{a3}299 minimum spend
  - id: argos_home_2025
    title: 20% off selected homeware
    discount: 20% off
    retailer: Argos
    code: HOME20
    expires: 30 June 2026
    category: kitchen
    terms: Selected lines.
    verified: true
    url: https://www.argos.co.uk
";
        let catalog: CatalogFile = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(
            catalog.vouchers[0].min_spend.as_deref(),
            Some("\u{a3}299 minimum spend")
        );
        assert_eq!(catalog.vouchers[1].min_spend, None);
    }

    #[test]
    fn load_catalog_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("vouchers.yaml");
        assert!(
            path.exists(),
            "vouchers.yaml missing at {path:?} — required for this test"
        );
        let result = load_catalog(&path);
        assert!(result.is_ok(), "failed to load vouchers.yaml: {result:?}");
        let catalog = result.unwrap();
        assert!(!catalog.vouchers.is_empty());
        assert!(!catalog.locations.is_empty());
    }
}
