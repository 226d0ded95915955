//! Relevance filter for voucher search.
//!
//! A deliberately boolean filter: no scoring, no ranking. Results come back
//! in catalog insertion order and are capped at [`MAX_RESULTS`]. A query
//! that matches nothing returns nothing — an irrelevant voucher is worse
//! than no voucher.

use vouchercheck_core::{classify, Category};

use crate::catalog::{CatalogFile, VoucherRecord};

/// Hard cap on the number of records a search returns.
pub const MAX_RESULTS: usize = 3;

/// Select catalog records relevant to a free-text query.
///
/// A record matches when the query classifies to its category, or when its
/// retailer name (or that name's first token) occurs in the query, or when
/// its full title occurs in the query. When fewer than [`MAX_RESULTS`]
/// records match and a location is supplied, the location's exclusive list
/// backfills the result with entries in the classified category or the
/// `general` category. Matches are not de-duplicated across the two pools.
///
/// Pure and infallible: identical inputs always yield the identical,
/// order-stable output.
#[must_use]
pub fn discover(
    catalog: &CatalogFile,
    query: &str,
    location: Option<&str>,
) -> Vec<VoucherRecord> {
    let query = query.to_lowercase();
    let search_category = classify(&query);

    let mut results: Vec<VoucherRecord> = catalog
        .vouchers
        .iter()
        .filter(|record| matches_query(record, &query, search_category))
        .cloned()
        .collect();

    if results.len() < MAX_RESULTS {
        if let Some(city) = location {
            if let Some(local) = catalog.locations.get(&city.to_lowercase()) {
                results.extend(
                    local
                        .iter()
                        .filter(|record| {
                            search_category == Some(record.category)
                                || record.category == Category::General
                        })
                        .cloned(),
                );
            }
        }
    }

    results.truncate(MAX_RESULTS);
    results
}

fn matches_query(
    record: &VoucherRecord,
    query: &str,
    search_category: Option<Category>,
) -> bool {
    if search_category == Some(record.category) {
        return true;
    }

    let retailer = record.retailer.to_lowercase();
    if query.contains(&retailer) {
        return true;
    }
    if let Some(first_token) = retailer.split_whitespace().next() {
        if query.contains(first_token) {
            return true;
        }
    }

    query.contains(&record.title.to_lowercase())
}
