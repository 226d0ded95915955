use chrono::{DateTime, Utc};
use vouchercheck_discovery::CatalogFile;
use vouchercheck_validation::ValidationTable;

/// Search the catalog and print matches as a table.
pub(crate) fn run_discover(catalog: &CatalogFile, query: &str, location: Option<&str>) {
    let results = vouchercheck_discovery::discover(catalog, query, location);

    if results.is_empty() {
        println!("no vouchers matched '{query}'");
        return;
    }

    let header = format!(
        "{:<14}{:<18}{:<16}{:<18}TITLE",
        "CODE", "RETAILER", "DISCOUNT", "EXPIRES"
    );
    println!("{header}");
    for record in &results {
        println!(
            "{:<14}{:<18}{:<16}{:<18}{}",
            record.code,
            truncate(&record.retailer, 16),
            truncate(&record.discount, 14),
            truncate(&record.expires, 16),
            truncate(&record.title, 50)
        );
    }
}

/// Print a single code's redeemability status.
pub(crate) fn run_validate(table: &ValidationTable, store: &str, code: &str) {
    let status = vouchercheck_validation::validate(table, store, code);

    if status.expires.is_none() {
        println!("code '{code}' not found for store '{store}'");
        return;
    }

    println!(
        "code '{code}' at '{store}' is {}",
        if status.valid { "VALID" } else { "NOT VALID" }
    );
    println!("  discount:    {}", status.discount);
    println!("  description: {}", status.description);
    if let Some(expires) = status.expires {
        println!("  expires:     {}", fmt_date(expires));
    }
    if let Some(min_spend) = status.min_spend {
        println!("  min spend:   \u{a3}{min_spend}");
    }
    println!("  eligibility: {}", status.eligibility);
    if let Some(source) = status.source {
        println!("  source:      {source}");
    }
}

/// Print active validation records for one store or all stores.
pub(crate) fn run_active(table: &ValidationTable, store: Option<&str>) {
    let rows: Vec<(Option<String>, _)> = match store {
        Some(store) => vouchercheck_validation::active_for_store(table, store)
            .into_iter()
            .map(|record| (None, record))
            .collect(),
        None => vouchercheck_validation::all_active(table)
            .into_iter()
            .map(|(store, record)| (Some(store), record))
            .collect(),
    };

    if rows.is_empty() {
        println!(
            "no active vouchers{}",
            store.map(|s| format!(" for store '{s}'")).unwrap_or_default()
        );
        return;
    }

    let header = format!(
        "{:<14}{:<14}{:<16}{:<12}DESCRIPTION",
        "STORE", "CODE", "DISCOUNT", "EXPIRES"
    );
    println!("{header}");
    for (store, record) in &rows {
        println!(
            "{:<14}{:<14}{:<16}{:<12}{}",
            store.as_deref().unwrap_or("\u{2014}"),
            record.code,
            truncate(&record.discount, 14),
            fmt_date(record.expires),
            truncate(&record.description, 50)
        );
    }
}

fn fmt_date(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width).collect::<String>())
    } else {
        text.to_string()
    }
}
