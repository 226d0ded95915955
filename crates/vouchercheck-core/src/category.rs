//! Coarse category taxonomy and the keyword classifier behind voucher search.
//!
//! Classification is a first-match-wins scan over [`CATEGORY_TRIGGERS`]: the
//! table's definition order is an observable design constant, not an
//! implementation detail. A query matching triggers from two categories
//! resolves to whichever category is defined first, and downstream result
//! sets depend on that order staying fixed.

use serde::{Deserialize, Serialize};

/// Voucher category tag.
///
/// The first eight are searchable product/service categories; `General`,
/// `Trade` and `Building` only appear on location-exclusive records and are
/// never produced by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cleaning,
    Kitchen,
    Bathroom,
    Garden,
    Diy,
    Electronics,
    Flooring,
    Heating,
    General,
    Trade,
    Building,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Cleaning => "cleaning",
            Category::Kitchen => "kitchen",
            Category::Bathroom => "bathroom",
            Category::Garden => "garden",
            Category::Diy => "diy",
            Category::Electronics => "electronics",
            Category::Flooring => "flooring",
            Category::Heating => "heating",
            Category::General => "general",
            Category::Trade => "trade",
            Category::Building => "building",
        };
        write!(f, "{name}")
    }
}

/// Ordered trigger table: the first category whose trigger occurs in the
/// query wins. Do not reorder entries — result sets observably depend on it.
pub const CATEGORY_TRIGGERS: &[(Category, &[&str])] = &[
    (
        Category::Cleaning,
        &[
            "window clean",
            "clean",
            "cleaner",
            "cleaning",
            "wash",
            "pressure wash",
            "jet wash",
            "hoover",
            "vacuum",
        ],
    ),
    (
        Category::Kitchen,
        &["kitchen", "worktop", "oven", "hob", "cooker", "appliance"],
    ),
    (
        Category::Bathroom,
        &["bathroom", "shower", "bath", "tap", "toilet", "basin"],
    ),
    (
        Category::Garden,
        &["garden", "lawn", "mower", "patio", "fence", "hedge", "landscaping"],
    ),
    (
        Category::Diy,
        &["diy", "drill", "tool", "screw", "paint", "decorating", "sander"],
    ),
    (
        Category::Electronics,
        &["tv", "television", "laptop", "tablet", "phone", "headphone", "console"],
    ),
    (
        Category::Flooring,
        &["floor", "carpet", "laminate", "vinyl", "tile", "rug"],
    ),
    (
        Category::Heating,
        &["boiler", "heating", "radiator", "thermostat", "plumber", "plumbing"],
    ),
];

/// Classify a free-text search query to a coarse category.
///
/// Case-insensitive substring containment over the ordered trigger table;
/// returns `None` when no trigger matches. Never fails.
#[must_use]
pub fn classify(query: &str) -> Option<Category> {
    let query = query.to_lowercase();
    for (category, triggers) in CATEGORY_TRIGGERS {
        if triggers.iter().any(|trigger| query.contains(trigger)) {
            return Some(*category);
        }
    }
    None
}
