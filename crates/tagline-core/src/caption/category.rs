//! Folder label categorization.
//!
//! A folder label is matched against fixed keyword sets by substring
//! containment, in [`Category::PRIORITY`] order. Labels matching nothing land
//! in [`Category::Cultural`], so categorization never fails.

use crate::types::Category;

/// Category assumed when no keyword matches.
pub const DEFAULT_CATEGORY: Category = Category::Cultural;

/// Lowercase keywords for a category. Matched against the lowercased label,
/// underscores included (`fishing_cat`, `national_park`).
pub fn keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Wildlife => &["junglefowl", "elephant", "cat", "fishing_cat", "bird"],
        Category::Architecture => &[
            "fort", "temple", "mosque", "station", "tower", "airport", "hospital", "houses",
        ],
        Category::Landscape => &[
            "falls",
            "beach",
            "bay",
            "plains",
            "mountain",
            "lake",
            "island",
            "rainforest",
            "national_park",
        ],
        Category::Cultural => &[
            "weaving", "craft", "carving", "lace", "dance", "drummers", "perahera",
        ],
        Category::Food => &["thiyal", "kottu", "roti", "kiribath", "lamprais", "hopper"],
    }
}

/// Human-readable subject for a folder label: underscores become spaces,
/// casing is kept.
pub fn subject_of(folder_label: &str) -> String {
    folder_label.replace('_', " ")
}

/// Resolve a folder label to its category and subject.
pub fn categorize(folder_label: &str) -> (Category, String) {
    let lower = folder_label.to_lowercase();
    let category = Category::PRIORITY
        .into_iter()
        .find(|&category| keywords(category).iter().any(|kw| lower.contains(kw)))
        .unwrap_or(DEFAULT_CATEGORY);

    (category, subject_of(folder_label))
}
