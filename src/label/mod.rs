//! Nutrition Label Model
//!
//! The closed set of label fields the scanner understands and the mapping
//! built from one scan attempt. A fresh mapping is produced per attempt and
//! replaced wholesale on re-scan; mappings are never merged across scans.

pub mod extractor;
pub mod serving;

pub use extractor::extract_facts;
pub use serving::{parse_serving_size, ServingError, ServingSize, RESCAN_PROMPT};

use std::collections::BTreeMap;

/// A field on a nutrition-facts label.
///
/// Variant order is the extractor's priority order: the first field whose
/// printed prefix matches a recognized line claims that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LabelField {
    ServingSize,
    Calories,
    TotalFat,
    Sodium,
    TotalCarbohydrate,
    TotalSugars,
    Protein,
}

impl LabelField {
    /// All fields, in extractor priority order
    pub const ALL: [LabelField; 7] = [
        LabelField::ServingSize,
        LabelField::Calories,
        LabelField::TotalFat,
        LabelField::Sodium,
        LabelField::TotalCarbohydrate,
        LabelField::TotalSugars,
        LabelField::Protein,
    ];

    /// The printed label text this field is matched by, and its display name
    pub fn prefix(&self) -> &'static str {
        match self {
            LabelField::ServingSize => "Serving size",
            LabelField::Calories => "Calories",
            LabelField::TotalFat => "Total Fat",
            LabelField::Sodium => "Sodium",
            LabelField::TotalCarbohydrate => "Total Carbohydrate",
            LabelField::TotalSugars => "Total Sugars",
            LabelField::Protein => "Protein",
        }
    }
}

/// Field values recognized from a single scan attempt.
///
/// Keys are restricted to [`LabelField`] by construction, so the mapping can
/// never hold a field outside the fixed set. Fewer than seven entries is not
/// an error; the results screen shows whatever was recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NutritionFacts {
    fields: BTreeMap<LabelField, String>,
}

impl NutritionFacts {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, replacing any earlier value for the same field
    pub fn insert(&mut self, field: LabelField, value: String) {
        self.fields.insert(field, value);
    }

    /// Get a field value
    pub fn get(&self, field: LabelField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Whether a field was recognized
    pub fn contains(&self, field: LabelField) -> bool {
        self.fields.contains_key(&field)
    }

    /// Number of recognized fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether nothing was recognized
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Entries sorted by display name, the order the results screen lists them
    pub fn iter_sorted(&self) -> impl Iterator<Item = (LabelField, &str)> {
        let mut entries: Vec<(LabelField, &str)> =
            self.fields.iter().map(|(f, v)| (*f, v.as_str())).collect();
        entries.sort_by_key(|(f, _)| f.prefix());
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_overwrites() {
        let mut facts = NutritionFacts::new();
        facts.insert(LabelField::Calories, "110".to_string());
        facts.insert(LabelField::Calories, "210".to_string());
        assert_eq!(facts.get(LabelField::Calories), Some("210"));
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn test_iter_sorted_is_alphabetical() {
        let mut facts = NutritionFacts::new();
        facts.insert(LabelField::Protein, "2g".to_string());
        facts.insert(LabelField::Calories, "140".to_string());
        facts.insert(LabelField::ServingSize, "28g".to_string());

        let names: Vec<&str> = facts.iter_sorted().map(|(f, _)| f.prefix()).collect();
        assert_eq!(names, vec!["Calories", "Protein", "Serving size"]);
    }

    #[test]
    fn test_priority_order_matches_printed_list() {
        let prefixes: Vec<&str> = LabelField::ALL.iter().map(|f| f.prefix()).collect();
        assert_eq!(
            prefixes,
            vec![
                "Serving size",
                "Calories",
                "Total Fat",
                "Sodium",
                "Total Carbohydrate",
                "Total Sugars",
                "Protein",
            ]
        );
    }
}
