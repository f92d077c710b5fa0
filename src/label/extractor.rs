//! Label-field extraction from recognized text lines
//!
//! A flat scan: each recognized line is checked against the fixed field list
//! in priority order, and the first field whose printed prefix starts the line
//! claims it. Lines matching no field are ignored. The serving-size value is
//! additionally narrowed to the first parenthesized group when one is present,
//! because labels print it as e.g. "15 pieces (28g)" and only the weight
//! matters downstream.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::recognition::TextObservation;

use super::{LabelField, NutritionFacts};

static PAREN_VALUE: OnceLock<Regex> = OnceLock::new();

/// First parenthesized group in a serving-size value
fn paren_value() -> &'static Regex {
    PAREN_VALUE.get_or_init(|| Regex::new(r"\((.*?)\)").expect("hardcoded pattern is valid"))
}

/// Build a [`NutritionFacts`] mapping from recognized observations.
///
/// Only the top candidate of each observation is considered. The first field
/// prefix that matches wins the line; a later line for the same field
/// overwrites the earlier value. Pure function of its input: re-running it on
/// the same observations yields an identical mapping.
pub fn extract_facts(observations: &[TextObservation]) -> NutritionFacts {
    let mut facts = NutritionFacts::new();

    for observation in observations {
        let Some(candidate) = observation.top_candidate() else {
            continue;
        };
        let text = candidate.string.as_str();

        for field in LabelField::ALL {
            if let Some(rest) = text.strip_prefix(field.prefix()) {
                let trimmed = rest.trim();

                let value = if field == LabelField::ServingSize {
                    match paren_value().captures(trimmed) {
                        Some(captures) => captures[1].to_string(),
                        None => trimmed.to_string(),
                    }
                } else {
                    trimmed.to_string()
                };

                facts.insert(field, value);
                break;
            }
        }
    }

    debug!("Extracted {} of {} label fields", facts.len(), LabelField::ALL.len());
    facts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observations(lines: &[&str]) -> Vec<TextObservation> {
        lines.iter().map(|l| TextObservation::from_line(l)).collect()
    }

    #[test]
    fn test_extracts_calories() {
        let facts = extract_facts(&observations(&["Calories 210"]));
        assert_eq!(facts.get(LabelField::Calories), Some("210"));
    }

    #[test]
    fn test_serving_size_parenthesized_value() {
        let facts = extract_facts(&observations(&["Serving size (28g)"]));
        assert_eq!(facts.get(LabelField::ServingSize), Some("28g"));
    }

    #[test]
    fn test_serving_size_narrows_to_parentheses() {
        let facts = extract_facts(&observations(&["Serving size 15 pieces (28g)"]));
        assert_eq!(facts.get(LabelField::ServingSize), Some("28g"));
    }

    #[test]
    fn test_serving_size_without_parentheses_kept_trimmed() {
        let facts = extract_facts(&observations(&["Serving size   28 g  "]));
        assert_eq!(facts.get(LabelField::ServingSize), Some("28 g"));
    }

    #[test]
    fn test_unmatched_lines_ignored() {
        let facts = extract_facts(&observations(&[
            "Nutrition Facts",
            "% Daily Value*",
            "Calories 140",
            "Includes 9g Added Sugars",
        ]));
        assert_eq!(facts.len(), 1);
        assert_eq!(facts.get(LabelField::Calories), Some("140"));
    }

    #[test]
    fn test_first_field_prefix_wins_per_line() {
        // "Total Carbohydrate" is checked before "Total Sugars"; a
        // carbohydrate line must not land on the sugars field.
        let facts = extract_facts(&observations(&["Total Carbohydrate 37g"]));
        assert_eq!(facts.get(LabelField::TotalCarbohydrate), Some("37g"));
        assert!(!facts.contains(LabelField::TotalSugars));
    }

    #[test]
    fn test_later_line_overwrites_same_field() {
        let facts = extract_facts(&observations(&["Calories 110", "Calories 230"]));
        assert_eq!(facts.get(LabelField::Calories), Some("230"));
    }

    #[test]
    fn test_incomplete_label_is_not_an_error() {
        let facts = extract_facts(&observations(&["Calories 90", "Protein 3g"]));
        assert_eq!(facts.len(), 2);
        assert!(!facts.contains(LabelField::ServingSize));
    }

    #[test]
    fn test_empty_input_yields_empty_mapping() {
        let facts = extract_facts(&[]);
        assert!(facts.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let obs = observations(&[
            "Serving size 1 bar (40g)",
            "Calories 140",
            "Total Fat 4g",
            "garbage line",
        ]);
        let first = extract_facts(&obs);
        let second = extract_facts(&obs);
        assert_eq!(first, second);
    }

    #[test]
    fn test_uses_top_candidate_only() {
        let observation = TextObservation::from_candidates(vec![
            ("Calorias 210".to_string(), 0.4),
            ("Calories 210".to_string(), 0.9),
        ]);
        let facts = extract_facts(&[observation]);
        assert_eq!(facts.get(LabelField::Calories), Some("210"));
    }
}
