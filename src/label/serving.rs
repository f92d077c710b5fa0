//! Serving-size parsing
//!
//! Splits the recognized "Serving size" value into a numeric quantity and a
//! unit. OCR frequently drops the space between the number and the unit
//! ("28g"), so a corrective pass inserts one between a digit and a following
//! non-digit before retrying the numeric parse.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::{LabelField, NutritionFacts};

/// The single prompt shown for every serving-size failure. The three failure
/// kinds are not distinguished in the interface; all of them ask for a
/// re-capture.
pub const RESCAN_PROMPT: &str = "Re-scan the label, the data is not clear";

static DIGIT_UNIT_BOUNDARY: OnceLock<Regex> = OnceLock::new();

/// A digit immediately followed by a non-digit, the missing-space signature
fn digit_unit_boundary() -> &'static Regex {
    DIGIT_UNIT_BOUNDARY.get_or_init(|| Regex::new(r"(\d)(\D)").expect("hardcoded pattern is valid"))
}

/// Why a serving-size value could not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ServingError {
    /// The serving-size field was absent or blank
    #[error("serving size was not recognized on the label")]
    MissingField,
    /// The quantity token did not parse as a number
    #[error("serving size quantity is not a number")]
    UnparsableQuantity,
    /// No quantity/unit split could be found at all
    #[error("serving size could not be split into quantity and unit")]
    UnparsableFormat,
}

/// A parsed serving size: how many of which unit one portion is.
///
/// Computed on demand when the user asks for the AR view; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ServingSize {
    /// Portion quantity; non-negative and finite
    pub quantity: f32,
    /// Portion unit as printed, e.g. "g" or "pieces"
    pub unit: String,
}

/// Parse the serving size out of a facts mapping
pub fn parse_serving_size(facts: &NutritionFacts) -> Result<ServingSize, ServingError> {
    let value = facts
        .get(LabelField::ServingSize)
        .ok_or(ServingError::MissingField)?;
    parse_serving_value(value)
}

/// Parse a raw serving-size value string.
///
/// A value that splits into exactly two whitespace tokens is taken as
/// `quantity unit` directly. Anything else goes through the corrective pass
/// once: a space is inserted at every digit/non-digit boundary and the first
/// resulting token is parsed as the quantity.
pub fn parse_serving_value(value: &str) -> Result<ServingSize, ServingError> {
    if value.trim().is_empty() {
        return Err(ServingError::MissingField);
    }

    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() == 2 {
        let quantity = parse_quantity(tokens[0])?;
        return Ok(ServingSize {
            quantity,
            unit: tokens[1].to_string(),
        });
    }

    let corrected = digit_unit_boundary().replace_all(value, "$1 $2");
    let mut tokens = corrected.split_whitespace();
    let quantity_token = tokens.next().ok_or(ServingError::UnparsableFormat)?;
    let quantity = parse_quantity(quantity_token)?;

    Ok(ServingSize {
        quantity,
        unit: tokens.next().unwrap_or_default().to_string(),
    })
}

/// Parse a quantity token, rejecting negative and non-finite values
fn parse_quantity(token: &str) -> Result<f32, ServingError> {
    let quantity: f32 = token.parse().map_err(|_| ServingError::UnparsableQuantity)?;
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(ServingError::UnparsableQuantity);
    }
    Ok(quantity)
}
