//! Built-in sample labels
//!
//! Recorded recognizer output for two real snack labels, so the pipeline can
//! be exercised end to end without a camera or a platform OCR engine.

/// A built-in nutrition label with pre-recognized text lines
#[derive(Debug, Clone, Copy)]
pub struct SampleLabel {
    /// Name used to select the sample on the command line
    pub name: &'static str,
    /// Short description for listings
    pub description: &'static str,
    /// Recognized lines, top to bottom
    pub lines: &'static [&'static str],
}

/// The built-in samples
pub const SAMPLE_LABELS: [SampleLabel; 2] = [
    SampleLabel {
        name: "sweet-tarts",
        description: "Candy roll, 15-piece serving",
        lines: &[
            "Nutrition Facts",
            "About 3 servings per container",
            "Serving size 15 pieces (28g)",
            "Amount per serving",
            "Calories 110",
            "% Daily Value*",
            "Total Fat 0g",
            "Sodium 0mg",
            "Total Carbohydrate 27g",
            "Total Sugars 24g",
            "Includes 24g Added Sugars",
            "Protein 0g",
        ],
    },
    SampleLabel {
        name: "fiber-one",
        description: "Oats and chocolate bar, 1-bar serving",
        lines: &[
            "Nutrition Facts",
            "5 servings per container",
            "Serving size 1 bar (40g)",
            "Calories 140",
            "Total Fat 4g",
            "Saturated Fat 1.5g",
            "Sodium 95mg",
            "Total Carbohydrate 29g",
            "Dietary Fiber 9g",
            "Total Sugars 9g",
            "Protein 2g",
        ],
    },
];

/// Look up a built-in sample by name
pub fn find_sample(name: &str) -> Option<&'static SampleLabel> {
    SAMPLE_LABELS.iter().find(|s| s.name == name)
}
