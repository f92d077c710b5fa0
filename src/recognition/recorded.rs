//! Recorded recognizer backend
//!
//! Replays observations captured earlier from a device recognizer, either as a
//! plain text file (one line per recognized line) or as JSON carrying the full
//! candidate lists. Stands in for the platform OCR engine in the CLI and in
//! tests; the photo content is ignored.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::capture::CapturedPhoto;

use super::{TextObservation, TextRecognizer};

/// A recognizer that returns a fixed list of observations
#[derive(Debug, Clone)]
pub struct RecordedRecognizer {
    observations: Vec<TextObservation>,
}

impl RecordedRecognizer {
    /// Build from prepared observations
    pub fn from_observations(observations: Vec<TextObservation>) -> Self {
        Self { observations }
    }

    /// Build from plain text lines, each becoming a fully-confident observation
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        Self::from_observations(
            lines
                .iter()
                .map(|l| TextObservation::from_line(l.as_ref()))
                .collect(),
        )
    }

    /// Load a plain-lines sidecar: one recognized line per row, blank rows
    /// skipped
    pub fn load_lines(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recorded lines from {}", path.display()))?;
        let lines: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        Ok(Self::from_lines(&lines))
    }

    /// Load a JSON sidecar of observations with candidate confidences
    pub fn load_observations(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| {
            format!("Failed to read recorded observations from {}", path.display())
        })?;
        let observations: Vec<TextObservation> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid observation JSON in {}", path.display()))?;
        Ok(Self::from_observations(observations))
    }

    /// Number of recorded observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the recording is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl TextRecognizer for RecordedRecognizer {
    fn recognize(&self, _photo: &CapturedPhoto) -> Result<Vec<TextObservation>> {
        Ok(self.observations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_lines_preserves_order() {
        let recognizer = RecordedRecognizer::from_lines(&["Calories 110", "Protein 0g"]);
        let observations = recognizer.recognize(&CapturedPhoto::placeholder()).unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[0].top_candidate().unwrap().string, "Calories 110");
        assert_eq!(observations[1].top_candidate().unwrap().string, "Protein 0g");
    }

    #[test]
    fn test_load_lines_skips_blanks() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Calories 110").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  Sodium 0mg  ").unwrap();

        let recognizer = RecordedRecognizer::load_lines(file.path()).unwrap();
        assert_eq!(recognizer.len(), 2);
        let observations = recognizer.recognize(&CapturedPhoto::placeholder()).unwrap();
        assert_eq!(observations[1].top_candidate().unwrap().string, "Sodium 0mg");
    }

    #[test]
    fn test_load_observations_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"candidates": [{{"string": "Calories 110", "confidence": 0.9}}]}}]"#
        )
        .unwrap();

        let recognizer = RecordedRecognizer::load_observations(file.path()).unwrap();
        assert_eq!(recognizer.len(), 1);
    }

    #[test]
    fn test_load_observations_rejects_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(RecordedRecognizer::load_observations(file.path()).is_err());
    }

    #[test]
    fn test_load_lines_missing_file() {
        assert!(RecordedRecognizer::load_lines(Path::new("/nonexistent/lines.txt")).is_err());
    }
}
