//! Text Recognition Layer
//!
//! Performs text extraction on captured label photos. The actual optical
//! recognition engine is platform territory and sits behind the
//! [`TextRecognizer`] trait; this layer owns the surrounding pipeline —
//! photo preprocessing, confidence filtering, and the observation types the
//! extractor consumes.

pub mod preprocess;
pub mod recorded;

pub use preprocess::{apply_preprocessing, PhotoPreprocessing};
pub use recorded::RecordedRecognizer;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::capture::CapturedPhoto;

/// One candidate reading of a text line, with recognition confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCandidate {
    /// Candidate text
    pub string: String,
    /// Recognition confidence (0.0 - 1.0)
    pub confidence: f32,
}

/// One recognized text line with its confidence-ranked candidate readings.
///
/// Observations arrive in the recognizer's top-to-bottom order; nothing
/// downstream depends on that ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObservation {
    /// Candidate readings of the line
    pub candidates: Vec<TextCandidate>,
}

impl TextObservation {
    /// An observation with a single fully-confident candidate
    pub fn from_line(line: &str) -> Self {
        Self {
            candidates: vec![TextCandidate {
                string: line.to_string(),
                confidence: 1.0,
            }],
        }
    }

    /// An observation from (text, confidence) pairs
    pub fn from_candidates(candidates: Vec<(String, f32)>) -> Self {
        Self {
            candidates: candidates
                .into_iter()
                .map(|(string, confidence)| TextCandidate { string, confidence })
                .collect(),
        }
    }

    /// The highest-confidence candidate, the only one used downstream
    pub fn top_candidate(&self) -> Option<&TextCandidate> {
        self.candidates
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

/// The platform OCR seam. Implementations recognize text in a still photo and
/// return one observation per detected line.
pub trait TextRecognizer: Send {
    /// Recognize text lines in a photo
    fn recognize(&self, photo: &CapturedPhoto) -> Result<Vec<TextObservation>>;
}

/// Configuration for the recognition pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionSettings {
    /// Observations whose top candidate falls below this confidence are dropped
    pub min_confidence: f32,
    /// Photo enhancement applied before recognition
    pub preprocessing: PhotoPreprocessing,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            preprocessing: PhotoPreprocessing::default(),
        }
    }
}

/// Recognition pipeline: preprocessing plus a recognizer backend
pub struct RecognitionPipeline {
    recognizer: Box<dyn TextRecognizer>,
    settings: RecognitionSettings,
}

impl RecognitionPipeline {
    /// Create a pipeline around a recognizer backend
    pub fn new(recognizer: Box<dyn TextRecognizer>, settings: RecognitionSettings) -> Self {
        Self {
            recognizer,
            settings,
        }
    }

    /// Recognize text in a photo, applying preprocessing and confidence
    /// filtering
    pub fn process(&self, photo: &CapturedPhoto) -> Result<Vec<TextObservation>> {
        let start = Instant::now();

        let prepared;
        let input = if self.settings.preprocessing.enabled {
            prepared = apply_preprocessing(photo, &self.settings.preprocessing);
            &prepared
        } else {
            photo
        };

        let observations = self.recognizer.recognize(input)?;
        let total = observations.len();

        let kept: Vec<TextObservation> = observations
            .into_iter()
            .filter(|o| {
                o.top_candidate()
                    .map(|c| c.confidence >= self.settings.min_confidence)
                    .unwrap_or(false)
            })
            .collect();

        debug!(
            "Recognition complete in {:?}: kept {} of {} observations",
            start.elapsed(),
            kept.len(),
            total
        );

        Ok(kept)
    }
}
