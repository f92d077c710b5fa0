//! Message types for communication with the recognition worker

use uuid::Uuid;

use crate::capture::CapturedPhoto;
use crate::label::NutritionFacts;

/// Requests sent to the recognition worker
#[derive(Debug)]
pub enum RecognitionRequest {
    /// Recognize and parse one captured photo
    Recognize {
        /// Scan attempt this photo belongs to
        attempt: Uuid,
        /// The captured label photo
        photo: CapturedPhoto,
    },
    /// Ask the worker to shut down
    Shutdown,
}

/// Outcomes sent back from the recognition worker
#[derive(Debug, Clone)]
pub enum RecognitionOutcome {
    /// Recognition and extraction finished
    Recognized {
        /// Scan attempt the facts belong to
        attempt: Uuid,
        /// Extracted label fields; possibly incomplete, never merged across attempts
        facts: NutritionFacts,
    },
    /// Recognition failed; the attempt surfaces an empty table
    Failed {
        /// Scan attempt that failed
        attempt: Uuid,
        /// Description of the failure, for the log
        error: String,
    },
}
