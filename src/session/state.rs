//! Scan session state machine
//!
//! One session covers a single scan-to-conclusion flow: onboarding, pointing
//! the camera at the label, one recognition in flight at a time, reviewing the
//! extracted table, placing the portion stack, and the closing screen. All
//! state lives in memory for the duration of the flow; nothing is persisted.

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::capture::CapturedPhoto;
use crate::config::AppConfig;
use crate::label::{parse_serving_size, NutritionFacts, ServingError, ServingSize};
use crate::scene::{nearest_point_distance_cm, PointCloudFrame, ProximityStatus};

/// Where the user is in the scan flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    /// Onboarding carousel; Begin unlocks on the last page
    Onboarding,
    /// Camera screen, waiting for a capture
    Camera,
    /// A photo is being recognized; no further capture is allowed
    Recognizing,
    /// Results screen showing the extracted table
    Results,
    /// AR portion screen
    Portion,
    /// Closing screen
    Conclusion,
}

/// A session operation that is not valid right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The operation does not apply to the current stage
    #[error("operation not available in the {0:?} stage")]
    WrongStage(ScanStage),
    /// Begin was requested before the last onboarding page
    #[error("onboarding is not finished")]
    OnboardingIncomplete,
    /// The serving size could not be parsed; the user is asked to re-scan
    #[error(transparent)]
    Serving(#[from] ServingError),
}

/// State for one scan-to-conclusion flow
#[derive(Debug)]
pub struct ScanSession {
    stage: ScanStage,
    onboarding_page: usize,
    onboarding_pages: usize,
    min_distance_cm: f32,
    surface_distance_cm: Option<f32>,
    photo: Option<CapturedPhoto>,
    facts: NutritionFacts,
    serving: Option<ServingSize>,
    rescan_prompt: bool,
    attempt: Option<Uuid>,
}

impl ScanSession {
    /// Create a session at the start of onboarding
    pub fn new(config: &AppConfig) -> Self {
        Self {
            stage: ScanStage::Onboarding,
            onboarding_page: 0,
            onboarding_pages: config.onboarding.pages.max(1),
            min_distance_cm: config.camera.min_distance_cm,
            surface_distance_cm: None,
            photo: None,
            facts: NutritionFacts::new(),
            serving: None,
            rescan_prompt: false,
            attempt: None,
        }
    }

    /// Current stage
    pub fn stage(&self) -> ScanStage {
        self.stage
    }

    /// Current onboarding page index
    pub fn onboarding_page(&self) -> usize {
        self.onboarding_page
    }

    /// Move to the next onboarding page, stopping at the last one
    pub fn advance_onboarding(&mut self) {
        if self.stage == ScanStage::Onboarding {
            self.onboarding_page = (self.onboarding_page + 1).min(self.onboarding_pages - 1);
        }
    }

    /// Whether Begin is unlocked (last onboarding page reached)
    pub fn can_begin(&self) -> bool {
        self.onboarding_page + 1 == self.onboarding_pages
    }

    /// Leave onboarding for the camera screen
    pub fn begin(&mut self) -> Result<(), SessionError> {
        if self.stage != ScanStage::Onboarding {
            return Err(SessionError::WrongStage(self.stage));
        }
        if !self.can_begin() {
            return Err(SessionError::OnboardingIncomplete);
        }
        self.stage = ScanStage::Camera;
        Ok(())
    }

    /// Feed a feature-point frame from the AR session while on the camera
    /// screen. Frames without feature points keep the previous reading.
    pub fn update_proximity(&mut self, frame: &PointCloudFrame) -> Option<ProximityStatus> {
        if self.stage != ScanStage::Camera {
            return None;
        }
        if let Some(distance) = nearest_point_distance_cm(frame) {
            self.surface_distance_cm = Some(distance);
        }
        self.proximity()
    }

    /// Latest surface distance reading, in centimeters
    pub fn surface_distance_cm(&self) -> Option<f32> {
        self.surface_distance_cm
    }

    /// Whether the camera is currently too close to the surface
    pub fn proximity(&self) -> Option<ProximityStatus> {
        self.surface_distance_cm
            .map(|d| ProximityStatus::classify(d, self.min_distance_cm))
    }

    /// Hand a captured photo to the session, starting a recognition attempt.
    ///
    /// Only one attempt is ever in flight: the camera screen allows a single
    /// capture before showing results, and a session in the `Recognizing`
    /// stage rejects further captures.
    pub fn begin_recognition(&mut self, photo: CapturedPhoto) -> Result<Uuid, SessionError> {
        if self.stage != ScanStage::Camera {
            return Err(SessionError::WrongStage(self.stage));
        }
        let attempt = Uuid::new_v4();
        debug!("Starting recognition attempt {attempt}");
        self.photo = Some(photo);
        self.facts = NutritionFacts::new();
        self.attempt = Some(attempt);
        self.stage = ScanStage::Recognizing;
        Ok(attempt)
    }

    /// Apply a finished recognition. Outcomes for a superseded attempt are
    /// dropped, the same way abandoning a screen discards its callbacks.
    /// Returns whether the outcome was applied.
    pub fn complete_recognition(&mut self, attempt: Uuid, facts: NutritionFacts) -> bool {
        if self.stage != ScanStage::Recognizing || self.attempt != Some(attempt) {
            warn!("Dropping stale recognition outcome for attempt {attempt}");
            return false;
        }
        self.facts = facts;
        self.attempt = None;
        self.stage = ScanStage::Results;
        true
    }

    /// Apply a failed recognition: the attempt surfaces an empty table.
    /// Returns whether the outcome was applied.
    pub fn fail_recognition(&mut self, attempt: Uuid) -> bool {
        if self.stage != ScanStage::Recognizing || self.attempt != Some(attempt) {
            warn!("Dropping stale recognition failure for attempt {attempt}");
            return false;
        }
        self.facts = NutritionFacts::new();
        self.attempt = None;
        self.stage = ScanStage::Results;
        true
    }

    /// Extracted fields of the current attempt
    pub fn facts(&self) -> &NutritionFacts {
        &self.facts
    }

    /// The captured photo of the current attempt
    pub fn photo(&self) -> Option<&CapturedPhoto> {
        self.photo.as_ref()
    }

    /// Discard the current results and return to the camera for a fresh
    /// capture. The mapping is replaced wholesale, never merged.
    pub fn retake(&mut self) -> Result<(), SessionError> {
        if self.stage != ScanStage::Results {
            return Err(SessionError::WrongStage(self.stage));
        }
        self.photo = None;
        self.facts = NutritionFacts::new();
        self.rescan_prompt = false;
        self.stage = ScanStage::Camera;
        Ok(())
    }

    /// Ask for the AR portion view. Parses the serving size on demand; any
    /// parse failure raises the single re-scan prompt and stays on results.
    pub fn request_portion(&mut self) -> Result<ServingSize, SessionError> {
        if self.stage != ScanStage::Results {
            return Err(SessionError::WrongStage(self.stage));
        }
        match parse_serving_size(&self.facts) {
            Ok(serving) => {
                self.serving = Some(serving.clone());
                self.stage = ScanStage::Portion;
                Ok(serving)
            }
            Err(error) => {
                debug!("Serving size unavailable: {error}");
                self.rescan_prompt = true;
                Err(SessionError::Serving(error))
            }
        }
    }

    /// The serving size driving the portion screen
    pub fn serving(&self) -> Option<&ServingSize> {
        self.serving.as_ref()
    }

    /// Whether the re-scan prompt is showing
    pub fn rescan_prompt(&self) -> bool {
        self.rescan_prompt
    }

    /// Dismiss the re-scan prompt
    pub fn dismiss_rescan_prompt(&mut self) {
        self.rescan_prompt = false;
    }

    /// Leave the portion screen for the closing screen
    pub fn continue_to_conclusion(&mut self) -> Result<(), SessionError> {
        if self.stage != ScanStage::Portion {
            return Err(SessionError::WrongStage(self.stage));
        }
        self.serving = None;
        self.stage = ScanStage::Conclusion;
        Ok(())
    }

    /// Start over with a fresh scan from the closing screen
    pub fn try_again(&mut self) -> Result<(), SessionError> {
        if self.stage != ScanStage::Conclusion {
            return Err(SessionError::WrongStage(self.stage));
        }
        self.photo = None;
        self.facts = NutritionFacts::new();
        self.serving = None;
        self.rescan_prompt = false;
        self.stage = ScanStage::Camera;
        Ok(())
    }
}
