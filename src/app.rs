//! Application Coordinator
//!
//! Owns the scan session and the background recognition worker. Recognition
//! runs on a dedicated thread; photos go out and extracted facts come back
//! over channels, so exactly one logical flow touches the session per scan.

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::capture::CapturedPhoto;
use crate::config::AppConfig;
use crate::label::extract_facts;
use crate::recognition::{RecognitionPipeline, TextRecognizer};
use crate::session::{RecognitionOutcome, RecognitionRequest, ScanSession};

/// Main application coordinator
pub struct NutriScanApp {
    /// The scan session, shared with whatever surface drives the app
    session: Arc<RwLock<ScanSession>>,
    /// Channel to send capture requests to the worker
    to_worker: Sender<RecognitionRequest>,
    /// Channel to receive recognition outcomes
    from_worker: Receiver<RecognitionOutcome>,
    /// Handle to the recognition worker thread
    worker: Option<JoinHandle<()>>,
}

impl NutriScanApp {
    /// Create the coordinator and start the recognition worker
    pub fn new(config: &AppConfig, recognizer: Box<dyn TextRecognizer>) -> Self {
        let session = Arc::new(RwLock::new(ScanSession::new(config)));
        let (to_worker, request_rx) = unbounded();
        let (outcome_tx, from_worker) = unbounded();

        let pipeline = RecognitionPipeline::new(recognizer, config.recognition.clone());
        let worker = std::thread::spawn(move || run_worker(pipeline, request_rx, outcome_tx));

        Self {
            session,
            to_worker,
            from_worker,
            worker: Some(worker),
        }
    }

    /// The shared scan session
    pub fn session(&self) -> Arc<RwLock<ScanSession>> {
        self.session.clone()
    }

    /// Hand a captured photo to the background worker.
    ///
    /// Fails if a recognition is already in flight; the session enforces one
    /// capture at a time.
    pub fn capture(&self, photo: CapturedPhoto) -> Result<Uuid> {
        let attempt = self.session.write().begin_recognition(photo.clone())?;
        self.to_worker
            .send(RecognitionRequest::Recognize { attempt, photo })?;
        Ok(attempt)
    }

    /// Block until the worker reports the next outcome
    pub fn recv_outcome(&self) -> Result<RecognitionOutcome> {
        Ok(self.from_worker.recv()?)
    }

    /// Marshal one outcome back into the session
    pub fn apply_outcome(&self, outcome: RecognitionOutcome) {
        let mut session = self.session.write();
        match outcome {
            RecognitionOutcome::Recognized { attempt, facts } => {
                info!("Recognition attempt {attempt} extracted {} fields", facts.len());
                session.complete_recognition(attempt, facts);
            }
            RecognitionOutcome::Failed { attempt, error } => {
                error!("Recognition attempt {attempt} failed: {error}");
                session.fail_recognition(attempt);
            }
        }
    }

    /// Apply any outcomes the worker has finished, without blocking.
    /// Returns how many were applied.
    pub fn pump_outcomes(&self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.from_worker.try_recv() {
            self.apply_outcome(outcome);
            applied += 1;
        }
        applied
    }

    /// Capture a photo and block until its outcome lands in the session
    pub fn scan_blocking(&self, photo: CapturedPhoto) -> Result<()> {
        self.capture(photo)?;
        let outcome = self.recv_outcome()?;
        self.apply_outcome(outcome);
        Ok(())
    }
}

impl Drop for NutriScanApp {
    fn drop(&mut self) {
        let _ = self.to_worker.send(RecognitionRequest::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

/// Recognition worker loop: recognize, extract, report back
fn run_worker(
    pipeline: RecognitionPipeline,
    requests: Receiver<RecognitionRequest>,
    outcomes: Sender<RecognitionOutcome>,
) {
    info!("Recognition worker starting...");
    for request in requests {
        match request {
            RecognitionRequest::Recognize { attempt, photo } => {
                let outcome = match pipeline.process(&photo) {
                    Ok(observations) => RecognitionOutcome::Recognized {
                        attempt,
                        facts: extract_facts(&observations),
                    },
                    Err(error) => RecognitionOutcome::Failed {
                        attempt,
                        error: error.to_string(),
                    },
                };
                if outcomes.send(outcome).is_err() {
                    break;
                }
            }
            RecognitionRequest::Shutdown => break,
        }
    }
    info!("Recognition worker exiting...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelField;
    use crate::recognition::RecordedRecognizer;
    use crate::session::ScanStage;

    fn app_with_lines(lines: &[&str]) -> NutriScanApp {
        let recognizer = RecordedRecognizer::from_lines(lines);
        NutriScanApp::new(&AppConfig::default(), Box::new(recognizer))
    }

    fn drive_to_camera(app: &NutriScanApp) {
        let session = app.session();
        let mut session = session.write();
        while !session.can_begin() {
            session.advance_onboarding();
        }
        session.begin().unwrap();
    }

    #[test]
    fn test_scan_roundtrip_through_worker() {
        let app = app_with_lines(&["Serving size 15 pieces (28g)", "Calories 110"]);
        drive_to_camera(&app);

        app.scan_blocking(CapturedPhoto::placeholder()).unwrap();

        let session = app.session();
        let session = session.read();
        assert_eq!(session.stage(), ScanStage::Results);
        assert_eq!(session.facts().get(LabelField::Calories), Some("110"));
        assert_eq!(session.facts().get(LabelField::ServingSize), Some("28g"));
    }

    #[test]
    fn test_capture_rejected_while_in_flight() {
        let app = app_with_lines(&["Calories 110"]);
        drive_to_camera(&app);

        app.capture(CapturedPhoto::placeholder()).unwrap();
        assert!(app.capture(CapturedPhoto::placeholder()).is_err());

        let outcome = app.recv_outcome().unwrap();
        app.apply_outcome(outcome);
    }

    #[test]
    fn test_pump_outcomes_applies_pending() {
        let app = app_with_lines(&["Protein 2g"]);
        drive_to_camera(&app);

        app.capture(CapturedPhoto::placeholder()).unwrap();
        // recv then re-apply through the pump path
        let outcome = app.recv_outcome().unwrap();
        app.apply_outcome(outcome);
        assert_eq!(app.pump_outcomes(), 0);

        let session = app.session();
        assert_eq!(session.read().facts().get(LabelField::Protein), Some("2g"));
    }
}
