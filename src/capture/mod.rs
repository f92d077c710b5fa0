//! Photo Capture Layer
//!
//! Types around the captured label photo. The camera itself belongs to the
//! host platform; this layer only carries the snapshot it hands over, plus the
//! built-in sample labels used when no device capture is available.

pub mod photo;
pub mod samples;

pub use photo::CapturedPhoto;
pub use samples::{find_sample, SampleLabel, SAMPLE_LABELS};
