//! Surface proximity estimation from raw feature points
//!
//! The AR collaborator streams per-frame feature-point clouds alongside the
//! camera transform. The distance from the camera to the nearest feature point
//! approximates how close the device is held to the scanned surface; the
//! camera screen uses it to warn when the label is too close to focus.

use super::Transform;

/// One frame of raw feature points from the AR session
#[derive(Debug, Clone)]
pub struct PointCloudFrame {
    /// Camera world transform at the time of the frame
    pub camera: Transform,
    /// Detected feature points in world space
    pub points: Vec<[f32; 3]>,
}

impl PointCloudFrame {
    /// Create a frame from a camera transform and world-space points
    pub fn new(camera: Transform, points: Vec<[f32; 3]>) -> Self {
        Self { camera, points }
    }
}

/// Camera proximity relative to the configured minimum scanning distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityStatus {
    /// Camera is closer than the minimum distance; prompt the user to move back
    TooClose,
    /// Camera is far enough from the surface to capture
    Clear,
}

impl ProximityStatus {
    /// Classify a distance reading against the minimum scanning distance
    pub fn classify(distance_cm: f32, min_distance_cm: f32) -> Self {
        if distance_cm < min_distance_cm {
            ProximityStatus::TooClose
        } else {
            ProximityStatus::Clear
        }
    }
}

/// Minimum Euclidean distance from the camera to any feature point, in
/// centimeters. Returns `None` when the frame carries no feature points; the
/// caller keeps its previous reading in that case.
pub fn nearest_point_distance_cm(frame: &PointCloudFrame) -> Option<f32> {
    if frame.points.is_empty() {
        return None;
    }

    let to_camera_space = frame.camera.inverse_rigid();
    let mut closest = f32::MAX;

    for point in &frame.points {
        let p = to_camera_space.transform_point(*point);
        let distance = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        if distance < closest {
            closest = distance;
        }
    }

    Some(closest * 100.0)
}
