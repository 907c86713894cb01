//! Frame-driven recognition loop.
//!
//! The caller feeds one detection batch per frame together with the frame's
//! timestamp. Every face in a frame is classified at most once per
//! recognition interval; in between, frames only report how many faces are
//! visible. Explicit register/recognize actions act on the first detection of
//! a batch.

use crate::descriptor::DescriptorError;
use crate::registry::{Classification, FaceRegistry, RegistryError};
use crate::types::Detection;
use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_RECOGNITION_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("no face detected")]
    NoFaceDetected,
    #[error("descriptor: {0}")]
    Descriptor(#[from] DescriptorError),
    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
}

/// Auto-recognition result for one detection of a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FaceOutcome {
    Classified(Classification),
    /// The face could not be described or compared; no match is reported for it.
    Failed {
        #[serde(serialize_with = "as_display")]
        error: SessionError,
    },
}

impl FaceOutcome {
    pub fn is_recognized(&self) -> bool {
        matches!(self, FaceOutcome::Classified(c) if c.is_recognized())
    }
}

fn as_display<T: std::fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// What a single frame produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "faces", rename_all = "snake_case")]
pub enum FrameStatus {
    NoFaces,
    /// Faces visible but the recognition interval has not elapsed.
    Throttled,
    /// One outcome per detection, index-aligned with the frame's detections.
    Recognized(Vec<FaceOutcome>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub face_count: usize,
    #[serde(flatten)]
    pub status: FrameStatus,
}

/// Throttled auto-recognition state for a stream of frames.
#[derive(Debug, Clone)]
pub struct RecognitionSession {
    interval: Duration,
    last_recognition: Option<Instant>,
}

impl Default for RecognitionSession {
    fn default() -> Self {
        Self::new(DEFAULT_RECOGNITION_INTERVAL)
    }
}

impl RecognitionSession {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_recognition: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Process one frame's detections.
    ///
    /// Frames without faces leave the throttle clock untouched.
    pub fn on_frame(
        &mut self,
        registry: &FaceRegistry,
        detections: &[Detection],
        now: Instant,
    ) -> FrameReport {
        let face_count = detections.len();
        if detections.is_empty() {
            return FrameReport {
                face_count,
                status: FrameStatus::NoFaces,
            };
        }

        let due = match self.last_recognition {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if !due {
            return FrameReport {
                face_count,
                status: FrameStatus::Throttled,
            };
        }
        self.last_recognition = Some(now);

        let results: Vec<FaceOutcome> = detections
            .iter()
            .enumerate()
            .map(|(i, detection)| match classify_detection(registry, detection) {
                Ok(c) => FaceOutcome::Classified(c),
                Err(error) => {
                    tracing::warn!(face = i, %error, "auto-recognition failed for face");
                    FaceOutcome::Failed { error }
                }
            })
            .collect();

        tracing::debug!(
            faces = face_count,
            recognized = results.iter().filter(|c| c.is_recognized()).count(),
            "auto-recognition pass"
        );

        FrameReport {
            face_count,
            status: FrameStatus::Recognized(results),
        }
    }
}

fn classify_detection(
    registry: &FaceRegistry,
    detection: &Detection,
) -> Result<Classification, SessionError> {
    let descriptor = detection.descriptor()?;
    Ok(registry.classify(&descriptor)?)
}

/// Register the first face of `detections` under `name`.
pub fn register_face(
    registry: &mut FaceRegistry,
    name: &str,
    detections: &[Detection],
) -> Result<(), SessionError> {
    let face = detections.first().ok_or(SessionError::NoFaceDetected)?;
    let descriptor = face.descriptor()?;
    registry.register(name, descriptor)?;
    tracing::info!(name, faces = detections.len(), "face registered");
    Ok(())
}

/// Classify the first face of `detections` against `registry`.
pub fn recognize_face(
    registry: &FaceRegistry,
    detections: &[Detection],
) -> Result<Classification, SessionError> {
    let face = detections.first().ok_or(SessionError::NoFaceDetected)?;
    classify_detection(registry, face)
}
