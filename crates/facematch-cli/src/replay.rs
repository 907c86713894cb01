//! Scenario replay against a single in-memory registry.

use std::fmt;
use std::time::{Duration, Instant};

use facematch_core::{
    recognize_face, register_face, Classification, FaceOutcome, FaceRegistry, FrameReport,
    FrameStatus, RecognitionSession, SessionError,
};
use serde::{Serialize, Serializer};

use crate::config::Config;
use crate::scenario::{Event, Scenario};

/// Result of replaying one scenario event.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Outcome {
    Registered {
        name: String,
    },
    RegisterFailed {
        name: String,
        #[serde(serialize_with = "as_display")]
        error: SessionError,
    },
    Recognized {
        result: Classification,
    },
    RecognizeFailed {
        #[serde(serialize_with = "as_display")]
        error: SessionError,
    },
    Frame {
        at_ms: u64,
        #[serde(flatten)]
        report: FrameReport,
    },
}

fn as_display<T: fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Registered { name } => write!(f, "Face registered successfully for {name}"),
            Outcome::RegisterFailed {
                error: SessionError::NoFaceDetected,
                ..
            }
            | Outcome::RecognizeFailed {
                error: SessionError::NoFaceDetected,
            } => write!(f, "No face detected. Please try again."),
            Outcome::RegisterFailed { error, .. } => write!(f, "Error registering face: {error}"),
            Outcome::RecognizeFailed { error } => write!(f, "Error recognizing face: {error}"),
            Outcome::Recognized {
                result: Classification::Recognized { name, confidence },
            } => write!(f, "Recognized as: {name} (confidence: {confidence:.2})"),
            Outcome::Recognized {
                result: Classification::Unrecognized,
            } => write!(f, "Face not recognized. Please register first."),
            Outcome::Frame { at_ms, report } => {
                write!(f, "[{at_ms:>6} ms] faces: {}", report.face_count)?;
                match &report.status {
                    FrameStatus::NoFaces => write!(f, " | No faces detected"),
                    FrameStatus::Throttled => Ok(()),
                    FrameStatus::Recognized(results) => {
                        for (i, result) in results.iter().enumerate() {
                            match result {
                                FaceOutcome::Classified(Classification::Recognized {
                                    name, ..
                                }) => write!(f, " | #{i} Recognized: {name}")?,
                                FaceOutcome::Classified(Classification::Unrecognized) => {
                                    write!(f, " | #{i} Unknown face")?
                                }
                                FaceOutcome::Failed { error } => {
                                    write!(f, " | #{i} Error: {error}")?
                                }
                            }
                        }
                        Ok(())
                    }
                }
            }
        }
    }
}

/// Replays scenario events in order against one registry and session.
pub struct Replay {
    registry: FaceRegistry,
    session: RecognitionSession,
    started: Instant,
}

impl Replay {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: FaceRegistry::new(),
            session: RecognitionSession::new(config.recognition_interval),
            started: Instant::now(),
        }
    }

    pub fn registry(&self) -> &FaceRegistry {
        &self.registry
    }

    pub fn run(&mut self, scenario: &Scenario) -> Vec<Outcome> {
        scenario.events.iter().map(|e| self.step(e)).collect()
    }

    pub fn step(&mut self, event: &Event) -> Outcome {
        match event {
            Event::Register { name, faces } => {
                match register_face(&mut self.registry, name, faces) {
                    Ok(()) => Outcome::Registered { name: name.clone() },
                    Err(error) => {
                        tracing::warn!(name = %name, %error, "registration failed");
                        Outcome::RegisterFailed {
                            name: name.clone(),
                            error,
                        }
                    }
                }
            }
            Event::Recognize { faces } => match recognize_face(&self.registry, faces) {
                Ok(result) => Outcome::Recognized { result },
                Err(error) => {
                    tracing::warn!(%error, "recognition failed");
                    Outcome::RecognizeFailed { error }
                }
            },
            Event::Frame { at_ms, faces } => {
                let now = self.started + Duration::from_millis(*at_ms);
                let report = self.session.on_frame(&self.registry, faces, now);
                Outcome::Frame {
                    at_ms: *at_ms,
                    report,
                }
            }
        }
    }
}
