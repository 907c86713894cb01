//! facematch-core — Landmark descriptors and nearest-neighbor face matching.
//!
//! Face detection is external: callers supply bounding boxes and landmark
//! points from any detector. This crate normalizes landmarks into descriptors,
//! keeps a named in-memory registry of them, and matches new faces against it
//! by Euclidean distance.

pub mod descriptor;
pub mod registry;
pub mod session;
pub mod types;

pub use descriptor::{extract_descriptor, Descriptor, DescriptorError};
pub use registry::{
    Classification, EuclideanMatcher, FaceRegistry, Match, Matcher, RegistryError,
    MATCH_THRESHOLD,
};
pub use session::{
    recognize_face, register_face, FaceOutcome, FrameReport, FrameStatus, RecognitionSession,
    SessionError,
};
pub use types::{BoundingBox, Detection, Point};
