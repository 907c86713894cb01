//! In-memory face registry with nearest-neighbor matching.

use crate::descriptor::{Descriptor, DescriptorError};
use serde::Serialize;
use thiserror::Error;

/// Maximum Euclidean distance (exclusive) accepted as a recognition.
pub const MATCH_THRESHOLD: f32 = 0.6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("face name must not be empty or blank")]
    InvalidName,
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// A named descriptor held by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredFace {
    pub name: String,
    pub descriptor: Descriptor,
}

/// Nearest registry entry for a probe descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub name: String,
    pub distance: f32,
}

/// Outcome of [`FaceRegistry::classify`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    /// Best match is under [`MATCH_THRESHOLD`].
    ///
    /// `confidence` is `1 - distance`: a display score, not a probability.
    Recognized { name: String, confidence: f32 },
    Unrecognized,
}

impl Classification {
    pub fn is_recognized(&self) -> bool {
        matches!(self, Classification::Recognized { .. })
    }
}

/// Strategy for finding the nearest enrolled face to a probe descriptor.
pub trait Matcher {
    fn nearest(
        &self,
        probe: &Descriptor,
        gallery: &[RegisteredFace],
    ) -> Result<Option<Match>, DescriptorError>;
}

/// Linear-scan Euclidean matcher.
///
/// Keeps the first entry seen at the minimum distance, so ties resolve to the
/// earliest registered face. A non-empty gallery always yields a match.
pub struct EuclideanMatcher;

impl Matcher for EuclideanMatcher {
    fn nearest(
        &self,
        probe: &Descriptor,
        gallery: &[RegisteredFace],
    ) -> Result<Option<Match>, DescriptorError> {
        let mut best: Option<(usize, f32)> = None;

        for (i, face) in gallery.iter().enumerate() {
            let distance = probe.euclidean_distance(&face.descriptor)?;
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((i, distance));
            }
        }

        Ok(best.map(|(idx, distance)| Match {
            name: gallery[idx].name.clone(),
            distance,
        }))
    }
}

/// Caller-owned mapping from name to descriptor.
///
/// Entries iterate in insertion order. Re-registering a name replaces its
/// descriptor in place. All stored descriptors share one length.
#[derive(Debug, Default, Clone)]
pub struct FaceRegistry {
    faces: Vec<RegisteredFace>,
}

impl FaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `descriptor` under `name`, overwriting any prior entry.
    ///
    /// Empty descriptors and descriptors holding non-finite values are rejected.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        descriptor: Descriptor,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidName);
        }
        descriptor.validate()?;

        if let Some(other) = self.faces.iter().find(|f| f.name != name) {
            if other.descriptor.len() != descriptor.len() {
                return Err(DescriptorError::LengthMismatch {
                    expected: other.descriptor.len(),
                    actual: descriptor.len(),
                }
                .into());
            }
        }

        let len = descriptor.len();
        match self.faces.iter().position(|f| f.name == name) {
            Some(idx) => {
                self.faces[idx].descriptor = descriptor;
                tracing::debug!(name = %name, len, "replaced registered face");
            }
            None => {
                tracing::debug!(name = %name, len, "registered face");
                self.faces.push(RegisteredFace { name, descriptor });
            }
        }

        Ok(())
    }

    /// Nearest registered face by Euclidean distance, or `None` when empty.
    pub fn find_best_match(&self, descriptor: &Descriptor) -> Result<Option<Match>, RegistryError> {
        self.find_best_match_with(&EuclideanMatcher, descriptor)
    }

    pub fn find_best_match_with<M: Matcher>(
        &self,
        matcher: &M,
        descriptor: &Descriptor,
    ) -> Result<Option<Match>, RegistryError> {
        descriptor.validate()?;
        Ok(matcher.nearest(descriptor, &self.faces)?)
    }

    /// Recognize `descriptor` if its nearest face is under [`MATCH_THRESHOLD`].
    pub fn classify(&self, descriptor: &Descriptor) -> Result<Classification, RegistryError> {
        let classification = match self.find_best_match(descriptor)? {
            Some(m) if m.distance < MATCH_THRESHOLD => Classification::Recognized {
                confidence: 1.0 - m.distance,
                name: m.name,
            },
            Some(m) => {
                tracing::debug!(nearest = %m.name, distance = m.distance, "no face within threshold");
                Classification::Unrecognized
            }
            None => Classification::Unrecognized,
        };
        Ok(classification)
    }

    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.faces
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.descriptor)
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
