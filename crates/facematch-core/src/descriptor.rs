//! Landmark descriptor extraction.
//!
//! Turns a detected face's landmark points into a flat vector normalized by the
//! face's bounding box, so that descriptors are independent of where the face
//! sits in the frame and how large it appears. Rotation and lighting are not
//! normalized.

use crate::types::{BoundingBox, Point};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescriptorError {
    #[error("degenerate bounding box ({width} x {height}): width and height must be positive")]
    DegenerateBoundingBox { width: f32, height: f32 },
    #[error("no landmarks supplied for face")]
    EmptyLandmarks,
    #[error("descriptor length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("descriptor is empty")]
    Empty,
    #[error("non-finite descriptor value at index {index}")]
    NonFinite { index: usize },
}

/// Normalized landmark geometry of a single face.
///
/// Holds `2 * landmark_count` values laid out as `[x0, y0, x1, y1, ...]`.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor {
    values: Vec<f32>,
}

impl Descriptor {
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check that the descriptor is non-empty and every value is finite.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.values.is_empty() {
            return Err(DescriptorError::Empty);
        }
        match self.values.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(DescriptorError::NonFinite { index }),
            None => Ok(()),
        }
    }

    /// Euclidean distance to another descriptor of the same length.
    pub fn euclidean_distance(&self, other: &Descriptor) -> Result<f32, DescriptorError> {
        euclidean_distance(&self.values, &other.values)
    }
}

impl From<Vec<f32>> for Descriptor {
    fn from(values: Vec<f32>) -> Self {
        Self { values }
    }
}

/// Build a descriptor from a bounding box and its landmarks.
///
/// Each landmark becomes `((x - left) / width, (y - top) / height)`; pairs are
/// flattened in input order. Non-finite landmarks, or landmarks so far from
/// the box that normalization overflows, are rejected.
pub fn extract_descriptor(
    bbox: &BoundingBox,
    landmarks: &[Point],
) -> Result<Descriptor, DescriptorError> {
    if !bbox.is_valid() {
        return Err(DescriptorError::DegenerateBoundingBox {
            width: bbox.width(),
            height: bbox.height(),
        });
    }
    if landmarks.is_empty() {
        return Err(DescriptorError::EmptyLandmarks);
    }

    let width = bbox.width();
    let height = bbox.height();
    let origin = bbox.top_left;

    let values = landmarks
        .iter()
        .flat_map(|p| [(p.x - origin.x) / width, (p.y - origin.y) / height])
        .collect();

    let descriptor = Descriptor { values };
    descriptor.validate()?;
    Ok(descriptor)
}

/// Square root of the summed squared per-index differences.
///
/// Slices must have equal length; unequal inputs are rejected rather than
/// compared over the shorter prefix.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Result<f32, DescriptorError> {
    if a.len() != b.len() {
        return Err(DescriptorError::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    Ok(a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x1: f32, y1: f32, x2: f32, y2: f32) -> BoundingBox {
        BoundingBox::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    fn assert_close(a: &[f32], b: &[f32]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-5, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_extract_reference_example() {
        let desc = extract_descriptor(
            &bbox(0.0, 0.0, 100.0, 100.0),
            &[Point::new(10.0, 10.0), Point::new(90.0, 90.0)],
        )
        .unwrap();
        assert_close(desc.values(), &[0.1, 0.1, 0.9, 0.9]);
    }

    #[test]
    fn test_extract_length_is_twice_landmarks() {
        let landmarks: Vec<Point> = (0..6)
            .map(|i| Point::new(20.0 + i as f32 * 7.0, 30.0 + i as f32 * 3.0))
            .collect();
        let desc = extract_descriptor(&bbox(10.0, 10.0, 90.0, 120.0), &landmarks).unwrap();
        assert_eq!(desc.len(), 12);
    }

    #[test]
    fn test_extract_preserves_landmark_order() {
        let desc = extract_descriptor(
            &bbox(0.0, 0.0, 200.0, 100.0),
            &[Point::new(150.0, 25.0), Point::new(50.0, 75.0)],
        )
        .unwrap();
        assert_close(desc.values(), &[0.75, 0.25, 0.25, 0.75]);
    }

    #[test]
    fn test_extract_translation_scale_invariant() {
        let landmarks = [
            Point::new(10.0, 20.0),
            Point::new(55.0, 70.0),
            Point::new(80.0, 33.0),
        ];
        let base = extract_descriptor(&bbox(0.0, 0.0, 100.0, 100.0), &landmarks).unwrap();

        let (scale, dx, dy) = (2.5f32, 37.0f32, -12.0f32);
        let moved: Vec<Point> = landmarks
            .iter()
            .map(|p| Point::new(p.x * scale + dx, p.y * scale + dy))
            .collect();
        let moved_box = bbox(dx, dy, 100.0 * scale + dx, 100.0 * scale + dy);
        let transformed = extract_descriptor(&moved_box, &moved).unwrap();

        assert_close(base.values(), transformed.values());
    }

    #[test]
    fn test_extract_landmarks_outside_box() {
        // Detectors can report keypoints slightly outside the box; these are kept as-is.
        let desc = extract_descriptor(
            &bbox(0.0, 0.0, 100.0, 100.0),
            &[Point::new(-10.0, 110.0)],
        )
        .unwrap();
        assert_close(desc.values(), &[-0.1, 1.1]);
    }

    #[test]
    fn test_extract_rejects_zero_width() {
        let err = extract_descriptor(&bbox(50.0, 0.0, 50.0, 100.0), &[Point::new(50.0, 50.0)])
            .unwrap_err();
        assert!(matches!(err, DescriptorError::DegenerateBoundingBox { .. }));
    }

    #[test]
    fn test_extract_rejects_negative_height() {
        let err = extract_descriptor(&bbox(0.0, 100.0, 100.0, 0.0), &[Point::new(50.0, 50.0)])
            .unwrap_err();
        assert!(matches!(err, DescriptorError::DegenerateBoundingBox { .. }));
    }

    #[test]
    fn test_extract_rejects_empty_landmarks() {
        let err = extract_descriptor(&bbox(0.0, 0.0, 100.0, 100.0), &[]).unwrap_err();
        assert_eq!(err, DescriptorError::EmptyLandmarks);
    }

    #[test]
    fn test_degenerate_box_checked_before_landmarks() {
        let err = extract_descriptor(&bbox(0.0, 0.0, 0.0, 0.0), &[]).unwrap_err();
        assert!(matches!(err, DescriptorError::DegenerateBoundingBox { .. }));
    }

    #[test]
    fn test_extract_rejects_nan_landmark() {
        let err = extract_descriptor(
            &bbox(0.0, 0.0, 100.0, 100.0),
            &[Point::new(f32::NAN, 10.0), Point::new(90.0, 90.0)],
        )
        .unwrap_err();
        assert_eq!(err, DescriptorError::NonFinite { index: 0 });
    }

    #[test]
    fn test_extract_rejects_infinite_box() {
        let err = extract_descriptor(
            &bbox(0.0, 0.0, f32::INFINITY, 100.0),
            &[Point::new(10.0, 10.0)],
        )
        .unwrap_err();
        assert!(matches!(err, DescriptorError::DegenerateBoundingBox { .. }));
    }

    #[test]
    fn test_extract_rejects_overflowing_landmark() {
        let err = extract_descriptor(
            &bbox(0.0, 0.0, 0.5, 0.5),
            &[Point::new(10.0, 10.0), Point::new(f32::MAX, 0.25)],
        )
        .unwrap_err();
        assert_eq!(err, DescriptorError::NonFinite { index: 2 });
    }

    #[test]
    fn test_validate() {
        assert!(Descriptor::from(vec![0.1, 0.2]).validate().is_ok());
        assert_eq!(Descriptor::from(vec![]).validate(), Err(DescriptorError::Empty));
        assert_eq!(
            Descriptor::from(vec![0.1, f32::INFINITY]).validate(),
            Err(DescriptorError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn test_distance_identical_is_zero() {
        let a = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(euclidean_distance(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_known_value() {
        let d = euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = [0.1, 0.7, 0.33, 0.9, 0.05, 0.5];
        let b = [0.4, 0.2, 0.81, 0.15, 0.6, 0.5];
        let ab = euclidean_distance(&a, &b).unwrap();
        let ba = euclidean_distance(&b, &a).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_distance_length_mismatch() {
        let err = euclidean_distance(&[0.1, 0.2, 0.3, 0.4], &[0.1, 0.2]).unwrap_err();
        assert_eq!(
            err,
            DescriptorError::LengthMismatch {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn test_descriptor_distance_method() {
        let a = Descriptor::from(vec![0.1, 0.1, 0.9, 0.9]);
        let b = Descriptor::from(vec![0.9, 0.9, 0.1, 0.1]);
        let d = a.euclidean_distance(&b).unwrap();
        assert!((d - 1.6).abs() < 1e-5, "got {d}");
    }
}
