use crate::descriptor::{self, Descriptor, DescriptorError};
use serde::{Deserialize, Serialize};

/// A 2D coordinate in image pixel space.
///
/// Serialized as a two-element `[x, y]` array, the shape face detectors emit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Face bounding box given by its top-left and bottom-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(alias = "topLeft")]
    pub top_left: Point,
    #[serde(alias = "bottomRight")]
    pub bottom_right: Point,
}

impl BoundingBox {
    pub const fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn width(&self) -> f32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f32 {
        self.bottom_right.y - self.top_left.y
    }

    /// True when both sides are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        let (width, height) = (self.width(), self.height());
        width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
    }
}

/// One face reported by the external detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(flatten)]
    pub bbox: BoundingBox,
    /// Ordered landmark keypoints; cardinality is fixed per detector model.
    pub landmarks: Vec<Point>,
}

impl Detection {
    pub fn new(bbox: BoundingBox, landmarks: Vec<Point>) -> Self {
        Self { bbox, landmarks }
    }

    /// Normalize this detection's landmarks into a [`Descriptor`].
    pub fn descriptor(&self) -> Result<Descriptor, DescriptorError> {
        descriptor::extract_descriptor(&self.bbox, &self.landmarks)
    }
}
