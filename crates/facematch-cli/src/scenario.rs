//! Scenario files: a timed sequence of register / recognize / frame events.
//!
//! Scenarios stand in for the camera: each event carries the detector output
//! that a live feed would have produced at that point.

use std::path::Path;

use anyhow::{Context, Result};
use facematch_core::Detection;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Event {
    /// Register the first face under `name`.
    Register {
        name: String,
        #[serde(default)]
        faces: Vec<Detection>,
    },
    /// Classify the first face.
    Recognize {
        #[serde(default)]
        faces: Vec<Detection>,
    },
    /// One camera frame, `at_ms` milliseconds after the scenario starts.
    Frame {
        at_ms: u64,
        #[serde(default)]
        faces: Vec<Detection>,
    },
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&src).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }
}

/// Load a JSON array of detections, as dumped from a detector.
pub fn load_detections(path: &Path) -> Result<Vec<Detection>> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("reading detections {}", path.display()))?;
    serde_json::from_str(&src).with_context(|| format!("parsing detections {}", path.display()))
}
