//! Detection records and the typed ingestion boundary.
//!
//! Producers hand the pipeline loosely-shaped records (`RawDetection`);
//! `RawDetection::validate` parses them once, at the edge, into strict
//! `DetectedObject` values. Every stage past ingestion is defined over
//! `DetectedObject` only, so structural validity holds by construction and
//! is never re-checked ad hoc downstream.

use anyhow::{anyhow, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::geometry::{classify_distance, BoundingBox, DistanceCategory};

/// The closed label vocabulary the mock generator draws from. A real
/// detector may emit labels outside this list; the pipeline does not care.
pub const KNOWN_LABELS: [&str; 9] = [
    "person", "chair", "table", "cup", "book", "phone", "laptop", "door", "window",
];

/// A stabilized, validated detection.
///
/// `id` is an opaque token regenerated every tick, even for an object the
/// stabilizer carried over. Cross-frame identity is established by label
/// plus geometry (IoU), never by id.
#[derive(Clone, Debug, Serialize)]
pub struct DetectedObject {
    pub id: String,
    pub label: String,
    pub confidence: f64,
    pub bounding_box: BoundingBox,
    pub distance: DistanceCategory,
}

impl DetectedObject {
    /// Build an object with a fresh id. `distance` is always derived from
    /// the box handed in; callers cannot supply a stale category.
    pub fn new(label: impl Into<String>, confidence: f64, bounding_box: BoundingBox) -> Self {
        let label = label.into();
        let id = fresh_id(&label);
        let distance = classify_distance(bounding_box.width, bounding_box.height);
        Self {
            id,
            label,
            confidence,
            bounding_box,
            distance,
        }
    }

    /// Replace the box, regenerating the id and re-deriving `distance`.
    pub fn with_box(&self, bounding_box: BoundingBox) -> Self {
        Self::new(self.label.clone(), self.confidence, bounding_box)
    }

    pub fn area(&self) -> f64 {
        self.bounding_box.area()
    }
}

/// Opaque per-tick token: label, epoch millis, random suffix.
fn fresh_id(label: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let suffix: u32 = rand::thread_rng().gen();
    format!("{label}-{millis}-{suffix:08x}")
}

/// Loosely-shaped record as produced by a detector (or deserialized off a
/// transport). Every field is optional so malformed producer output is
/// representable and can be rejected in one place.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawDetection {
    pub label: Option<String>,
    pub confidence: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl RawDetection {
    pub fn new(label: &str, confidence: f64, bounding_box: BoundingBox) -> Self {
        Self {
            label: Some(label.to_string()),
            confidence: Some(confidence),
            x: Some(bounding_box.x),
            y: Some(bounding_box.y),
            width: Some(bounding_box.width),
            height: Some(bounding_box.height),
        }
    }

    /// Parse into a strict `DetectedObject`.
    ///
    /// Rejects records with missing fields, non-finite geometry, or
    /// non-positive box dimensions. Confidence is taken as supplied and
    /// never re-normalized.
    pub fn validate(&self) -> Result<DetectedObject> {
        let label = self
            .label
            .as_deref()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| anyhow!("detection record missing label"))?;
        let confidence = require_finite(self.confidence, "confidence")?;
        let x = require_finite(self.x, "x")?;
        let y = require_finite(self.y, "y")?;
        let width = require_finite(self.width, "width")?;
        let height = require_finite(self.height, "height")?;
        if width <= 0.0 || height <= 0.0 {
            return Err(anyhow!(
                "detection '{}' has degenerate box {}x{}",
                label,
                width,
                height
            ));
        }
        Ok(DetectedObject::new(
            label,
            confidence,
            BoundingBox::new(x, y, width, height),
        ))
    }
}

fn require_finite(value: Option<f64>, field: &str) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(anyhow!("detection field '{}' is not finite: {}", field, v)),
        None => Err(anyhow!("detection record missing field '{}'", field)),
    }
}

/// Validate a batch, dropping malformed records with a debug log line.
/// Malformed input is ordinary data variance at this boundary, not an error.
pub fn ingest(raw: &[RawDetection]) -> Vec<DetectedObject> {
    raw.iter()
        .filter_map(|r| match r.validate() {
            Ok(obj) => Some(obj),
            Err(e) => {
                log::debug!("dropping malformed detection: {}", e);
                None
            }
        })
        .collect()
}
