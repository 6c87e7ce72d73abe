//! Box geometry and distance classification.
//!
//! Everything here is a pure function over normalized frame coordinates.
//! The distance cut points are fixed: downstream behavior (priority
//! ordering, audio pitch selection) depends on these exact values, so they
//! are deliberately not configurable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Box area above which an object is classified `Near`.
const NEAR_AREA: f64 = 0.15;
/// Box area above which an object is classified `Medium`.
const MEDIUM_AREA: f64 = 0.05;

/// Estimated real-world distance at or under which an object counts as an
/// immediate proximity hazard.
pub const PROXIMITY_ALERT_METERS: f64 = 2.0;

/// Axis-aligned bounding box, normalized to [0,1] frame coordinates.
/// `x`, `y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Coarse distance class derived from box area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceCategory {
    Near,
    Medium,
    Far,
}

impl DistanceCategory {
    /// Priority rank: near objects outrank medium outrank far.
    pub fn rank(&self) -> u8 {
        match self {
            DistanceCategory::Near => 3,
            DistanceCategory::Medium => 2,
            DistanceCategory::Far => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceCategory::Near => "near",
            DistanceCategory::Medium => "medium",
            DistanceCategory::Far => "far",
        }
    }
}

impl fmt::Display for DistanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a box into a distance category by its area.
pub fn classify_distance(width: f64, height: f64) -> DistanceCategory {
    let area = width * height;
    if area > NEAR_AREA {
        DistanceCategory::Near
    } else if area > MEDIUM_AREA {
        DistanceCategory::Medium
    } else {
        DistanceCategory::Far
    }
}

/// Intersection over Union of two boxes.
///
/// Returns 0 when the boxes do not overlap. Symmetric in its arguments.
/// Degenerate boxes (zero or negative size) are the caller's responsibility;
/// they simply yield 0.
pub fn intersection_over_union(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.width).min(b.x + b.width);
    let y2 = (a.y + a.height).min(b.y + b.height);

    if x1 >= x2 || y1 >= y2 {
        return 0.0;
    }

    let intersection = (x2 - x1) * (y2 - y1);
    intersection / (a.area() + b.area() - intersection)
}

/// Rough area-to-meters lookup, calibrated against a typical camera field of
/// view and human-scale objects. Monotonic: larger boxes read as closer.
pub fn estimate_distance_meters(width: f64, height: f64) -> f64 {
    let area = width * height;
    if area > 0.35 {
        0.5
    } else if area > 0.18 {
        1.0
    } else if area > 0.1 {
        1.5
    } else if area > 0.07 {
        2.0
    } else if area > 0.04 {
        3.0
    } else if area > 0.02 {
        4.0
    } else {
        5.0
    }
}

/// True when the estimated real-world distance is within the proximity
/// alert threshold.
pub fn is_nearby(width: f64, height: f64) -> bool {
    estimate_distance_meters(width, height) <= PROXIMITY_ALERT_METERS
}
