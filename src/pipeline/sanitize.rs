//! Frame sanitizer: out-of-frame culling and duplicate suppression.

use std::collections::HashSet;

use crate::detect::DetectedObject;

/// Minimum visible overlap with the frame, per axis, as a frame fraction.
const VISIBLE_MARGIN: f64 = 0.05;

/// Drop objects that have drifted (almost) fully outside the frame.
///
/// An object is kept only while at least 5% of the frame span on each axis
/// remains visible, which tolerates boxes clipped at the edges without
/// letting fully-departed objects linger.
pub fn filter_out_of_frame(objects: Vec<DetectedObject>) -> Vec<DetectedObject> {
    objects
        .into_iter()
        .filter(|obj| {
            let b = &obj.bounding_box;
            let horizontal = b.x < 1.0 - VISIBLE_MARGIN && b.x + b.width > VISIBLE_MARGIN;
            let vertical = b.y < 1.0 - VISIBLE_MARGIN && b.y + b.height > VISIBLE_MARGIN;
            horizontal && vertical
        })
        .collect()
}

/// Collapse duplicate detections of the same object.
///
/// Key is label plus position rounded to one decimal of frame fraction, so
/// two detections of the same label within the same coarse cell are treated
/// as one. First occurrence in input order wins; callers that care which
/// duplicate survives must order the input accordingly.
pub fn deduplicate(objects: Vec<DetectedObject>) -> Vec<DetectedObject> {
    if objects.len() <= 1 {
        return objects;
    }

    let mut seen: HashSet<(String, i64, i64)> = HashSet::new();
    objects
        .into_iter()
        .filter(|obj| {
            let key = (
                obj.label.clone(),
                (obj.bounding_box.x * 10.0).round() as i64,
                (obj.bounding_box.y * 10.0).round() as i64,
            );
            seen.insert(key)
        })
        .collect()
}
