//! Cross-frame stabilization.
//!
//! Raw per-tick detections jitter: independent positions, fluctuating
//! confidence. Anchoring each new detection to a spatially and categorically
//! similar detection from the previous tick suppresses that flicker before
//! it reaches the audio and overlay consumers.

use crate::detect::DetectedObject;
use crate::geometry::{intersection_over_union, BoundingBox};

/// Weight given to the incoming detection; the remainder anchors to the
/// previous tick. A fixed exponential-moving-average mix, not a Kalman
/// filter: no velocity estimation, no occlusion prediction.
const NEW_WEIGHT: f64 = 0.7;
const PREV_WEIGHT: f64 = 1.0 - NEW_WEIGHT;

/// Minimum IoU for two same-label boxes to count as the same object.
const MATCH_IOU: f64 = 0.5;

/// Smooth `new_objects` against the previous tick's stabilized set.
///
/// Matching is greedy per new object: the first previous object with the
/// same label and IoU above 0.5 wins; there is no global optimal
/// assignment. Matched objects blend position and confidence 0.7/0.3 toward
/// the new detection; unmatched ones pass through unchanged. With an empty
/// history this is the identity function.
///
/// The blended object keeps the NEW detection's id (ids are per-tick
/// tokens) and re-derives its distance category from the blended box.
pub fn stabilize(
    new_objects: Vec<DetectedObject>,
    previous_objects: &[DetectedObject],
) -> Vec<DetectedObject> {
    if previous_objects.is_empty() {
        return new_objects;
    }

    new_objects
        .into_iter()
        .map(|new_obj| {
            let matched = previous_objects.iter().find(|prev| {
                prev.label == new_obj.label
                    && intersection_over_union(&new_obj.bounding_box, &prev.bounding_box)
                        > MATCH_IOU
            });
            match matched {
                Some(prev) => blend(new_obj, prev),
                None => new_obj,
            }
        })
        .collect()
}

fn blend(new_obj: DetectedObject, prev: &DetectedObject) -> DetectedObject {
    let nb = &new_obj.bounding_box;
    let pb = &prev.bounding_box;
    let bounding_box = BoundingBox::new(
        nb.x * NEW_WEIGHT + pb.x * PREV_WEIGHT,
        nb.y * NEW_WEIGHT + pb.y * PREV_WEIGHT,
        nb.width * NEW_WEIGHT + pb.width * PREV_WEIGHT,
        nb.height * NEW_WEIGHT + pb.height * PREV_WEIGHT,
    );
    let confidence = new_obj.confidence * NEW_WEIGHT + prev.confidence * PREV_WEIGHT;
    DetectedObject::new(new_obj.label, confidence, bounding_box)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBox, DistanceCategory};

    fn object(label: &str, confidence: f64, x: f64, y: f64, w: f64, h: f64) -> DetectedObject {
        DetectedObject::new(label, confidence, BoundingBox::new(x, y, w, h))
    }

    #[test]
    fn empty_history_is_identity() {
        let fresh = vec![object("chair", 0.9, 0.1, 0.1, 0.2, 0.2)];
        let ids: Vec<String> = fresh.iter().map(|o| o.id.clone()).collect();
        let out = stabilize(fresh, &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, ids[0]);
        assert_eq!(out[0].confidence, 0.9);
    }

    #[test]
    fn matched_object_blends_toward_new() {
        let prev = vec![object("chair", 0.6, 0.10, 0.10, 0.2, 0.2)];
        let new = vec![object("chair", 1.0, 0.12, 0.10, 0.2, 0.2)];
        let out = stabilize(new, &prev);
        assert_eq!(out.len(), 1);
        assert!((out[0].confidence - (1.0 * 0.7 + 0.6 * 0.3)).abs() < 1e-12);
        assert!((out[0].bounding_box.x - (0.12 * 0.7 + 0.10 * 0.3)).abs() < 1e-12);
        assert_eq!(out[0].bounding_box.width, 0.2);
    }

    #[test]
    fn label_mismatch_passes_through() {
        let prev = vec![object("table", 0.6, 0.1, 0.1, 0.2, 0.2)];
        let new = vec![object("chair", 0.9, 0.1, 0.1, 0.2, 0.2)];
        let out = stabilize(new, &prev);
        assert_eq!(out[0].confidence, 0.9);
        assert_eq!(out[0].bounding_box.x, 0.1);
    }

    #[test]
    fn low_overlap_passes_through() {
        let prev = vec![object("chair", 0.6, 0.7, 0.7, 0.2, 0.2)];
        let new = vec![object("chair", 0.9, 0.1, 0.1, 0.2, 0.2)];
        let out = stabilize(new, &prev);
        assert_eq!(out[0].confidence, 0.9);
    }

    #[test]
    fn first_previous_match_wins() {
        let prev = vec![
            object("chair", 0.2, 0.10, 0.10, 0.2, 0.2),
            object("chair", 0.8, 0.11, 0.10, 0.2, 0.2),
        ];
        let new = vec![object("chair", 1.0, 0.10, 0.10, 0.2, 0.2)];
        let out = stabilize(new, &prev);
        // Blended against the first entry (confidence 0.2), not the second.
        assert!((out[0].confidence - (1.0 * 0.7 + 0.2 * 0.3)).abs() < 1e-12);
    }

    #[test]
    fn distance_is_recomputed_from_blended_box() {
        // Previous box is large (near), new box is small (far); the blend
        // lands in between and the category must reflect the blended area.
        let prev = vec![object("door", 0.9, 0.1, 0.1, 0.5, 0.5)];
        let new = vec![object("door", 0.9, 0.1, 0.1, 0.4, 0.4)];
        let out = stabilize(new, &prev);
        let b = out[0].bounding_box;
        assert_eq!(
            out[0].distance,
            crate::geometry::classify_distance(b.width, b.height)
        );
        assert_eq!(out[0].distance, DistanceCategory::Near);
    }

    #[test]
    fn repeated_ticks_converge_to_true_position() {
        // A stationary object observed with constant true values: the
        // residual decays geometrically by 0.3 per tick.
        let true_conf = 0.9;
        let truth = object("chair", true_conf, 0.3, 0.3, 0.2, 0.2);
        let mut persisted = vec![object("chair", 0.3, 0.3, 0.3, 0.2, 0.2)];
        for _ in 0..20 {
            persisted = stabilize(vec![truth.clone()], &persisted);
        }
        assert!((persisted[0].confidence - true_conf).abs() < 1e-6);
        assert!((persisted[0].bounding_box.x - 0.3).abs() < 1e-9);
    }
}
