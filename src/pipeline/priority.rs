//! Priority ranking for audio dispatch.

use std::cmp::Ordering;

use crate::detect::DetectedObject;

/// Secondary-key weight on box area (bigger objects announce first).
const SIZE_WEIGHT: f64 = 0.7;
/// Secondary-key weight on confidence. Deliberately much lighter than the
/// size weight: two equally-distant objects differ audibly by bulk before
/// they differ by detector certainty.
const CONFIDENCE_WEIGHT: f64 = 0.15;

/// Produce the playback order for audio dispatch: a total order over the
/// input, highest priority first.
///
/// Primary key is the distance category (near outranks medium outranks
/// far). Within a category, a weighted combination of box area and
/// confidence breaks the tie. The sort is stable, so equal-priority objects
/// keep their input order and the result is deterministic.
pub fn sort_by_priority(objects: &[DetectedObject]) -> Vec<DetectedObject> {
    let mut ranked: Vec<DetectedObject> = objects.to_vec();
    ranked.sort_by(compare_priority);
    ranked
}

fn compare_priority(a: &DetectedObject, b: &DetectedObject) -> Ordering {
    // Nearer category first.
    match b.distance.rank().cmp(&a.distance.rank()) {
        Ordering::Equal => {}
        unequal => return unequal,
    }

    let score =
        (b.area() - a.area()) * SIZE_WEIGHT + (b.confidence - a.confidence) * CONFIDENCE_WEIGHT;
    // Positive score: b is the stronger announcement, so it sorts first.
    score.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
}
