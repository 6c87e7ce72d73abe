//! The per-tick detection pipeline.
//!
//! Pure, synchronous transformations over validated detections, applied in
//! a fixed order: quality filter, frame sanitizer (bounds + dedup),
//! stabilizer. Empty input produces empty output at every stage; no stage
//! can fail.

mod filter;
mod priority;
mod sanitize;
mod stabilize;

pub use filter::{filter_by_confidence, DEFAULT_CONFIDENCE_THRESHOLD};
pub use priority::sort_by_priority;
pub use sanitize::{deduplicate, filter_out_of_frame};
pub use stabilize::stabilize;

use crate::detect::DetectedObject;

/// Run one frame's candidates through the full pipeline against the
/// previous tick's stabilized baseline.
pub fn run_frame(
    candidates: Vec<DetectedObject>,
    baseline: &[DetectedObject],
    confidence_threshold: f64,
) -> Vec<DetectedObject> {
    let kept = filter_by_confidence(candidates, confidence_threshold);
    let in_frame = filter_out_of_frame(kept);
    let unique = deduplicate(in_frame);
    stabilize(unique, baseline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    #[test]
    fn empty_in_empty_out() {
        assert!(run_frame(Vec::new(), &[], 0.75).is_empty());
    }

    #[test]
    fn stages_compose_in_order() {
        let baseline = vec![DetectedObject::new(
            "chair",
            0.6,
            BoundingBox::new(0.10, 0.10, 0.2, 0.2),
        )];
        let candidates = vec![
            // Survives everything and stabilizes against the baseline.
            DetectedObject::new("chair", 0.9, BoundingBox::new(0.11, 0.10, 0.2, 0.2)),
            // Duplicate of the first (same coarse cell), suppressed.
            DetectedObject::new("chair", 0.95, BoundingBox::new(0.12, 0.11, 0.2, 0.2)),
            // Below threshold.
            DetectedObject::new("cup", 0.4, BoundingBox::new(0.5, 0.5, 0.05, 0.05)),
            // Out of frame.
            DetectedObject::new("door", 0.9, BoundingBox::new(1.2, 0.5, 0.3, 0.3)),
        ];
        let out = run_frame(candidates, &baseline, 0.75);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "chair");
        // Blended confidence proves the survivor went through stabilize.
        assert!((out[0].confidence - (0.9 * 0.7 + 0.6 * 0.3)).abs() < 1e-12);
    }
}
