//! Quality filter: confidence thresholding.

use crate::detect::DetectedObject;

/// Default minimum confidence a detection needs to survive filtering.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.75;

/// Retain objects whose confidence meets `threshold`.
///
/// The threshold is applied exactly as given: a threshold above 1.0 empties
/// the list, a threshold of 0.0 (or below) keeps everything. Out-of-range
/// values are the caller's choice, never silently clamped here.
pub fn filter_by_confidence(objects: Vec<DetectedObject>, threshold: f64) -> Vec<DetectedObject> {
    objects
        .into_iter()
        .filter(|obj| obj.confidence >= threshold)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    fn object(confidence: f64) -> DetectedObject {
        DetectedObject::new("chair", confidence, BoundingBox::new(0.1, 0.1, 0.2, 0.2))
    }

    fn sample() -> Vec<DetectedObject> {
        vec![object(0.5), object(0.75), object(0.9), object(1.0)]
    }

    #[test]
    fn threshold_is_inclusive() {
        let kept = filter_by_confidence(sample(), 0.75);
        assert_eq!(kept.len(), 3);
        assert!(kept.iter().all(|o| o.confidence >= 0.75));
    }

    #[test]
    fn raising_threshold_never_grows_the_set() {
        let mut last = usize::MAX;
        for threshold in [0.0, 0.5, 0.75, 0.9, 1.0, 1.1] {
            let kept = filter_by_confidence(sample(), threshold).len();
            assert!(kept <= last);
            last = kept;
        }
    }

    #[test]
    fn extreme_thresholds() {
        assert_eq!(filter_by_confidence(sample(), 1.1).len(), 0);
        assert_eq!(filter_by_confidence(sample(), 0.0).len(), 4);
        assert!(filter_by_confidence(Vec::new(), 0.75).is_empty());
    }
}
