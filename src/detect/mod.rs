mod mock;
mod object;
mod source;

pub use mock::MockDetectionSource;
pub use object::{ingest, DetectedObject, RawDetection, KNOWN_LABELS};
pub use source::DetectionSource;
