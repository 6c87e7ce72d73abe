//! Soundsight core.
//!
//! Converts a noisy stream of per-frame object detections into stable,
//! prioritized, deduplicated audio feedback for visually impaired users.
//! Per-frame candidates appear, disappear, jitter, and duplicate; this
//! crate owns everything done to that raw list before it reaches the audio
//! layer:
//!
//! 1. Typed ingestion ([`detect::RawDetection`] -> [`detect::DetectedObject`])
//! 2. Quality filter (confidence thresholding)
//! 3. Frame sanitizer (out-of-frame culling, duplicate suppression)
//! 4. Stabilizer (cross-frame IoU matching + exponential smoothing)
//! 5. Priority ranking and staggered audio dispatch
//!
//! The detector itself is out of scope: [`detect::DetectionSource`] is the
//! input boundary, and the shipped [`detect::MockDetectionSource`] stands in
//! for a real model. [`audio::AudioSink`] is the output boundary; tone and
//! speech synthesis live behind it. [`session::DetectionSession`] owns the
//! per-session state and drives one pipeline pass per tick.

pub mod audio;
pub mod config;
pub mod detect;
pub mod geometry;
pub mod pipeline;
pub mod session;

pub use audio::{AudioFeedback, AudioSink, LogSink, NullSink, ToneOptions};
pub use config::{AudioSettings, DetectionSettings, SoundsightConfig};
pub use detect::{DetectedObject, DetectionSource, MockDetectionSource, RawDetection};
pub use geometry::{
    classify_distance, estimate_distance_meters, intersection_over_union, is_nearby, BoundingBox,
    DistanceCategory,
};
pub use pipeline::{
    deduplicate, filter_by_confidence, filter_out_of_frame, sort_by_priority, stabilize,
};
pub use session::{
    CameraAccess, DetectionSession, SessionState, StartOutcome, StubCamera, TickOutcome,
};
