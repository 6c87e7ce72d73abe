//! Detection source trait.
//!
//! The pipeline is agnostic to where raw detections come from: a real
//! on-device model, a remote inference service, or the mock generator used
//! for development. A source is polled once per accepted tick and returns
//! unvalidated `RawDetection` records; everything done to that list
//! afterwards belongs to the pipeline.

use crate::detect::object::{DetectedObject, RawDetection};

pub trait DetectionSource: Send {
    /// Source identifier, for logs.
    fn name(&self) -> &'static str;

    /// Produce this tick's candidate detections.
    ///
    /// `baseline` is the previous tick's stabilized set. A real detector
    /// ignores it (its own frame-to-frame output already reflects motion);
    /// the mock generator uses it to simulate movement. `generation` is the
    /// session's tick counter, used by sources that inject candidates on a
    /// sparse cadence.
    fn poll(&mut self, baseline: &[DetectedObject], generation: u64) -> Vec<RawDetection>;
}
