//! Audio output sinks.
//!
//! Synthesis itself is out of scope for this crate: a sink is the contract
//! boundary to whatever tone/speech engine the platform provides. The
//! shipped implementations log or discard; tests substitute a recording
//! sink.

use crate::geometry::DistanceCategory;

/// Per-tone playback parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneOptions {
    pub duration_ms: u64,
    /// Tone volume in [0,1]; by convention the detection confidence.
    pub volume: f64,
}

pub trait AudioSink: Send {
    /// Play a short tone cue for one detected object.
    fn play_tone(&mut self, label: &str, distance: DistanceCategory, options: &ToneOptions);

    /// Speak free-form text.
    fn speak(&mut self, text: &str, rate: f64, pitch: f64);

    /// Distinct urgent cue for an object within the proximity threshold.
    fn play_urgent_alert(&mut self);
}

/// Frequency in Hz a synthesis engine would use for a label/distance pair.
/// Nearer objects get higher octaves of the same pitch family.
pub fn tone_frequency(label: &str, distance: DistanceCategory) -> u32 {
    match distance {
        DistanceCategory::Near => match label {
            "person" => 660,
            "door" => 587,
            "chair" => 523,
            _ => 880,
        },
        DistanceCategory::Medium => match label {
            "person" => 330,
            "door" => 293,
            "chair" => 261,
            _ => 440,
        },
        DistanceCategory::Far => match label {
            "person" => 165,
            "door" => 146,
            "chair" => 130,
            _ => 220,
        },
    }
}

/// Sink that narrates every cue to the log. Used by the daemon, where no
/// real synthesis engine is attached.
pub struct LogSink {
    /// Master volume applied on top of per-tone volume.
    master_volume: f64,
}

impl LogSink {
    pub fn new(master_volume: f64) -> Self {
        Self { master_volume }
    }
}

impl AudioSink for LogSink {
    fn play_tone(&mut self, label: &str, distance: DistanceCategory, options: &ToneOptions) {
        log::info!(
            "tone {}hz label={} distance={} duration={}ms volume={:.2}",
            tone_frequency(label, distance),
            label,
            distance,
            options.duration_ms,
            options.volume * self.master_volume,
        );
    }

    fn speak(&mut self, text: &str, rate: f64, pitch: f64) {
        log::info!("speak \"{}\" rate={} pitch={}", text, rate, pitch);
    }

    fn play_urgent_alert(&mut self) {
        log::warn!("urgent proximity alert");
    }
}

/// Sink that discards everything.
pub struct NullSink;

impl AudioSink for NullSink {
    fn play_tone(&mut self, _label: &str, _distance: DistanceCategory, _options: &ToneOptions) {}
    fn speak(&mut self, _text: &str, _rate: f64, _pitch: f64) {}
    fn play_urgent_alert(&mut self) {}
}
