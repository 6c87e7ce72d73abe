//! Audio feedback service.
//!
//! One `AudioFeedback` instance is constructed per session and handed to
//! consumers by reference; there is no process-wide audio state. The
//! service has an explicit `initialize`/`dispose` lifecycle, and every
//! scheduled cue is stamped with the lifecycle epoch so a cue queued before
//! `dispose` can never play into a later session.

mod sink;

pub use sink::{tone_frequency, AudioSink, LogSink, NullSink, ToneOptions};

use std::time::Instant;

use crate::config::AudioSettings;
use crate::detect::DetectedObject;
use crate::geometry::{intersection_over_union, is_nearby, BoundingBox, DistanceCategory};
use crate::pipeline::{filter_by_confidence, sort_by_priority};

/// Inter-object stagger applied to ranked cues.
const STAGGER_MS: u64 = 150;
/// Tone length for near objects; everything else gets the short cue.
const NEAR_TONE_MS: u64 = 400;
const TONE_MS: u64 = 200;
/// Identity rule for the announced ledger: the stabilizer's matching rule,
/// label equality plus IoU above this bound. One definition of "same
/// object" across stabilization and announcement dedup.
const ANNOUNCE_MATCH_IOU: f64 = 0.5;

#[derive(Clone, Debug)]
enum AudioCommand {
    Tone {
        label: String,
        distance: DistanceCategory,
        options: ToneOptions,
    },
    UrgentAlert,
}

struct ScheduledCommand {
    due: Instant,
    epoch: u64,
    command: AudioCommand,
}

/// A recently announced object: matching detections stay quiet until the
/// re-arm window elapses.
struct Announcement {
    label: String,
    bounding_box: BoundingBox,
    at: Instant,
}

pub struct AudioFeedback {
    sink: Box<dyn AudioSink>,
    settings: AudioSettings,
    confidence_threshold: f64,
    active: bool,
    muted: bool,
    epoch: u64,
    queue: Vec<ScheduledCommand>,
    announced: Vec<Announcement>,
    last_urgent: Option<Instant>,
}

impl AudioFeedback {
    pub fn new(sink: Box<dyn AudioSink>, settings: AudioSettings, confidence_threshold: f64) -> Self {
        Self {
            sink,
            settings,
            confidence_threshold,
            active: false,
            muted: false,
            epoch: 0,
            queue: Vec::new(),
            announced: Vec::new(),
            last_urgent: None,
        }
    }

    /// Bring the service up for a session. Idempotent.
    pub fn initialize(&mut self) {
        self.active = true;
    }

    /// Tear the service down: cancels every queued cue and invalidates the
    /// epoch so nothing scheduled earlier can play later.
    pub fn dispose(&mut self) {
        self.active = false;
        self.epoch += 1;
        self.queue.clear();
        self.announced.clear();
        self.last_urgent = None;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Speak immediately (not staggered, not deduplicated).
    pub fn speak(&mut self, text: &str, rate: f64, pitch: f64) {
        if self.active && !self.muted {
            self.sink.speak(text, rate, pitch);
        }
    }

    /// Schedule cues for a published detection set.
    ///
    /// Filters by confidence, ranks by priority, then schedules one tone
    /// per not-recently-announced object at `now + index * 150ms`. A single
    /// urgent alert fires when any object is inside the proximity threshold,
    /// itself rate-limited by the re-arm window.
    pub fn dispatch(&mut self, objects: &[DetectedObject], now: Instant) {
        if !self.active || self.muted || objects.is_empty() || !self.settings.enabled {
            return;
        }

        self.prune_announced(now);

        let confident = filter_by_confidence(objects.to_vec(), self.confidence_threshold);
        let ranked = sort_by_priority(&confident);

        let nearby = ranked
            .iter()
            .any(|o| is_nearby(o.bounding_box.width, o.bounding_box.height));
        if nearby && self.urgent_armed(now) {
            self.last_urgent = Some(now);
            self.queue.push(ScheduledCommand {
                due: now,
                epoch: self.epoch,
                command: AudioCommand::UrgentAlert,
            });
        }

        for (index, obj) in ranked.iter().enumerate() {
            if self.note_announced(obj, now) {
                continue;
            }
            let duration_ms = if obj.distance == DistanceCategory::Near {
                NEAR_TONE_MS
            } else {
                TONE_MS
            };
            self.queue.push(ScheduledCommand {
                due: now + std::time::Duration::from_millis(index as u64 * STAGGER_MS),
                epoch: self.epoch,
                command: AudioCommand::Tone {
                    label: obj.label.clone(),
                    distance: obj.distance,
                    options: ToneOptions {
                        duration_ms,
                        volume: obj.confidence,
                    },
                },
            });
        }
    }

    /// Deliver every due cue to the sink. Returns the number delivered.
    /// Cues stamped with a stale epoch are dropped, not played.
    pub fn pump(&mut self, now: Instant) -> usize {
        let epoch = self.epoch;
        let mut due: Vec<ScheduledCommand> = Vec::new();
        let mut pending: Vec<ScheduledCommand> = Vec::new();
        for cmd in self.queue.drain(..) {
            if cmd.epoch != epoch {
                continue;
            }
            if cmd.due <= now {
                due.push(cmd);
            } else {
                pending.push(cmd);
            }
        }
        self.queue = pending;

        due.sort_by_key(|cmd| cmd.due);
        let delivered = due.len();
        for cmd in due {
            match cmd.command {
                AudioCommand::Tone {
                    label,
                    distance,
                    options,
                } => self.sink.play_tone(&label, distance, &options),
                AudioCommand::UrgentAlert => self.sink.play_urgent_alert(),
            }
        }
        delivered
    }

    fn prune_announced(&mut self, now: Instant) {
        let rearm = self.settings.announce_rearm;
        self.announced
            .retain(|a| now.duration_since(a.at) < rearm);
    }

    /// Record `obj` in the announced ledger. Returns true when a live entry
    /// already matched, in which case the entry's box is refreshed (so a
    /// drifting object keeps suppressing itself) but its timestamp is not.
    fn note_announced(&mut self, obj: &DetectedObject, now: Instant) -> bool {
        for entry in &mut self.announced {
            if entry.label == obj.label
                && intersection_over_union(&entry.bounding_box, &obj.bounding_box)
                    > ANNOUNCE_MATCH_IOU
            {
                entry.bounding_box = obj.bounding_box;
                return true;
            }
        }
        self.announced.push(Announcement {
            label: obj.label.clone(),
            bounding_box: obj.bounding_box,
            at: now,
        });
        false
    }

    fn urgent_armed(&self, now: Instant) -> bool {
        match self.last_urgent {
            Some(at) => now.duration_since(at) >= self.settings.announce_rearm,
            None => true,
        }
    }
}
