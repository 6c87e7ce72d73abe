//! Detection-cycle orchestrator.
//!
//! `DetectionSession` is the single owner of all per-session state: the
//! persisted object list, the generation counter, and the last accepted
//! tick time. Nothing else mutates them. The session is driven by one
//! periodic caller (the daemon loop, or a test); overlapping ticks are
//! structurally impossible and the minimum-interval guard additionally
//! discards a timer that fires too fast.

use std::time::Instant;

use crate::config::DetectionSettings;
use crate::detect::{ingest, DetectedObject, DetectionSource};
use crate::pipeline::run_frame;

/// Camera/permission acquisition boundary.
///
/// The only part of the detection cycle with an external failure mode.
/// Failures are surfaced by the session as a flag plus a human-readable
/// message; they never propagate as errors to tick callers.
pub trait CameraAccess: Send {
    fn request_permission(&mut self) -> anyhow::Result<()>;
}

/// Test/demo camera that grants or denies unconditionally.
pub struct StubCamera {
    pub grant: bool,
}

impl CameraAccess for StubCamera {
    fn request_permission(&mut self) -> anyhow::Result<()> {
        if self.grant {
            Ok(())
        } else {
            anyhow::bail!("camera access denied")
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// Detection is running; per-session state was reset.
    Started,
    /// No permission yet: acquisition was attempted instead of starting.
    PermissionRequested,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session is not running; nothing happened.
    Idle,
    /// The driving timer fired before the minimum interval elapsed.
    Throttled,
    /// A full pipeline pass ran and the published set was replaced.
    Processed { published: usize },
}

pub struct DetectionSession {
    settings: DetectionSettings,
    source: Box<dyn DetectionSource>,
    camera: Box<dyn CameraAccess>,

    state: SessionState,
    persisted_objects: Vec<DetectedObject>,
    generation_count: u64,
    last_tick: Option<Instant>,

    has_permission: Option<bool>,
    camera_ready: bool,
    error: Option<String>,
}

impl DetectionSession {
    pub fn new(
        settings: DetectionSettings,
        source: Box<dyn DetectionSource>,
        camera: Box<dyn CameraAccess>,
    ) -> Self {
        Self {
            settings,
            source,
            camera,
            state: SessionState::Idle,
            persisted_objects: Vec::new(),
            generation_count: 0,
            last_tick: None,
            has_permission: None,
            camera_ready: false,
            error: None,
        }
    }

    /// Acquire camera permission. Returns whether permission is held; the
    /// failure message, if any, is retained in `error()`.
    pub fn request_permission(&mut self) -> bool {
        match self.camera.request_permission() {
            Ok(()) => {
                self.has_permission = Some(true);
                self.camera_ready = true;
                self.error = None;
                true
            }
            Err(e) => {
                log::warn!("camera permission request failed: {e}");
                self.has_permission = Some(false);
                self.camera_ready = false;
                self.error = Some(format!("Camera access denied: {e}"));
                false
            }
        }
    }

    /// Begin a detection cycle.
    ///
    /// Without permission this delegates to acquisition and does not start;
    /// a subsequent `start` after a successful grant will. With permission
    /// it resets all per-session state and enters `Running`.
    pub fn start(&mut self) -> StartOutcome {
        if self.has_permission != Some(true) {
            self.request_permission();
            return StartOutcome::PermissionRequested;
        }

        self.persisted_objects.clear();
        self.generation_count = 0;
        self.last_tick = None;
        self.state = SessionState::Running;
        log::info!(
            "detection started: source={} period={:?} min_interval={:?}",
            self.source.name(),
            self.settings.tick_period,
            self.settings.min_tick_interval
        );
        StartOutcome::Started
    }

    /// Halt the cycle and publish an empty set. Always returns to `Idle`.
    pub fn stop(&mut self) {
        if self.state == SessionState::Running {
            log::info!(
                "detection stopped after {} generations",
                self.generation_count
            );
        }
        self.state = SessionState::Idle;
        self.persisted_objects.clear();
    }

    /// Run one tick at the wall clock.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick_at(Instant::now())
    }

    /// Run one tick at an explicit instant (tests drive this directly).
    ///
    /// A tick is pure data transformation and cannot fail: malformed
    /// detector records are dropped at ingestion, empty input flows through
    /// every stage as empty output.
    pub fn tick_at(&mut self, now: Instant) -> TickOutcome {
        if self.state != SessionState::Running {
            return TickOutcome::Idle;
        }
        if let Some(last) = self.last_tick {
            if now.duration_since(last) < self.settings.min_tick_interval {
                return TickOutcome::Throttled;
            }
        }
        self.last_tick = Some(now);
        self.generation_count += 1;

        let raw = self
            .source
            .poll(&self.persisted_objects, self.generation_count);
        let candidates = ingest(&raw);
        self.persisted_objects = run_frame(
            candidates,
            &self.persisted_objects,
            self.settings.confidence_threshold,
        );

        log::debug!(
            "generation {}: published {} objects",
            self.generation_count,
            self.persisted_objects.len()
        );
        TickOutcome::Processed {
            published: self.persisted_objects.len(),
        }
    }

    /// The published detection set. Read-only; overlay/audio consumers
    /// borrow it between ticks.
    pub fn detected_objects(&self) -> &[DetectedObject] {
        &self.persisted_objects
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_detecting(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn generation_count(&self) -> u64 {
        self.generation_count
    }

    pub fn has_permission(&self) -> Option<bool> {
        self.has_permission
    }

    pub fn is_camera_ready(&self) -> bool {
        self.camera_ready
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn settings(&self) -> &DetectionSettings {
        &self.settings
    }
}
