//! Mock detection generator.
//!
//! Stands in for a real object-detection model during development: persisted
//! objects drift a little every tick, new candidates spawn on a sparse
//! cadence, and a random fraction of candidates drops out to simulate
//! detector flakiness. The output is deliberately noisy; making it coherent
//! is the pipeline's job, not the generator's.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::detect::object::{DetectedObject, RawDetection};
use crate::detect::source::DetectionSource;
use crate::geometry::BoundingBox;

/// Per-tick probability that any given candidate survives dropout.
const DETECTION_KEEP_CHANCE: f64 = 0.9;
/// Positional jitter amplitude per tick (uniform in +/- half of this).
const JITTER_SPAN: f64 = 0.02;
/// Maximum number of candidates spawned on a spawn tick.
const MAX_SPAWNS_PER_TICK: u64 = 2;

/// Spawn-table entry for one label in the vocabulary.
struct ObjectDefinition {
    label: &'static str,
    size_range: (f64, f64),
    confidence_range: (f64, f64),
    spawn_chance: f64,
}

const OBJECT_DEFINITIONS: [ObjectDefinition; 9] = [
    ObjectDefinition {
        label: "person",
        size_range: (0.1, 0.4),
        confidence_range: (0.85, 0.98),
        spawn_chance: 0.6,
    },
    ObjectDefinition {
        label: "chair",
        size_range: (0.05, 0.2),
        confidence_range: (0.82, 0.95),
        spawn_chance: 0.4,
    },
    ObjectDefinition {
        label: "table",
        size_range: (0.1, 0.3),
        confidence_range: (0.8, 0.95),
        spawn_chance: 0.3,
    },
    ObjectDefinition {
        label: "cup",
        size_range: (0.02, 0.08),
        confidence_range: (0.75, 0.92),
        spawn_chance: 0.2,
    },
    ObjectDefinition {
        label: "book",
        size_range: (0.02, 0.1),
        confidence_range: (0.78, 0.94),
        spawn_chance: 0.2,
    },
    ObjectDefinition {
        label: "phone",
        size_range: (0.01, 0.06),
        confidence_range: (0.8, 0.96),
        spawn_chance: 0.2,
    },
    ObjectDefinition {
        label: "laptop",
        size_range: (0.08, 0.25),
        confidence_range: (0.85, 0.97),
        spawn_chance: 0.3,
    },
    ObjectDefinition {
        label: "door",
        size_range: (0.15, 0.4),
        confidence_range: (0.82, 0.96),
        spawn_chance: 0.3,
    },
    ObjectDefinition {
        label: "window",
        size_range: (0.1, 0.35),
        confidence_range: (0.8, 0.95),
        spawn_chance: 0.3,
    },
];

pub struct MockDetectionSource {
    rng: StdRng,
    /// Spawn new candidates every N generations.
    spawn_every: u64,
}

impl MockDetectionSource {
    pub fn new(spawn_every: u64) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            spawn_every: spawn_every.max(1),
        }
    }

    /// Deterministic variant for tests and reproducible demo runs.
    pub fn with_seed(spawn_every: u64, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            spawn_every: spawn_every.max(1),
        }
    }

    /// Drift every baseline object by a small independent jitter, keeping
    /// the box inside the frame.
    fn simulate_movement(&mut self, baseline: &[DetectedObject]) -> Vec<RawDetection> {
        baseline
            .iter()
            .map(|obj| {
                let dx = (self.rng.gen::<f64>() - 0.5) * JITTER_SPAN;
                let dy = (self.rng.gen::<f64>() - 0.5) * JITTER_SPAN;
                let bbox = &obj.bounding_box;
                let moved = BoundingBox::new(
                    (bbox.x + dx).max(0.0).min(1.0 - bbox.width),
                    (bbox.y + dy).max(0.0).min(1.0 - bbox.height),
                    bbox.width,
                    bbox.height,
                );
                RawDetection::new(&obj.label, obj.confidence, moved)
            })
            .collect()
    }

    fn generate_new_objects(&mut self, count: u64) -> Vec<RawDetection> {
        let mut spawned = Vec::new();
        for _ in 0..count {
            let eligible: Vec<&ObjectDefinition> = OBJECT_DEFINITIONS
                .iter()
                .filter(|def| self.rng.gen::<f64>() < def.spawn_chance)
                .collect();
            if eligible.is_empty() {
                continue;
            }
            let def = eligible[self.rng.gen_range(0..eligible.len())];

            let (min_size, max_size) = def.size_range;
            let width_span = max_size - min_size;
            let height_span = width_span * (0.8 + self.rng.gen::<f64>() * 0.4);
            let width = min_size + self.rng.gen::<f64>() * width_span;
            let height = min_size + self.rng.gen::<f64>() * height_span;

            let x = self.rng.gen::<f64>() * (0.9 - width);
            let y = self.rng.gen::<f64>() * (0.9 - height);

            let (min_conf, max_conf) = def.confidence_range;
            let confidence = min_conf + self.rng.gen::<f64>() * (max_conf - min_conf);

            spawned.push(RawDetection::new(
                def.label,
                confidence,
                BoundingBox::new(x, y, width, height),
            ));
        }
        spawned
    }
}

impl DetectionSource for MockDetectionSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn poll(&mut self, baseline: &[DetectedObject], generation: u64) -> Vec<RawDetection> {
        let mut candidates = self.simulate_movement(baseline);

        if generation % self.spawn_every == 0 {
            let count = self.rng.gen_range(0..=MAX_SPAWNS_PER_TICK);
            candidates.extend(self.generate_new_objects(count));
        }

        // Detector flakiness: drop a random fraction of candidates.
        candidates.retain(|_| self.rng.gen::<f64>() < DETECTION_KEEP_CHANCE);
        candidates
    }
}
