//! demo - fixed-length synthetic detection run
//!
//! Runs the full pipeline for a number of ticks with a seeded mock source
//! and prints each tick's ranked object set, plus the audio cues a sink
//! would receive. Useful for eyeballing stabilizer and ranker behavior
//! without a camera or synthesis engine.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;

use soundsight::{
    estimate_distance_meters, sort_by_priority, AudioFeedback, DetectedObject, DetectionSession,
    MockDetectionSource, NullSink, SoundsightConfig, StartOutcome, StubCamera, TickOutcome,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of detection ticks to run.
    #[arg(long, default_value_t = 10)]
    ticks: u64,
    /// Deterministic seed for the mock source.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Emit one JSON document per tick instead of text lines.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct TickReport<'a> {
    generation: u64,
    objects: &'a [DetectedObject],
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    if args.ticks == 0 {
        return Err(anyhow!("ticks must be >= 1"));
    }

    let cfg = SoundsightConfig::load()?;
    let source = MockDetectionSource::with_seed(cfg.detection.spawn_every, args.seed);
    let mut session = DetectionSession::new(
        cfg.detection.clone(),
        Box::new(source),
        Box::new(StubCamera { grant: true }),
    );
    let mut audio = AudioFeedback::new(
        Box::new(NullSink),
        cfg.audio.clone(),
        cfg.detection.confidence_threshold,
    );
    audio.initialize();

    session.request_permission();
    if session.start() != StartOutcome::Started {
        return Err(anyhow!("could not start demo session"));
    }

    // Accelerated clock: each simulated tick advances by the nominal period
    // without sleeping.
    let mut now = Instant::now();
    for _ in 0..args.ticks {
        let outcome = session.tick_at(now);
        if matches!(outcome, TickOutcome::Processed { .. }) {
            let ranked = sort_by_priority(session.detected_objects());
            if args.json {
                let report = TickReport {
                    generation: session.generation_count(),
                    objects: &ranked,
                };
                println!("{}", serde_json::to_string(&report)?);
            } else {
                print_tick(session.generation_count(), &ranked);
            }
            audio.dispatch(&ranked, now);
            audio.pump(now + Duration::from_secs(5));
        }
        now += cfg.detection.tick_period;
    }

    session.stop();
    audio.dispose();
    Ok(())
}

fn print_tick(generation: u64, ranked: &[DetectedObject]) {
    println!("--- generation {generation} ({} objects)", ranked.len());
    for (index, obj) in ranked.iter().enumerate() {
        println!(
            "  {:>2}. {:<8} {:<6} conf={:.2} ~{:.1}m box=({:.2},{:.2} {:.2}x{:.2})",
            index + 1,
            obj.label,
            obj.distance.to_string(),
            obj.confidence,
            estimate_distance_meters(obj.bounding_box.width, obj.bounding_box.height),
            obj.bounding_box.x,
            obj.bounding_box.y,
            obj.bounding_box.width,
            obj.bounding_box.height,
        );
    }
}
