//! soundsightd - Soundsight detection daemon
//!
//! Drives the detection cycle against the mock source and narrates audio
//! cues to the log:
//! 1. Loads layered config (defaults, SOUNDSIGHT_CONFIG file, env)
//! 2. Acquires camera permission and starts a detection session
//! 3. Ticks the pipeline on the configured period until Ctrl-C
//! 4. Dispatches ranked, deduplicated audio cues after every tick

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use clap::Parser;

use soundsight::{
    AudioFeedback, DetectionSession, LogSink, MockDetectionSource, SoundsightConfig, StartOutcome,
    StubCamera, TickOutcome,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Deterministic seed for the mock detection source.
    #[arg(long)]
    seed: Option<u64>,
    /// Start muted (pipeline runs, no audio cues).
    #[arg(long, default_value_t = false)]
    muted: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = SoundsightConfig::load()?;

    let source = match args.seed {
        Some(seed) => MockDetectionSource::with_seed(cfg.detection.spawn_every, seed),
        None => MockDetectionSource::new(cfg.detection.spawn_every),
    };
    let mut session = DetectionSession::new(
        cfg.detection.clone(),
        Box::new(source),
        Box::new(StubCamera { grant: true }),
    );
    let mut audio = AudioFeedback::new(
        Box::new(LogSink::new(cfg.audio.volume)),
        cfg.audio.clone(),
        cfg.detection.confidence_threshold,
    );
    audio.initialize();
    audio.set_muted(args.muted || !cfg.audio.enabled);

    session.request_permission();
    if session.start() != StartOutcome::Started {
        return Err(anyhow!(
            "could not start detection: {}",
            session.error().unwrap_or("permission unavailable")
        ));
    }

    let running = Arc::new(AtomicBool::new(true));
    let running_flag = running.clone();
    ctrlc::set_handler(move || {
        running_flag.store(false, Ordering::SeqCst);
    })?;

    log::info!(
        "soundsightd running: period={:?} threshold={}",
        cfg.detection.tick_period,
        cfg.detection.confidence_threshold
    );

    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if let TickOutcome::Processed { published } = session.tick_at(now) {
            if published > 0 {
                audio.dispatch(session.detected_objects(), now);
            }
        }
        audio.pump(Instant::now());
        std::thread::sleep(cfg.detection.tick_period);
    }

    session.stop();
    audio.dispose();
    log::info!("soundsightd stopped");
    Ok(())
}
