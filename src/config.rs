use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::pipeline::DEFAULT_CONFIDENCE_THRESHOLD;

const DEFAULT_TICK_PERIOD_MS: u64 = 300;
const DEFAULT_MIN_TICK_INTERVAL_MS: u64 = 200;
const DEFAULT_SPAWN_EVERY: u64 = 3;
const DEFAULT_ANNOUNCE_REARM_SECS: u64 = 3;
const DEFAULT_VOLUME: f64 = 0.5;

#[derive(Debug, Deserialize, Default)]
struct SoundsightConfigFile {
    detection: Option<DetectionConfigFile>,
    audio: Option<AudioConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectionConfigFile {
    tick_period_ms: Option<u64>,
    min_tick_interval_ms: Option<u64>,
    confidence_threshold: Option<f64>,
    spawn_every: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct AudioConfigFile {
    enabled: Option<bool>,
    volume: Option<f64>,
    announce_rearm_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct SoundsightConfig {
    pub detection: DetectionSettings,
    pub audio: AudioSettings,
}

#[derive(Debug, Clone)]
pub struct DetectionSettings {
    /// Nominal tick period for the driving timer.
    pub tick_period: Duration,
    /// Hard minimum between accepted ticks, independent of the timer.
    pub min_tick_interval: Duration,
    /// Quality-filter threshold. Passed through as given, never clamped.
    pub confidence_threshold: f64,
    /// Mock source spawns new candidates every N generations.
    pub spawn_every: u64,
}

#[derive(Debug, Clone)]
pub struct AudioSettings {
    pub enabled: bool,
    /// Master volume hint for sinks that honor one, in [0,1].
    pub volume: f64,
    /// Re-arm window before an already-announced object may re-announce.
    pub announce_rearm: Duration,
}

impl Default for SoundsightConfig {
    fn default() -> Self {
        Self {
            detection: DetectionSettings {
                tick_period: Duration::from_millis(DEFAULT_TICK_PERIOD_MS),
                min_tick_interval: Duration::from_millis(DEFAULT_MIN_TICK_INTERVAL_MS),
                confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
                spawn_every: DEFAULT_SPAWN_EVERY,
            },
            audio: AudioSettings {
                enabled: true,
                volume: DEFAULT_VOLUME,
                announce_rearm: Duration::from_secs(DEFAULT_ANNOUNCE_REARM_SECS),
            },
        }
    }
}

impl SoundsightConfig {
    /// Layered load: defaults, then the JSON file named by
    /// `SOUNDSIGHT_CONFIG` (if set), then `SOUNDSIGHT_*` env overrides,
    /// then validation.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("SOUNDSIGHT_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: SoundsightConfigFile) -> Self {
        let mut cfg = Self::default();
        if let Some(detection) = file.detection {
            if let Some(period) = detection.tick_period_ms {
                cfg.detection.tick_period = Duration::from_millis(period);
            }
            if let Some(min) = detection.min_tick_interval_ms {
                cfg.detection.min_tick_interval = Duration::from_millis(min);
            }
            if let Some(threshold) = detection.confidence_threshold {
                cfg.detection.confidence_threshold = threshold;
            }
            if let Some(spawn) = detection.spawn_every {
                cfg.detection.spawn_every = spawn;
            }
        }
        if let Some(audio) = file.audio {
            if let Some(enabled) = audio.enabled {
                cfg.audio.enabled = enabled;
            }
            if let Some(volume) = audio.volume {
                cfg.audio.volume = volume;
            }
            if let Some(rearm) = audio.announce_rearm_secs {
                cfg.audio.announce_rearm = Duration::from_secs(rearm);
            }
        }
        cfg
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(period) = std::env::var("SOUNDSIGHT_TICK_PERIOD_MS") {
            let ms: u64 = period
                .parse()
                .map_err(|_| anyhow!("SOUNDSIGHT_TICK_PERIOD_MS must be an integer of millis"))?;
            self.detection.tick_period = Duration::from_millis(ms);
        }
        if let Ok(min) = std::env::var("SOUNDSIGHT_MIN_INTERVAL_MS") {
            let ms: u64 = min
                .parse()
                .map_err(|_| anyhow!("SOUNDSIGHT_MIN_INTERVAL_MS must be an integer of millis"))?;
            self.detection.min_tick_interval = Duration::from_millis(ms);
        }
        if let Ok(threshold) = std::env::var("SOUNDSIGHT_CONFIDENCE_THRESHOLD") {
            let value: f64 = threshold
                .parse()
                .map_err(|_| anyhow!("SOUNDSIGHT_CONFIDENCE_THRESHOLD must be a number"))?;
            self.detection.confidence_threshold = value;
        }
        if let Ok(volume) = std::env::var("SOUNDSIGHT_VOLUME") {
            let value: f64 = volume
                .parse()
                .map_err(|_| anyhow!("SOUNDSIGHT_VOLUME must be a number"))?;
            self.audio.volume = value;
        }
        if let Ok(enabled) = std::env::var("SOUNDSIGHT_AUDIO") {
            match enabled.trim() {
                "1" | "true" | "on" => self.audio.enabled = true,
                "0" | "false" | "off" => self.audio.enabled = false,
                other => return Err(anyhow!("SOUNDSIGHT_AUDIO must be a boolean, got '{other}'")),
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.detection.tick_period.is_zero() {
            return Err(anyhow!("tick period must be greater than zero"));
        }
        if self.detection.min_tick_interval.is_zero() {
            return Err(anyhow!("minimum tick interval must be greater than zero"));
        }
        if self.detection.spawn_every == 0 {
            return Err(anyhow!("spawn_every must be greater than zero"));
        }
        if !self.detection.confidence_threshold.is_finite() {
            return Err(anyhow!("confidence threshold must be finite"));
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(anyhow!("volume must be within [0, 1]"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<SoundsightConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
