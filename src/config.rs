use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::types::Tuning;

// ── Command line ────────────────────────────────────────────────────────────

#[derive(Parser, Debug, Default)]
#[command(about = "Flap through the pipes, right in your terminal", version)]
pub struct Cli {
    /// TOML settings file. Defaults to `config.toml` in the data directory.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Run without sound.
    #[arg(long)]
    pub mute: bool,
    /// Seed for pipe placement, for repeatable runs.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Nominal frame length in milliseconds.
    #[arg(long)]
    pub frame_ms: Option<u64>,
    /// Log filter, e.g. `debug` or `flappy_term=trace`. Overrides RUST_LOG.
    #[arg(long)]
    pub log_level: Option<String>,
    /// Keep the high score in memory only.
    #[arg(long)]
    pub no_save: bool,
}

// ── Settings file ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub flap_velocity: f64,
    pub scroll_speed: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let tuning = Tuning::default();
        Self {
            gravity: tuning.gravity,
            flap_velocity: tuning.flap_velocity,
            scroll_speed: tuning.scroll_speed,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Nominal frame length; ~60 Hz by default.
    pub frame_ms: u64,
    pub spawn_interval_ms: u64,
    /// Scale each tick by the real frame time instead of assuming one frame.
    pub frame_compensation: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            spawn_interval_ms: 1500,
            frame_compensation: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub music_volume: f32,
    pub impact_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            music_volume: 0.5,
            impact_volume: 0.9,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub physics: PhysicsConfig,
    pub timing: TimingConfig,
    pub audio: AudioConfig,
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Explicit `--config` must load; the default file is optional.
    pub fn resolve(cli: &Cli, default_path: Option<&Path>) -> Result<Self> {
        let mut cfg = match (&cli.config, default_path) {
            (Some(path), _) => Self::load_from_file(path)?,
            (None, Some(path)) if path.exists() => Self::load_from_file(path)?,
            _ => Self::default(),
        };
        cfg.apply_cli(cli);
        Ok(cfg)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.mute {
            self.audio.enabled = false;
        }
        if let Some(ms) = cli.frame_ms {
            self.timing.frame_ms = ms;
        }
    }

    pub fn tuning(&self) -> Tuning {
        Tuning {
            gravity: self.physics.gravity,
            flap_velocity: self.physics.flap_velocity,
            scroll_speed: self.physics.scroll_speed,
        }
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.timing.frame_ms.max(1))
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.timing.spawn_interval_ms.max(1))
    }

    /// Suspicious but usable values, one message each.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.physics.gravity <= 0.0 {
            w.push(format!(
                "physics.gravity {} is not positive; the bird will never fall",
                self.physics.gravity
            ));
        }
        if self.physics.flap_velocity >= 0.0 {
            w.push(format!(
                "physics.flap_velocity {} is not negative; flapping won't lift the bird",
                self.physics.flap_velocity
            ));
        }
        if self.physics.scroll_speed <= 0.0 {
            w.push(format!(
                "physics.scroll_speed {} is not positive; pipes will never arrive",
                self.physics.scroll_speed
            ));
        }
        if self.timing.frame_ms == 0 {
            w.push("timing.frame_ms is 0; treated as 1".into());
        } else if self.timing.frame_ms > 100 {
            w.push(format!("timing.frame_ms {} is very slow (<10 fps)", self.timing.frame_ms));
        }
        if self.timing.spawn_interval_ms == 0 {
            w.push("timing.spawn_interval_ms is 0; treated as 1".into());
        }
        for (name, v) in [
            ("audio.music_volume", self.audio.music_volume),
            ("audio.impact_volume", self.audio.impact_volume),
        ] {
            if !(0.0..=1.0).contains(&v) {
                w.push(format!("{name} {v} outside 0.0..=1.0"));
            }
        }
        w
    }
}
