use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use stormscape_engine::SceneConfig;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/stormscape.toml";

/// Headless driver configuration: scene parameters plus run length.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    /// Scene dimensions and population ceilings.
    pub scene: SceneConfig,
    /// Master RNG seed.
    pub seed: u64,
    /// Number of frames to simulate.
    pub frames: u64,
    /// Fixed timestep per frame.
    pub dt: f32,
    /// Log a frame summary every N frames (0 disables).
    pub log_every: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            seed: 0,
            // 600 frames at 60 FPS pacing is ten seconds of scene time.
            frames: 600,
            dt: 1.0 / 60.0,
            log_every: 60,
        }
    }
}

impl SimConfig {
    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable. A malformed file is reported, not fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(err) => {
                    warn!(path = %path.display(), %err, "invalid config, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist the current configuration as TOML.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }
}
