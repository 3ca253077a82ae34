//! Configuration management
//!
//! Persistent speech defaults loaded from `~/.ttsbridge.cfg`. Everything is
//! optional; a missing or malformed entry falls back to the built-in
//! default so a bad config file can never take speech down.

use crate::{BridgeError, Result};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Speech configuration
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.ttsbridge.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from disk or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(path)
                .map_err(|e| BridgeError::Config(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(path)
                .map_err(|e| BridgeError::Config(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self {
            ini,
            path: path.to_path_buf(),
        })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| BridgeError::Config(format!("Failed to save config: {}", e)))
    }

    /// Get config file path (~/.ttsbridge.cfg)
    fn config_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".ttsbridge.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"))
            .set("rate", "1.0")
            .set("pitch", "1.0")
            .set("volume", "1.0")
            .set("pan", "0.0")
            .set("engine", "");

        ini.with_section(Some("timeouts"))
            .set("init_secs", "10")
            .set("synthesis_secs", "10");

        ini
    }

    /// Get a float value from config
    fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get an optional float value from config
    fn get_opt_float(&self, section: &str, key: &str) -> Option<f32> {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    // Speech-specific configuration getters

    /// Speech rate multiplier (1.0 is normal)
    pub fn rate(&self) -> Option<f32> {
        self.get_opt_float("speech", "rate").filter(|r| *r > 0.0)
    }

    /// Voice pitch multiplier (1.0 is normal)
    pub fn pitch(&self) -> Option<f32> {
        self.get_opt_float("speech", "pitch").filter(|p| *p > 0.0)
    }

    /// Playback volume (0.0-1.0)
    pub fn volume(&self) -> Option<f32> {
        self.get_opt_float("speech", "volume")
            .filter(|v| (0.0..=1.0).contains(v))
    }

    /// Stereo pan (-1.0 left to 1.0 right)
    pub fn pan(&self) -> Option<f32> {
        self.get_opt_float("speech", "pan")
            .filter(|p| (-1.0..=1.0).contains(p))
    }

    /// Specific engine package to connect to
    pub fn engine(&self) -> Option<String> {
        self.ini
            .get_from(Some("speech"), "engine")
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Bound on the engine initialization handshake
    pub fn init_timeout(&self) -> Duration {
        let secs = self.get_float("timeouts", "init_secs", 10.0);
        Duration::from_secs_f32(secs.max(0.1))
    }

    /// Bound on one raw-audio synthesis request
    pub fn synthesis_timeout(&self) -> Duration {
        let secs = self.get_float("timeouts", "synthesis_secs", 10.0);
        Duration::from_secs_f32(secs.max(0.1))
    }
}
