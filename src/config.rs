//! Configuration for the voicestar client
//!
//! Precedence, lowest to highest: built-in defaults, the optional
//! `~/.config/voicestar/config.toml` overlay, the `VOICESTAR_SERVER_URL`
//! environment variable, then an explicit override from the caller.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Default conversion service base URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Default upload size limit (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Voicestar client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Conversion service base URL
    pub server_url: String,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: u64,

    /// Advisory progress reporting policy
    pub progress: ProgressPolicy,
}

/// Policy for the advisory conversion progress bar
///
/// No real transfer telemetry is available from the service, so progress
/// advances on a fixed cadence toward a ceiling below 100 and snaps to 100
/// only when the remote call actually returns.
#[derive(Debug, Clone, Copy)]
pub struct ProgressPolicy {
    /// Interval between advisory progress increments
    pub tick: Duration,

    /// Progress added per tick
    pub step: u8,

    /// Highest value the advisory ticker may claim (must be below 100)
    pub ceiling: u8,

    /// Delay between snapping to 100 and revealing the result
    pub settle: Duration,
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(200),
            step: 10,
            ceiling: 90,
            settle: Duration::from_millis(500),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            progress: ProgressPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration, applying the file overlay, environment, and an
    /// optional explicit server URL override.
    #[must_use]
    pub fn load(server_url_override: Option<&str>) -> Self {
        let mut config = Self::default();
        let file = load_config_file();

        if let Some(url) = file.server_url {
            config.server_url = url;
        }
        if let Some(mb) = file.max_upload_mb {
            config.max_upload_bytes = mb * 1024 * 1024;
        }
        let progress = file.progress.unwrap_or_default();
        if let Some(ms) = progress.tick_ms {
            config.progress.tick = Duration::from_millis(ms);
        }
        if let Some(step) = progress.step {
            config.progress.step = step;
        }
        if let Some(ceiling) = progress.ceiling {
            config.progress.ceiling = ceiling.min(99);
        }
        if let Some(ms) = progress.settle_ms {
            config.progress.settle = Duration::from_millis(ms);
        }

        if let Ok(url) = std::env::var("VOICESTAR_SERVER_URL") {
            if !url.is_empty() {
                config.server_url = url;
            }
        }
        if let Some(url) = server_url_override {
            config.server_url = url.to_string();
        }

        config.server_url = config.server_url.trim_end_matches('/').to_string();
        config
    }
}

/// Top-level TOML configuration file schema
///
/// All fields are optional — the file is a partial overlay on top of defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    /// Conversion service base URL
    server_url: Option<String>,

    /// Upload size limit in MiB
    max_upload_mb: Option<u64>,

    /// Advisory progress settings
    #[serde(default)]
    progress: Option<ProgressFileConfig>,
}

/// Advisory progress section of the config file
#[derive(Debug, Default, Deserialize)]
struct ProgressFileConfig {
    tick_ms: Option<u64>,
    step: Option<u8>,
    ceiling: Option<u8>,
    settle_ms: Option<u64>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ConfigFile::default()` if the file doesn't exist or can't be parsed.
fn load_config_file() -> ConfigFile {
    let Some(path) = config_file_path() else {
        return ConfigFile::default();
    };

    if !path.exists() {
        return ConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/voicestar/config.toml`
fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("voicestar").join("config.toml"))
}
