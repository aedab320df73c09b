//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/padstat/config.json`
//! (or a path passed with `--config <path>`).  The top-level schema is split
//! into sections so the file can grow without breaking older configs.
//!
//! # Example
//!
//! ```json
//! {
//!   "touchpad": {
//!     "device_id": null,
//!     "format": "TP {state}",
//!     "enabled_char": "[on]",
//!     "disabled_char": "[off]",
//!     "update_interval": 10,
//!     "callbacks": { "Button1": "Toggle", "Button3": "Refresh" }
//!   },
//!   "xinput": { "program": "xinput", "keyword": "touchpad" },
//!   "socket_path": "/run/user/1000/padstat.sock"
//! }
//! ```

use crate::command::Callbacks;
use crate::format::Template;
use crate::xinput::backend::XinputConfig;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration.
///
/// Every field is optional — a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Widget appearance and behaviour.
    #[serde(default)]
    pub touchpad: WidgetConfig,

    /// Settings for the default `xinput` backend.
    #[serde(default)]
    pub xinput: XinputConfig,

    /// Command socket path.  `None` means [`default_socket_path`].
    #[serde(default)]
    pub socket_path: Option<PathBuf>,
}

/// Static widget configuration, read-only once the widget is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Touchpad name or id.  When `None` the widget discovers it on
    /// configure.
    pub device_id: Option<String>,
    /// Displayed text format; `{state}` is replaced by one of the two
    /// state strings below.
    pub format: Template,
    /// Shown when the touchpad is enabled.
    pub enabled_char: String,
    /// Shown when the touchpad is disabled.
    pub disabled_char: String,
    /// Seconds between status updates.  The status is also refreshed right
    /// after every toggle.
    pub update_interval: u64,
    /// Which command a click on the widget runs.
    pub callbacks: Callbacks,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            device_id: None,
            format: Template::default(),
            enabled_char: "[👆]".into(),
            disabled_char: "[🚫]".into(),
            update_interval: 10,
            callbacks: Callbacks::default(),
        }
    }
}

impl WidgetConfig {
    /// The refresh interval as a [`Duration`], never shorter than a second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.update_interval.max(1))
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::Missing(path.display().to_string()),
            _ => ConfigError::Read(format!("{}: {}", path.display(), e)),
        })?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Load `path`, falling back to compiled-in defaults.
    ///
    /// A missing file is normal and only logged at `info`.  An unreadable
    /// or invalid file is logged as an error, since the user's settings are
    /// being ignored.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(cfg) => {
                info!("loaded config from {}", path.display());
                cfg
            }
            Err(e @ ConfigError::Missing(_)) => {
                info!("{}, using defaults", e);
                Self::default()
            }
            Err(e) => {
                error!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// The socket the daemon listens on and `padstat-ctl` writes to.
    pub fn socket_path(&self) -> PathBuf {
        self.socket_path.clone().unwrap_or_else(default_socket_path)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config file at {0}")]
    Missing(String),
    #[error("config error: failed to read {0}")]
    Read(String),
    #[error("config error: failed to parse {0}")]
    Invalid(String),
}

/// Default socket path for the command listener.
pub fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(runtime).join("padstat.sock")
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/padstat`).
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("padstat")
}

/// Default location of `config.json`.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.json")
}
