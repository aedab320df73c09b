//! [`DeviceBackend`] implementation backed by the `xinput` utility.
//!
//! Every call spawns a short-lived `xinput` process:
//!
//! * discovery: `xinput list --name-only`
//! * read: `xinput list-props <device>`
//! * write: `xinput enable <device>` / `xinput disable <device>`
//!
//! Output parsing is kept in free functions so it can be tested without
//! an X server.

use crate::traits::DeviceBackend;
use log::debug;
use serde::{Deserialize, Serialize};
use std::process;

/// Settings for [`XinputBackend`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct XinputConfig {
    /// Executable to run.  A bare name is looked up on `$PATH`.
    pub program: String,
    /// Discovery picks the first input device whose name contains this,
    /// case-insensitively.
    pub keyword: String,
}

impl Default for XinputConfig {
    fn default() -> Self {
        Self {
            program: "xinput".into(),
            keyword: "touchpad".into(),
        }
    }
}

/// `xinput`-backed touchpad control.
pub struct XinputBackend {
    program: String,
    keyword: String,
}

/// Errors that can occur when talking to `xinput`.
#[derive(Debug, thiserror::Error)]
pub enum XinputError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: process::ExitStatus,
        stderr: String,
    },
    #[error("`{0}` printed non UTF-8 output")]
    Utf8(String),
    #[error("could not determine touchpad name: no input device matches {0:?}")]
    NoDevice(String),
    #[error("could not determine touchpad state: no \"Device Enabled\" property for {0:?}")]
    NoEnabledProperty(String),
}

impl Default for XinputBackend {
    fn default() -> Self {
        Self::from_config(&XinputConfig::default())
    }
}

impl XinputBackend {
    /// Create a backend running `program` and matching devices on `keyword`.
    pub fn new(program: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            keyword: keyword.into(),
        }
    }

    pub fn from_config(config: &XinputConfig) -> Self {
        Self::new(config.program.clone(), config.keyword.clone())
    }

    /// Run `program args…`, returning stdout on a zero exit status.
    fn run(&self, args: &[&str]) -> Result<String, XinputError> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("running {}", command);
        let output = process::Command::new(&self.program)
            .args(args)
            .stdin(process::Stdio::null())
            .output()
            .map_err(|source| XinputError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(XinputError::Failed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| XinputError::Utf8(command))
    }
}

//  Output parsing

/// Return the first line of `listing` that contains `keyword`,
/// case-insensitively.
///
/// Later matches are ignored: the first device listed wins.
pub fn find_device<'a>(listing: &'a str, keyword: &str) -> Option<&'a str> {
    let keyword = keyword.to_lowercase();
    listing
        .lines()
        .find(|line| line.to_lowercase().contains(&keyword))
}

/// Extract the "Device Enabled" flag from `xinput list-props` output.
///
/// The property line looks like `\tDevice Enabled (187):\t1`; the state is
/// whether its last character is `1`.
pub fn parse_enabled(props: &str) -> Option<bool> {
    props
        .lines()
        .find(|line| line.to_lowercase().contains("device enabled"))
        .map(|line| line.trim_end().ends_with('1'))
}

//  DeviceBackend implementation

impl DeviceBackend for XinputBackend {
    type Error = XinputError;

    fn discover(&self) -> Result<String, Self::Error> {
        let listing = self.run(&["list", "--name-only"])?;
        find_device(&listing, &self.keyword)
            .map(str::to_string)
            .ok_or_else(|| XinputError::NoDevice(self.keyword.clone()))
    }

    fn read_state(&self, device: &str) -> Result<bool, Self::Error> {
        let props = self.run(&["list-props", device])?;
        parse_enabled(&props).ok_or_else(|| XinputError::NoEnabledProperty(device.to_string()))
    }

    fn write_state(&self, device: &str, enabled: bool) -> Result<(), Self::Error> {
        let verb = if enabled { "enable" } else { "disable" };
        self.run(&[verb, device]).map(|_| ())
    }
}
