//! Configuration types for emacs-custom
//!
//! Defines:
//! - `Settings` - Top-level config file contents
//! - `EmacsSettings` - How to invoke Emacs

use serde::{Deserialize, Serialize};

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub emacs: EmacsSettings,
}

/// `[emacs]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmacsSettings {
    /// Executable name or path
    #[serde(default = "default_program")]
    pub program: String,

    /// Profile passed to `--user`; defaults to the current OS user
    #[serde(default)]
    pub user: Option<String>,

    /// Extra arguments inserted before `--eval`
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Per-process timeout in seconds; unset waits indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for EmacsSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            user: None,
            extra_args: Vec::new(),
            timeout_secs: None,
        }
    }
}

fn default_program() -> String {
    "emacs".to_string()
}

/// Values given on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub program: Option<String>,
    pub user: Option<String>,
    pub timeout_secs: Option<u64>,
}
