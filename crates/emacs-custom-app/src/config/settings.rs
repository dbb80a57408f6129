//! Settings loading for `config.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use emacs_custom_batch::BatchConfig;
use emacs_custom_core::prelude::*;

use super::types::{Settings, SettingsOverrides};

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "emacs-custom";

/// Environment variables consulted, in order, for the OS user name
const USER_ENV_VARS: &[&str] = &["USER", "LOGNAME"];

// ─────────────────────────────────────────────────────────────────────────────
// Settings Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Default location: `~/.config/emacs-custom/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load settings leniently.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Load settings from a file the user named explicitly; problems are errors.
pub fn load_settings_strict(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        return Err(Error::ConfigNotFound {
            path: config_path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(config_path)
        .map_err(|e| Error::config(format!("Failed to read {:?}: {}", config_path, e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {:?}: {}", config_path, e)))
}

impl Settings {
    /// Apply command-line overrides on top of file settings
    pub fn merge_overrides(&mut self, overrides: SettingsOverrides) {
        if let Some(program) = overrides.program {
            self.emacs.program = program;
        }
        if let Some(user) = overrides.user {
            self.emacs.user = Some(user);
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.emacs.timeout_secs = Some(timeout);
        }
    }

    /// Build the process configuration for a resolved executable and user
    pub fn batch_config(
        &self,
        program: impl Into<PathBuf>,
        user: impl Into<String>,
    ) -> BatchConfig {
        BatchConfig::new(program, user)
            .with_extra_args(self.emacs.extra_args.clone())
            .with_timeout(self.emacs.timeout_secs.map(Duration::from_secs))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Pick the Emacs profile user: explicit setting, else the OS user.
pub fn resolve_user(configured: Option<&str>) -> Result<String> {
    if let Some(user) = configured.map(str::trim).filter(|u| !u.is_empty()) {
        return Ok(user.to_string());
    }

    USER_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|u| u.trim().to_string())
        .find(|u| !u.is_empty())
        .ok_or_else(|| {
            Error::config("Could not determine the current user; set [emacs] user or pass --user")
        })
}
