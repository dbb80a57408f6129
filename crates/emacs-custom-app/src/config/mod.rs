//! Configuration loading
//!
//! Settings come from `~/.config/emacs-custom/config.toml` (or a file given
//! with `--config`), with command-line overrides applied last.

pub mod settings;
pub mod types;

pub use settings::{default_config_path, load_settings, load_settings_strict, resolve_user};
pub use types::{EmacsSettings, Settings, SettingsOverrides};
