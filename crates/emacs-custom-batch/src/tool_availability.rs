//! Locating the Emacs executable
//!
//! Resolution happens once, before any script runs, so a missing binary is
//! reported up front instead of as a spawn failure halfway through.

use std::path::{Path, PathBuf};

use emacs_custom_core::prelude::*;

/// Result of looking up the configured Emacs program
#[derive(Debug, Clone, Default)]
pub struct EmacsAvailability {
    /// Program as configured (name or path)
    pub program: PathBuf,

    /// Absolute path of the executable if it was found
    pub resolved: Option<PathBuf>,
}

impl EmacsAvailability {
    /// Look up `program` in PATH, or check it directly if it is a path
    pub fn check(program: impl AsRef<Path>) -> Self {
        let program = program.as_ref().to_path_buf();
        let resolved = which::which(&program)
            .inspect_err(|e| debug!("emacs lookup for {:?} failed: {}", program, e))
            .ok();

        Self { program, resolved }
    }

    /// The resolved executable, or [`Error::EmacsNotFound`]
    pub fn require(&self) -> Result<&Path> {
        self.resolved
            .as_deref()
            .ok_or_else(|| Error::emacs_not_found(self.program.to_string_lossy()))
    }
}
