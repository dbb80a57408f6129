//! Seam between the reconciler and whatever actually runs Elisp

use emacs_custom_core::prelude::*;

use crate::elisp::ElispScript;

/// Evaluates batch scripts against a customization store.
///
/// [`crate::EmacsBatch`] runs a real Emacs process; tests use the in-memory
/// store from `test_utils`.
#[trait_variant::make(EmacsRunner: Send)]
pub trait LocalEmacsRunner {
    /// Run one script to completion and return its raw stdout.
    ///
    /// A non-zero exit must be reported as [`Error::EmacsFailed`].
    async fn eval(&self, script: &ElispScript) -> Result<String>;
}
