//! # emacs-custom-core - Core Domain Types
//!
//! Foundation crate for emacs-custom. Provides the domain types, error
//! handling, and logging setup shared by the other crates.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`VariableName`] - Name of a customize variable (never parsed)
//! - [`VariableValue`] - Elisp literal kept as source text
//! - [`ReconcilePhase`] - Named steps of one reconciliation
//! - [`ReconcileReport`] - Outcome of a successful reconciliation
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error enum; Emacs failures carry exit code, stderr and command
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use emacs_custom_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod prelude;
pub mod types;

pub use error::{Error, Result, ResultExt};
pub use types::{ReconcilePhase, ReconcileReport, VariableName, VariableValue};
