//! # emacs-custom-app - Reconciliation and Configuration
//!
//! Turns an invocation into a reconciliation against Emacs and a result
//! record for the caller.
//!
//! ## Public API
//!
//! - [`ReconcileRequest`] / [`ModuleArgs`] - Validated invocation arguments
//! - [`Reconciler`] / [`reconcile()`] - The read, canonicalize, compare, write sequence
//! - [`ModuleOutcome`] - JSON result record (success or failure)
//! - [`config`] - `config.toml` loading and user resolution

pub mod config;
pub mod outcome;
pub mod reconcile;
pub mod request;

pub use outcome::{FailureRecord, ModuleOutcome, SuccessRecord};
pub use reconcile::{reconcile, ReconcileFailure, Reconciler};
pub use request::{ModuleArgs, ReconcileRequest};
