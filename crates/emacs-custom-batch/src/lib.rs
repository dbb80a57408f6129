//! # emacs-custom-batch - Emacs Batch Process Management
//!
//! Everything that talks to the Emacs executable: the Elisp programs passed
//! to `--eval`, parsing of their printed output, and running
//! `emacs -q --batch` as a child process.
//!
//! Depends on [`emacs_custom_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Scripts
//! - [`ElispScript`] - The read / canonicalize / save programs
//! - [`parse_read_output()`] - Map read output to `Option<VariableValue>`
//! - [`UNSET_SENTINEL`] - Token the read script prints for unset variables
//!
//! ### Process Management
//! - [`EmacsBatch`] - Run scripts through a real Emacs binary
//! - [`BatchConfig`] - Program, `--user` profile, extra args, timeout
//! - [`EmacsRunner`] / [`LocalEmacsRunner`] - Seam used by the reconciler
//!
//! ### Tool Lookup
//! - [`EmacsAvailability`] - Resolve the Emacs executable before running

pub mod elisp;
pub mod process;
pub mod runner;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;
pub mod tool_availability;

pub use elisp::{parse_print_output, parse_read_output, ElispScript, ScriptKind, UNSET_SENTINEL};
pub use process::{BatchConfig, BatchOutput, EmacsBatch};
pub use runner::{EmacsRunner, LocalEmacsRunner};
pub use tool_availability::EmacsAvailability;
