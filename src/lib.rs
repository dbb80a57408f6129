//! emacs-custom library
//!
//! Ensures an Emacs customize variable has a given value by driving
//! `emacs --batch`. The binary in `main.rs` is a thin wrapper around
//! [`run_module`].

pub mod module;

pub use module::{emit, run_module, Invocation};
