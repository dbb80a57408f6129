//! Domain types for variable reconciliation

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Name of a variable in the Emacs customization namespace.
///
/// Opaque: it is never parsed, only interpolated into generated Elisp.
/// The only requirement is that it is not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VariableName(String);

impl VariableName {
    /// Create a variable name, trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_argument("variable name must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An Emacs Lisp literal expression, kept as source text.
///
/// Values read back from Emacs are printer output; equality is plain
/// string equality on that text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableValue(String);

impl VariableValue {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    /// Build a value from raw process output, dropping surrounding whitespace
    /// (Emacs' `print` wraps its output in newlines).
    pub fn from_output(output: &str) -> Self {
        Self(output.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Steps of a single reconciliation.
///
/// ```text
/// Idle -> Canonicalize -> Read -> Compare -> NoOp  -> Done
///                                         -> Write -> Done
/// (any step) -> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePhase {
    #[default]
    Idle,
    Canonicalize,
    Read,
    Compare,
    NoOp,
    Write,
    Done,
    Failed,
}

impl ReconcilePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReconcilePhase::Done | ReconcilePhase::Failed)
    }

    /// Whether `next` is a legal successor of this phase
    pub fn can_transition_to(&self, next: ReconcilePhase) -> bool {
        use ReconcilePhase::*;
        match (self, next) {
            (_, Failed) => !self.is_terminal(),
            (Idle, Canonicalize) => true,
            (Canonicalize, Read) => true,
            (Read, Compare) => true,
            (Compare, NoOp) | (Compare, Write) => true,
            (NoOp, Done) | (Write, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ReconcilePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReconcilePhase::Idle => "idle",
            ReconcilePhase::Read => "read",
            ReconcilePhase::Canonicalize => "canonicalize",
            ReconcilePhase::Compare => "compare",
            ReconcilePhase::NoOp => "no-op",
            ReconcilePhase::Write => "write",
            ReconcilePhase::Done => "done",
            ReconcilePhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of a successful reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub name: VariableName,
    /// Whether the stored value differs (or differed) from the desired one
    pub changed: bool,
    /// Value found in the store before this run; `None` when unset
    pub old_value: Option<VariableValue>,
    /// Canonical form of the desired value
    pub new_value: VariableValue,
    /// True when the run was a dry run and nothing was written
    pub check_mode: bool,
}
