//! Elisp programs sent to `emacs --batch --eval`
//!
//! Each reconciliation uses at most three scripts: read the stored value,
//! print the desired value in canonical form, and save the new value. Names
//! and values are interpolated verbatim; Emacs does all the parsing.

use std::fmt;

use emacs_custom_core::{VariableName, VariableValue};

/// Token printed by the read script when the variable has no saved value.
///
/// It is a symbol no real customization would be set to, so it can share the
/// stdout channel with actual values.
pub const UNSET_SENTINEL: &str = "EMACS-CUSTOM-UNSET-SENTINEL";

/// Which of the three scripts this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    Read,
    Canonicalize,
    Save,
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScriptKind::Read => "read",
            ScriptKind::Canonicalize => "canonicalize",
            ScriptKind::Save => "save",
        };
        f.write_str(s)
    }
}

/// A script for Emacs' batch mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElispScript {
    /// Print the variable's saved theme value, or [`UNSET_SENTINEL`]
    ReadValue { name: VariableName },
    /// Print the quoted expression back through the Lisp reader/printer
    Canonicalize { value: VariableValue },
    /// Evaluate the expression, `customize-save-variable` the result and
    /// write custom-file
    SaveValue {
        name: VariableName,
        value: VariableValue,
    },
}

impl ElispScript {
    pub fn read_value(name: &VariableName) -> Self {
        Self::ReadValue { name: name.clone() }
    }

    pub fn canonicalize(value: &VariableValue) -> Self {
        Self::Canonicalize {
            value: value.clone(),
        }
    }

    pub fn save_value(name: &VariableName, value: &VariableValue) -> Self {
        Self::SaveValue {
            name: name.clone(),
            value: value.clone(),
        }
    }

    pub fn kind(&self) -> ScriptKind {
        match self {
            ElispScript::ReadValue { .. } => ScriptKind::Read,
            ElispScript::Canonicalize { .. } => ScriptKind::Canonicalize,
            ElispScript::SaveValue { .. } => ScriptKind::Save,
        }
    }

    /// Render the program text passed to `--eval`
    pub fn render(&self) -> String {
        match self {
            ElispScript::ReadValue { name } => format!(
                "(print (let ((val (custom-variable-theme-value '{name}))) \
                 (if val (car val) '{UNSET_SENTINEL})))"
            ),
            ElispScript::Canonicalize { value } => format!("(print '{value})"),
            // Evaluated, not quoted: custom-quote then stores a form that
            // prints back exactly like the canonical value.
            ElispScript::SaveValue { name, value } => {
                format!("(customize-save-variable '{name} {value})")
            }
        }
    }
}

/// Interpret the stdout of a [`ElispScript::ReadValue`] run.
///
/// Returns `None` for the sentinel. Some Emacs builds print nothing at all
/// for an unset variable, so blank output is treated the same way.
pub fn parse_read_output(stdout: &str) -> Option<VariableValue> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() || trimmed == UNSET_SENTINEL {
        None
    } else {
        Some(VariableValue::new(trimmed))
    }
}

/// Interpret the stdout of a [`ElispScript::Canonicalize`] run
pub fn parse_print_output(stdout: &str) -> VariableValue {
    VariableValue::from_output(stdout)
}
