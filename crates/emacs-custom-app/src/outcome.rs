//! Module result record
//!
//! The single JSON object the binary prints on stdout. Success:
//!
//! ```json
//! {"changed": true, "old_value": null, "new_value": "42"}
//! ```
//!
//! Failure (Emacs diagnostics are `null` when the error did not come from
//! running Emacs):
//!
//! ```json
//! {"failed": true, "changed": false, "msg": "emacs failed with exit code 255",
//!  "emacs_returncode": 255, "emacs_stderr": "...", "emacs_command": ["emacs", "..."]}
//! ```

use serde::Serialize;

use emacs_custom_core::{Error, ReconcilePhase, ReconcileReport, VariableValue};

use crate::reconcile::ReconcileFailure;

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessRecord {
    pub changed: bool,
    pub old_value: Option<VariableValue>,
    pub new_value: VariableValue,
    #[serde(skip_serializing_if = "is_false")]
    pub check_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub failed: bool,
    pub changed: bool,
    pub msg: String,
    pub emacs_returncode: Option<i32>,
    pub emacs_stderr: Option<String>,
    pub emacs_command: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Option<VariableValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<VariableValue>,
}

/// What the caller sees for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModuleOutcome {
    Success(SuccessRecord),
    Failure(FailureRecord),
}

impl ModuleOutcome {
    pub fn from_report(report: &ReconcileReport) -> Self {
        Self::Success(SuccessRecord {
            changed: report.changed,
            old_value: report.old_value.clone(),
            new_value: report.new_value.clone(),
            check_mode: report.check_mode,
        })
    }

    /// Failure record for an error raised before reconciliation started
    pub fn from_error(err: &Error) -> Self {
        Self::Failure(FailureRecord {
            failed: true,
            changed: false,
            msg: err.to_string(),
            emacs_returncode: err.emacs_returncode(),
            emacs_stderr: err.emacs_stderr().map(str::to_string),
            emacs_command: err.emacs_command().map(<[String]>::to_vec),
            old_value: None,
            new_value: None,
        })
    }

    /// Failure record for a reconciliation that stopped partway.
    ///
    /// A failed write still reports `changed`: the store was found to differ
    /// and a save was attempted.
    pub fn from_failure(failure: &ReconcileFailure) -> Self {
        match Self::from_error(&failure.source) {
            Self::Failure(mut record) => {
                record.changed = failure.phase == ReconcilePhase::Write;
                record.old_value = failure.old_value.clone();
                record.new_value = failure.new_value.clone();
                Self::Failure(record)
            }
            success => success,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ModuleOutcome::Failure(_))
    }

    /// Process exit code for this outcome
    pub fn exit_code(&self) -> u8 {
        if self.is_failure() {
            1
        } else {
            0
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<std::result::Result<ReconcileReport, ReconcileFailure>> for ModuleOutcome {
    fn from(result: std::result::Result<ReconcileReport, ReconcileFailure>) -> Self {
        match result {
            Ok(report) => Self::from_report(&report),
            Err(failure) => Self::from_failure(&failure),
        }
    }
}
