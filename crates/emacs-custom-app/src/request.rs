//! Invocation arguments
//!
//! Arguments arrive either on the command line or, when run by Ansible as a
//! binary module, as a JSON file whose path is the first argument:
//!
//! ```json
//! {"name": "fill-column", "value": "80", "_ansible_check_mode": false}
//! ```

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use emacs_custom_core::prelude::*;
use emacs_custom_core::{VariableName, VariableValue};

/// Raw contents of a module-arguments file. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleArgs {
    #[serde(default)]
    pub name: Option<String>,

    /// Usually a string; YAML numbers come through as JSON numbers
    #[serde(default)]
    pub value: Option<Value>,

    #[serde(rename = "_ansible_check_mode", default)]
    pub check_mode: bool,
}

impl ModuleArgs {
    /// Read and parse a module-arguments file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read module args {:?}", path))?;
        let args = serde_json::from_str(&content)?;
        Ok(args)
    }

    fn value_text(&self) -> Result<Option<String>> {
        match &self.value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(Error::invalid_argument(format!(
                "value must be a string holding an Elisp expression, got {}",
                other
            ))),
        }
    }
}

/// A validated request to reconcile one variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileRequest {
    pub name: VariableName,
    pub value: VariableValue,
    pub check_mode: bool,
}

impl ReconcileRequest {
    pub fn new(name: &str, value: &str, check_mode: bool) -> Result<Self> {
        let name = VariableName::new(name)?;
        let value = VariableValue::new(value);
        if value.is_blank() {
            return Err(Error::invalid_argument("value must not be empty"));
        }
        Ok(Self {
            name,
            value,
            check_mode,
        })
    }

    /// Combine an optional args file with command-line values.
    ///
    /// Command-line values win; check mode is on if either source asks for it.
    pub fn from_sources(
        file: Option<ModuleArgs>,
        name: Option<String>,
        value: Option<String>,
        check_mode: bool,
    ) -> Result<Self> {
        let file = file.unwrap_or_default();
        let name = name
            .or_else(|| file.name.clone())
            .ok_or_else(|| Error::invalid_argument("missing required argument: name"))?;
        let value = match value {
            Some(v) => v,
            None => file
                .value_text()?
                .ok_or_else(|| Error::invalid_argument("missing required argument: value"))?,
        };

        Self::new(&name, &value, check_mode || file.check_mode)
    }
}
