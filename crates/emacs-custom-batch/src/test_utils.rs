//! Test utilities for code that runs Elisp scripts
//!
//! Provides [`FakeCustomStore`], an in-memory stand-in for Emacs and its
//! custom-file that answers the three script shapes. Saving follows
//! `customize-save-variable`: the expression is evaluated and the result is
//! stored through `custom-quote`, so a later read prints `'(a b)` for a saved
//! list and `42` for a number.

use std::collections::HashMap;
use std::sync::Mutex;

use emacs_custom_core::prelude::*;

use crate::elisp::{ElispScript, ScriptKind, UNSET_SENTINEL};
use crate::runner::LocalEmacsRunner;

/// Approximates the Lisp printer: collapses whitespace runs, drops padding
/// just inside parentheses and prints a top-level `(quote x)` as `'x`.
///
/// # Examples
/// - `"( a   b )"` -> `"(a b)"`
/// - `"  42 "` -> `"42"`
/// - `"(quote (a b))"` -> `"'(a b)"`
pub fn canonical_print(expr: &str) -> String {
    let printed = expr
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("( ", "(")
        .replace(" )", ")");
    match printed
        .strip_prefix("(quote ")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => format!("'{}", inner),
        None => printed,
    }
}

/// Whether a printed form evaluates to itself (and so is stored unquoted)
fn is_self_evaluating(form: &str) -> bool {
    let numeric = form.starts_with(|c: char| c.is_ascii_digit() || "+-.".contains(c))
        && form.parse::<f64>().is_ok();
    numeric
        || form == "nil"
        || form == "t"
        || form.starts_with('"')
        || form.starts_with(':')
        || form.starts_with('[')
}

/// Printed theme value left behind by `(customize-save-variable 'NAME EXPR)`.
///
/// Errors carry the message Emacs would put on stderr when evaluating `expr`
/// fails (an unquoted list or symbol).
///
/// # Examples
/// - `"42"` -> `Ok("42")`
/// - `"'(a  b)"` -> `Ok("'(a b)")`
/// - `"'\"s\""` -> `Ok("\"s\"")`
/// - `"(a b)"` -> `Err(..)`
pub fn saved_form(expr: &str) -> std::result::Result<String, String> {
    let form = canonical_print(expr);
    let value = if is_self_evaluating(&form) {
        form.as_str()
    } else if let Some(inner) = form.strip_prefix('\'') {
        inner
    } else if let Some(call) = form.strip_prefix('(') {
        let head = call.split([' ', ')']).next().unwrap_or_default();
        return Err(format!("Symbol's function definition is void: {}", head));
    } else {
        return Err(format!("Symbol's value as variable is void: {}", form));
    };

    if is_self_evaluating(value) {
        Ok(value.to_string())
    } else {
        Ok(format!("'{}", value))
    }
}

#[derive(Debug, Clone)]
struct InjectedFailure {
    kind: ScriptKind,
    returncode: i32,
    stderr: String,
}

/// In-memory customization store answering [`ElispScript`]s
#[derive(Debug, Default)]
pub struct FakeCustomStore {
    values: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<ElispScript>>,
    failure: Option<InjectedFailure>,
}

impl FakeCustomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a saved value as the read script would print it
    pub fn with_value(self, name: &str, value: &str) -> Self {
        self.values
            .lock()
            .expect("fake store lock")
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Make every script of `kind` exit with `returncode`
    pub fn failing_on(mut self, kind: ScriptKind, returncode: i32, stderr: &str) -> Self {
        self.failure = Some(InjectedFailure {
            kind,
            returncode,
            stderr: stderr.to_string(),
        });
        self
    }

    /// Current saved value of `name`
    pub fn stored(&self, name: &str) -> Option<String> {
        self.values.lock().expect("fake store lock").get(name).cloned()
    }

    /// Kinds of every script evaluated so far, in order
    pub fn calls(&self) -> Vec<ScriptKind> {
        self.calls
            .lock()
            .expect("fake store lock")
            .iter()
            .map(ElispScript::kind)
            .collect()
    }

    /// Number of save scripts evaluated
    pub fn write_count(&self) -> usize {
        self.calls()
            .into_iter()
            .filter(|k| *k == ScriptKind::Save)
            .count()
    }

    fn fake_command(script: &ElispScript) -> Vec<String> {
        vec![
            "emacs".to_string(),
            "-q".to_string(),
            "--batch".to_string(),
            "--eval".to_string(),
            script.render(),
        ]
    }
}

impl LocalEmacsRunner for FakeCustomStore {
    async fn eval(&self, script: &ElispScript) -> Result<String> {
        self.calls
            .lock()
            .expect("fake store lock")
            .push(script.clone());

        if let Some(failure) = &self.failure {
            if failure.kind == script.kind() {
                return Err(Error::emacs_failed(
                    Some(failure.returncode),
                    failure.stderr.clone(),
                    Self::fake_command(script),
                ));
            }
        }

        let mut values = self.values.lock().expect("fake store lock");
        let stdout = match script {
            ElispScript::ReadValue { name } => values
                .get(name.as_str())
                .cloned()
                .unwrap_or_else(|| UNSET_SENTINEL.to_string()),
            ElispScript::Canonicalize { value } => canonical_print(value.as_str()),
            ElispScript::SaveValue { name, value } => match saved_form(value.as_str()) {
                Ok(form) => {
                    values.insert(name.to_string(), form);
                    String::new()
                }
                Err(message) => {
                    return Err(Error::emacs_failed(
                        Some(255),
                        message,
                        Self::fake_command(script),
                    ));
                }
            },
        };

        // `print` surrounds its output with newlines
        Ok(if stdout.is_empty() {
            stdout
        } else {
            format!("\n{}\n", stdout)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emacs_custom_core::{VariableName, VariableValue};

    #[test]
    fn test_canonical_print() {
        assert_eq!(canonical_print("( a   b )"), "(a b)");
        assert_eq!(canonical_print("  42 \n"), "42");
        assert_eq!(canonical_print("(a b)"), "(a b)");
        assert_eq!(canonical_print("(quote  (a b))"), "'(a b)");
    }

    #[test]
    fn test_saved_form_follows_custom_quote() {
        assert_eq!(saved_form("42").unwrap(), "42");
        assert_eq!(saved_form("-1.5").unwrap(), "-1.5");
        assert_eq!(saved_form("\"hi\"").unwrap(), "\"hi\"");
        assert_eq!(saved_form("nil").unwrap(), "nil");
        assert_eq!(saved_form(":key").unwrap(), ":key");
        assert_eq!(saved_form("'(a   b)").unwrap(), "'(a b)");
        assert_eq!(saved_form("(quote (a b))").unwrap(), "'(a b)");
        assert_eq!(saved_form("'foo").unwrap(), "'foo");
        assert_eq!(saved_form("'42").unwrap(), "42");
    }

    #[test]
    fn test_saved_form_rejects_unquoted_forms() {
        assert!(saved_form("(a b)").unwrap_err().contains("function definition is void: a"));
        assert!(saved_form("foo").unwrap_err().contains("variable is void: foo"));
        assert!(saved_form("inf").is_err());
    }

    #[tokio::test]
    async fn test_fake_store_read_unset_then_save() {
        let store = FakeCustomStore::new();
        let name = VariableName::new("my-var").unwrap();

        let out = store.eval(&ElispScript::read_value(&name)).await.unwrap();
        assert_eq!(out.trim(), UNSET_SENTINEL);

        store
            .eval(&ElispScript::save_value(&name, &VariableValue::new("'(a b)")))
            .await
            .unwrap();
        assert_eq!(store.stored("my-var").as_deref(), Some("'(a b)"));
        assert_eq!(store.calls(), vec![ScriptKind::Read, ScriptKind::Save]);

        let out = store.eval(&ElispScript::read_value(&name)).await.unwrap();
        assert_eq!(out.trim(), "'(a b)");
    }

    #[tokio::test]
    async fn test_fake_store_save_of_unquoted_symbol_fails() {
        let store = FakeCustomStore::new();
        let name = VariableName::new("my-var").unwrap();

        let err = store
            .eval(&ElispScript::save_value(&name, &VariableValue::new("foo")))
            .await
            .unwrap_err();
        assert_eq!(err.emacs_returncode(), Some(255));
        assert!(err.emacs_stderr().unwrap().contains("void"));
        assert_eq!(store.stored("my-var"), None);
    }

    #[tokio::test]
    async fn test_fake_store_injected_failure() {
        let store = FakeCustomStore::new().failing_on(ScriptKind::Read, 255, "void variable");
        let name = VariableName::new("x").unwrap();

        let err = store.eval(&ElispScript::read_value(&name)).await.unwrap_err();
        assert_eq!(err.emacs_returncode(), Some(255));
        assert_eq!(err.emacs_stderr(), Some("void variable"));
    }
}
