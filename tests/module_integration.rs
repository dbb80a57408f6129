//! Integration tests for the module runner against a fake `emacs` executable
//!
//! The fake is a POSIX shell script that understands the three batch
//! programs and keeps saved values as files in a state directory. Like
//! `customize-save-variable`, it evaluates the saved expression (only quoted
//! forms and self-evaluating atoms succeed) and stores lists and symbols
//! quoted.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use emacs_custom::{run_module, Invocation};
use emacs_custom_app::config::SettingsOverrides;
use emacs_custom_app::ModuleOutcome;

const FAKE_EMACS: &str = r#"#!/bin/sh
STATE='@STATE@'
printf '%s\n' "$*" >> "$STATE/args.log"
for prog; do :; done
case "$prog" in
  "(print (let ((val (custom-variable-theme-value '"*)
    if [ -f "$STATE/fail_read" ]; then
      echo "Cannot open load file: custom" >&2
      exit 255
    fi
    name=${prog#*custom-variable-theme-value \'}
    name=${name%%)*}
    if [ -f "$STATE/var_$name" ]; then
      printf '\n%s\n' "$(cat "$STATE/var_$name")"
    else
      printf '\nEMACS-CUSTOM-UNSET-SENTINEL\n'
    fi
    ;;
  "(customize-save-variable '"*)
    rest=${prog#"(customize-save-variable '"}
    name=${rest%% *}
    expr=${rest#* }
    expr=${expr%)}
    case "$expr" in
      [0-9]*|-[0-9]*|\"*|nil|t|:*|\[*) inner=$expr ;;
      \'*) inner=${expr#\'} ;;
      *)
        echo "Symbol's value as variable is void: $expr" >&2
        exit 255
        ;;
    esac
    case "$inner" in
      [0-9]*|-[0-9]*|\"*|nil|t|:*|\[*) printf '%s' "$inner" > "$STATE/var_$name" ;;
      *) printf "'%s" "$inner" > "$STATE/var_$name" ;;
    esac
    ;;
  "(print '"*)
    value=${prog#"(print '"}
    value=${value%)}
    printf '\n%s\n' "$(printf '%s' "$value" | tr -s ' ')"
    ;;
  *)
    echo "unexpected program: $prog" >&2
    exit 1
    ;;
esac
"#;

/// Fake Emacs installation plus an empty config file
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let state = dir.path().to_string_lossy().into_owned();
        let emacs = dir.path().join("emacs");
        fs::write(&emacs, FAKE_EMACS.replace("@STATE@", &state)).unwrap();
        let mut perms = fs::metadata(&emacs).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&emacs, perms).unwrap();
        fs::write(dir.path().join("config.toml"), "").unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn invocation(&self, name: &str, value: &str, check_mode: bool) -> Invocation {
        Invocation {
            name: Some(name.to_string()),
            value: Some(value.to_string()),
            check_mode,
            config_path: Some(self.path().join("config.toml")),
            overrides: SettingsOverrides {
                program: Some(self.path().join("emacs").to_string_lossy().into_owned()),
                user: Some("alice".to_string()),
                timeout_secs: Some(30),
            },
            ..Default::default()
        }
    }

    fn stored(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.path().join(format!("var_{}", name))).ok()
    }

    fn args_log(&self) -> Vec<String> {
        fs::read_to_string(self.path().join("args.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn save_calls(&self) -> usize {
        self.args_log()
            .iter()
            .filter(|line| line.contains("customize-save-variable"))
            .count()
    }
}

fn success(outcome: ModuleOutcome) -> emacs_custom_app::SuccessRecord {
    match outcome {
        ModuleOutcome::Success(record) => record,
        ModuleOutcome::Failure(record) => panic!("expected success, got {:?}", record),
    }
}

#[tokio::test]
#[serial]
async fn test_unset_variable_then_idempotent_rerun() {
    let fx = Fixture::new();

    let first = success(run_module(fx.invocation("my-var", "42", false)).await);
    assert!(first.changed);
    assert_eq!(first.old_value, None);
    assert_eq!(first.new_value.as_str(), "42");
    assert_eq!(fx.stored("my-var").as_deref(), Some("42"));

    let second = success(run_module(fx.invocation("my-var", "42", false)).await);
    assert!(!second.changed);
    assert_eq!(second.old_value.as_ref().map(|v| v.as_str()), Some("42"));
    assert_eq!(fx.save_calls(), 1);
}

#[tokio::test]
#[serial]
async fn test_check_mode_never_saves() {
    let fx = Fixture::new();

    let record = success(run_module(fx.invocation("my-var", "42", true)).await);
    assert!(record.changed);
    assert!(record.check_mode);
    assert_eq!(fx.stored("my-var"), None);
    assert_eq!(fx.save_calls(), 0);
}

#[tokio::test]
#[serial]
async fn test_quoted_list_value_round_trips() {
    let fx = Fixture::new();

    let first = success(run_module(fx.invocation("my-list", "'(a    b)", false)).await);
    assert!(first.changed);
    assert_eq!(first.new_value.as_str(), "'(a b)");
    assert_eq!(fx.stored("my-list").as_deref(), Some("'(a b)"));

    let second = success(run_module(fx.invocation("my-list", "'(a b)", false)).await);
    assert!(!second.changed);
    assert_eq!(second.old_value.as_ref().map(|v| v.as_str()), Some("'(a b)"));
    assert_eq!(fx.save_calls(), 1);
}

#[tokio::test]
#[serial]
async fn test_quoted_symbol_value_round_trips() {
    let fx = Fixture::new();

    let first = success(run_module(fx.invocation("my-sym", "'foo", false)).await);
    assert!(first.changed);
    let second = success(run_module(fx.invocation("my-sym", "'foo", false)).await);
    assert!(!second.changed);
    assert_eq!(fx.stored("my-sym").as_deref(), Some("'foo"));
    assert_eq!(fx.save_calls(), 1);
}

#[tokio::test]
#[serial]
async fn test_unquoted_list_fails_at_save_with_changed() {
    let fx = Fixture::new();

    let outcome = run_module(fx.invocation("my-list", "(a b)", false)).await;
    let record = match outcome {
        ModuleOutcome::Failure(record) => record,
        other => panic!("expected failure, got {:?}", other),
    };
    assert!(record.changed);
    assert_eq!(record.emacs_returncode, Some(255));
    assert_eq!(record.old_value, Some(None));
    assert_eq!(record.new_value.as_ref().map(|v| v.as_str()), Some("(a b)"));
    assert_eq!(fx.stored("my-list"), None);
}

#[tokio::test]
#[serial]
async fn test_read_failure_reports_diagnostics_and_skips_write() {
    let fx = Fixture::new();
    fs::write(fx.path().join("var_my-var"), "1").unwrap();
    fs::write(fx.path().join("fail_read"), "").unwrap();

    let outcome = run_module(fx.invocation("my-var", "42", false)).await;
    assert_eq!(outcome.exit_code(), 1);

    let record = match outcome {
        ModuleOutcome::Failure(record) => record,
        other => panic!("expected failure, got {:?}", other),
    };
    assert!(record.failed);
    assert!(!record.changed);
    assert_eq!(record.emacs_returncode, Some(255));
    assert!(record
        .emacs_stderr
        .as_deref()
        .unwrap()
        .contains("Cannot open load file"));
    let command = record.emacs_command.unwrap();
    assert!(command.contains(&"--batch".to_string()));
    assert!(command.contains(&"--eval".to_string()));

    assert_eq!(fx.args_log().len(), 2);
    assert_eq!(fx.save_calls(), 0);
    assert_eq!(record.new_value.as_ref().map(|v| v.as_str()), Some("42"));
    assert_eq!(fx.stored("my-var").as_deref(), Some("1"));
}

#[tokio::test]
#[serial]
async fn test_user_profile_is_passed() {
    let fx = Fixture::new();

    success(run_module(fx.invocation("my-var", "42", true)).await);

    let log = fx.args_log();
    assert!(!log.is_empty());
    assert!(log.iter().all(|line| line.starts_with("-q --batch --user alice --eval ")));
}

#[tokio::test]
#[serial]
async fn test_module_args_file() {
    let fx = Fixture::new();
    let args_path: PathBuf = fx.path().join("module_args.json");
    fs::write(
        &args_path,
        r#"{"name": "fill-column", "value": 80, "_ansible_check_mode": true}"#,
    )
    .unwrap();

    let mut invocation = fx.invocation("unused", "unused", false);
    invocation.name = None;
    invocation.value = None;
    invocation.args_file = Some(args_path);

    let record = success(run_module(invocation).await);
    assert!(record.changed);
    assert!(record.check_mode);
    assert_eq!(record.new_value.as_str(), "80");
    assert_eq!(fx.stored("fill-column"), None);
}

#[tokio::test]
#[serial]
async fn test_missing_config_file_is_failure() {
    let fx = Fixture::new();
    let mut invocation = fx.invocation("my-var", "42", false);
    invocation.config_path = Some(fx.path().join("nope.toml"));

    let outcome = run_module(invocation).await;
    assert!(outcome.is_failure());
    assert!(fx.args_log().is_empty());
}
