//! Module mode - the result record on stdout
//!
//! Whatever runs the binary (Ansible, a script, a test) reads exactly one
//! JSON object from stdout. Logs and diagnostics never go there.

pub mod runner;

use std::io::{self, Write};

use tracing::error;

use emacs_custom_app::ModuleOutcome;

pub use runner::{run_module, Invocation};

/// Write `outcome` as a single JSON line
pub fn write_outcome<W: Write>(out: &mut W, outcome: &ModuleOutcome) -> io::Result<()> {
    let json = outcome.to_json().map_err(io::Error::other)?;
    writeln!(out, "{}", json)?;
    out.flush()
}

/// Emit `outcome` to stdout
pub fn emit(outcome: &ModuleOutcome) {
    let mut stdout = io::stdout().lock();
    if let Err(e) = write_outcome(&mut stdout, outcome) {
        error!("Failed to write module result to stdout: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emacs_custom_core::Error;

    #[test]
    fn test_write_outcome_is_one_json_line() {
        let outcome = ModuleOutcome::from_error(&Error::invalid_argument("missing name"));
        let mut buf = Vec::new();
        write_outcome(&mut buf, &outcome).expect("write failed");

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('\n'));

        let value: serde_json::Value = serde_json::from_str(text.trim()).expect("invalid JSON");
        assert_eq!(value["failed"], true);
        assert_eq!(value["changed"], false);
    }
}
