//! Variable reconciliation
//!
//! Brings one customize variable to a desired value:
//!
//! ```text
//! Idle -> Canonicalize -> Read -> Compare -> NoOp  -> Done
//!                                         -> Write -> Done
//! ```
//!
//! Any failing step moves to `Failed` and ends the run. A malformed value is
//! rejected by the first Emacs run, before the store is looked at. The write
//! is the last step and only happens after both reads succeeded, so a failure
//! never leaves a partial change behind.
//!
//! The saved expression is evaluated by Emacs, so a list or symbol value has
//! to be quoted (`'(a b)`, `'foo`) just as it would be in an init file.

use emacs_custom_batch::{parse_print_output, parse_read_output, ElispScript, LocalEmacsRunner};
use emacs_custom_core::prelude::*;
use emacs_custom_core::{ReconcilePhase, ReconcileReport, VariableName, VariableValue};

use crate::request::ReconcileRequest;

/// A failed reconciliation together with whatever was learned before it
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct ReconcileFailure {
    /// Step that failed
    pub phase: ReconcilePhase,
    #[source]
    pub source: Error,
    /// `Some(None)` means the variable was read and found unset
    pub old_value: Option<Option<VariableValue>>,
    pub new_value: Option<VariableValue>,
}

/// Drives one request through the reconcile steps
pub struct Reconciler<'a, R> {
    runner: &'a R,
    phase: ReconcilePhase,
    history: Vec<ReconcilePhase>,
}

impl<'a, R: LocalEmacsRunner> Reconciler<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self {
            runner,
            phase: ReconcilePhase::Idle,
            history: vec![ReconcilePhase::Idle],
        }
    }

    /// Current step
    pub fn phase(&self) -> ReconcilePhase {
        self.phase
    }

    /// Every step visited so far, starting with `Idle`
    pub fn history(&self) -> &[ReconcilePhase] {
        &self.history
    }

    fn advance(&mut self, next: ReconcilePhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal transition {} -> {}",
            self.phase,
            next
        );
        debug!("reconcile: {} -> {}", self.phase, next);
        self.phase = next;
        self.history.push(next);
    }

    fn fail(
        &mut self,
        source: Error,
        old_value: Option<Option<VariableValue>>,
        new_value: Option<VariableValue>,
    ) -> ReconcileFailure {
        let phase = self.phase;
        warn!("reconcile failed during {}: {}", phase, source);
        self.advance(ReconcilePhase::Failed);
        ReconcileFailure {
            phase,
            source,
            old_value,
            new_value,
        }
    }

    async fn read_current(&self, name: &VariableName) -> Result<Option<VariableValue>> {
        let stdout = self.runner.eval(&ElispScript::read_value(name)).await?;
        Ok(parse_read_output(&stdout))
    }

    async fn canonicalize(&self, value: &VariableValue) -> Result<VariableValue> {
        let stdout = self.runner.eval(&ElispScript::canonicalize(value)).await?;
        Ok(parse_print_output(&stdout))
    }

    /// Run the request to completion.
    ///
    /// Can only be called once per reconciler.
    pub async fn run(
        &mut self,
        request: &ReconcileRequest,
    ) -> std::result::Result<ReconcileReport, ReconcileFailure> {
        let name = &request.name;

        self.advance(ReconcilePhase::Canonicalize);
        let new_value = match self.canonicalize(&request.value).await {
            Ok(v) => v,
            Err(e) => return Err(self.fail(e, None, None)),
        };
        if new_value != request.value {
            debug!("canonical form of {:?} is {:?}", request.value, new_value);
        }

        self.advance(ReconcilePhase::Read);
        let old_value = match self.read_current(name).await {
            Ok(v) => v,
            Err(e) => return Err(self.fail(e, None, Some(new_value))),
        };
        debug!("{} currently {:?}", name, old_value);

        self.advance(ReconcilePhase::Compare);
        let changed = old_value.as_ref() != Some(&new_value);

        if changed && !request.check_mode {
            self.advance(ReconcilePhase::Write);
            let script = ElispScript::save_value(name, &new_value);
            if let Err(e) = self.runner.eval(&script).await {
                return Err(self.fail(e, Some(old_value), Some(new_value)));
            }
            info!("Saved {} = {}", name, new_value);
        } else {
            self.advance(ReconcilePhase::NoOp);
            if changed {
                info!("Check mode: {} would change to {}", name, new_value);
            } else {
                info!("{} already {}", name, new_value);
            }
        }

        self.advance(ReconcilePhase::Done);
        Ok(ReconcileReport {
            name: name.clone(),
            changed,
            old_value,
            new_value,
            check_mode: request.check_mode,
        })
    }
}

/// Reconcile `request` against `runner` in one call
pub async fn reconcile<R: LocalEmacsRunner>(
    runner: &R,
    request: &ReconcileRequest,
) -> std::result::Result<ReconcileReport, ReconcileFailure> {
    Reconciler::new(runner).run(request).await
}
