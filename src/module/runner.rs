//! Module runner - one invocation from arguments to result record

use std::path::PathBuf;

use emacs_custom_app::config::{
    default_config_path, load_settings, load_settings_strict, resolve_user, Settings,
    SettingsOverrides,
};
use emacs_custom_app::{reconcile, ModuleArgs, ModuleOutcome, ReconcileRequest};
use emacs_custom_batch::{EmacsAvailability, EmacsBatch, LocalEmacsRunner};
use emacs_custom_core::prelude::*;

/// Everything the binary was asked to do
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    /// Module-arguments JSON file (Ansible binary module convention)
    pub args_file: Option<PathBuf>,
    pub name: Option<String>,
    pub value: Option<String>,
    pub check_mode: bool,
    /// Explicit config file; when absent the default location is tried
    pub config_path: Option<PathBuf>,
    pub overrides: SettingsOverrides,
}

impl Invocation {
    fn request(&self) -> Result<ReconcileRequest> {
        let file_args = self
            .args_file
            .as_deref()
            .map(ModuleArgs::load)
            .transpose()?;
        ReconcileRequest::from_sources(
            file_args,
            self.name.clone(),
            self.value.clone(),
            self.check_mode,
        )
    }

    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config_path {
            Some(path) => load_settings_strict(path)?,
            None => default_config_path()
                .map(|path| load_settings(&path))
                .unwrap_or_default(),
        };
        settings.merge_overrides(self.overrides.clone());
        Ok(settings)
    }

    /// Resolve configuration into a ready-to-run Emacs batch runner
    fn batch(&self) -> Result<EmacsBatch> {
        let settings = self.settings()?;
        let user = resolve_user(settings.emacs.user.as_deref())?;
        let program = EmacsAvailability::check(&settings.emacs.program)
            .require()?
            .to_path_buf();
        debug!("Using emacs at {:?} for user {}", program, user);
        Ok(EmacsBatch::new(settings.batch_config(program, user)))
    }
}

/// Reconcile a prepared request with any runner
pub async fn run_request<R: LocalEmacsRunner>(
    runner: &R,
    request: &ReconcileRequest,
) -> ModuleOutcome {
    info!(
        "Reconciling {} (check mode: {})",
        request.name, request.check_mode
    );
    reconcile(runner, request).await.into()
}

/// Run one invocation to a result record. Never fails: every error becomes a
/// failure record.
pub async fn run_module(invocation: Invocation) -> ModuleOutcome {
    let prepared = invocation
        .request()
        .and_then(|request| Ok((request, invocation.batch()?)));

    match prepared {
        Ok((request, batch)) => run_request(&batch, &request).await,
        Err(e) => {
            error!("Invocation rejected: {}", e);
            ModuleOutcome::from_error(&e)
        }
    }
}
