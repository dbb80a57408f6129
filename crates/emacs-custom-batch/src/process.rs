//! Emacs batch process management
//!
//! Every script runs in a fresh `emacs -q --batch` process that is awaited to
//! completion, with stdout and stderr fully drained, before the caller moves on.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use emacs_custom_core::prelude::*;

use crate::elisp::ElispScript;
use crate::runner::LocalEmacsRunner;

/// How to invoke Emacs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Emacs executable (bare name looked up in PATH, or a path)
    pub program: PathBuf,
    /// Profile whose custom-file is read and written (`--user`)
    pub user: String,
    /// Extra arguments placed before `--eval`
    pub extra_args: Vec<String>,
    /// Give up on a single process after this long. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl BatchConfig {
    pub fn new(program: impl Into<PathBuf>, user: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            user: user.into(),
            extra_args: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Captured result of one batch process
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Exit code; `None` if the process was killed by a signal
    pub returncode: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub command: Vec<String>,
}

impl BatchOutput {
    pub fn success(&self) -> bool {
        self.returncode == Some(0)
    }

    /// Convert a failed run into [`Error::EmacsFailed`]
    pub fn into_result(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(Error::emacs_failed(
                self.returncode,
                self.stderr,
                self.command,
            ))
        }
    }
}

/// Runs scripts through a real Emacs binary
#[derive(Debug, Clone)]
pub struct EmacsBatch {
    config: BatchConfig,
}

impl EmacsBatch {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Full argv (program first) used to run `script`
    pub fn command_line(&self, script: &ElispScript) -> Vec<String> {
        let mut argv = vec![
            self.config.program.to_string_lossy().into_owned(),
            "-q".to_string(),
            "--batch".to_string(),
            "--user".to_string(),
            self.config.user.clone(),
        ];
        argv.extend(self.config.extra_args.iter().cloned());
        argv.push("--eval".to_string());
        argv.push(script.render());
        argv
    }

    /// Spawn Emacs for `script` and wait for it to exit.
    ///
    /// Only spawn problems and timeouts are errors here; the exit status is
    /// left for the caller to inspect.
    pub async fn run(&self, script: &ElispScript) -> Result<BatchOutput> {
        let command = self.command_line(script);
        debug!("Running emacs ({} script): {:?}", script.kind(), command);

        let mut cmd = Command::new(&self.config.program);
        cmd.args(&command[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    // Dropping the output future kills the child (kill_on_drop)
                    warn!("emacs {} script timed out after {:?}", script.kind(), limit);
                    return Err(Error::timeout(limit, command));
                }
            },
            None => cmd.output().await,
        }
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::emacs_not_found(self.config.program.to_string_lossy())
            } else {
                Error::process_spawn(e.to_string())
            }
        })?;

        let out = BatchOutput {
            returncode: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            command,
        };

        if out.success() {
            trace!("emacs stdout: {:?}", out.stdout);
        } else {
            warn!(
                "emacs {} script exited with {:?}: {}",
                script.kind(),
                out.returncode,
                out.stderr.trim()
            );
        }

        Ok(out)
    }
}

impl LocalEmacsRunner for EmacsBatch {
    async fn eval(&self, script: &ElispScript) -> Result<String> {
        let output = self.run(script).await?.into_result()?;
        Ok(output.stdout)
    }
}
