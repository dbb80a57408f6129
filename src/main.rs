//! emacs-custom - idempotently set an Emacs customize variable
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use emacs_custom::{emit, run_module, Invocation};
use emacs_custom_app::config::SettingsOverrides;
use emacs_custom_core::logging;

/// Ensure an Emacs customize variable has the given value.
///
/// Prints one JSON result object on stdout and exits non-zero on failure.
#[derive(Parser, Debug)]
#[command(name = "emacs-custom")]
#[command(about = "Idempotently set an Emacs customize variable", long_about = None)]
struct Args {
    /// Module arguments JSON file (as passed by Ansible to binary modules)
    #[arg(value_name = "ARGS_FILE")]
    args_file: Option<PathBuf>,

    /// Name of the variable to set
    #[arg(long)]
    name: Option<String>,

    /// Desired value, as an Elisp expression
    #[arg(long, allow_hyphen_values = true)]
    value: Option<String>,

    /// Report what would change without saving anything
    #[arg(long)]
    check: bool,

    /// Emacs executable to run
    #[arg(long, value_name = "PROGRAM")]
    emacs: Option<String>,

    /// Emacs profile user (defaults to the current user)
    #[arg(long)]
    user: Option<String>,

    /// Give up on a single Emacs process after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Config file (defaults to ~/.config/emacs-custom/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl From<Args> for Invocation {
    fn from(args: Args) -> Self {
        Self {
            args_file: args.args_file,
            name: args.name,
            value: args.value,
            check_mode: args.check,
            config_path: args.config,
            overrides: SettingsOverrides {
                program: args.emacs,
                user: args.user,
                timeout_secs: args.timeout,
            },
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();

    // Logging is best-effort; the result record matters more than the log file
    if let Err(e) = logging::init() {
        eprintln!("emacs-custom: logging disabled: {}", e);
    }

    let outcome = run_module(args.into()).await;
    emit(&outcome);

    Ok(ExitCode::from(outcome.exit_code()))
}
