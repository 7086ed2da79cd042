//! CLI entry point for the nabu structural PDF fingerprinting engine.
//!
//! Parses command-line arguments with clap, executes `build`/`score`/
//! `cluster`, renders the outcome, and maps errors to exit codes. Logging is
//! initialized eagerly so subsequent operations can emit structured
//! diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use nabu_cli::{
    cli::{Cli, CliError, Outcome, render_build_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::error;

/// Parse CLI arguments, execute the command, render the outcome, and flush
/// the output stream.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let outcome = run_cli(cli, &mut writer).context("failed to execute command")?;
    if let Outcome::Built(summary) = outcome {
        render_build_summary(&summary, &mut writer).context("failed to render summary")?;
    }
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code = err
            .chain()
            .find_map(|cause| {
                let cause: &(dyn std::error::Error + 'static) = cause;
                cause.downcast_ref::<CliError>().and_then(|cli_error| match cli_error {
                    CliError::Core(core) => Some(core.code()),
                    CliError::ClusterNotImplemented => None,
                })
            });

        error!(error = %err, code = ?code.map(|c| c.as_str()), "command execution failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Emit a fallback diagnostic to stderr when tracing initialization fails.
#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
