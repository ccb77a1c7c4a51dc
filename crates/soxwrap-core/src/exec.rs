//! External process execution
//!
//! One synchronous invocation per operation: spawn, capture stdout and
//! stderr, block until exit. There is no pooling and no retry; a spawn
//! failure and a non-zero exit are reported identically.

use crate::command::CommandSpec;
use crate::error::SoxError;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Run `program` with the rendered argument vector and wait for it.
pub fn run(
    program: &str,
    spec: &CommandSpec,
    source: Option<&Path>,
    dest: Option<&Path>,
    operation: &str,
    input: &str,
) -> Result<Output, SoxError> {
    let argv = spec.render(source, dest);
    log::debug!("{}: {} {:?}", operation, program, argv);

    let output = Command::new(program)
        .args(&argv)
        .stdin(Stdio::null())
        .output();

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            log::debug!("{}: failed to spawn {}: {}", operation, program, e);
            return Err(SoxError::command_failed(operation, input));
        }
    };

    if !output.status.success() {
        log::debug!(
            "{}: {} exited with {} ({})",
            operation,
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Err(SoxError::command_failed(operation, input));
    }

    Ok(output)
}

/// Check whether `program` responds to `--version`. Used for an early
/// warning; operations still fail per-call when the binary is absent.
pub fn available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
