//! Spawning external commands.

use crate::types::{CommandOutput, ProcError};
use std::process::Command;

/// Runs a program to completion and captures what it wrote.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ProcError>;
}

/// Runs commands on the host with `std::process::Command`.
///
/// Blocks until the child exits; no timeout is applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ProcError> {
        tracing::debug!(program, ?args, "running command");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ProcError::Spawn {
                command: display_command(program, args),
                source,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

pub(crate) fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
