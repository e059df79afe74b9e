//! Finding processes this build left running.

use crate::context::ExecContext;
use crate::kill_pattern::KillPattern;
use crate::types::{CommandOutput, ProcError, ProcessRecord};
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Calls `handler` once for every process whose listing line matches
/// `matcher`, has a pid, and does not belong to the running tool.
///
/// Fails without calling `handler` when the process listing itself fails;
/// the raw listing output is written to `<build_dir>/errorLogs` first.
pub fn for_each_leaking_process<F>(
    ctx: &ExecContext,
    matcher: &KillPattern,
    mut handler: F,
) -> Result<(), ProcError>
where
    F: FnMut(ProcessRecord),
{
    let platform = ctx.platform();
    let list = platform.list_command();

    let output = match ctx.runner().run(list.program, &list.args) {
        Ok(output) => output,
        Err(ProcError::Spawn { command, source }) => {
            let failed = CommandOutput {
                code: None,
                stdout: String::new(),
                stderr: format!("Failed to spawn `{command}`: {source}"),
            };
            return Err(listing_failed(ctx, &failed)?);
        }
        Err(e) => return Err(e),
    };

    if !output.success() {
        return Err(listing_failed(ctx, &output)?);
    }

    for line in platform.listing_text(&output).lines() {
        let Some(command_line) = matcher.find(line) else {
            continue;
        };
        let Some(pid) = platform.pid_in_line(line) else {
            tracing::debug!(line, "leak pattern matched but no pid found");
            continue;
        };
        if ctx.is_me(command_line) {
            tracing::debug!(pid, "skipping own process");
            continue;
        }
        handler(ProcessRecord {
            pid: pid.to_string(),
            command_line: command_line.to_string(),
        });
    }

    Ok(())
}

/// Collects every leaking process instead of visiting them one by one.
pub fn leaking_processes(
    ctx: &ExecContext,
    matcher: &KillPattern,
) -> Result<Vec<ProcessRecord>, ProcError> {
    let mut found = Vec::new();
    for_each_leaking_process(ctx, matcher, |record| found.push(record))?;
    Ok(found)
}

/// Writes the failed listing to a timestamped log and builds the error
/// pointing at it.
fn listing_failed(ctx: &ExecContext, output: &CommandOutput) -> Result<ProcError, ProcError> {
    let log = write_listing_log(ctx, output)?;
    ctx.reporter().info(&format!(
        "Error obtaining process list, output log created at {}",
        log.display()
    ));
    Ok(ProcError::ListingFailed {
        code: output.code,
        log,
    })
}

fn write_listing_log(ctx: &ExecContext, output: &CommandOutput) -> Result<PathBuf, ProcError> {
    let dir = ctx.build_dir().join("errorLogs");
    let millis = chrono::Utc::now().timestamp_millis();
    let contents = format!(
        "[Output]\n{}\n[Error Output]\n{}",
        output.stdout, output.stderr
    );

    fs::create_dir_all(&dir)
        .and_then(|()| create_log(&dir, millis, &contents))
        .map_err(|source| ProcError::DiagnosticLog {
            path: dir.join(log_name(millis, 0)),
            source,
        })
}

fn log_name(millis: i64, attempt: u32) -> String {
    match attempt {
        0 => format!("process-list-{millis}.log"),
        n => format!("process-list-{millis}-{n}.log"),
    }
}

/// Creates a fresh log for `millis`, never overwriting an earlier one
/// from the same millisecond.
fn create_log(dir: &Path, millis: i64, contents: &str) -> io::Result<PathBuf> {
    let mut attempt = 0;
    loop {
        let path = dir.join(log_name(millis, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(contents.as_bytes())?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}
