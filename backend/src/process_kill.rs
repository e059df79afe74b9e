//! Process killing functionality.

use crate::context::ExecContext;
use crate::kill_pattern::KillPattern;
use crate::process_list::for_each_leaking_process;
use crate::types::{is_valid_pid, ProcError};

/// Marker left by `kill` when the target exited before the signal arrived.
const ALREADY_GONE: &str = "No such process";

/// Kill a process by pid with the platform's kill command.
///
/// Never fails: a pid that already exited is ignored, any other failure
/// becomes a single warning on the context reporter. Anything other than a
/// positive decimal pid is refused before a command is spawned.
pub fn kill_pid(ctx: &ExecContext, pid: &str) {
    if !is_valid_pid(pid) {
        ctx.reporter()
            .warn(&format!("Refusing to kill '{pid}': not a process id"));
        return;
    }
    let kill = ctx.platform().kill_command(pid);
    tracing::debug!(pid, program = kill.program, "killing process");

    let output = match ctx.runner().run(kill.program, &kill.args) {
        Ok(output) if output.success() => return,
        Ok(output) => output.combined(),
        Err(e) => e.to_string(),
    };

    if output.contains(ALREADY_GONE) {
        return;
    }
    ctx.reporter().warn(&format!(
        "Failed to kill daemon process {pid}. Maybe already killed?\nOutput: {output}"
    ));
}

/// Kill every process `matcher` identifies as left over by this build.
///
/// Returns the number of kill attempts. Listing failures are fatal; single
/// kill failures are only reported.
pub fn kill_leaking_processes(
    ctx: &ExecContext,
    matcher: &KillPattern,
) -> Result<usize, ProcError> {
    let mut leaking = Vec::new();
    for_each_leaking_process(ctx, matcher, |record| leaking.push(record))?;

    for record in &leaking {
        ctx.reporter().info(&format!(
            "A process wasn't shutdown properly in a previous build. Killing {} ({})",
            record.pid, record.command_line
        ));
        kill_pid(ctx, &record.pid);
    }
    Ok(leaking.len())
}
