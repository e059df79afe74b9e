//! Leaking process commands.

use anyhow::Result;
use backend::{for_each_leaking_process, kill_leaking_processes, ExecContext, KillPattern};

pub fn list_leaking(ctx: &ExecContext) -> Result<()> {
    let pattern = KillPattern::for_context(ctx)?;
    tracing::debug!(pattern = pattern.as_str(), "leak pattern");

    let mut count = 0;
    for_each_leaking_process(ctx, &pattern, |process| {
        println!("{:>8}  {}", process.pid, process.command_line);
        count += 1;
    })?;
    tracing::info!("{count} leaking process(es) found");
    Ok(())
}

pub fn kill_leaking(ctx: &ExecContext, dry_run: bool) -> Result<()> {
    if dry_run {
        return list_leaking(ctx);
    }
    let pattern = KillPattern::for_context(ctx)?;
    let killed = kill_leaking_processes(ctx, &pattern)?;
    tracing::info!("{killed} leaking process(es) killed");
    Ok(())
}
