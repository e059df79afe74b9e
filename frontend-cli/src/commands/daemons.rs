//! Daemon registry commands.

use anyhow::Result;
use backend::{DaemonRegistry, ExecContext};
use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum DaemonsCommand {
    /// Record a daemon pid started by this build
    Register { pid: String },
    /// Print recorded daemon pids
    List,
    /// Kill every recorded daemon and clear the registry
    Kill,
}

pub fn run(ctx: &ExecContext, command: DaemonsCommand) -> Result<()> {
    let registry = DaemonRegistry::for_context(ctx);
    match command {
        DaemonsCommand::Register { pid } => {
            registry.register(&pid)?;
            tracing::debug!(pid = %pid, registry = %registry.path().display(), "daemon registered");
        }
        DaemonsCommand::List => {
            for pid in registry.pids()? {
                println!("{pid}");
            }
        }
        DaemonsCommand::Kill => {
            let killed = registry.kill_all(ctx)?;
            tracing::info!("{killed} daemon(s) stopped");
        }
    }
    Ok(())
}
