//! Command line surface and dispatch.

pub mod caches;
pub mod daemons;
pub mod processes;

use anyhow::{bail, Context, Result};
use backend::{is_valid_pid, ExecContext};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "janitor", version, about = "Kill leaking build processes and prune stale caches")]
pub struct Cli {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the build lives and which tool installation is running it.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Root directory of the build tree
    #[arg(long, env = "JANITOR_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Installation directory of the running build tool; its processes are never killed
    #[arg(long, env = "JANITOR_TOOL_HOME", global = true)]
    pub tool_home: Option<PathBuf>,

    /// Build output directory [default: <root>/build]
    #[arg(long, env = "JANITOR_BUILD_DIR", global = true)]
    pub build_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print processes left running by this build
    ListLeaking,
    /// Kill processes left running by this build
    KillLeaking {
        /// Only print what would be killed
        #[arg(long)]
        dry_run: bool,
    },
    /// Kill a single process
    Kill { pid: String },
    /// Remove stale cache directories
    PruneCaches(caches::PruneArgs),
    /// Track daemons started by the build
    #[command(subcommand)]
    Daemons(daemons::DaemonsCommand),
}

impl BuildArgs {
    /// Builds the execution context, filling in defaults for anything not
    /// given on the command line or in the environment.
    ///
    /// Without a tool home every process counts as the tool's own, so
    /// nothing is ever reported as leaking.
    pub fn context(&self) -> Result<ExecContext> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().context("Failed to resolve current directory")?,
        };
        let root = std::path::absolute(&root)
            .with_context(|| format!("Failed to resolve build root {}", root.display()))?;

        let tool_home = self.tool_home.clone().unwrap_or_default();

        let mut ctx = ExecContext::new(root, tool_home);
        if let Some(build_dir) = &self.build_dir {
            ctx = ctx.with_build_dir(build_dir);
        }
        Ok(ctx)
    }

    /// Leak detection must know which installation is running the build.
    pub fn require_tool_home(&self) -> Result<&Path> {
        match self.tool_home.as_deref() {
            Some(home) if !home.as_os_str().is_empty() => Ok(home),
            _ => bail!(
                "The build tool's installation directory is required to tell its own \
                 processes apart from leaks; pass --tool-home or set JANITOR_TOOL_HOME"
            ),
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if matches!(cli.command, Command::ListLeaking | Command::KillLeaking { .. }) {
        cli.build.require_tool_home()?;
    }
    let ctx = cli.build.context()?;
    tracing::debug!(?ctx, "resolved build context");

    match cli.command {
        Command::ListLeaking => processes::list_leaking(&ctx),
        Command::KillLeaking { dry_run } => processes::kill_leaking(&ctx, dry_run),
        Command::Kill { pid } => {
            if !is_valid_pid(&pid) {
                bail!("'{pid}' is not a process id");
            }
            backend::kill_pid(&ctx, &pid);
            Ok(())
        }
        Command::PruneCaches(args) => caches::prune(&ctx, &args),
        Command::Daemons(command) => daemons::run(&ctx, command),
    }
}
