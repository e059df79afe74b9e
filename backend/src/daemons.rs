//! Daemons started during a build, recorded so they can be stopped when
//! the build finishes.

use crate::context::ExecContext;
use crate::process_kill::kill_pid;
use crate::types::{is_valid_pid, ProcError};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const REGISTRY_FILE: &str = "daemon-pids.txt";

/// Pid file under the build output directory, one pid per line.
#[derive(Debug, Clone)]
pub struct DaemonRegistry {
    path: PathBuf,
}

impl DaemonRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Registry kept in the context's build directory.
    pub fn for_context(ctx: &ExecContext) -> Self {
        Self::new(ctx.build_dir().join(REGISTRY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records `pid`; a pid already present is not written twice.
    pub fn register(&self, pid: &str) -> Result<(), ProcError> {
        let pid = pid.trim();
        if !is_valid_pid(pid) {
            return Err(ProcError::InvalidPid(pid.to_string()));
        }
        if self.pids()?.iter().any(|p| p == pid) {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.error(e))?;
        writeln!(file, "{pid}").map_err(|e| self.error(e))
    }

    /// Registered pids in registration order. No file means no daemons.
    ///
    /// Lines that are not process ids are dropped.
    pub fn pids(&self) -> Result<Vec<String>, ProcError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .filter(|l| {
                    let valid = is_valid_pid(l);
                    if !valid {
                        tracing::debug!(line = *l, "ignoring registry line that is not a pid");
                    }
                    valid
                })
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(self.error(e)),
        }
    }

    /// Kills every registered daemon and forgets them.
    ///
    /// Returns the number of kill attempts.
    pub fn kill_all(&self, ctx: &ExecContext) -> Result<usize, ProcError> {
        let pids = self.pids()?;
        for pid in &pids {
            ctx.reporter().info(&format!("Killing daemon process {pid}"));
            kill_pid(ctx, pid);
        }
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(self.error(e)),
        }
        Ok(pids.len())
    }

    fn error(&self, source: std::io::Error) -> ProcError {
        ProcError::Registry {
            path: self.path.clone(),
            source,
        }
    }
}
