//! Data types and error definitions for build cleanup.

use std::path::PathBuf;
use thiserror::Error;

/// A process picked out of the OS process listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: String,
    pub command_line: String,
}

/// True for a positive decimal process id.
///
/// `0` and negative values address process groups rather than a single
/// process, so they are never accepted.
pub fn is_valid_pid(pid: &str) -> bool {
    !pid.is_empty()
        && pid.bytes().all(|b| b.is_ascii_digit())
        && pid.parse::<u32>().is_ok_and(|n| n > 0)
}

/// Captured result of running an external command to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout followed by stderr, as if both streams shared one pipe.
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }
}

/// Errors that can occur while listing or signalling processes.
#[derive(Error, Debug)]
pub enum ProcError {
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Process listing failed with exit code {code:?}, output log written to {}", log.display())]
    ListingFailed { code: Option<i32>, log: PathBuf },
    #[error("Failed to write process listing log {}: {source}", path.display())]
    DiagnosticLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{0}' is not a process id")]
    InvalidPid(String),
    #[error("Invalid leaking process pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Daemon registry error at {}: {source}", path.display())]
    Registry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while pruning cache directories.
#[derive(Error, Debug)]
pub enum PruneError {
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors produced when a string is not a recognised tool version.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("'{0}' is not a valid version")]
    Malformed(String),
    #[error("Version component '{0}' is out of range")]
    Overflow(String),
}
