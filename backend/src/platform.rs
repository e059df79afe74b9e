//! Per-OS process listing and termination commands.
//!
//! Both platforms list processes as free text. The leak pattern is applied
//! to each line of that text; the platform only knows how to produce the
//! text, where the pid sits on a line, and how to kill a pid.

use crate::types::CommandOutput;
use regex::Regex;
use std::sync::LazyLock;

static POSIX_PID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)").unwrap());
static WINDOWS_PID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)\s*$").unwrap());

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl Invocation {
    fn new(program: &'static str, args: &[&str]) -> Self {
        Self {
            program,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

pub trait ProcessPlatform: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Command that prints every process with its command line.
    fn list_command(&self) -> Invocation;

    /// Text scanned for leaking processes once the listing succeeded.
    fn listing_text(&self, output: &CommandOutput) -> String;

    /// Pid found on one line of listing output.
    fn pid_in_line<'a>(&self, line: &'a str) -> Option<&'a str>;

    /// Command that terminates `pid`.
    fn kill_command(&self, pid: &str) -> Invocation;

    /// Path separator used on command lines of this platform.
    fn separator(&self) -> char;
}

/// `ps x` / `kill` on Linux, macOS and the BSDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixPlatform;

impl ProcessPlatform for PosixPlatform {
    fn name(&self) -> &'static str {
        "posix"
    }

    fn list_command(&self) -> Invocation {
        Invocation::new("ps", &["x"])
    }

    fn listing_text(&self, output: &CommandOutput) -> String {
        // ps writes its complaints into the same stream that gets scanned.
        output.combined()
    }

    fn pid_in_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        POSIX_PID.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
    }

    fn kill_command(&self, pid: &str) -> Invocation {
        Invocation::new("kill", &[pid])
    }

    fn separator(&self) -> char {
        '/'
    }
}

/// `wmic` / `taskkill` on Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsPlatform;

impl ProcessPlatform for WindowsPlatform {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn list_command(&self) -> Invocation {
        Invocation::new("wmic", &["process", "get", "processid,commandline"])
    }

    fn listing_text(&self, output: &CommandOutput) -> String {
        output.stdout.clone()
    }

    fn pid_in_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        WINDOWS_PID.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
    }

    fn kill_command(&self, pid: &str) -> Invocation {
        Invocation::new("taskkill.exe", &["/F", "/T", "/PID", pid])
    }

    fn separator(&self) -> char {
        '\\'
    }
}

/// Platform of the machine this binary runs on.
pub fn host_platform() -> &'static dyn ProcessPlatform {
    if cfg!(windows) {
        &WindowsPlatform
    } else {
        &PosixPlatform
    }
}
