//! Explicit execution context handed to every cleanup operation.

use crate::command::{CommandRunner, SystemCommandRunner};
use crate::platform::{host_platform, ProcessPlatform};
use crate::reporter::{Reporter, TracingReporter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything an operation needs from the surrounding build: how to spawn
/// commands, which OS conventions apply, where the build lives, and where
/// messages go.
#[derive(Clone)]
pub struct ExecContext {
    runner: Arc<dyn CommandRunner>,
    platform: &'static dyn ProcessPlatform,
    reporter: Arc<dyn Reporter>,
    root_dir: PathBuf,
    build_dir: PathBuf,
    tool_home: PathBuf,
}

impl ExecContext {
    /// Host defaults: system commands, host platform, `tracing` output.
    /// The build output directory defaults to `<root_dir>/build`.
    pub fn new(root_dir: impl Into<PathBuf>, tool_home: impl Into<PathBuf>) -> Self {
        let root_dir = root_dir.into();
        Self {
            runner: Arc::new(SystemCommandRunner),
            platform: host_platform(),
            reporter: Arc::new(TracingReporter),
            build_dir: root_dir.join("build"),
            root_dir,
            tool_home: tool_home.into(),
        }
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_platform(mut self, platform: &'static dyn ProcessPlatform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_build_dir(mut self, build_dir: impl Into<PathBuf>) -> Self {
        self.build_dir = build_dir.into();
        self
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    pub fn platform(&self) -> &'static dyn ProcessPlatform {
        self.platform
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    /// Root directory of the build tree being cleaned.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Build output directory; diagnostics and the daemon registry live here.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Installation directory of the running build tool.
    pub fn tool_home(&self) -> &Path {
        &self.tool_home
    }

    /// True when `command_line` belongs to the running tool itself.
    ///
    /// An empty tool home claims every process, so an unconfigured context
    /// never reports anything as leaking.
    pub fn is_me(&self, command_line: &str) -> bool {
        command_line.contains(self.tool_home.to_string_lossy().as_ref())
    }
}

impl std::fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecContext")
            .field("platform", &self.platform.name())
            .field("root_dir", &self.root_dir)
            .field("build_dir", &self.build_dir)
            .field("tool_home", &self.tool_home)
            .finish_non_exhaustive()
    }
}
