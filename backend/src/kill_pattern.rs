//! Recognising processes spawned by the current build.

use crate::context::ExecContext;
use crate::types::ProcError;
use regex::Regex;
use std::path::Path;

/// Regex over one line of process listing output.
///
/// When the pattern has a first capture group, that group is the command
/// text handed to callers; otherwise the whole match is.
#[derive(Debug, Clone)]
pub struct KillPattern {
    regex: Regex,
}

impl KillPattern {
    pub fn new(pattern: &str) -> Result<Self, ProcError> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Pattern for JVM processes started from the build rooted at `root`.
    ///
    /// Matches a `java` launcher that runs one of:
    /// - a classpath rooted in `root` that loads from a `build` directory
    /// - the Kotlin compile daemon
    /// - a Play dev server whose classpath is rooted in `root`
    pub fn generate(root: &Path, separator: char) -> Result<Self, ProcError> {
        let root = regex::escape(&root.to_string_lossy());
        let sep = regex::escape(&separator.to_string());

        // The root must be followed by a separator so `/a/proj` never
        // claims `/a/proj-other`.
        let build_classpath =
            format!(r#"(?:-(?:classpath|cp) "?{root}(?:{sep}.*?)?{sep}build{sep}.+?)"#);
        let kotlin_daemon = r"(?:-Dkotlin\.environment\.keepalive.+org\.jetbrains\.kotlin\.daemon\.KotlinCompileDaemon)";
        let play_server =
            format!(r"(?:-classpath.+{root}{sep}.+?play\.core\.server\.NettyServer)");

        Self::new(&format!(
            r"(?i)[/\\](java(?:\.exe)?.+?(?:{build_classpath}|{kotlin_daemon}|{play_server}).*)"
        ))
    }

    /// [`KillPattern::generate`] for the context's root and platform.
    pub fn for_context(ctx: &ExecContext) -> Result<Self, ProcError> {
        Self::generate(ctx.root_dir(), ctx.platform().separator())
    }

    /// Matched command text within `line`, if the line matches.
    pub fn find<'a>(&self, line: &'a str) -> Option<&'a str> {
        let caps = self.regex.captures(line)?;
        caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
