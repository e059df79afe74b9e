//! UI-agnostic build cleanup library.
//!
//! Provides functions for finding and killing processes a build left
//! running, and for pruning cache directories of older tool versions.
//! Operations take an explicit [`ExecContext`] for spawning commands,
//! resolving build paths and reporting what they did.

mod cache_prune;
mod command;
mod context;
mod daemons;
mod kill_pattern;
mod platform;
mod process_kill;
mod process_list;
mod reporter;
mod types;
mod version;

pub use cache_prune::{
    clean_up_caches, remove_cached_scripts, remove_dodgy_cache_files,
    remove_old_versions_from_dir, CacheCleanupPolicy, CACHED_SCRIPT_DIRS, DODGY_STATE_DIRS,
};
pub use command::{CommandRunner, SystemCommandRunner};
pub use context::ExecContext;
pub use daemons::DaemonRegistry;
pub use kill_pattern::KillPattern;
pub use platform::{host_platform, Invocation, PosixPlatform, ProcessPlatform, WindowsPlatform};
pub use process_kill::{kill_leaking_processes, kill_pid};
pub use process_list::{for_each_leaking_process, leaking_processes};
pub use reporter::{Level, MemoryReporter, Reporter, TracingReporter};
pub use types::{
    is_valid_pid, CommandOutput, ProcError, ProcessRecord, PruneError, VersionError,
};
pub use version::{matches_version_grammar, Stage, ToolVersion};
