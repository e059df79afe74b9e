//! Pruning cache and state directories left behind by older tool versions.
//!
//! Every pass only looks at the immediate children of the directory it is
//! given. A directory that does not exist is not an error, and neither is
//! a target that disappears between listing and deletion.

use crate::context::ExecContext;
use crate::types::PruneError;
use crate::version::{matches_version_grammar, ToolVersion};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Script caches that are always safe to drop.
pub const CACHED_SCRIPT_DIRS: [&str; 4] = [
    "scripts",
    "scripts-remapped",
    "gradle-kotlin-dsl",
    "gradle-kotlin-dsl-accessors",
];

/// State caches older versions did not guard against concurrent use.
pub const DODGY_STATE_DIRS: [&str; 3] = ["fileHashes", "outputFileStates", "fileSnapshots"];

/// Removes children of `dir` named `<prefix><version><suffix>` whose
/// version satisfies `should_delete`.
///
/// Names without that framing, or whose version does not parse, are left
/// alone.
pub fn remove_old_versions_from_dir<F>(
    ctx: &ExecContext,
    dir: &Path,
    should_delete: F,
    prefix: &str,
    suffix: &str,
) -> Result<(), PruneError>
where
    F: Fn(&ToolVersion) -> bool,
{
    for (name, path) in child_dirs(dir)? {
        let Some(version) = framed_version(&name, prefix, suffix) else {
            continue;
        };
        if should_delete(&version) {
            ctx.reporter()
                .info(&format!("Removing old cache directory : {}", path.display()));
            delete_dir(&path)?;
        }
    }
    Ok(())
}

/// Removes compiled build script caches under every child of `caches_dir`.
pub fn remove_cached_scripts(ctx: &ExecContext, caches_dir: &Path) -> Result<(), PruneError> {
    for (_, cache_dir) in child_dirs(caches_dir)? {
        for name in CACHED_SCRIPT_DIRS {
            let scripts = cache_dir.join(name);
            if scripts.is_dir() {
                ctx.reporter()
                    .info(&format!("Removing scripts cache directory : {}", scripts.display()));
                delete_dir(&scripts)?;
            }
        }
    }
    Ok(())
}

/// Removes multi-process-unsafe state caches from version-named children
/// of `dir`.
pub fn remove_dodgy_cache_files(ctx: &ExecContext, dir: &Path) -> Result<(), PruneError> {
    for (name, cache_dir) in child_dirs(dir)? {
        if !matches_version_grammar(&name) {
            continue;
        }
        for state in DODGY_STATE_DIRS {
            let state_dir = cache_dir.join(state);
            if state_dir.is_dir() {
                ctx.reporter()
                    .info(&format!("Removing old cache directory : {}", state_dir.display()));
                delete_dir(&state_dir)?;
            }
        }
    }
    Ok(())
}

/// What a full cache cleanup pass removes.
#[derive(Debug, Clone, Default)]
pub struct CacheCleanupPolicy {
    /// Versioned directories below this version are removed.
    pub older_than: Option<ToolVersion>,
    /// Only remove versioned directories that are snapshots.
    pub snapshots_only: bool,
    pub prefix: String,
    pub suffix: String,
    pub cached_scripts: bool,
    pub dodgy_state: bool,
}

impl CacheCleanupPolicy {
    /// Whether a versioned directory at `version` should go.
    pub fn should_delete(&self, version: &ToolVersion) -> bool {
        if self.snapshots_only && !version.is_snapshot() {
            return false;
        }
        match &self.older_than {
            Some(limit) => version < limit,
            None => self.snapshots_only,
        }
    }
}

/// Runs every pass `policy` enables over `caches_dir`.
pub fn clean_up_caches(
    ctx: &ExecContext,
    caches_dir: &Path,
    policy: &CacheCleanupPolicy,
) -> Result<(), PruneError> {
    if policy.older_than.is_some() || policy.snapshots_only {
        remove_old_versions_from_dir(
            ctx,
            caches_dir,
            |v| policy.should_delete(v),
            &policy.prefix,
            &policy.suffix,
        )?;
    }
    if policy.cached_scripts {
        remove_cached_scripts(ctx, caches_dir)?;
    }
    if policy.dodgy_state {
        remove_dodgy_cache_files(ctx, caches_dir)?;
    }
    Ok(())
}

/// Version between `prefix` and `suffix` in `name`, if it has that shape.
fn framed_version(name: &str, prefix: &str, suffix: &str) -> Option<ToolVersion> {
    let interior = name.strip_prefix(prefix)?.strip_suffix(suffix)?;
    if !matches_version_grammar(interior) {
        return None;
    }
    ToolVersion::parse(interior).ok()
}

/// Immediate child directories of `dir` with their names, sorted by name.
fn child_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>, PruneError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = fs::read_dir(dir).map_err(|source| PruneError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut dirs: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            Some((name, path))
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn delete_dir(path: &Path) -> Result<(), PruneError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PruneError::Delete {
            path: path.to_path_buf(),
            source,
        }),
    }
}
