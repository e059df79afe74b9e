//! Cache pruning command.

use anyhow::{Context, Result};
use backend::{clean_up_caches, CacheCleanupPolicy, ExecContext, ToolVersion};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PruneArgs {
    /// Directory whose children are cache directories
    pub dir: PathBuf,

    /// Remove versioned directories older than this version
    #[arg(long, value_parser = parse_version)]
    pub older_than: Option<ToolVersion>,

    /// Only remove versioned directories that are snapshots
    #[arg(long)]
    pub snapshots_only: bool,

    /// Text before the version in directory names
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Text after the version in directory names
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// Remove compiled build script caches
    #[arg(long)]
    pub scripts: bool,

    /// Remove state caches that are unsafe for concurrent builds
    #[arg(long)]
    pub dodgy: bool,
}

fn parse_version(text: &str) -> Result<ToolVersion, String> {
    ToolVersion::parse(text).map_err(|e| e.to_string())
}

impl PruneArgs {
    pub fn policy(&self) -> CacheCleanupPolicy {
        CacheCleanupPolicy {
            older_than: self.older_than.clone(),
            snapshots_only: self.snapshots_only,
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            cached_scripts: self.scripts,
            dodgy_state: self.dodgy,
        }
    }
}

pub fn prune(ctx: &ExecContext, args: &PruneArgs) -> Result<()> {
    clean_up_caches(ctx, &args.dir, &args.policy())
        .with_context(|| format!("Failed to prune caches in {}", args.dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_prune_flags_into_policy() {
        let cli = Cli::parse_from([
            "janitor",
            "prune-caches",
            "/caches",
            "--older-than",
            "7.0",
            "--prefix",
            "gradle-",
            "--scripts",
        ]);
        let Command::PruneCaches(args) = cli.command else {
            panic!("expected prune-caches");
        };
        let policy = args.policy();
        assert_eq!(policy.older_than.map(|v| v.to_string()), Some("7.0".to_string()));
        assert_eq!(policy.prefix, "gradle-");
        assert!(policy.cached_scripts);
        assert!(!policy.dodgy_state);
    }

    #[test]
    fn rejects_malformed_version() {
        let result = Cli::try_parse_from(["janitor", "prune-caches", "/c", "--older-than", "7.x"]);
        assert!(result.is_err());
    }

    #[test]
    fn prune_removes_old_versions() {
        let scratch = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(scratch.path().join("6.0")).unwrap();
        std::fs::create_dir_all(scratch.path().join("8.0")).unwrap();
        let ctx = ExecContext::new(scratch.path(), "/opt/tool");
        let args = PruneArgs {
            dir: scratch.path().to_path_buf(),
            older_than: Some(ToolVersion::parse("7.0").unwrap()),
            snapshots_only: false,
            prefix: String::new(),
            suffix: String::new(),
            scripts: false,
            dodgy: false,
        };

        prune(&ctx, &args).unwrap();

        assert!(!scratch.path().join("6.0").exists());
        assert!(scratch.path().join("8.0").is_dir());
    }
}
