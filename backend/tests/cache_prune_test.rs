use backend::{
    clean_up_caches, remove_cached_scripts, remove_dodgy_cache_files, remove_old_versions_from_dir,
    CacheCleanupPolicy, ExecContext, MemoryReporter, ToolVersion,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn context(root: &Path) -> (ExecContext, Arc<MemoryReporter>) {
    let reporter = Arc::new(MemoryReporter::new());
    let ctx = ExecContext::new(root, "/opt/tool").with_reporter(reporter.clone());
    (ctx, reporter)
}

fn make_dirs(root: &Path, dirs: &[&str]) {
    for dir in dirs {
        fs::create_dir_all(root.join(dir)).unwrap();
        fs::write(root.join(dir).join("marker.bin"), b"x").unwrap();
    }
}

fn version(text: &str) -> ToolVersion {
    ToolVersion::parse(text).unwrap()
}

#[test]
fn grammar_versions_are_candidates_and_others_are_not() {
    let scratch = TempDir::new().unwrap();
    let (ctx, _) = context(scratch.path());
    make_dirs(
        scratch.path(),
        &[
            "cache-6.0",
            "cache-7.1.2",
            "cache-8.0-rc-1",
            "cache-8.0-milestone-1-20210101120000+0000",
            "cache-abcxyz",
            "cache-7.x",
        ],
    );

    remove_old_versions_from_dir(&ctx, scratch.path(), |_| true, "cache-", "").unwrap();

    let mut left: Vec<String> = fs::read_dir(scratch.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    left.sort();
    assert_eq!(left, vec!["cache-7.x", "cache-abcxyz"]);
}

#[test]
fn never_deleting_predicate_keeps_everything() {
    let scratch = TempDir::new().unwrap();
    let (ctx, reporter) = context(scratch.path());
    make_dirs(scratch.path(), &["gradle-6.9", "gradle-7.0", "gradle-8.1"]);

    remove_old_versions_from_dir(&ctx, scratch.path(), |_| false, "gradle-", "").unwrap();

    for name in ["gradle-6.9", "gradle-7.0", "gradle-8.1"] {
        assert!(scratch.path().join(name).is_dir());
    }
    assert!(reporter.entries().is_empty());
}

#[test]
fn only_versions_below_limit_are_removed() {
    let scratch = TempDir::new().unwrap();
    let (ctx, reporter) = context(scratch.path());
    make_dirs(scratch.path(), &["gradle-6.9", "gradle-7.0", "gradle-8.1"]);
    let limit = version("7.0");

    remove_old_versions_from_dir(&ctx, scratch.path(), |v| v < &limit, "gradle-", "").unwrap();

    assert!(!scratch.path().join("gradle-6.9").exists());
    assert!(scratch.path().join("gradle-7.0").is_dir());
    assert!(scratch.path().join("gradle-8.1").is_dir());

    let infos = reporter.messages(backend::Level::Info);
    assert_eq!(infos.len(), 1);
    assert!(infos[0].starts_with("Removing old cache directory : "));
    assert!(infos[0].contains("gradle-6.9"));
}

#[test]
fn suffix_framing_is_required() {
    let scratch = TempDir::new().unwrap();
    let (ctx, _) = context(scratch.path());
    make_dirs(scratch.path(), &["wrapper-6.0-bin", "wrapper-6.0-all", "wrapper-6.0"]);

    remove_old_versions_from_dir(&ctx, scratch.path(), |_| true, "wrapper-", "-bin").unwrap();

    assert!(!scratch.path().join("wrapper-6.0-bin").exists());
    assert!(scratch.path().join("wrapper-6.0-all").is_dir());
    assert!(scratch.path().join("wrapper-6.0").is_dir());
}

#[test]
fn plain_files_are_never_removed() {
    let scratch = TempDir::new().unwrap();
    let (ctx, _) = context(scratch.path());
    fs::write(scratch.path().join("gradle-6.0"), b"not a dir").unwrap();

    remove_old_versions_from_dir(&ctx, scratch.path(), |_| true, "gradle-", "").unwrap();

    assert!(scratch.path().join("gradle-6.0").is_file());
}

#[test]
fn missing_directory_is_a_no_op() {
    let scratch = TempDir::new().unwrap();
    let (ctx, reporter) = context(scratch.path());
    let missing = scratch.path().join("does-not-exist");

    remove_old_versions_from_dir(&ctx, &missing, |_| true, "", "").unwrap();
    remove_cached_scripts(&ctx, &missing).unwrap();
    remove_dodgy_cache_files(&ctx, &missing).unwrap();

    assert!(reporter.entries().is_empty());
}

#[test]
fn cached_scripts_removed_unconditionally() {
    let scratch = TempDir::new().unwrap();
    let (ctx, reporter) = context(scratch.path());
    make_dirs(
        scratch.path(),
        &["1.0/scripts", "1.0/gradle-kotlin-dsl", "1.0/unrelated-dir", "jars-3/scripts-remapped"],
    );

    remove_cached_scripts(&ctx, scratch.path()).unwrap();

    assert!(!scratch.path().join("1.0/scripts").exists());
    assert!(!scratch.path().join("1.0/gradle-kotlin-dsl").exists());
    assert!(!scratch.path().join("jars-3/scripts-remapped").exists());
    assert!(scratch.path().join("1.0/unrelated-dir").is_dir());
    assert_eq!(reporter.entries().len(), 3);
}

#[test]
fn dodgy_state_only_under_version_named_dirs() {
    let scratch = TempDir::new().unwrap();
    let (ctx, _) = context(scratch.path());
    make_dirs(
        scratch.path(),
        &["7.2/fileHashes", "7.2/outputFileStates", "7.2/kotlin-dsl", "not-a-version/fileHashes"],
    );

    remove_dodgy_cache_files(&ctx, scratch.path()).unwrap();

    assert!(!scratch.path().join("7.2/fileHashes").exists());
    assert!(!scratch.path().join("7.2/outputFileStates").exists());
    assert!(scratch.path().join("7.2/kotlin-dsl").is_dir());
    assert!(scratch.path().join("not-a-version/fileHashes").is_dir());
}

#[test]
fn cleanup_pass_runs_enabled_steps() {
    let scratch = TempDir::new().unwrap();
    let (ctx, _) = context(scratch.path());
    make_dirs(
        scratch.path(),
        &["6.1/fileHashes", "7.5/scripts", "7.5/fileSnapshots", "7.5/journal-1"],
    );
    let policy = CacheCleanupPolicy {
        older_than: Some(version("7.0")),
        cached_scripts: true,
        dodgy_state: true,
        ..Default::default()
    };

    clean_up_caches(&ctx, scratch.path(), &policy).unwrap();

    assert!(!scratch.path().join("6.1").exists());
    assert!(!scratch.path().join("7.5/scripts").exists());
    assert!(!scratch.path().join("7.5/fileSnapshots").exists());
    assert!(scratch.path().join("7.5/journal-1").is_dir());
}

#[test]
fn cleanup_pass_with_default_policy_removes_nothing() {
    let scratch = TempDir::new().unwrap();
    let (ctx, _) = context(scratch.path());
    make_dirs(scratch.path(), &["6.1/fileHashes", "7.5/scripts"]);

    clean_up_caches(&ctx, scratch.path(), &CacheCleanupPolicy::default()).unwrap();

    assert!(scratch.path().join("6.1/fileHashes").is_dir());
    assert!(scratch.path().join("7.5/scripts").is_dir());
}
