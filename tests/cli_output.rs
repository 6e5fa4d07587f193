use std::ffi::OsStr;
use std::fs;
use std::process::{Command, Output};

fn gitloc<S: AsRef<OsStr>>(args: &[S]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gitloc"))
        .args(args)
        .env_remove("CLICOLOR_FORCE")
        .env_remove("RUST_LOG")
        .output()
        .expect("run gitloc")
}

#[test]
fn missing_root_argument_exits_with_usage() {
    let out = gitloc::<&str>(&[]);
    assert_eq!(out.status.code(), Some(1));
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("Usage"), "stderr was: {err}");
    assert!(out.stdout.is_empty());
}

#[test]
fn nonexistent_root_prints_failure_result() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let out = gitloc(&[&missing]);
    assert!(out.status.success());
    let s = String::from_utf8_lossy(&out.stdout);
    assert!(s.contains("\"success\": false"));
    assert!(s.contains("path does not exist"));
    assert!(!s.contains("\"data\""));
    assert!(!s.contains("Summary"));
}

#[test]
fn empty_folder_writes_zero_totals_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("workspace");
    fs::create_dir(&root).unwrap();
    let target = dir.path().join("result.json");

    let out = gitloc(&[&root, &target]);
    assert!(
        out.status.success(),
        "gitloc failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("results saved to"));
    assert!(stdout.contains("found 0 repositories"));
    assert!(stdout.contains("Summary"));

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(v["success"], true);
    assert_eq!(v["message"], "no repositories found");
    assert_eq!(v["data"]["repositories"].as_array().unwrap().len(), 0);
    let total = &v["data"]["total"];
    for key in [
        "repositoryCount",
        "contributorCount",
        "totalAdded",
        "totalDeleted",
        "totalChanges",
        "totalCommits",
    ] {
        assert_eq!(total[key], 0, "{key}");
    }
}

#[test]
fn repository_progress_and_json_on_stdout() {
    if Command::new("git").arg("--version").output().is_err() {
        eprintln!("git not available; skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path().join("proj");
    fs::create_dir(&repo).unwrap();
    let git = |args: &[&str]| {
        assert!(
            Command::new("git")
                .args(["-c", "commit.gpgsign=false"])
                .args(args)
                .current_dir(&repo)
                .status()
                .unwrap()
                .success()
        );
    };
    git(&["-c", "init.defaultBranch=main", "init", "-q"]);
    fs::write(repo.join("main.rs"), "fn main() {}\n// one\n// two\n").unwrap();
    git(&["add", "."]);
    git(&[
        "-c",
        "user.name=Ada Lovelace",
        "-c",
        "user.email=ada@example.com",
        "commit",
        "-q",
        "-m",
        "initial",
    ]);

    let out = gitloc(&[dir.path()]);
    assert!(out.status.success());
    let s = String::from_utf8_lossy(&out.stdout);
    assert!(s.contains("found 1 repositories"));
    assert!(s.contains("analyzing repository: proj"));
    assert!(s.contains("found 1 contributors"));
    assert!(s.contains("- Ada Lovelace: 3 changes, 1 commits"));
    assert!(s.contains("\"totalChanges\": 3"));
    assert!(s.contains("\"contributorCount\": 1"));
    assert!(s.contains("Summary"));
}

#[test]
fn quiet_suppresses_progress() {
    let dir = tempfile::tempdir().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_gitloc"))
        .arg(dir.path())
        .arg("--quiet")
        .env_remove("CLICOLOR_FORCE")
        .output()
        .expect("run gitloc");
    assert!(out.status.success());
    let s = String::from_utf8_lossy(&out.stdout);
    assert!(!s.contains("scanning folder"));
    assert!(s.contains("\"success\": true"));
}
