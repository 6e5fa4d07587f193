use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use ignore::{DirEntry, WalkBuilder};
use tracing::debug;

/// Directory holding git metadata; its parent is a repository root.
pub const GIT_DIR: &str = ".git";

/// Dependency, build and cache directories never searched for repositories.
pub const SKIP_DIRS: [&str; 9] = [
    "node_modules",
    "vendor",
    "venv",
    "__pycache__",
    ".venv",
    "env",
    "build",
    "dist",
    ".next",
];

pub struct TraversalOptions {
    pub follow_symlinks: bool,
    pub skip_dirs: Vec<String>,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        TraversalOptions {
            follow_symlinks: false,
            skip_dirs: SKIP_DIRS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// True when a directory name contains any denylisted name.
pub fn is_skipped(name: &OsStr, skip_dirs: &[String]) -> bool {
    let name = name.to_string_lossy();
    skip_dirs.iter().any(|d| name.contains(d.as_str()))
}

/// True when any directory of `path` (leading components included) is denylisted.
pub fn in_skipped_dir(path: &Path, skip_dirs: &[String]) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(n) if is_skipped(n, skip_dirs)))
}

fn prune(e: &DirEntry, skip_dirs: &[String]) -> bool {
    if e.depth() == 0 {
        return false;
    }
    // don't descend into metadata directories themselves
    if e.path()
        .parent()
        .and_then(Path::file_name)
        .is_some_and(|p| p == GIT_DIR)
    {
        return true;
    }
    let is_dir = e.file_type().is_some_and(|t| t.is_dir());
    is_dir && e.file_name() != GIT_DIR && is_skipped(e.file_name(), skip_dirs)
}

/// Every repository root under `root`, in traversal order.
///
/// Nested repositories are reported independently. A candidate whose full
/// path has a denylisted component is dropped; below `root` the walk prunes
/// such directories instead of entering them.
pub fn find_repositories(root: &Path, opts: &TraversalOptions) -> Vec<PathBuf> {
    // every candidate path starts with root
    if in_skipped_dir(root, &opts.skip_dirs) {
        debug!(root = %root.display(), "root lies in a denylisted directory");
        return Vec::new();
    }

    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false);
    builder.follow_links(opts.follow_symlinks);
    builder.sort_by_file_name(|a, b| a.cmp(b));

    let skip_dirs = opts.skip_dirs.clone();
    builder.filter_entry(move |e| !prune(e, &skip_dirs));

    let mut out = Vec::new();
    for dent in builder.build() {
        let dent = match dent {
            Ok(d) => d,
            Err(err) => {
                debug!("skip unreadable entry: {err}");
                continue;
            }
        };
        if dent.file_name() != GIT_DIR || !dent.path().is_dir() {
            continue;
        }
        match dent.path().parent() {
            Some(repo) if !in_skipped_dir(repo, &opts.skip_dirs) => out.push(repo.to_path_buf()),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn mk_repo(root: &Path, rel: &str) -> PathBuf {
        let p = root.join(rel);
        fs::create_dir_all(p.join(GIT_DIR)).unwrap();
        p
    }

    #[test]
    fn finds_nested_repositories() {
        let dir = tempfile::tempdir().unwrap();
        let a = mk_repo(dir.path(), "a");
        let b = mk_repo(dir.path(), "a/libs/b");
        let c = mk_repo(dir.path(), "group/c");
        let found = find_repositories(dir.path(), &TraversalOptions::default());
        assert_eq!(found.len(), 3);
        for p in [a, b, c] {
            assert!(found.contains(&p), "missing {}", p.display());
        }
    }

    #[test]
    fn root_itself_can_be_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(GIT_DIR)).unwrap();
        let found = find_repositories(dir.path(), &TraversalOptions::default());
        assert_eq!(found, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn denylisted_directories_are_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let app = mk_repo(dir.path(), "app");
        mk_repo(dir.path(), "app/node_modules/left-pad");
        mk_repo(dir.path(), "app/target-build-cache/x");
        mk_repo(dir.path(), "py/.venv/src/pkg");
        let found = find_repositories(dir.path(), &TraversalOptions::default());
        assert_eq!(found, vec![app]);
    }

    #[test]
    fn plain_file_named_git_is_not_a_repository() {
        // worktrees and submodules use a `.git` file
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join(GIT_DIR), "gitdir: ../elsewhere").unwrap();
        assert!(find_repositories(dir.path(), &TraversalOptions::default()).is_empty());
    }

    #[test]
    fn denylist_matches_substrings() {
        let skip = TraversalOptions::default().skip_dirs;
        assert!(is_skipped(OsStr::new("node_modules"), &skip));
        assert!(is_skipped(OsStr::new("rebuild"), &skip));
        assert!(!is_skipped(OsStr::new("src"), &skip));
    }

    #[test]
    fn denylisted_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("build-area");
        mk_repo(&root, "proj");
        assert!(find_repositories(&root, &TraversalOptions::default()).is_empty());

        let nested = dir.path().join("node_modules").join("pkgs");
        mk_repo(&nested, "dep");
        assert!(find_repositories(&nested, &TraversalOptions::default()).is_empty());
    }

    #[test]
    fn full_path_components_are_checked() {
        let skip = TraversalOptions::default().skip_dirs;
        assert!(in_skipped_dir(Path::new("/home/me/build-area/proj"), &skip));
        assert!(in_skipped_dir(Path::new("work/vendor/lib"), &skip));
        assert!(!in_skipped_dir(Path::new("/home/me/src/proj"), &skip));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_repositories_need_follow_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let target = mk_repo(dir.path(), "elsewhere/proj");
        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(&target, root.join("linked")).unwrap();

        assert!(find_repositories(&root, &TraversalOptions::default()).is_empty());

        let opts = TraversalOptions {
            follow_symlinks: true,
            ..Default::default()
        };
        assert_eq!(find_repositories(&root, &opts), vec![root.join("linked")]);
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_repositories(dir.path(), &TraversalOptions::default()).is_empty());
    }
}
