use std::collections::HashSet;
use std::path::Path;

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::formatters::table::format_num;
use crate::runner::CommandRunner;
use crate::traversal::{TraversalOptions, find_repositories};
use crate::types::{AggregateTotals, AnalysisData, AnalysisResult, RepositoryReport};
use crate::vcs::{RevScope, VcsContext};

pub const MSG_MISSING_ROOT: &str = "path does not exist";
pub const MSG_NO_REPOSITORIES: &str = "no repositories found";

#[derive(Default)]
pub struct AnalyzeOptions {
    pub scope: RevScope,
    pub traversal: TraversalOptions,
    /// Print progress lines to stdout while analyzing.
    pub progress: bool,
}

impl AnalyzeOptions {
    fn say(&self, line: impl std::fmt::Display) {
        if self.progress {
            println!("{line}");
        }
    }
}

/// Per-author statistics for one repository, largest contributors first.
///
/// # Errors
/// Returns an error if `repo` is not a directory.
pub fn analyze_repository(
    repo: &Path,
    runner: &dyn CommandRunner,
    opts: &AnalyzeOptions,
) -> Result<RepositoryReport> {
    if !repo.is_dir() {
        bail!("not a directory: {}", repo.display());
    }
    let name = repo_name(repo);
    let path = repo.display().to_string();
    opts.say(format_args!("analyzing repository: {name} ({path})"));

    // each author costs two git calls (numstat and commit list)
    let vcs = VcsContext::new(runner, repo, &opts.scope);
    let authors = vcs.authors();
    opts.say(format_args!("  found {} contributors", authors.len()));

    let mut contributors = Vec::with_capacity(authors.len());
    for author in &authors {
        let stat = vcs.author_stats(author);
        opts.say(format_args!(
            "    - {}: {} changes, {} commits",
            stat.author, stat.total_changes, stat.commits
        ));
        contributors.push(stat);
    }
    // stable: ties keep enumeration order
    contributors.sort_by(|a, b| b.total_changes.cmp(&a.total_changes));

    let report = RepositoryReport {
        name,
        path,
        branch: opts.scope.label().to_string(),
        branches: vcs.branches(),
        contributors,
    };
    opts.say(format_args!(
        "  repository done: {} changes, {} commits",
        format_num(report.total_changes()),
        format_num(report.total_commits())
    ));
    Ok(report)
}

/// Locates and analyzes every repository under `root`.
pub fn analyze_folder(
    root: &Path,
    runner: &dyn CommandRunner,
    opts: &AnalyzeOptions,
) -> AnalysisResult {
    if !root.exists() {
        return AnalysisResult::failure(MSG_MISSING_ROOT);
    }

    opts.say(format_args!("scanning folder: {}", root.display()));
    let repositories = find_repositories(root, &opts.traversal);
    opts.say(format_args!("found {} repositories", repositories.len()));
    info!(root = %root.display(), count = repositories.len(), "located repositories");

    if repositories.is_empty() {
        return AnalysisResult {
            success: true,
            message: Some(MSG_NO_REPOSITORIES.to_string()),
            data: Some(AnalysisData {
                repositories: Vec::new(),
                total: AggregateTotals::default(),
            }),
        };
    }

    // a repository that fails is reported and skipped; the rest still count
    let reports: Vec<RepositoryReport> = repositories
        .iter()
        .map(|repo| (repo, analyze_repository(repo, runner, opts)))
        .filter_map(|(repo, res)| match res {
            Ok(report) => Some(report),
            Err(err) => {
                warn!(repo = %repo.display(), "repository analysis failed: {err:#}");
                opts.say(format_args!(
                    "failed to analyze repository {}: {err}",
                    repo.display()
                ));
                None
            }
        })
        .collect();

    // totals derive only from reports that made it into the result
    let total = fold_totals(&reports);
    AnalysisResult {
        success: true,
        message: None,
        data: Some(AnalysisData {
            repositories: reports,
            total,
        }),
    }
}

/// Sums every contributor of every report; authors are counted once by name.
pub fn fold_totals(reports: &[RepositoryReport]) -> AggregateTotals {
    let mut totals = AggregateTotals {
        repository_count: reports.len(),
        ..Default::default()
    };
    // same name in two repositories is one contributor; sums still add both
    let mut authors: HashSet<&str> = HashSet::new();
    for c in reports.iter().flat_map(|r| &r.contributors) {
        authors.insert(c.author.as_str());
        totals.merge(c);
    }
    totals.contributor_count = authors.len();
    totals
}

fn repo_name(repo: &Path) -> String {
    // `.` or `..` have no file name; fall back to the resolved directory
    repo.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            std::fs::canonicalize(repo)
                .ok()?
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| repo.display().to_string())
}
