use std::collections::BTreeSet;
use std::path::Path;

use indexmap::IndexSet;

use crate::runner::CommandRunner;
use crate::types::ContributorStat;

const GIT: &str = "git";

/// Which history every query walks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RevScope {
    /// Every branch and tag (`--all`).
    #[default]
    All,
    Rev(String),
}

impl RevScope {
    fn arg(&self) -> &str {
        match self {
            RevScope::All => "--all",
            RevScope::Rev(r) => r,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RevScope::All => "all",
            RevScope::Rev(r) => r,
        }
    }
}

/// Numeric diff-stat totals for one author.
///
/// `net` is accumulated alongside but does not reach [`ContributorStat`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineTotals {
    pub added: u64,
    pub deleted: u64,
    pub net: i64,
}

/// Git queries for one repository, issued through a [`CommandRunner`].
pub struct VcsContext<'a> {
    runner: &'a dyn CommandRunner,
    repo: &'a Path,
    scope: &'a RevScope,
}

impl<'a> VcsContext<'a> {
    pub fn new(runner: &'a dyn CommandRunner, repo: &'a Path, scope: &'a RevScope) -> Self {
        Self {
            runner,
            repo,
            scope,
        }
    }

    fn git(&self, args: &[&str]) -> String {
        self.runner.run(GIT, args, Some(self.repo))
    }

    /// Distinct author names, sorted.
    pub fn authors(&self) -> Vec<String> {
        let out = self.git(&["log", self.scope.arg(), "--format=%aN", "--"]);
        parse_authors(&out)
    }

    /// Local and remote-tracking branch names in ref order.
    pub fn branches(&self) -> Vec<String> {
        let out = self.git(&[
            "for-each-ref",
            "--format=%(refname)",
            "refs/heads",
            "refs/remotes",
        ]);
        parse_branches(&out)
    }

    pub fn line_totals(&self, author: &str) -> LineTotals {
        let filter = author_filter(author);
        let out = self.git(&[
            "log",
            self.scope.arg(),
            "--extended-regexp",
            filter.as_str(),
            "--pretty=tformat:",
            "--numstat",
            "--",
        ]);
        parse_numstat(&out)
    }

    /// Commits attributed to `author`.
    ///
    /// Goes through `git log` like [`Self::line_totals`] so both queries
    /// resolve `.mailmap` the same way; `rev-list` matches raw identities.
    pub fn commit_count(&self, author: &str) -> u64 {
        let filter = author_filter(author);
        let out = self.git(&[
            "log",
            self.scope.arg(),
            "--extended-regexp",
            filter.as_str(),
            "--format=%H",
            "--",
        ]);
        parse_count(&out)
    }

    pub fn author_stats(&self, author: &str) -> ContributorStat {
        let lines = self.line_totals(author);
        let commits = self.commit_count(author);
        ContributorStat::new(author, lines.added, lines.deleted, commits)
    }
}

/// `--author` pattern matching exactly this name.
///
/// git tests the pattern against `Name <email>`, so the escaped name is
/// anchored at the start and terminated by the opening angle bracket.
pub fn author_filter(author: &str) -> String {
    let mut out = String::with_capacity(author.len() + 12);
    out.push_str("--author=^");
    for ch in author.chars() {
        if "\\.+*?()|[]{}^$".contains(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push_str(" <");
    out
}

pub fn parse_authors(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn parse_branches(out: &str) -> Vec<String> {
    let mut seen = IndexSet::new();
    for line in out.lines().map(str::trim) {
        let name = line
            .strip_prefix("refs/heads/")
            .or_else(|| line.strip_prefix("refs/remotes/"));
        let Some(name) = name else { continue };
        if name.is_empty() || name == "HEAD" || name.ends_with("/HEAD") {
            continue;
        }
        seen.insert(name.to_string());
    }
    seen.into_iter().collect()
}

/// Sums `added<TAB>deleted<TAB>path` lines.
///
/// Binary entries (`-`) and anything else non-numeric count as 0.
pub fn parse_numstat(out: &str) -> LineTotals {
    let mut t = LineTotals::default();
    for line in out.lines() {
        let mut fields = line.split('\t');
        let added = fields.next().map_or(0, parse_field);
        let deleted = fields.next().map_or(0, parse_field);
        t.added += added;
        t.deleted += deleted;
        t.net += added as i64 - deleted as i64;
    }
    t
}

fn parse_field(s: &str) -> u64 {
    s.trim().parse().unwrap_or(0)
}

/// One commit hash per line; blank or non-hex lines are ignored.
pub fn parse_count(out: &str) -> u64 {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && l.bytes().all(|b| b.is_ascii_hexdigit()))
        .count() as u64
}
