use crate::types::{AggregateTotals, RepositoryReport};
use std::io::IsTerminal;

pub const BANNER_WIDTH: usize = 60;

pub fn banner() -> String {
    "=".repeat(BANNER_WIDTH)
}

/// Human-readable totals block printed after the structured output.
pub fn format_summary(t: &AggregateTotals) -> String {
    let colors = Colors::enabled();
    let rows: [(&str, String); 6] = [
        ("Repositories", format_num(t.repository_count as u64)),
        ("Contributors", format_num(t.contributor_count as u64)),
        ("Lines added", format_num(t.total_added)),
        ("Lines deleted", format_num(t.total_deleted)),
        ("Total changes", format_num(t.total_changes)),
        ("Total commits", format_num(t.total_commits)),
    ];
    // labels left-aligned, +1 for the trailing colon; numbers right-aligned
    let label_w = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0) + 1;
    let value_w = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

    let mut lines = vec![banner(), colors.bold("Summary"), banner()];
    for (label, value) in &rows {
        let label = format!("{:<w$}", format!("{label}:"), w = label_w);
        let value = format!("{:>w$}", value, w = value_w);
        lines.push(format!("{} {}", label, colors.paint(&value, "36")));
    }
    lines.push(banner());
    lines.join("\n")
}

/// Per-contributor table for one repository, in report order.
pub fn format_contributors(r: &RepositoryReport) -> String {
    let colors = Colors::enabled();

    // start from the header widths; author gets a floor so short names don't squash the table
    let mut w = ColWidths {
        author: "Author".len().max(12),
        added: "added".len(),
        deleted: "deleted".len(),
        changes: "changes".len(),
        commits: "commits".len(),
    };
    // widen to the longest cell; numeric cells are measured after formatting (commas included)
    for c in &r.contributors {
        w.author = w.author.max(c.author.chars().count());
        w.added = w.added.max(format_num(c.added).len());
        w.deleted = w.deleted.max(format_num(c.deleted).len());
        w.changes = w.changes.max(format_num(c.total_changes).len());
        w.commits = w.commits.max(format_num(c.commits).len());
    }

    // spaces between columns
    let gutter = 4;
    let sep = " ".repeat(gutter);
    let header_plain = [
        format!("{:<w$}", "Author", w = w.author),
        format!("{:>w$}", "added", w = w.added),
        format!("{:>w$}", "deleted", w = w.deleted),
        format!("{:>w$}", "changes", w = w.changes),
        format!("{:>w$}", "commits", w = w.commits),
    ]
    .join(&sep);
    // rule spans every column plus the four gutters between five columns
    let rule = "-".repeat(w.author + w.added + w.deleted + w.changes + w.commits + gutter * 4);

    let mut lines = vec![
        colors.bold(&format!("{} ({})", r.name, r.path)),
        colors.bold(&header_plain),
        rule,
    ];
    for c in &r.contributors {
        // pad before painting so escape codes don't count toward the width
        let cells = [
            colors.paint(&format!("{:<w$}", c.author, w = w.author), "1"),
            colors.paint(&format!("{:>w$}", format_num(c.added), w = w.added), "32"),
            colors.paint(&format!("{:>w$}", format_num(c.deleted), w = w.deleted), "31"),
            colors.paint(&format!("{:>w$}", format_num(c.total_changes), w = w.changes), "36"),
            colors.paint(&format!("{:>w$}", format_num(c.commits), w = w.commits), "94"),
        ];
        lines.push(cells.join(&sep));
    }
    lines.join("\n")
}

struct ColWidths {
    author: usize,
    added: usize,
    deleted: usize,
    changes: usize,
    commits: usize,
}

/// Thousands separators: `1234567` -> `1,234,567`.
pub fn format_num(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

struct Colors {
    enabled: bool,
}

impl Colors {
    fn enabled() -> Self {
        let force = std::env::var("CLICOLOR_FORCE")
            .ok()
            .filter(|v| v != "0")
            .is_some();
        let no_color = std::env::var_os("NO_COLOR").is_some();
        let clicolor_zero = std::env::var("CLICOLOR")
            .ok()
            .is_some_and(|v| v == "0");
        let term = std::io::stdout().is_terminal();
        // CLICOLOR_FORCE beats NO_COLOR and CLICOLOR=0, which beat tty detection
        let enabled = if force {
            true
        } else if no_color || clicolor_zero {
            false
        } else {
            term
        };
        Colors { enabled }
    }

    fn paint(&self, s: &str, code: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        self.paint(s, "1")
    }
}
