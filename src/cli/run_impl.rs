use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::analyzer::{AnalyzeOptions, analyze_folder};
use crate::formatters::table;
use crate::runner::ProcessRunner;
use crate::traversal::TraversalOptions;
use crate::types::AnalysisResult;
use crate::vcs::RevScope;

use super::Args;

pub fn run_with_args(args: &Args) -> Result<()> {
    let runner = ProcessRunner::new(Duration::from_secs(args.timeout));
    let opts = AnalyzeOptions {
        scope: args.rev.clone().map_or(RevScope::All, RevScope::Rev),
        traversal: TraversalOptions {
            follow_symlinks: args.follow_symlinks,
            ..Default::default()
        },
        progress: !args.quiet,
    };
    tracing::info!(
        root = %args.root.display(),
        scope = opts.scope.label(),
        timeout_secs = runner.timeout().as_secs(),
        follow_symlinks = opts.traversal.follow_symlinks,
        "starting analysis"
    );

    let result = analyze_folder(&args.root, &runner, &opts);

    if let Some(ref out) = args.output {
        write_result(&result, out)?;
        println!("\nresults saved to: {}", out.display());
    } else {
        let s = serde_json::to_string_pretty(&result)?;
        println!("\n{}", table::banner());
        println!("Analysis result:");
        println!("{}", table::banner());
        println!("{s}");
    }

    if let Some(totals) = result.totals() {
        if let Some(ref data) = result.data {
            for repo in data.repositories.iter().filter(|r| !r.contributors.is_empty()) {
                println!("\n{}", table::format_contributors(repo));
            }
        }
        println!("\n{}", table::format_summary(totals));
    }
    Ok(())
}

/// Pretty-printed UTF-8 JSON with a trailing newline.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub fn write_result(result: &AnalysisResult, path: &Path) -> Result<()> {
    let mut s = serde_json::to_string_pretty(result).context("serialize result")?;
    s.push('\n');
    fs::write(path, s).with_context(|| format!("write output file: {}", path.display()))?;
    Ok(())
}
