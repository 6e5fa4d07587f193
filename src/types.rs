use serde::Serialize;

/// Line and commit counts for one author inside one repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorStat {
    pub author: String,
    pub added: u64,
    pub deleted: u64,
    pub total_changes: u64,
    pub commits: u64,
}

impl ContributorStat {
    pub fn new(author: impl Into<String>, added: u64, deleted: u64, commits: u64) -> Self {
        ContributorStat {
            author: author.into(),
            added,
            deleted,
            total_changes: added + deleted,
            commits,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryReport {
    pub name: String,
    pub path: String,
    /// Revision scope of every query: `"all"` or the revision given with `--rev`.
    pub branch: String,
    pub branches: Vec<String>,
    pub contributors: Vec<ContributorStat>,
}

impl RepositoryReport {
    pub fn total_changes(&self) -> u64 {
        self.contributors.iter().map(|c| c.total_changes).sum()
    }

    pub fn total_commits(&self) -> u64 {
        self.contributors.iter().map(|c| c.commits).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateTotals {
    pub repository_count: usize,
    pub contributor_count: usize,
    pub total_added: u64,
    pub total_deleted: u64,
    pub total_changes: u64,
    pub total_commits: u64,
}

impl AggregateTotals {
    pub fn merge(&mut self, c: &ContributorStat) {
        self.total_added += c.added;
        self.total_deleted += c.deleted;
        self.total_changes += c.total_changes;
        self.total_commits += c.commits;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisData {
    pub repositories: Vec<RepositoryReport>,
    pub total: AggregateTotals,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AnalysisData>,
}

impl AnalysisResult {
    pub fn failure(message: impl Into<String>) -> Self {
        AnalysisResult {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn totals(&self) -> Option<&AggregateTotals> {
        if !self.success {
            return None;
        }
        self.data.as_ref().map(|d| &d.total)
    }
}
