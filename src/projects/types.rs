//! Serialized shapes of a project detection run.

use crate::core::{DateRange, ImpactCounts};
use serde::{Deserialize, Serialize};

/// Trust level of a grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// Strongest evidence type behind a grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DominantSignal {
    Tickets,
    JiraProject,
    Time,
    Labels,
}

/// Inclusive creation-date range of a time-clustered grouping (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub earliest: String,
    pub latest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSignals {
    pub shared_tickets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    #[serde(default)]
    pub shared_labels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub pr_count: usize,
    pub ticket_count: usize,
    pub total_additions: u64,
    pub total_deletions: u64,
    pub repos: Vec<String>,
    #[serde(default)]
    pub by_impact: ImpactCounts,
}

/// A cluster of related changes and tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectGrouping {
    pub project_id: String,
    pub name: String,
    /// Member change URLs
    pub pr_urls: Vec<String>,
    pub ticket_keys: Vec<String>,
    pub signals: ProjectSignals,
    pub confidence: Confidence,
    pub dominant_signal: DominantSignal,
    pub stats: ProjectStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalCounts {
    pub tickets: usize,
    pub jira_project: usize,
    pub time: usize,
    pub labels: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsSummary {
    pub total_projects: usize,
    pub by_confidence: ConfidenceCounts,
    pub by_signal: SignalCounts,
    #[serde(rename = "unassignedPRs")]
    pub unassigned_prs: usize,
    /// URLs of changes no phase assigned, in input order
    #[serde(default)]
    pub unassigned_pr_urls: Vec<String>,
}

impl ProjectsSummary {
    pub fn from_projects(projects: &[ProjectGrouping], unassigned_pr_urls: Vec<String>) -> Self {
        let mut summary = Self {
            total_projects: projects.len(),
            unassigned_prs: unassigned_pr_urls.len(),
            unassigned_pr_urls,
            ..Default::default()
        };
        for project in projects {
            match project.confidence {
                Confidence::High => summary.by_confidence.high += 1,
                Confidence::Medium => summary.by_confidence.medium += 1,
                Confidence::Low => summary.by_confidence.low += 1,
            }
            match project.dominant_signal {
                DominantSignal::Tickets => summary.by_signal.tickets += 1,
                DominantSignal::JiraProject => summary.by_signal.jira_project += 1,
                DominantSignal::Time => summary.by_signal.time += 1,
                DominantSignal::Labels => summary.by_signal.labels += 1,
            }
        }
        summary
    }
}

/// Output of one detection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsAnalysis {
    pub date_range: DateRange,
    pub projects: Vec<ProjectGrouping>,
    pub summary: ProjectsSummary,
}
