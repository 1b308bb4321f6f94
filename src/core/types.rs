//! Record types shared by every analyzer.
//!
//! Field names serialize in camelCase because the JSON written by the
//! persistence layer is consumed by other tools; treat the names as a stable
//! external contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse significance classification of a code change.
///
/// Variants are declared from least to most significant so the derived `Ord`
/// matches the impact hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactTier {
    Minor,
    Standard,
    Major,
    Flagship,
}

impl ImpactTier {
    /// All tiers, most significant first.
    pub const ALL: [ImpactTier; 4] = [
        ImpactTier::Flagship,
        ImpactTier::Major,
        ImpactTier::Standard,
        ImpactTier::Minor,
    ];

    /// Position in the impact hierarchy (higher = more significant).
    pub fn rank(&self) -> u8 {
        match self {
            ImpactTier::Minor => 0,
            ImpactTier::Standard => 1,
            ImpactTier::Major => 2,
            ImpactTier::Flagship => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactTier::Minor => "minor",
            ImpactTier::Standard => "standard",
            ImpactTier::Major => "major",
            ImpactTier::Flagship => "flagship",
        }
    }

    /// Human-readable description of what the tier means.
    pub fn description(&self) -> &'static str {
        match self {
            ImpactTier::Flagship => "Large initiatives, platform changes, or multi-PR efforts",
            ImpactTier::Major => "Significant features, larger refactors, or architectural work",
            ImpactTier::Standard => "Regular feature work, bug fixes, and moderate changes",
            ImpactTier::Minor => "Small fixes, typos, docs, or dependency updates",
        }
    }
}

impl fmt::Display for ImpactTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeState {
    Open,
    Closed,
    Merged,
}

impl ChangeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeState::Open => "open",
            ChangeState::Closed => "closed",
            ChangeState::Merged => "merged",
        }
    }
}

impl fmt::Display for ChangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One code change (pull request).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub title: String,
    /// Number of the change, unique within its repository.
    #[serde(rename = "prNumber", alias = "id")]
    pub id: u64,
    pub repository: String,
    pub org: String,
    #[serde(default)]
    pub author: String,
    pub state: ChangeState,
    #[serde(with = "crate::core::dates")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "crate::core::dates::option")]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::core::dates::option")]
    pub closed_at: Option<DateTime<Utc>>,
    pub url: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changed_files: u64,
    #[serde(default, rename = "jiraTickets", alias = "linkedTicketKeys")]
    pub linked_ticket_keys: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactTier>,
    /// Fields the analyzers ignore (body, reviewers, ...), kept so a tagging
    /// pass writes them back untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ChangeRecord {
    pub fn total_lines(&self) -> u64 {
        self.additions + self.deletions
    }

    /// `org/repository`
    pub fn repo_key(&self) -> String {
        format!("{}/{}", self.org, self.repository)
    }

    /// The date a change "happened": merge time when merged, creation otherwise.
    pub fn primary_date(&self) -> DateTime<Utc> {
        self.merged_at.unwrap_or(self.created_at)
    }

    pub fn has_linked_tickets(&self) -> bool {
        !self.linked_ticket_keys.is_empty()
    }
}

/// One issue-tracker item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    pub key: String,
    pub summary: String,
    pub project: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub story_points: Option<f64>,
    #[serde(default)]
    pub url: String,
    #[serde(with = "crate::core::dates")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "crate::core::dates::option")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "linkedPRs", alias = "linkedChangeUrls")]
    pub linked_change_urls: Vec<String>,
}

impl TicketRecord {
    /// Resolution time when resolved, creation otherwise.
    pub fn primary_date(&self) -> DateTime<Utc> {
        self.resolved_at.unwrap_or(self.created_at)
    }

    pub fn has_linked_changes(&self) -> bool {
        !self.linked_change_urls.is_empty()
    }
}

/// The `since`/`until` pair an analysis was requested for.
///
/// Passed through verbatim into output metadata; it never filters input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub since: String,
    pub until: String,
}

impl DateRange {
    pub fn new(since: impl Into<String>, until: impl Into<String>) -> Self {
        Self {
            since: since.into(),
            until: until.into(),
        }
    }
}

/// Counter per impact tier, serialized with every tier present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactCounts {
    pub flagship: usize,
    pub major: usize,
    pub standard: usize,
    pub minor: usize,
}

impl ImpactCounts {
    pub fn increment(&mut self, tier: ImpactTier) {
        *self.slot(tier) += 1;
    }

    pub fn get(&self, tier: ImpactTier) -> usize {
        match tier {
            ImpactTier::Flagship => self.flagship,
            ImpactTier::Major => self.major,
            ImpactTier::Standard => self.standard,
            ImpactTier::Minor => self.minor,
        }
    }

    pub fn total(&self) -> usize {
        self.flagship + self.major + self.standard + self.minor
    }

    pub fn absorb(&mut self, other: &ImpactCounts) {
        self.flagship += other.flagship;
        self.major += other.major;
        self.standard += other.standard;
        self.minor += other.minor;
    }

    fn slot(&mut self, tier: ImpactTier) -> &mut usize {
        match tier {
            ImpactTier::Flagship => &mut self.flagship,
            ImpactTier::Major => &mut self.major,
            ImpactTier::Standard => &mut self.standard,
            ImpactTier::Minor => &mut self.minor,
        }
    }
}
