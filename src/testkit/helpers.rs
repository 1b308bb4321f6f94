//! Test helper functions for creating test data.
//!
//! # Quick Reference
//!
//! | Helper | Purpose |
//! |--------|---------|
//! | [`ChangeBuilder`] | Build a change record fluently |
//! | [`TicketBuilder`] | Build a ticket record fluently |
//! | [`ts`] | Parse a timestamp literal, panicking on typos |
//!
//! # Example
//!
//! ```rust
//! use chronicle::testkit::{ChangeBuilder, TicketBuilder};
//!
//! let change = ChangeBuilder::new(7, "feat: add exporter")
//!     .repo("acme", "billing")
//!     .size(120, 30, 6)
//!     .tickets(&["PAY-12"])
//!     .created("2024-03-04T09:00:00Z")
//!     .build();
//! let ticket = TicketBuilder::new("PAY-12", "Invoice exports").build();
//!
//! assert_eq!(change.repo_key(), "acme/billing");
//! assert_eq!(ticket.project, "PAY");
//! ```

use crate::core::dates::parse_timestamp;
use crate::core::{ChangeRecord, ChangeState, ImpactTier, TicketRecord};
use chrono::{DateTime, Utc};

/// Parse a timestamp literal used in tests.
///
/// # Panics
///
/// Panics if the literal is not a recognizable ISO-8601 date or date-time.
pub fn ts(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or_else(|| panic!("Invalid test timestamp: {raw:?}"))
}

/// Builder for [`ChangeRecord`] with sensible defaults (`acme/api`, open,
/// created 2024-01-01, empty diff).
#[derive(Debug, Clone)]
pub struct ChangeBuilder {
    change: ChangeRecord,
}

impl ChangeBuilder {
    pub fn new(id: u64, title: &str) -> Self {
        Self {
            change: ChangeRecord {
                title: title.to_string(),
                id,
                repository: "api".to_string(),
                org: "acme".to_string(),
                author: "dev".to_string(),
                state: ChangeState::Open,
                created_at: ts("2024-01-01T00:00:00Z"),
                merged_at: None,
                closed_at: None,
                url: format!("https://github.com/acme/api/pull/{id}"),
                additions: 0,
                deletions: 0,
                changed_files: 0,
                linked_ticket_keys: Vec::new(),
                labels: Vec::new(),
                impact: None,
                extra: serde_json::Map::new(),
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.change.title = title.to_string();
        self
    }

    /// Move the change to another repository; the URL follows.
    pub fn repo(mut self, org: &str, repository: &str) -> Self {
        self.change.org = org.to_string();
        self.change.repository = repository.to_string();
        self.change.url = format!(
            "https://github.com/{org}/{repository}/pull/{}",
            self.change.id
        );
        self
    }

    pub fn size(mut self, additions: u64, deletions: u64, changed_files: u64) -> Self {
        self.change.additions = additions;
        self.change.deletions = deletions;
        self.change.changed_files = changed_files;
        self
    }

    pub fn labels(mut self, labels: &[&str]) -> Self {
        self.change.labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn tickets(mut self, keys: &[&str]) -> Self {
        self.change.linked_ticket_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn created(mut self, raw: &str) -> Self {
        self.change.created_at = ts(raw);
        self
    }

    /// Mark the change merged at the given time.
    pub fn merged(mut self, raw: &str) -> Self {
        self.change.state = ChangeState::Merged;
        self.change.merged_at = Some(ts(raw));
        self
    }

    pub fn closed(mut self, raw: &str) -> Self {
        self.change.state = ChangeState::Closed;
        self.change.closed_at = Some(ts(raw));
        self
    }

    pub fn impact(mut self, tier: ImpactTier) -> Self {
        self.change.impact = Some(tier);
        self
    }

    pub fn build(self) -> ChangeRecord {
        self.change
    }
}

/// Builder for [`TicketRecord`]; the project defaults to the key prefix.
#[derive(Debug, Clone)]
pub struct TicketBuilder {
    ticket: TicketRecord,
}

impl TicketBuilder {
    pub fn new(key: &str, summary: &str) -> Self {
        let project = key.split('-').next().unwrap_or(key).to_string();
        Self {
            ticket: TicketRecord {
                key: key.to_string(),
                summary: summary.to_string(),
                project,
                org: "acme".to_string(),
                issue_type: "Story".to_string(),
                status: "Done".to_string(),
                story_points: None,
                url: format!("https://acme.atlassian.net/browse/{key}"),
                created_at: ts("2024-01-01T00:00:00Z"),
                resolved_at: None,
                linked_change_urls: Vec::new(),
            },
        }
    }

    pub fn project(mut self, project: &str) -> Self {
        self.ticket.project = project.to_string();
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.ticket.status = status.to_string();
        self
    }

    pub fn issue_type(mut self, issue_type: &str) -> Self {
        self.ticket.issue_type = issue_type.to_string();
        self
    }

    pub fn story_points(mut self, points: f64) -> Self {
        self.ticket.story_points = Some(points);
        self
    }

    pub fn created(mut self, raw: &str) -> Self {
        self.ticket.created_at = ts(raw);
        self
    }

    pub fn resolved(mut self, raw: &str) -> Self {
        self.ticket.resolved_at = Some(ts(raw));
        self
    }

    pub fn linked(mut self, urls: &[&str]) -> Self {
        self.ticket.linked_change_urls = urls.iter().map(|u| u.to_string()).collect();
        self
    }

    pub fn build(self) -> TicketRecord {
        self.ticket
    }
}
