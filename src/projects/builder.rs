//! Mutable accumulator for a project while detection runs, plus the rules
//! that turn it into a named, scored [`ProjectGrouping`].

use super::types::{
    Confidence, DominantSignal, ProjectGrouping, ProjectSignals, ProjectStats, TimeRange,
};
use crate::core::dates::format_date;
use crate::core::{ChangeRecord, ImpactCounts, TicketRecord};
use crate::impact::ImpactClassifier;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Insertion-ordered set; membership checks are hashed, iteration follows
/// first insertion.
#[derive(Debug, Clone)]
pub struct OrderedSet<T> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> OrderedSet<T> {
    /// Returns false if the item was already present.
    pub fn insert(&mut self, item: T) -> bool {
        if self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.items.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

/// Internal representation of a project during detection.
///
/// Changes are referenced by their index in the detector's de-duplicated
/// change list.
#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    pub changes: OrderedSet<usize>,
    pub tickets: OrderedSet<String>,
    pub shared_tickets: OrderedSet<String>,
    pub repos: OrderedSet<String>,
    pub jira_project: Option<String>,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
    pub shared_labels: Vec<String>,
    pub dominant_signal: DominantSignal,
}

impl ProjectBuilder {
    pub fn new(dominant_signal: DominantSignal) -> Self {
        Self {
            changes: OrderedSet::default(),
            tickets: OrderedSet::default(),
            shared_tickets: OrderedSet::default(),
            repos: OrderedSet::default(),
            jira_project: None,
            earliest: None,
            latest: None,
            shared_labels: Vec::new(),
            dominant_signal,
        }
    }

    pub fn add_change(&mut self, index: usize, change: &ChangeRecord) {
        if self.changes.insert(index) {
            self.repos.insert(change.repo_key());
        }
    }

    /// Record a ticket that members reference directly.
    pub fn add_shared_ticket(&mut self, key: &str) {
        self.tickets.insert(key.to_string());
        self.shared_tickets.insert(key.to_string());
    }

    /// Record a ticket attached by project key only.
    pub fn attach_ticket(&mut self, key: &str) {
        self.tickets.insert(key.to_string());
    }

    /// Stable identifier derived from the strongest signal.
    ///
    /// `ordinal` is the builder's position in creation order.
    pub fn project_id(&self, ordinal: usize) -> String {
        if let Some(ticket) = self.shared_tickets.first() {
            return format!("project-{}", slugify(ticket));
        }
        if let Some(jira) = &self.jira_project {
            return format!("project-{}-{}", jira.to_lowercase(), ordinal);
        }
        if let Some(repo) = self.repos.first() {
            return format!("project-{}-{}", repo_name(repo), ordinal);
        }
        format!("project-{ordinal}")
    }

    /// Human-readable name: the first shared ticket's summary when that
    /// ticket is known, then the JIRA project, then the repositories.
    pub fn project_name(&self, tickets: &HashMap<&str, &TicketRecord>) -> String {
        if let Some(ticket) = self
            .shared_tickets
            .first()
            .and_then(|key| tickets.get(key.as_str()))
        {
            return ticket.summary.clone();
        }
        if let Some(jira) = &self.jira_project {
            return format!("{jira} Work");
        }
        if !self.repos.is_empty() {
            let names: Vec<&str> = self.repos.iter().map(|r| repo_name(r)).collect();
            return format!("Work on {}", names.join(", "));
        }
        "Unnamed Project".to_string()
    }

    pub fn confidence(&self) -> Confidence {
        if !self.shared_tickets.is_empty() {
            return Confidence::High;
        }
        if self.jira_project.is_some() && self.changes.len() >= 3 {
            return Confidence::Medium;
        }
        if !self.shared_labels.is_empty() && self.changes.len() >= 2 {
            return Confidence::Medium;
        }
        Confidence::Low
    }

    pub fn build(
        self,
        ordinal: usize,
        changes: &[&ChangeRecord],
        tickets: &HashMap<&str, &TicketRecord>,
        classifier: &ImpactClassifier,
    ) -> ProjectGrouping {
        let project_id = self.project_id(ordinal);
        let name = self.project_name(tickets);
        let confidence = self.confidence();

        let mut stats = ProjectStats {
            pr_count: self.changes.len(),
            ticket_count: self.tickets.len(),
            ..Default::default()
        };
        let mut by_impact = ImpactCounts::default();
        let pr_urls = self
            .changes
            .iter()
            .map(|&index| {
                let change = changes[index];
                stats.total_additions += change.additions;
                stats.total_deletions += change.deletions;
                by_impact.increment(classifier.resolve(change));
                change.url.clone()
            })
            .collect();
        stats.by_impact = by_impact;
        stats.repos = self.repos.into_vec();

        let time_range = match (self.earliest, self.latest) {
            (Some(earliest), Some(latest)) => Some(TimeRange {
                earliest: format_date(earliest.date_naive()),
                latest: format_date(latest.date_naive()),
            }),
            _ => None,
        };

        ProjectGrouping {
            project_id,
            name,
            pr_urls,
            ticket_keys: self.tickets.into_vec(),
            signals: ProjectSignals {
                shared_tickets: self.shared_tickets.into_vec(),
                jira_project: self.jira_project,
                time_range,
                shared_labels: self.shared_labels,
            },
            confidence,
            dominant_signal: self.dominant_signal,
            stats,
        }
    }
}

/// Lowercase, with every character outside `[a-z0-9]` replaced by `-`.
pub fn slugify(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect()
}

/// Last path segment of `org/repo`.
fn repo_name(repo_key: &str) -> &str {
    repo_key.rsplit('/').next().unwrap_or(repo_key)
}
