//! Three-phase project detection.
//!
//! 1. Changes that share ticket keys are merged transitively (union-find).
//! 2. Tickets no change references join the first group of the same JIRA
//!    project.
//! 3. Remaining changes are clustered per repository by creation time.
//!
//! Whatever is left after phase 3 is reported as unassigned.

use super::builder::{OrderedSet, ProjectBuilder};
use super::types::{DominantSignal, ProjectsAnalysis, ProjectsSummary};
use crate::config::ProjectDetectionConfig;
use crate::core::{ChangeRecord, DateRange, TicketRecord};
use crate::impact::ImpactClassifier;
use chrono::Duration;
use petgraph::unionfind::UnionFind;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Groups changes and tickets into projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectDetector {
    config: ProjectDetectionConfig,
    classifier: ImpactClassifier,
}

/// Read-only view of the inputs shared by all phases.
struct DetectionInput<'a> {
    /// Changes de-duplicated by URL, input order.
    changes: Vec<&'a ChangeRecord>,
    tickets: &'a [TicketRecord],
    /// First record wins for duplicate keys.
    ticket_index: HashMap<&'a str, &'a TicketRecord>,
}

impl<'a> DetectionInput<'a> {
    fn new(changes: &'a [ChangeRecord], tickets: &'a [TicketRecord]) -> Self {
        let mut seen_urls = HashSet::new();
        let changes = changes
            .iter()
            .filter(|change| seen_urls.insert(change.url.as_str()))
            .collect();

        let mut ticket_index = HashMap::new();
        for ticket in tickets {
            ticket_index.entry(ticket.key.as_str()).or_insert(ticket);
        }

        Self {
            changes,
            tickets,
            ticket_index,
        }
    }
}

/// Mutable state threaded through the phases.
#[derive(Default)]
struct DetectionState {
    builders: Vec<ProjectBuilder>,
    assigned: HashSet<usize>,
    /// Ticket keys referenced by at least one change.
    linked_keys: HashSet<String>,
}

impl ProjectDetector {
    pub fn new(config: ProjectDetectionConfig) -> Self {
        Self {
            config,
            classifier: ImpactClassifier::default(),
        }
    }

    /// Classifier used for the per-project impact histogram.
    pub fn with_classifier(mut self, classifier: ImpactClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn detect(
        &self,
        changes: &[ChangeRecord],
        tickets: &[TicketRecord],
        date_range: DateRange,
    ) -> ProjectsAnalysis {
        let input = DetectionInput::new(changes, tickets);
        let mut state = DetectionState::default();

        self.cluster_by_tickets(&input, &mut state);
        debug!(
            groups = state.builders.len(),
            assigned = state.assigned.len(),
            "ticket clustering complete"
        );

        let attached = self.attach_orphan_tickets(&input, &mut state);
        debug!(attached, "orphan ticket attachment complete");

        if self.config.include_unlinked_changes {
            let before = state.builders.len();
            self.cluster_by_time(&input, &mut state);
            debug!(
                groups = state.builders.len() - before,
                window_days = self.config.time_window_days,
                "temporal clustering complete"
            );
        }

        let unassigned_pr_urls: Vec<String> = input
            .changes
            .iter()
            .enumerate()
            .filter(|(index, _)| !state.assigned.contains(index))
            .map(|(_, change)| change.url.clone())
            .collect();

        let mut projects: Vec<_> = state
            .builders
            .into_iter()
            .enumerate()
            .map(|(ordinal, builder)| {
                builder.build(ordinal, &input.changes, &input.ticket_index, &self.classifier)
            })
            .collect();
        projects.sort_by(|a, b| b.stats.pr_count.cmp(&a.stats.pr_count));

        debug!(
            projects = projects.len(),
            unassigned = unassigned_pr_urls.len(),
            "project detection complete"
        );

        let summary = ProjectsSummary::from_projects(&projects, unassigned_pr_urls);
        ProjectsAnalysis {
            date_range,
            projects,
            summary,
        }
    }

    /// Phase 1: one group per connected component of the change/ticket graph.
    fn cluster_by_tickets(&self, input: &DetectionInput<'_>, state: &mut DetectionState) {
        let mut keys: OrderedSet<&str> = OrderedSet::default();
        let mut members: HashMap<&str, Vec<usize>> = HashMap::new();
        for (index, change) in input.changes.iter().enumerate() {
            let own_keys: OrderedSet<&str> = change
                .linked_ticket_keys
                .iter()
                .map(String::as_str)
                .collect();
            for &key in own_keys.iter() {
                keys.insert(key);
                members.entry(key).or_default().push(index);
            }
        }

        let mut components = UnionFind::<usize>::new(input.changes.len());
        for &key in keys.iter() {
            let indices = &members[key];
            for &other in &indices[1..] {
                components.union(indices[0], other);
            }
        }

        let mut builder_for_root: HashMap<usize, usize> = HashMap::new();
        for &key in keys.iter() {
            let indices = &members[key];
            let root = components.find_mut(indices[0]);
            let slot = *builder_for_root.entry(root).or_insert_with(|| {
                let mut builder = ProjectBuilder::new(DominantSignal::Tickets);
                builder.jira_project = input
                    .ticket_index
                    .get(key)
                    .map(|ticket| ticket.project.clone());
                state.builders.push(builder);
                state.builders.len() - 1
            });

            let builder = &mut state.builders[slot];
            builder.add_shared_ticket(key);
            for &index in indices {
                builder.add_change(index, input.changes[index]);
                state.assigned.insert(index);
            }
            state.linked_keys.insert(key.to_string());
        }
    }

    /// Phase 2: returns how many tickets were attached.
    fn attach_orphan_tickets(&self, input: &DetectionInput<'_>, state: &mut DetectionState) -> usize {
        let mut attached = 0;
        for ticket in input.tickets {
            if state.linked_keys.contains(&ticket.key) {
                continue;
            }
            let target = state
                .builders
                .iter_mut()
                .find(|builder| builder.jira_project.as_deref() == Some(ticket.project.as_str()));
            if let Some(builder) = target {
                builder.attach_ticket(&ticket.key);
                attached += 1;
            }
        }
        attached
    }

    /// Phase 3: fixed-window clusters per repository, anchored at each
    /// cluster's first change.
    fn cluster_by_time(&self, input: &DetectionInput<'_>, state: &mut DetectionState) {
        let mut repos: OrderedSet<String> = OrderedSet::default();
        let mut by_repo: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, change) in input.changes.iter().enumerate() {
            if state.assigned.contains(&index) {
                continue;
            }
            let repo = change.repo_key();
            repos.insert(repo.clone());
            by_repo.entry(repo).or_default().push(index);
        }

        let window = Duration::days(i64::from(self.config.time_window_days));
        for repo in repos.iter() {
            let mut indices = by_repo.remove(repo).unwrap_or_default();
            indices.sort_by_key(|&index| input.changes[index].created_at);

            let mut cluster: Vec<usize> = Vec::new();
            for index in indices {
                let fits = cluster.first().map_or(true, |&start| {
                    input.changes[index].created_at - input.changes[start].created_at <= window
                });
                if !fits {
                    self.flush_cluster(std::mem::take(&mut cluster), input, state);
                }
                cluster.push(index);
            }
            self.flush_cluster(cluster, input, state);
        }
    }

    fn flush_cluster(&self, cluster: Vec<usize>, input: &DetectionInput<'_>, state: &mut DetectionState) {
        if cluster.is_empty() || cluster.len() < self.config.min_cluster_size {
            return;
        }

        let mut builder = ProjectBuilder::new(DominantSignal::Time);
        for &index in &cluster {
            let change = input.changes[index];
            builder.add_change(index, change);
            builder.earliest = Some(builder.earliest.map_or(change.created_at, |e| e.min(change.created_at)));
            builder.latest = Some(builder.latest.map_or(change.created_at, |l| l.max(change.created_at)));
            state.assigned.insert(index);
        }
        builder.shared_labels = shared_labels(cluster.iter().map(|&index| input.changes[index]));
        state.builders.push(builder);
    }
}

/// Labels carried by at least half of the given changes, first-seen order.
fn shared_labels<'a>(changes: impl Iterator<Item = &'a ChangeRecord>) -> Vec<String> {
    let mut order: OrderedSet<&str> = OrderedSet::default();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut total = 0;
    for change in changes {
        total += 1;
        let own: OrderedSet<&str> = change.labels.iter().map(String::as_str).collect();
        for &label in own.iter() {
            order.insert(label);
            *counts.entry(label).or_default() += 1;
        }
    }

    order
        .iter()
        .filter(|label| counts[*label] * 2 >= total)
        .map(|label| label.to_string())
        .collect()
}

/// Detect projects with default classification.
pub fn detect_projects(
    changes: &[ChangeRecord],
    tickets: &[TicketRecord],
    date_range: DateRange,
    config: &ProjectDetectionConfig,
) -> ProjectsAnalysis {
    ProjectDetector::new(config.clone()).detect(changes, tickets, date_range)
}
