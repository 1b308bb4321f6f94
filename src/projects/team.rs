//! Team-level merge of several people's project analyses.

use super::builder::OrderedSet;
use super::types::{ProjectGrouping, ProjectsAnalysis};
use std::collections::HashMap;

/// Merge projects from several analyses by case-insensitive name.
///
/// The first occurrence of a name keeps its id, confidence and dominant
/// signal. Later occurrences add their members, tickets, signals and repos
/// (first-seen order, no duplicates) and sum into the numeric stats; a later
/// `jiraProject` replaces an earlier one. The result is ordered by PR count,
/// largest first, ties in first-seen order.
pub fn aggregate_team_projects(analyses: &[ProjectsAnalysis]) -> Vec<ProjectGrouping> {
    let mut merged: Vec<ProjectGrouping> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for project in analyses.iter().flat_map(|analysis| &analysis.projects) {
        match by_name.get(&project.name.to_lowercase()) {
            Some(&slot) => merge_into(&mut merged[slot], project),
            None => {
                by_name.insert(project.name.to_lowercase(), merged.len());
                merged.push(project.clone());
            }
        }
    }

    tracing::debug!(
        inputs = analyses.len(),
        projects = merged.len(),
        "merged team projects"
    );
    merged.sort_by(|a, b| b.stats.pr_count.cmp(&a.stats.pr_count));
    merged
}

fn merge_into(target: &mut ProjectGrouping, other: &ProjectGrouping) {
    union_into(&mut target.pr_urls, &other.pr_urls);
    union_into(&mut target.ticket_keys, &other.ticket_keys);
    union_into(&mut target.signals.shared_tickets, &other.signals.shared_tickets);
    union_into(&mut target.signals.shared_labels, &other.signals.shared_labels);
    if other.signals.jira_project.is_some() {
        target.signals.jira_project = other.signals.jira_project.clone();
    }

    let stats = &mut target.stats;
    stats.pr_count += other.stats.pr_count;
    stats.ticket_count += other.stats.ticket_count;
    stats.total_additions += other.stats.total_additions;
    stats.total_deletions += other.stats.total_deletions;
    stats.by_impact.absorb(&other.stats.by_impact);
    union_into(&mut stats.repos, &other.stats.repos);
}

fn union_into(target: &mut Vec<String>, extra: &[String]) {
    let mut set: OrderedSet<String> = target.drain(..).collect();
    for item in extra {
        set.insert(item.clone());
    }
    *target = set.into_vec();
}
