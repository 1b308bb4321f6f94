//! Flat count tables over changes and tickets.
//!
//! Every table is a `BTreeMap`, so keys serialize in ascending order and the
//! month table is chronological regardless of input order.

use crate::core::dates::format_month;
use crate::core::{ChangeRecord, DateRange, ImpactCounts, TicketRecord};
use crate::impact::ImpactClassifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStats {
    pub total: usize,
    pub by_impact: ImpactCounts,
    pub by_repo: BTreeMap<String, usize>,
    pub by_org: BTreeMap<String, usize>,
    /// Keyed by `YYYY-MM` of creation.
    pub by_month: BTreeMap<String, usize>,
    pub by_state: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStats {
    pub total: usize,
    pub by_project: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub by_issue_type: BTreeMap<String, usize>,
    pub total_story_points: f64,
}

/// Link coverage between the two collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    #[serde(rename = "prsWithTickets")]
    pub changes_with_tickets: usize,
    #[serde(rename = "ticketsWithPRs")]
    pub tickets_with_changes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub date_range: DateRange,
    #[serde(rename = "prs")]
    pub changes: ChangeStats,
    pub tickets: TicketStats,
    pub links: LinkStats,
}

/// Stats with the default classifier for changes that carry no stored tier.
pub fn generate_stats(
    changes: &[ChangeRecord],
    tickets: &[TicketRecord],
    date_range: DateRange,
) -> AnalysisStats {
    generate_stats_with(changes, tickets, date_range, &ImpactClassifier::default())
}

pub fn generate_stats_with(
    changes: &[ChangeRecord],
    tickets: &[TicketRecord],
    date_range: DateRange,
    classifier: &ImpactClassifier,
) -> AnalysisStats {
    let mut change_stats = ChangeStats {
        total: changes.len(),
        ..Default::default()
    };
    let mut ticket_stats = TicketStats {
        total: tickets.len(),
        ..Default::default()
    };
    let mut links = LinkStats::default();

    for change in changes {
        change_stats.by_impact.increment(classifier.resolve(change));
        bump(&mut change_stats.by_repo, change.repo_key());
        bump(&mut change_stats.by_org, change.org.clone());
        bump(
            &mut change_stats.by_month,
            format_month(change.created_at.date_naive()),
        );
        bump(&mut change_stats.by_state, change.state.as_str().to_string());
        if change.has_linked_tickets() {
            links.changes_with_tickets += 1;
        }
    }

    for ticket in tickets {
        bump(&mut ticket_stats.by_project, ticket.project.clone());
        bump(&mut ticket_stats.by_status, ticket.status.clone());
        bump(&mut ticket_stats.by_issue_type, ticket.issue_type.clone());
        ticket_stats.total_story_points += ticket.story_points.unwrap_or(0.0);
        if ticket.has_linked_changes() {
            links.tickets_with_changes += 1;
        }
    }

    tracing::debug!(
        changes = change_stats.total,
        tickets = ticket_stats.total,
        "generated stats"
    );

    AnalysisStats {
        date_range,
        changes: change_stats,
        tickets: ticket_stats,
        links,
    }
}

fn bump(table: &mut BTreeMap<String, usize>, key: String) {
    *table.entry(key).or_default() += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImpactThresholds;
    use crate::core::ImpactTier;
    use crate::testkit::{ChangeBuilder, TicketBuilder};
    use pretty_assertions::assert_eq;

    fn range() -> DateRange {
        DateRange::new("2024-01-01", "2024-12-31")
    }

    #[test]
    fn test_empty_collections() {
        let stats = generate_stats(&[], &[], range());
        assert_eq!(stats.changes, ChangeStats::default());
        assert_eq!(stats.tickets, TicketStats::default());
        assert_eq!(stats.links, LinkStats::default());
        assert_eq!(stats.date_range, range());
    }

    #[test]
    fn test_change_tables() {
        let changes = vec![
            ChangeBuilder::new(1, "Add export endpoint")
                .size(40, 5, 3)
                .created("2024-03-05T10:00:00Z")
                .merged("2024-03-06T10:00:00Z")
                .tickets(&["OPS-1"])
                .build(),
            ChangeBuilder::new(2, "Handle empty cart")
                .repo("shop", "web")
                .size(30, 10, 3)
                .created("2024-01-20T10:00:00Z")
                .build(),
            ChangeBuilder::new(3, "Handle null cart")
                .size(30, 10, 3)
                .created("2024-03-28T10:00:00Z")
                .impact(ImpactTier::Flagship)
                .build(),
        ];

        let stats = generate_stats(&changes, &[], range());
        let c = &stats.changes;
        assert_eq!(c.total, 3);
        assert_eq!(c.by_impact.major, 1);
        assert_eq!(c.by_impact.standard, 1);
        assert_eq!(c.by_impact.flagship, 1);
        assert_eq!(c.by_repo.get("acme/api"), Some(&2));
        assert_eq!(c.by_repo.get("shop/web"), Some(&1));
        assert_eq!(c.by_org.get("acme"), Some(&2));
        assert_eq!(c.by_state.get("merged"), Some(&1));
        assert_eq!(c.by_state.get("open"), Some(&2));
        assert_eq!(stats.links.changes_with_tickets, 1);

        let months: Vec<(&str, usize)> = c.by_month.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(months, vec![("2024-01", 1), ("2024-03", 2)]);
    }

    #[test]
    fn test_ticket_tables_and_story_points() {
        let tickets = vec![
            TicketBuilder::new("OPS-1", "Alerts").story_points(3.0).linked(&["u"]).build(),
            TicketBuilder::new("OPS-2", "Dashboards").status("In Progress").build(),
            TicketBuilder::new("WEB-1", "Landing")
                .issue_type("Bug")
                .story_points(1.5)
                .build(),
        ];

        let stats = generate_stats(&[], &tickets, range());
        let t = &stats.tickets;
        assert_eq!(t.total, 3);
        assert_eq!(t.by_project.get("OPS"), Some(&2));
        assert_eq!(t.by_status.get("Done"), Some(&2));
        assert_eq!(t.by_status.get("In Progress"), Some(&1));
        assert_eq!(t.by_issue_type.get("Bug"), Some(&1));
        assert_eq!(t.total_story_points, 4.5);
        assert_eq!(stats.links.tickets_with_changes, 1);
    }

    #[test]
    fn test_custom_classifier() {
        let mut thresholds = ImpactThresholds::default();
        thresholds.flagship.min_lines = 30;
        let classifier = ImpactClassifier::with_thresholds(thresholds);
        let changes = vec![ChangeBuilder::new(1, "Handle empty cart").size(30, 10, 3).build()];

        let stats = generate_stats_with(&changes, &[], range(), &classifier);
        assert_eq!(stats.changes.by_impact.flagship, 1);
    }

    #[test]
    fn test_serialized_field_names() {
        let changes = vec![ChangeBuilder::new(1, "x").tickets(&["A-1"]).build()];
        let json = serde_json::to_value(generate_stats(&changes, &[], range())).unwrap();
        assert_eq!(json["prs"]["byImpact"]["minor"], 1);
        assert_eq!(json["prs"]["byMonth"]["2024-01"], 1);
        assert_eq!(json["links"]["prsWithTickets"], 1);
        assert_eq!(json["links"]["ticketsWithPRs"], 0);
        assert_eq!(json["dateRange"]["since"], "2024-01-01");
        assert_eq!(json["tickets"]["totalStoryPoints"], 0.0);
    }
}
