//! End-to-end behavior of the four analyzers on hand-built records.

use chronicle::testkit::{ChangeBuilder, TicketBuilder};
use chronicle::{
    classify_impact, detect_projects, generate_stats, generate_timeline, Confidence, DateRange,
    DominantSignal, ImpactTier, ProjectDetectionConfig,
};
use pretty_assertions::assert_eq;

fn range() -> DateRange {
    DateRange::new("2024-02-01", "2024-02-29")
}

#[test]
fn test_linked_pair_forms_one_project_and_neighbor_stays_unassigned() {
    let changes = vec![
        ChangeBuilder::new(11, "feat: importer skeleton")
            .repo("acme", "ingest")
            .tickets(&["PROJ-1"])
            .created("2024-02-05T09:00:00Z")
            .build(),
        ChangeBuilder::new(12, "Importer retries")
            .repo("acme", "ingest")
            .tickets(&["PROJ-1"])
            .created("2024-02-05T16:00:00Z")
            .build(),
        ChangeBuilder::new(13, "Tidy logging")
            .repo("acme", "ingest")
            .created("2024-02-12T09:00:00Z")
            .build(),
    ];
    let tickets = vec![TicketBuilder::new("PROJ-1", "Bulk importer").build()];
    let config = ProjectDetectionConfig {
        min_cluster_size: 2,
        ..Default::default()
    };

    let analysis = detect_projects(&changes, &tickets, range(), &config);

    assert_eq!(analysis.projects.len(), 1);
    let project = &analysis.projects[0];
    assert_eq!(project.project_id, "project-proj-1");
    assert_eq!(project.name, "Bulk importer");
    assert_eq!(project.confidence, Confidence::High);
    assert_eq!(project.dominant_signal, DominantSignal::Tickets);
    assert_eq!(
        project.pr_urls,
        vec![
            "https://github.com/acme/ingest/pull/11".to_string(),
            "https://github.com/acme/ingest/pull/12".to_string(),
        ]
    );
    assert_eq!(project.ticket_keys, vec!["PROJ-1".to_string()]);
    assert_eq!(analysis.summary.total_projects, 1);
    assert_eq!(analysis.summary.by_confidence.high, 1);
    assert_eq!(analysis.summary.unassigned_prs, 1);
    assert_eq!(
        analysis.summary.unassigned_pr_urls,
        vec!["https://github.com/acme/ingest/pull/13".to_string()]
    );
}

#[test]
fn test_transitive_links_join_three_changes() {
    let changes = vec![
        ChangeBuilder::new(1, "A").tickets(&["T-1"]).build(),
        ChangeBuilder::new(2, "B").tickets(&["T-1", "T-2"]).build(),
        ChangeBuilder::new(3, "C").tickets(&["T-2"]).build(),
    ];

    let analysis = detect_projects(&changes, &[], range(), &ProjectDetectionConfig::default());
    assert_eq!(analysis.projects.len(), 1);
    assert_eq!(analysis.projects[0].pr_urls.len(), 3);
}

#[test]
fn test_classifier_precedence_examples() {
    let large = ChangeBuilder::new(1, "Tidy handlers").size(450, 50, 4).build();
    assert_eq!(classify_impact(&large, None), ImpactTier::Flagship);

    let keyword = ChangeBuilder::new(2, "rewrite auth flow").size(3, 2, 1).build();
    assert_eq!(classify_impact(&keyword, None), ImpactTier::Flagship);

    let tiny_feat = ChangeBuilder::new(3, "feat: new setting").size(3, 2, 1).build();
    assert_eq!(classify_impact(&tiny_feat, None), ImpactTier::Minor);
}

#[test]
fn test_sunday_at_month_start_rolls_into_previous_month() {
    // Sunday 2024-09-01 sits in the week of Monday 2024-08-26.
    let change = ChangeBuilder::new(1, "x").created("2024-09-01T12:00:00Z").build();
    let timeline = generate_timeline(&[change], &[], range());

    assert_eq!(timeline.months.len(), 1);
    assert_eq!(timeline.months[0].month, "2024-08");
    assert_eq!(timeline.months[0].weeks[0].week_start, "2024-08-26");
    assert_eq!(timeline.months[0].weeks[0].week_end, "2024-09-01");
}

#[test]
fn test_analyzers_are_deterministic() {
    let changes: Vec<_> = (0..12u64)
        .map(|i| {
            let labels = if i % 2 == 0 { vec!["backend"] } else { vec![] };
            let keys = if i % 4 == 0 { vec!["OPS-1"] } else { vec![] };
            ChangeBuilder::new(i + 1, if i % 2 == 0 { "fix: edge" } else { "Add panel" })
                .repo("acme", if i % 3 == 0 { "web" } else { "api" })
                .size(i * 30, i * 4, i % 9)
                .labels(&labels)
                .tickets(&keys)
                .created(&format!("2024-02-{:02}T10:00:00Z", i + 1))
                .build()
        })
        .collect();
    let tickets = vec![
        TicketBuilder::new("OPS-1", "Alerting").story_points(5.0).build(),
        TicketBuilder::new("OPS-7", "Runbooks").build(),
    ];
    let config = ProjectDetectionConfig::default();

    let render = || {
        (
            serde_json::to_string(&detect_projects(&changes, &tickets, range(), &config)).unwrap(),
            serde_json::to_string(&generate_stats(&changes, &tickets, range())).unwrap(),
            serde_json::to_string(&generate_timeline(&changes, &tickets, range())).unwrap(),
        )
    };

    assert_eq!(render(), render());
}

#[test]
fn test_date_range_is_passed_through_unfiltered() {
    let change = ChangeBuilder::new(1, "x").created("2023-06-01T00:00:00Z").build();
    let stats = generate_stats(&[change], &[], range());

    assert_eq!(stats.date_range, range());
    assert_eq!(stats.changes.total, 1);
    assert_eq!(stats.changes.by_month.get("2023-06"), Some(&1));
}
