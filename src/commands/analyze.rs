use crate::config::{self, ChronicleConfig};
use crate::core::dates::format_date;
use crate::core::{ChangeRecord, DateRange, ImpactTier, TicketRecord};
use crate::impact::{tag_changes, ImpactClassifier};
use crate::io;
use crate::projects::{ProjectDetector, ProjectsAnalysis};
use crate::stats::{generate_stats_with, AnalysisStats};
use crate::timeline::{generate_timeline_with, Timeline};
use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;
use tracing::info;

/// Options for one `chronicle analyze` run.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeConfig {
    pub changes: PathBuf,
    pub tickets: Option<PathBuf>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub projects: bool,
    pub timeline: bool,
    pub tag_changes: bool,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub plain: bool,
}

/// Everything an analyze run produced; `None` for analyses not requested.
#[derive(Debug, Clone)]
pub struct AnalyzeReport {
    pub stats: AnalysisStats,
    pub projects: Option<ProjectsAnalysis>,
    pub timeline: Option<Timeline>,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    configure_output(config.plain);

    let settings = config::load_config(config.config.as_deref())
        .context("Failed to load configuration")?;
    let classifier = ImpactClassifier::from_config(&settings)
        .context("Invalid impact classification settings")?;

    let mut changes = io::load_changes(&config.changes)
        .with_context(|| format!("Failed to load changes from {}", config.changes.display()))?;
    let tickets = match &config.tickets {
        Some(path) => io::load_tickets(path)
            .with_context(|| format!("Failed to load tickets from {}", path.display()))?,
        None => Vec::new(),
    };
    info!(changes = changes.len(), tickets = tickets.len(), "records loaded");

    if config.tag_changes {
        let summary = tag_changes(&mut changes, &classifier);
        io::write_changes(&config.changes, &changes)
            .with_context(|| format!("Failed to write {}", config.changes.display()))?;
        println!(
            "{} {} tagged, {} unchanged",
            "Impact:".bold(),
            summary.updated.to_string().green(),
            summary.unchanged
        );
    }

    let date_range = resolve_date_range(&config, &settings, &changes, &tickets);
    let report = run_analyses(&config, &settings, &classifier, &changes, &tickets, date_range);

    print_report(&report);

    if let Some(dir) = &config.output {
        let mut written = vec![io::write_report(dir, "stats", &report.stats)?];
        if let Some(projects) = &report.projects {
            written.push(io::write_report(dir, "projects", projects)?);
        }
        if let Some(timeline) = &report.timeline {
            written.push(io::write_report(dir, "timeline", timeline)?);
        }
        for path in written {
            println!("{} {}", "Wrote".dimmed(), path.display());
        }
    }

    Ok(())
}

/// Run the requested analyses over already-loaded records.
pub fn run_analyses(
    config: &AnalyzeConfig,
    settings: &ChronicleConfig,
    classifier: &ImpactClassifier,
    changes: &[ChangeRecord],
    tickets: &[TicketRecord],
    date_range: DateRange,
) -> AnalyzeReport {
    let stats = generate_stats_with(changes, tickets, date_range.clone(), classifier);

    let projects = config.projects.then(|| {
        ProjectDetector::new(settings.project_detection())
            .with_classifier(classifier.clone())
            .detect(changes, tickets, date_range.clone())
    });

    let timeline = config
        .timeline
        .then(|| generate_timeline_with(changes, tickets, date_range.clone(), classifier));

    AnalyzeReport {
        stats,
        projects,
        timeline,
    }
}

/// Command line wins over config; otherwise the span of the records.
pub fn resolve_date_range(
    config: &AnalyzeConfig,
    settings: &ChronicleConfig,
    changes: &[ChangeRecord],
    tickets: &[TicketRecord],
) -> DateRange {
    let dates = changes
        .iter()
        .map(|c| c.created_at)
        .chain(tickets.iter().map(|t| t.created_at));
    let earliest = dates.clone().min();
    let latest = dates.max();

    let since = config
        .since
        .clone()
        .or_else(|| settings.since().map(str::to_string))
        .or_else(|| earliest.map(|d| format_date(d.date_naive())))
        .unwrap_or_default();
    let until = config
        .until
        .clone()
        .or_else(|| settings.until().map(str::to_string))
        .or_else(|| latest.map(|d| format_date(d.date_naive())))
        .unwrap_or_default();
    DateRange::new(since, until)
}

fn configure_output(plain: bool) {
    if plain {
        colored::control::set_override(false);
    }
}

fn print_report(report: &AnalyzeReport) {
    let stats = &report.stats;
    println!(
        "{} {} to {}",
        "Period:".bold(),
        stats.date_range.since,
        stats.date_range.until
    );
    println!(
        "{} {} changes, {} tickets",
        "Records:".bold(),
        stats.changes.total,
        stats.tickets.total
    );

    println!("{}", "Impact".bold().underline());
    for tier in ImpactTier::ALL {
        let count = stats.changes.by_impact.get(tier);
        let padded = format!("{:<10}", tier.as_str());
        let label = match tier {
            ImpactTier::Flagship => padded.magenta().bold(),
            ImpactTier::Major => padded.red(),
            ImpactTier::Standard => padded.yellow(),
            ImpactTier::Minor => padded.dimmed(),
        };
        println!("  {label} {count:>5}  {}", tier.description().dimmed());
    }
    println!(
        "{} {} of {} changes link a ticket, {} of {} tickets link a change",
        "Links:".bold(),
        stats.links.changes_with_tickets,
        stats.changes.total,
        stats.links.tickets_with_changes,
        stats.tickets.total
    );

    if let Some(analysis) = &report.projects {
        println!("{}", "Projects".bold().underline());
        for project in &analysis.projects {
            println!(
                "  {} {} ({} changes, {} confidence)",
                "•".cyan(),
                project.name,
                project.stats.pr_count,
                project.confidence.as_str()
            );
        }
        if analysis.summary.unassigned_prs > 0 {
            println!(
                "  {}",
                format!("{} changes unassigned", analysis.summary.unassigned_prs).yellow()
            );
        }
    }

    if let Some(timeline) = &report.timeline {
        println!("{}", "Timeline".bold().underline());
        println!(
            "  {} weeks across {} months",
            timeline.summary.total_weeks, timeline.summary.total_months
        );
        if let Some(week) = &timeline.summary.busiest_week {
            println!("  busiest week:  {} ({} changes)", week.week_start, week.pr_count);
        }
        if let Some(month) = &timeline.summary.busiest_month {
            println!("  busiest month: {} ({} changes)", month.month, month.pr_count);
        }
    }
}
