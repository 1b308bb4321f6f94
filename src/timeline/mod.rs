//! Chronological rollup of changes and tickets into ISO weeks and months.
//!
//! A change is dated by its merge time (falling back to creation), a ticket by
//! its resolution time (falling back to creation). A week belongs entirely to
//! the month of its Monday, so month totals are exact sums of week totals.

pub mod weeks;

use crate::core::dates::{format_date, format_month};
use crate::core::{ChangeRecord, ChangeState, DateRange, ImpactCounts, ImpactTier, TicketRecord};
use crate::impact::ImpactClassifier;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weeks::{iso_week_number, month_name, month_of_week, week_end, week_start};

/// Projection of a change placed on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineChange {
    pub url: String,
    pub title: String,
    pub repository: String,
    pub org: String,
    #[serde(rename = "prNumber")]
    pub id: u64,
    pub state: ChangeState,
    pub impact: ImpactTier,
    pub additions: u64,
    pub deletions: u64,
    #[serde(rename = "jiraTickets")]
    pub linked_ticket_keys: Vec<String>,
    /// Primary date, `YYYY-MM-DD`
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineTicket {
    pub key: String,
    pub summary: String,
    pub project: String,
    pub issue_type: String,
    pub status: String,
    #[serde(rename = "linkedPRs")]
    pub linked_change_urls: Vec<String>,
    pub date: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub pr_count: usize,
    pub ticket_count: usize,
    pub additions: u64,
    pub deletions: u64,
    pub by_impact: ImpactCounts,
}

impl PeriodStats {
    fn absorb(&mut self, other: &PeriodStats) {
        self.pr_count += other.pr_count;
        self.ticket_count += other.ticket_count;
        self.additions += other.additions;
        self.deletions += other.deletions;
        self.by_impact.absorb(&other.by_impact);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineWeek {
    pub week_start: String,
    pub week_end: String,
    pub week_number: u32,
    pub year: i32,
    #[serde(rename = "prs")]
    pub changes: Vec<TimelineChange>,
    pub tickets: Vec<TimelineTicket>,
    pub stats: PeriodStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMonth {
    /// `YYYY-MM`
    pub month: String,
    pub month_name: String,
    pub weeks: Vec<TimelineWeek>,
    pub stats: PeriodStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusiestWeek {
    pub week_start: String,
    pub pr_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusiestMonth {
    pub month: String,
    pub pr_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSummary {
    pub total_weeks: usize,
    pub total_months: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busiest_week: Option<BusiestWeek>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busiest_month: Option<BusiestMonth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub date_range: DateRange,
    pub months: Vec<TimelineMonth>,
    pub summary: TimelineSummary,
}

impl Timeline {
    /// Weeks in ascending order across all months.
    pub fn weeks(&self) -> impl Iterator<Item = &TimelineWeek> {
        self.months.iter().flat_map(|month| month.weeks.iter())
    }
}

/// Accumulates one week before it is frozen into a [`TimelineWeek`].
struct WeekBucket {
    start: NaiveDate,
    week_number: u32,
    changes: Vec<(NaiveDate, TimelineChange)>,
    tickets: Vec<(NaiveDate, TimelineTicket)>,
    stats: PeriodStats,
}

impl WeekBucket {
    fn new(date: NaiveDate) -> Self {
        Self {
            start: week_start(date),
            week_number: iso_week_number(date),
            changes: Vec::new(),
            tickets: Vec::new(),
            stats: PeriodStats::default(),
        }
    }

    fn finish(mut self) -> TimelineWeek {
        self.changes.sort_by_key(|(date, _)| *date);
        self.tickets.sort_by_key(|(date, _)| *date);
        TimelineWeek {
            week_start: format_date(self.start),
            week_end: format_date(week_end(self.start)),
            week_number: self.week_number,
            year: self.start.year(),
            changes: self.changes.into_iter().map(|(_, c)| c).collect(),
            tickets: self.tickets.into_iter().map(|(_, t)| t).collect(),
            stats: self.stats,
        }
    }
}

fn project_change(change: &ChangeRecord, impact: ImpactTier, date: NaiveDate) -> TimelineChange {
    TimelineChange {
        url: change.url.clone(),
        title: change.title.clone(),
        repository: change.repository.clone(),
        org: change.org.clone(),
        id: change.id,
        state: change.state,
        impact,
        additions: change.additions,
        deletions: change.deletions,
        linked_ticket_keys: change.linked_ticket_keys.clone(),
        date: format_date(date),
    }
}

fn project_ticket(ticket: &TicketRecord, date: NaiveDate) -> TimelineTicket {
    TimelineTicket {
        key: ticket.key.clone(),
        summary: ticket.summary.clone(),
        project: ticket.project.clone(),
        issue_type: ticket.issue_type.clone(),
        status: ticket.status.clone(),
        linked_change_urls: ticket.linked_change_urls.clone(),
        date: format_date(date),
    }
}

/// Timeline with the default classifier for changes that carry no stored tier.
pub fn generate_timeline(
    changes: &[ChangeRecord],
    tickets: &[TicketRecord],
    date_range: DateRange,
) -> Timeline {
    generate_timeline_with(changes, tickets, date_range, &ImpactClassifier::default())
}

pub fn generate_timeline_with(
    changes: &[ChangeRecord],
    tickets: &[TicketRecord],
    date_range: DateRange,
    classifier: &ImpactClassifier,
) -> Timeline {
    let mut buckets: BTreeMap<NaiveDate, WeekBucket> = BTreeMap::new();

    for change in changes {
        let date = change.primary_date().date_naive();
        let impact = classifier.resolve(change);
        let bucket = buckets
            .entry(week_start(date))
            .or_insert_with(|| WeekBucket::new(date));
        bucket.stats.pr_count += 1;
        bucket.stats.additions += change.additions;
        bucket.stats.deletions += change.deletions;
        bucket.stats.by_impact.increment(impact);
        bucket.changes.push((date, project_change(change, impact, date)));
    }

    for ticket in tickets {
        let date = ticket.primary_date().date_naive();
        let bucket = buckets
            .entry(week_start(date))
            .or_insert_with(|| WeekBucket::new(date));
        bucket.stats.ticket_count += 1;
        bucket.tickets.push((date, project_ticket(ticket, date)));
    }

    let total_weeks = buckets.len();
    let mut months: BTreeMap<NaiveDate, TimelineMonth> = BTreeMap::new();
    for (start, bucket) in buckets {
        let first_of_month = month_of_week(start);
        let month = months.entry(first_of_month).or_insert_with(|| TimelineMonth {
            month: format_month(first_of_month),
            month_name: month_name(first_of_month),
            weeks: Vec::new(),
            stats: PeriodStats::default(),
        });
        let week = bucket.finish();
        month.stats.absorb(&week.stats);
        month.weeks.push(week);
    }
    let months: Vec<TimelineMonth> = months.into_values().collect();

    let summary = TimelineSummary {
        total_weeks,
        total_months: months.len(),
        busiest_week: busiest(months.iter().flat_map(|m| &m.weeks), |w| w.stats.pr_count).map(
            |week| BusiestWeek {
                week_start: week.week_start.clone(),
                pr_count: week.stats.pr_count,
            },
        ),
        busiest_month: busiest(months.iter(), |m| m.stats.pr_count).map(|month| BusiestMonth {
            month: month.month.clone(),
            pr_count: month.stats.pr_count,
        }),
    };

    tracing::debug!(
        weeks = summary.total_weeks,
        months = summary.total_months,
        "generated timeline"
    );

    Timeline {
        date_range,
        months,
        summary,
    }
}

/// First item with the strictly greatest count.
fn busiest<'a, T>(
    items: impl Iterator<Item = &'a T>,
    count: impl Fn(&T) -> usize,
) -> Option<&'a T>
where
    T: 'a,
{
    let mut best: Option<&'a T> = None;
    for item in items {
        if best.map_or(true, |current| count(item) > count(current)) {
            best = Some(item);
        }
    }
    best
}
