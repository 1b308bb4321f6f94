//! Proptest strategies for record collections.
//!
//! Generated collections draw ticket keys, repositories and dates from small
//! pools so that shared keys, same-repo clusters and busy weeks actually occur.

use super::helpers::{ChangeBuilder, TicketBuilder};
use crate::core::{ChangeRecord, TicketRecord};
use proptest::prelude::*;

const REPOS: &[&str] = &["api", "web", "infra"];
const TICKET_KEYS: &[&str] = &["PROJ-1", "PROJ-2", "PROJ-3", "OPS-1", "OPS-2", "WEB-9"];
const LABELS: &[&str] = &["backend", "frontend", "dependencies", "bug"];

fn timestamp(day_offset: u32, hour: u32) -> String {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        + chrono::Duration::days(i64::from(day_offset));
    format!("{}T{:02}:00:00Z", date.format("%Y-%m-%d"), hour)
}

/// One change with an id unique in its collection (assigned by the caller).
fn change_strategy() -> impl Strategy<Value = (usize, u32, u32, Vec<usize>, Vec<usize>, bool, u64)> {
    (
        0..REPOS.len(),
        0u32..120,
        0u32..24,
        prop::collection::vec(0..TICKET_KEYS.len(), 0..3),
        prop::collection::vec(0..LABELS.len(), 0..2),
        any::<bool>(),
        0u64..800,
    )
}

/// A list of changes with distinct ids and URLs.
pub fn changes(max: usize) -> impl Strategy<Value = Vec<ChangeRecord>> {
    prop::collection::vec(change_strategy(), 0..max).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (repo, day, hour, tickets, labels, merged, lines))| {
                let keys: Vec<&str> = tickets.iter().map(|&t| TICKET_KEYS[t]).collect();
                let labels: Vec<&str> = labels.iter().map(|&l| LABELS[l]).collect();
                let builder = ChangeBuilder::new(i as u64 + 1, "Change")
                    .repo("acme", REPOS[repo])
                    .created(&timestamp(day, hour))
                    .size(lines, lines / 3, lines / 40)
                    .tickets(&keys)
                    .labels(&labels);
                if merged {
                    builder.merged(&timestamp(day + 2, hour)).build()
                } else {
                    builder.build()
                }
            })
            .collect()
    })
}

/// A list of tickets drawn from the shared key pool, keys unique.
pub fn tickets() -> impl Strategy<Value = Vec<TicketRecord>> {
    (
        prop::sample::subsequence(TICKET_KEYS.to_vec(), 0..=TICKET_KEYS.len()),
        0u32..120,
    )
        .prop_map(|(keys, day)| {
            keys.into_iter()
                .enumerate()
                .map(|(i, key)| {
                    TicketBuilder::new(key, &format!("Ticket {key}"))
                        .created(&timestamp(day + i as u32, 10))
                        .build()
                })
                .collect()
        })
}
