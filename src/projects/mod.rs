//! Project grouping: clusters changes and tickets into named projects from
//! shared ticket keys, JIRA project keys and temporal proximity.

pub mod builder;
pub mod detector;
pub mod team;
pub mod types;

pub use detector::{detect_projects, ProjectDetector};
pub use team::aggregate_team_projects;
pub use types::{
    Confidence, ConfidenceCounts, DominantSignal, ProjectGrouping, ProjectSignals, ProjectStats,
    ProjectsAnalysis, ProjectsSummary, SignalCounts, TimeRange,
};
