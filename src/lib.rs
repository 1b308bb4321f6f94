// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod impact;
pub mod io;
pub mod projects;
pub mod stats;
pub mod testkit;
pub mod timeline;

// Re-export commonly used types
pub use crate::core::{
    ChangeRecord, ChangeState, DateRange, Error, ImpactCounts, ImpactTier, Result, TicketRecord,
};

pub use crate::config::{ChronicleConfig, ImpactThresholds, ProjectDetectionConfig};

pub use crate::impact::{classify_impact, tag_changes, ImpactClassifier, TagSummary};

pub use crate::projects::{
    aggregate_team_projects, detect_projects, Confidence, DominantSignal, ProjectDetector,
    ProjectGrouping, ProjectsAnalysis,
};

pub use crate::stats::{generate_stats, generate_stats_with, AnalysisStats};

pub use crate::timeline::{generate_timeline, generate_timeline_with, Timeline};
