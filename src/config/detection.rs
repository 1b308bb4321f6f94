use serde::{Deserialize, Serialize};

/// Project detection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDetectionConfig {
    /// Time window in days for temporal clustering (default: 14)
    /// Measured from the first change of a cluster, not the previous one
    #[serde(default = "default_time_window_days", alias = "timeWindowDays")]
    pub time_window_days: u32,

    /// Minimum changes to form a temporal cluster (default: 2)
    #[serde(default = "default_min_cluster_size", alias = "minClusterSize")]
    pub min_cluster_size: usize,

    /// Whether unlinked changes take part in temporal clustering (default: true)
    #[serde(
        default = "default_include_unlinked_changes",
        alias = "includeUnlinkedChanges",
        alias = "includeUnlinkedPRs"
    )]
    pub include_unlinked_changes: bool,
}

impl Default for ProjectDetectionConfig {
    fn default() -> Self {
        Self {
            time_window_days: default_time_window_days(),
            min_cluster_size: default_min_cluster_size(),
            include_unlinked_changes: default_include_unlinked_changes(),
        }
    }
}

impl ProjectDetectionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_cluster_size == 0 {
            return Err("min_cluster_size must be at least 1".to_string());
        }
        Ok(())
    }
}

fn default_time_window_days() -> u32 {
    14
}

fn default_min_cluster_size() -> usize {
    2
}

fn default_include_unlinked_changes() -> bool {
    true
}
