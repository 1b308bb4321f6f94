use serde::{Deserialize, Serialize};

use super::classification::PatternConfig;
use super::detection::ProjectDetectionConfig;
use super::thresholds::{ImpactThresholds, ThresholdOverrides};

/// Root configuration structure for chronicle
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChronicleConfig {
    /// Classification and grouping settings
    #[serde(default)]
    pub analysis: Option<AnalysisSettings>,

    /// Default date range for analysis runs
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
}

/// `[analysis]`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AnalysisSettings {
    #[serde(default)]
    pub thresholds: ThresholdOverrides,

    #[serde(default)]
    pub patterns: PatternConfig,

    #[serde(default)]
    pub projects: ProjectDetectionConfig,
}

/// `[fetch]`: the range a work log was fetched for.
///
/// Only used to label reports; the analyzers never filter by it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FetchConfig {
    #[serde(default)]
    pub since: Option<String>,
    #[serde(default)]
    pub until: Option<String>,
}

impl ChronicleConfig {
    /// Impact thresholds with config overrides applied over the defaults.
    pub fn impact_thresholds(&self) -> ImpactThresholds {
        self.analysis
            .as_ref()
            .map(|a| ImpactThresholds::from_overrides(&a.thresholds))
            .unwrap_or_default()
    }

    pub fn patterns(&self) -> PatternConfig {
        self.analysis
            .as_ref()
            .map(|a| a.patterns.clone())
            .unwrap_or_default()
    }

    pub fn project_detection(&self) -> ProjectDetectionConfig {
        self.analysis
            .as_ref()
            .map(|a| a.projects.clone())
            .unwrap_or_default()
    }

    pub fn since(&self) -> Option<&str> {
        self.fetch.as_ref().and_then(|f| f.since.as_deref())
    }

    pub fn until(&self) -> Option<&str> {
        self.fetch.as_ref().and_then(|f| f.until.as_deref())
    }
}
