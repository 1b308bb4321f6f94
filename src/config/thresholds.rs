use serde::{Deserialize, Serialize};

/// Upper size bounds below which a change may count as minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MinorThresholds {
    pub max_lines: u64,
    pub max_files: u64,
}

impl Default for MinorThresholds {
    fn default() -> Self {
        Self {
            max_lines: default_minor_max_lines(),
            max_files: default_minor_max_files(),
        }
    }
}

impl MinorThresholds {
    /// Both bounds must be enabled (non-zero) and satisfied.
    pub fn contains(&self, total_lines: u64, changed_files: u64) -> bool {
        self.max_lines > 0
            && total_lines <= self.max_lines
            && self.max_files > 0
            && changed_files <= self.max_files
    }
}

/// Lower size bounds at or above which a change reaches a tier.
///
/// A bound of zero is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeFloor {
    pub min_lines: u64,
    pub min_files: u64,
}

impl SizeFloor {
    pub fn reached(&self, total_lines: u64, changed_files: u64) -> bool {
        (self.min_lines > 0 && total_lines >= self.min_lines)
            || (self.min_files > 0 && changed_files >= self.min_files)
    }
}

/// Resolved size thresholds for impact classification.
///
/// Built from [`ThresholdOverrides`] so that a config file can set any single
/// bound and keep the defaults for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImpactThresholds {
    pub minor: MinorThresholds,
    pub major: SizeFloor,
    pub flagship: SizeFloor,
}

impl Default for ImpactThresholds {
    fn default() -> Self {
        Self {
            minor: MinorThresholds::default(),
            major: default_major_floor(),
            flagship: default_flagship_floor(),
        }
    }
}

impl ImpactThresholds {
    /// Apply the partially specified tiers from a config file over the defaults.
    pub fn from_overrides(overrides: &ThresholdOverrides) -> Self {
        let defaults = Self::default();
        let floor = |tier: Option<&FloorOverride>, default: SizeFloor| SizeFloor {
            min_lines: tier.and_then(|t| t.min_lines).unwrap_or(default.min_lines),
            min_files: tier.and_then(|t| t.min_files).unwrap_or(default.min_files),
        };

        Self {
            minor: MinorThresholds {
                max_lines: overrides
                    .minor
                    .as_ref()
                    .and_then(|m| m.max_lines)
                    .unwrap_or(defaults.minor.max_lines),
                max_files: overrides
                    .minor
                    .as_ref()
                    .and_then(|m| m.max_files)
                    .unwrap_or(defaults.minor.max_files),
            },
            major: floor(overrides.major.as_ref(), defaults.major),
            flagship: floor(overrides.flagship.as_ref(), defaults.flagship),
        }
    }
}

/// `[analysis.thresholds]` as written in the config file; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    #[serde(default)]
    pub minor: Option<CeilingOverride>,
    #[serde(default)]
    pub major: Option<FloorOverride>,
    #[serde(default)]
    pub flagship: Option<FloorOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeilingOverride {
    #[serde(default, alias = "maxLines")]
    pub max_lines: Option<u64>,
    #[serde(default, alias = "maxFiles")]
    pub max_files: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorOverride {
    #[serde(default, alias = "minLines")]
    pub min_lines: Option<u64>,
    #[serde(default, alias = "minFiles")]
    pub min_files: Option<u64>,
}

fn default_minor_max_lines() -> u64 {
    20
}
fn default_minor_max_files() -> u64 {
    3
}
fn default_major_floor() -> SizeFloor {
    SizeFloor {
        min_lines: 200,
        min_files: 8,
    }
}
fn default_flagship_floor() -> SizeFloor {
    SizeFloor {
        min_lines: 500,
        min_files: 15,
    }
}
