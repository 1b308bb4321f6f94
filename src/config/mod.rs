//! Configuration loaded from `.chronicle.toml`.
//!
//! Values are always handed to the analyzers explicitly; nothing here is
//! cached in process-wide state.

mod classification;
mod core;
mod detection;
mod loader;
mod thresholds;

pub use classification::PatternConfig;
pub use self::core::{AnalysisSettings, ChronicleConfig, FetchConfig};
pub use detection::ProjectDetectionConfig;
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use thresholds::{
    CeilingOverride, FloorOverride, ImpactThresholds, MinorThresholds, SizeFloor,
    ThresholdOverrides,
};
