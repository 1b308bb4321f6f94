use std::fs;
use std::path::{Path, PathBuf};

use super::core::ChronicleConfig;
use crate::core::{Error, Result};
use crate::impact::PatternRules;

pub const CONFIG_FILE_NAME: &str = ".chronicle.toml";

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<ChronicleConfig> {
    let config = toml::from_str::<ChronicleConfig>(contents)?;

    if let Some(analysis) = &config.analysis {
        analysis
            .projects
            .validate()
            .map_err(Error::Configuration)?;
        // Compile once up front so a bad pattern fails here, not mid-analysis
        PatternRules::with_extras(&analysis.patterns)?;
    }

    Ok(config)
}

/// Load and validate a config file at an explicit path.
pub fn load_config_from_path(path: &Path) -> Result<ChronicleConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::file_system_io("Failed to read config file", path, e))?;
    let config = parse_and_validate_config(&contents)
        .map_err(|e| e.with_context(format!("Invalid config {}", path.display())))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try loading config from a candidate path; a missing file is not an error.
fn try_load_config_from_path(config_path: &Path) -> Option<Result<ChronicleConfig>> {
    if !config_path.is_file() {
        return None;
    }
    Some(load_config_from_path(config_path))
}

/// Generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find and load `.chronicle.toml` from `start` or one of its ancestors.
///
/// Returns the default config when no file is found. A file that exists but
/// fails to parse or validate is an error.
pub fn load_config_from(start: PathBuf) -> Result<ChronicleConfig> {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok(ChronicleConfig::default())
        })
}

/// Load config from an explicit path, or discover it from the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<ChronicleConfig> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }

    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            Ok(ChronicleConfig::default())
        }
    }
}
