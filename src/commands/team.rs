use crate::io;
use crate::projects::{aggregate_team_projects, ProjectGrouping, ProjectsAnalysis};
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct TeamConfig {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub plain: bool,
}

/// Written as `team-projects.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamReport {
    pub sources: Vec<String>,
    pub projects: Vec<ProjectGrouping>,
}

fn load_analysis(path: &Path) -> Result<ProjectsAnalysis> {
    let content = io::read_file(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a project analysis", path.display()))
}

/// Merge the given analyses. Unreadable inputs are skipped with a warning.
pub fn handle_team(config: TeamConfig) -> Result<()> {
    if config.plain {
        colored::control::set_override(false);
    }

    let mut sources = Vec::new();
    let mut analyses = Vec::new();
    for path in &config.inputs {
        match load_analysis(path) {
            Ok(analysis) => {
                sources.push(path.display().to_string());
                analyses.push(analysis);
            }
            Err(err) => warn!(path = %path.display(), error = %err, "skipping input"),
        }
    }
    if analyses.is_empty() {
        anyhow::bail!("None of the {} inputs could be read", config.inputs.len());
    }

    let projects = aggregate_team_projects(&analyses);
    println!(
        "{} {} projects from {} analyses",
        "Team:".bold(),
        projects.len(),
        analyses.len()
    );
    for project in &projects {
        println!(
            "  {} {} ({} changes, {})",
            "•".cyan(),
            project.name,
            project.stats.pr_count,
            project.stats.repos.join(", ")
        );
    }

    if let Some(dir) = &config.output {
        let report = TeamReport { sources, projects };
        let path = io::write_report(dir, "team-projects", &report)?;
        println!("{} {}", "Wrote".dimmed(), path.display());
    }

    Ok(())
}
