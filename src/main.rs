use anyhow::Result;
use chronicle::cli::{Cli, Commands};
use chronicle::commands::{self, AnalyzeConfig, TeamConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "chronicle=warn",
        1 => "chronicle=debug",
        _ => "chronicle=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Analyze {
            changes,
            tickets,
            since,
            until,
            projects,
            timeline,
            tag_changes,
            all,
            output,
            config,
            plain,
        } => commands::handle_analyze(AnalyzeConfig {
            changes,
            tickets,
            since,
            until,
            projects: projects || all,
            timeline: timeline || all,
            tag_changes: tag_changes || all,
            output,
            config,
            plain,
        }),
        Commands::Team {
            inputs,
            output,
            plain,
        } => commands::handle_team(TeamConfig {
            inputs,
            output,
            plain,
        }),
        Commands::Init { force } => commands::init_config(force),
    }
}
