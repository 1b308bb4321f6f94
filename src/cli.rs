use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chronicle")]
#[command(about = "Impact, project and timeline analysis of engineering work", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze change and ticket records
    Analyze {
        /// Change (pull request) records, JSON or YAML
        #[arg(long = "prs", value_name = "FILE")]
        changes: PathBuf,

        /// Ticket records, JSON or YAML
        #[arg(long, value_name = "FILE")]
        tickets: Option<PathBuf>,

        /// Start of the analyzed period (recorded in reports, not used as a filter)
        #[arg(long)]
        since: Option<String>,

        /// End of the analyzed period (recorded in reports, not used as a filter)
        #[arg(long)]
        until: Option<String>,

        /// Detect projects
        #[arg(long)]
        projects: bool,

        /// Build the weekly/monthly timeline
        #[arg(long)]
        timeline: bool,

        /// Write classified impact tiers back into the change file
        #[arg(long = "tag-prs")]
        tag_changes: bool,

        /// Run every analysis
        #[arg(long)]
        all: bool,

        /// Directory for JSON reports
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Configuration file (defaults to the nearest .chronicle.toml)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        plain: bool,
    },

    /// Merge several people's project analyses into a team view
    Team {
        /// projects.json files written by `chronicle analyze`
        #[arg(required = true, value_name = "PROJECTS_JSON")]
        inputs: Vec<PathBuf>,

        /// Directory for the merged report
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        plain: bool,
    },

    /// Write a default .chronicle.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
