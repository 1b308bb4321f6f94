//! CLI command implementations.
//!
//! - **analyze**: stats, projects and timeline over loaded records
//! - **team**: merge several people's project analyses
//! - **init**: write a default `.chronicle.toml`

pub mod analyze;
pub mod init;
pub mod team;

pub use analyze::{handle_analyze, AnalyzeConfig};
pub use init::init_config;
pub use team::{handle_team, TeamConfig};
