use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# Chronicle Configuration

# Size bounds used by impact classification. A value of 0 disables that bound.
[analysis.thresholds.minor]
max_lines = 20
max_files = 3

[analysis.thresholds.major]
min_lines = 200
min_files = 8

[analysis.thresholds.flagship]
min_lines = 500
min_files = 15

# Extra case-insensitive title patterns, checked after the built-in ones.
[analysis.patterns]
extra_flagship = []
extra_major = []
extra_minor = []

[analysis.projects]
time_window_days = 14
min_cluster_size = 2
include_unlinked_changes = true

# Period labels for reports; analysis never filters by these.
[fetch]
# since = "2024-01-01"
# until = "2024-12-31"
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");
    Ok(())
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    Ok(())
}
