//! Record loading and report writing.
//!
//! Everything that touches the file system lives here; the analyzers only see
//! in-memory collections.

use crate::core::{ChangeRecord, Error, Result, ResultExt, TicketRecord};
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk encoding of a record file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Yaml,
}

impl RecordFormat {
    /// `.yaml`/`.yml` are YAML; anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::file_system_io("Failed to read file", path, e))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::file_system_io("Failed to write file", path, e))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_file() {
        return Err(Error::file_system("Output path is not a directory", path));
    }
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| Error::file_system_io("Failed to create directory", path, e))?;
    }
    Ok(())
}

fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = read_file(path)?;
    let records = match RecordFormat::from_path(path) {
        RecordFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
        RecordFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
    };
    records.map_err(|message| Error::invalid_record(path, message))
}

/// Load change records from a JSON or YAML array.
pub fn load_changes(path: &Path) -> Result<Vec<ChangeRecord>> {
    let changes: Vec<ChangeRecord> = load_records(path)?;
    tracing::debug!(path = %path.display(), count = changes.len(), "loaded changes");
    Ok(changes)
}

/// Load ticket records from a JSON or YAML array.
pub fn load_tickets(path: &Path) -> Result<Vec<TicketRecord>> {
    let tickets: Vec<TicketRecord> = load_records(path)?;
    tracing::debug!(path = %path.display(), count = tickets.len(), "loaded tickets");
    Ok(tickets)
}

/// Write change records back in the format their extension names.
pub fn write_changes(path: &Path, changes: &[ChangeRecord]) -> Result<()> {
    let content = match RecordFormat::from_path(path) {
        RecordFormat::Json => serde_json::to_string_pretty(changes)?,
        RecordFormat::Yaml => serde_yaml::to_string(changes)?,
    };
    write_file(path, &content)
}

/// A report body stamped with its generation time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope<'a, T: Serialize> {
    pub generated_at: String,
    #[serde(flatten)]
    pub body: &'a T,
}

impl<'a, T: Serialize> ReportEnvelope<'a, T> {
    pub fn now(body: &'a T) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            body,
        }
    }
}

/// Write `<dir>/<name>.json` as pretty JSON with a `generatedAt` field.
///
/// The body must serialize as a JSON object.
pub fn write_report<T: Serialize>(dir: &Path, name: &str, body: &T) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(format!("{name}.json"));
    let json = serde_json::to_string_pretty(&ReportEnvelope::now(body))
        .map_err(Error::from)
        .context(format!("Serializing {name} report"))?;
    write_file(&path, &json)?;
    tracing::info!(path = %path.display(), "wrote report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChangeState, DateRange};
    use crate::stats::generate_stats;
    use crate::testkit::ChangeBuilder;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(RecordFormat::from_path(Path::new("a/prs.yaml")), RecordFormat::Yaml);
        assert_eq!(RecordFormat::from_path(Path::new("prs.YML")), RecordFormat::Yaml);
        assert_eq!(RecordFormat::from_path(Path::new("prs.json")), RecordFormat::Json);
        assert_eq!(RecordFormat::from_path(Path::new("prs")), RecordFormat::Json);
    }

    #[test]
    fn test_load_changes_from_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prs.yaml");
        fs::write(
            &path,
            indoc! {r#"
                - title: "feat: exporter"
                  prNumber: 4
                  repository: api
                  org: acme
                  author: dev
                  state: merged
                  createdAt: 2024-02-01T10:00:00Z
                  mergedAt: "2024-02-02T10:00:00.000+0000"
                  url: https://github.com/acme/api/pull/4
                  additions: 120
                  deletions: 4
                  changedFiles: 6
                  jiraTickets: [PAY-1]
                  labels: []
            "#},
        )
        .unwrap();

        let changes = load_changes(&path).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].id, 4);
        assert_eq!(changes[0].state, ChangeState::Merged);
        assert_eq!(changes[0].linked_ticket_keys, vec!["PAY-1".to_string()]);
        assert!(changes[0].merged_at.is_some());
    }

    #[test]
    fn test_malformed_file_is_invalid_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tickets.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_tickets(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
    }

    #[test]
    fn test_missing_file_is_file_system_error() {
        let err = load_changes(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
    }

    #[test]
    fn test_write_report_adds_generated_at() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("analysis");
        let stats = generate_stats(&[], &[], DateRange::new("2024-01-01", "2024-01-31"));

        let path = write_report(&out, "stats", &stats).unwrap();
        assert_eq!(path, out.join("stats.json"));

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json["generatedAt"].is_string());
        assert_eq!(json["dateRange"]["until"], "2024-01-31");
        assert_eq!(json["prs"]["total"], 0);
    }

    #[test]
    fn test_write_report_into_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("reports");
        fs::write(&blocker, "").unwrap();
        let stats = generate_stats(&[], &[], DateRange::new("", ""));

        let err = write_report(&blocker, "stats", &stats).unwrap_err();
        assert!(matches!(err, Error::FileSystem { source: None, .. }));
    }

    #[test]
    fn test_tagging_write_back_keeps_unmodeled_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prs.json");
        fs::write(
            &path,
            indoc! {r#"
                [
                  {
                    "title": "Tweak caching",
                    "prNumber": 8,
                    "repository": "api",
                    "org": "acme",
                    "state": "open",
                    "createdAt": "2024-02-01T10:00:00.250Z",
                    "url": "https://github.com/acme/api/pull/8",
                    "additions": 150,
                    "deletions": 60,
                    "changedFiles": 3,
                    "body": "Moves the cache behind a trait",
                    "reviewers": ["sam", "lee"]
                  }
                ]
            "#},
        )
        .unwrap();

        let mut changes = load_changes(&path).unwrap();
        let summary = crate::impact::tag_changes(&mut changes, &Default::default());
        assert_eq!(summary.updated, 1);
        write_changes(&path, &changes).unwrap();

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let record = &json[0];
        assert_eq!(record["impact"], "major");
        assert_eq!(record["body"], "Moves the cache behind a trait");
        assert_eq!(record["reviewers"], serde_json::json!(["sam", "lee"]));
        assert_eq!(record["createdAt"], "2024-02-01T10:00:00.250Z");
        assert_eq!(record["prNumber"], 8);
        assert!(record.get("extra").is_none());
    }

    #[test]
    fn test_write_changes_keeps_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prs.yml");
        let changes = vec![ChangeBuilder::new(3, "docs: tidy").build()];

        write_changes(&path, &changes).unwrap();
        assert_eq!(load_changes(&path).unwrap(), changes);
    }
}
