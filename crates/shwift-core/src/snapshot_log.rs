use crate::answers::AnswerRecord;
use crate::error::{CoreError, Result};
use crate::questions::all_answer_keys;
use crate::tier::Tier;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_PREVIEW_CHARS: usize = 500;

/// One row of the diagnostic log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub tier: Tier,
    pub snapshot_preview: String,
    pub inputs: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(answers: &AnswerRecord, snapshot: &str, preview_chars: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            tier: answers.tier(),
            snapshot_preview: snapshot.chars().take(preview_chars).collect(),
            inputs: answers
                .iter()
                .map(|(key, value)| (key, value.to_string()))
                .collect(),
        }
    }

    fn to_record(&self) -> Vec<String> {
        let mut row = vec![
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.tier.to_string(),
            self.snapshot_preview.clone(),
        ];
        row.extend(all_answer_keys().map(|key| {
            self.inputs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        }));
        row
    }
}

/// Append-only CSV log of successful submissions.
///
/// The column set is the union of every tier's answer keys, so rows from
/// different tiers share one stable header.
#[derive(Debug)]
pub struct SnapshotLog {
    path: PathBuf,
    preview_chars: usize,
    write_lock: Mutex<()>,
}

impl SnapshotLog {
    pub fn new(path: impl Into<PathBuf>, preview_chars: usize) -> Self {
        Self {
            path: path.into(),
            preview_chars,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header() -> Vec<String> {
        ["timestamp", "tier", "snapshot_preview"]
            .into_iter()
            .map(str::to_string)
            .chain(all_answer_keys().map(|key| format!("input_{}", key)))
            .collect()
    }

    /// Record a finished submission and return the row that was written.
    pub fn append(&self, answers: &AnswerRecord, snapshot: &str) -> Result<LogEntry> {
        let entry = LogEntry::new(answers, snapshot, self.preview_chars);
        self.append_entry(&entry)?;
        Ok(entry)
    }

    /// Append one row. The file is opened, written with a single write and
    /// closed per call; rows already on disk are never touched.
    pub fn append_entry(&self, entry: &LogEntry) -> Result<()> {
        let _guard = self.write_lock.lock();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        if needs_header {
            writer.write_record(Self::header())?;
        }
        writer.write_record(entry.to_record())?;
        let bytes = writer
            .into_inner()
            .map_err(|e| CoreError::Io(e.into_error()))?;

        file.write_all(&bytes)?;
        file.flush()?;

        tracing::debug!(path = %self.path.display(), tier = %entry.tier, "Appended snapshot log row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::collect_answers;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn lab_record() -> AnswerRecord {
        let submitted: HashMap<String, Value> = serde_json::from_value(json!({
            "one_liner": "async standups, for \"remote\" teams",
            "hours_per_week": 12
        }))
        .unwrap();
        collect_answers(Tier::Lab, &submitted).unwrap()
    }

    fn read_rows(path: &Path) -> Vec<csv::StringRecord> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap()
            .records()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn header_covers_every_tier() {
        let header = SnapshotLog::header();
        assert_eq!(&header[..3], &["timestamp", "tier", "snapshot_preview"]);
        assert_eq!(header.len(), 3 + 9 + 12 + 18);
        assert!(header.contains(&"input_q1_goal_90".to_string()));
        assert!(header.contains(&"input_one_liner".to_string()));
        assert!(header.contains(&"input_leadership_commitment".to_string()));
    }

    #[test]
    fn first_append_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = SnapshotLog::new(dir.path().join("logs/diag.csv"), DEFAULT_PREVIEW_CHARS);

        log.append(&lab_record(), "first").unwrap();
        log.append(&lab_record(), "second").unwrap();

        let rows = read_rows(log.path());
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "timestamp");
        assert_eq!(&rows[1][2], "first");
        assert_eq!(&rows[2][2], "second");
        assert_eq!(&rows[1][1], "lab");
    }

    #[test]
    fn appends_leave_existing_bytes_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let log = SnapshotLog::new(dir.path().join("diag.csv"), DEFAULT_PREVIEW_CHARS);

        log.append(&lab_record(), "one").unwrap();
        let before = fs::read(log.path()).unwrap();
        log.append(&lab_record(), "two").unwrap();
        let after = fs::read(log.path()).unwrap();

        assert!(after.len() > before.len());
        assert_eq!(&after[..before.len()], &before[..]);
    }

    #[test]
    fn preview_is_truncated_by_characters() {
        let snapshot = "é".repeat(600);
        let entry = LogEntry::new(&lab_record(), &snapshot, DEFAULT_PREVIEW_CHARS);
        assert_eq!(entry.snapshot_preview.chars().count(), 500);
    }

    #[test]
    fn inputs_land_in_their_own_columns() {
        let dir = tempfile::tempdir().unwrap();
        let log = SnapshotLog::new(dir.path().join("diag.csv"), DEFAULT_PREVIEW_CHARS);
        log.append(&lab_record(), "ok").unwrap();

        let rows = read_rows(log.path());
        let header = &rows[0];
        let row = &rows[1];
        let column = |name: &str| header.iter().position(|h| h == name).unwrap();

        assert_eq!(&row[column("input_one_liner")], "async standups, for \"remote\" teams");
        assert_eq!(&row[column("input_hours_per_week")], "12");
        assert_eq!(&row[column("input_q1_goal_90")], "");
        assert!(row[0].ends_with('Z'));
    }
}
