//! JSON archive of exam records.
//!
//! Each record is written in its persisted shape, aggregates included. When
//! an archive is read back the aggregates are recomputed from the results.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ExamRecord;
use crate::repository::{ExamRepository, InMemoryExamRepository, ListOrder};

/// Archive format version written by this crate.
pub const ARCHIVE_VERSION: u32 = 1;

/// A saved set of exam records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamArchive {
    #[serde(default = "default_version")]
    pub version: u32,
    /// When the archive was written.
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub exams: Vec<ExamRecord>,
}

fn default_version() -> u32 {
    ARCHIVE_VERSION
}

impl ExamArchive {
    pub fn new(exams: Vec<ExamRecord>) -> Self {
        Self {
            version: ARCHIVE_VERSION,
            saved_at: Utc::now(),
            exams,
        }
    }

    /// Snapshot every record of a repository, newest first.
    pub fn from_repository(repo: &dyn ExamRepository) -> Result<Self> {
        let exams = repo
            .list(ListOrder::default())?
            .into_iter()
            .map(|r| ExamRecord::clone(&r))
            .collect();
        Ok(Self::new(exams))
    }

    /// Load the archive into a fresh in-memory repository.
    pub fn into_repository(self) -> Result<InMemoryExamRepository> {
        InMemoryExamRepository::from_records(self.exams)
            .context("archive contains duplicate exam ids")
    }

    /// Save the archive as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize exam archive")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write exam archive to {}", path.display()))?;
        Ok(())
    }

    /// Load an archive from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read exam archive from {}", path.display()))?;
        let archive: ExamArchive =
            serde_json::from_str(&content).context("failed to parse exam archive JSON")?;
        if archive.version > ARCHIVE_VERSION {
            tracing::warn!(
                "exam archive version {} is newer than supported version {}",
                archive.version,
                ARCHIVE_VERSION
            );
        }
        Ok(archive)
    }

    /// Load an archive, or start an empty one if the file does not exist yet.
    pub fn load_or_new(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_json(path)
        } else {
            Ok(Self::new(Vec::new()))
        }
    }
}

/// Write a repository back to an archive file.
pub fn save_repository(repo: &dyn ExamRepository, path: &Path) -> Result<()> {
    ExamArchive::from_repository(repo)?.save_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LessonResult, ScienceTier, TierCounts};
    use chrono::TimeZone;

    fn sample() -> ExamRecord {
        ExamRecord::new(
            "Deneme 3",
            Utc.with_ymd_and_hms(2025, 2, 2, 10, 0, 0).unwrap(),
            vec![
                LessonResult::new("Anatomi", ScienceTier::Basic, 14, 3).unwrap(),
                LessonResult::new("Dahiliye", ScienceTier::Clinical, 22, 5).unwrap(),
            ],
        )
    }

    #[test]
    fn json_roundtrip_preserves_records() {
        let record = sample();
        let archive = ExamArchive::new(vec![record.clone()]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("exams.json");

        archive.save_json(&path).unwrap();
        let loaded = ExamArchive::load_json(&path).unwrap();

        assert_eq!(loaded.version, ARCHIVE_VERSION);
        assert_eq!(loaded.exams, vec![record]);
    }

    #[test]
    fn written_file_has_persisted_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exams.json");
        ExamArchive::new(vec![sample()]).save_json(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let exam = &raw["exams"][0];
        assert_eq!(exam["name"], "Deneme 3");
        assert_eq!(exam["basicCorrect"], 14);
        assert_eq!(exam["clinicalIncorrect"], 5);
        assert_eq!(exam["results"][1]["lessonName"], "Dahiliye");
        assert_eq!(exam["results"][1]["isBasicScience"], false);
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let archive = ExamArchive::load_or_new(&dir.path().join("none.json")).unwrap();
        assert!(archive.exams.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ broken").unwrap();
        assert!(ExamArchive::load_json(&path).is_err());
    }

    #[test]
    fn repository_roundtrip() {
        let repo = InMemoryExamRepository::new();
        repo.add(sample()).unwrap();
        repo.add(ExamRecord::quick_entry(
            "Hızlı",
            Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
            TierCounts::new(50, 10),
            TierCounts::new(60, 12),
        ))
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exams.json");
        save_repository(&repo, &path).unwrap();

        let restored = ExamArchive::load_json(&path)
            .unwrap()
            .into_repository()
            .unwrap();
        let names: Vec<String> = restored
            .list(ListOrder::default())
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["Hızlı", "Deneme 3"]);
    }
}
