//! Append-only store of evaluation results

use crate::error::{RelevanceError, Result};
use crate::processing::scorer::Verdict;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub resume_name: String,
    pub job_id: String,
    pub score: f64,
    pub verdict: Verdict,
    pub missing: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct ResultStore {
    path: PathBuf,
    records: Vec<EvaluationRecord>,
}

impl ResultStore {
    pub fn open(path: &Path) -> Result<Self> {
        let records = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    RelevanceError::Storage(format!("Corrupt result store {}: {}", path.display(), e))
                })?
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Append a record stamped with the current time. Re-evaluations add
    /// new records rather than replacing old ones.
    pub fn save_result(
        &mut self,
        resume_name: &str,
        job_id: &str,
        score: f64,
        verdict: Verdict,
        missing: &[String],
    ) -> Result<&EvaluationRecord> {
        let record = EvaluationRecord {
            resume_name: resume_name.to_string(),
            job_id: job_id.to_string(),
            score,
            verdict,
            missing: missing.to_vec(),
            timestamp: Utc::now(),
        };
        debug!("Saving result for {} against {}", resume_name, job_id);

        // Memory only changes once the file holds the new record
        let mut updated = self.records.clone();
        updated.push(record);
        write_records(&self.path, &updated)?;
        self.records = updated;

        self.records
            .last()
            .ok_or_else(|| RelevanceError::Storage("Record vanished after save".to_string()))
    }

    pub fn results(&self) -> &[EvaluationRecord] {
        &self.records
    }

    pub fn for_job(&self, job_id: &str) -> Vec<&EvaluationRecord> {
        self.records.iter().filter(|r| r.job_id == job_id).collect()
    }
}

fn write_records(path: &Path, records: &[EvaluationRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(records)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_results_are_appended_and_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("results.json");

        let mut store = ResultStore::open(&path).unwrap();
        let missing = vec!["Skills: java".to_string()];
        store.save_result("alice.pdf", "DE-101", 45.24, Verdict::Low, &missing).unwrap();
        store.save_result("alice.pdf", "DE-101", 61.0, Verdict::Medium, &[]).unwrap();
        store.save_result("bob.pdf", "FE-1", 80.0, Verdict::High, &[]).unwrap();

        let reopened = ResultStore::open(&path).unwrap();
        assert_eq!(reopened.results().len(), 3);
        assert_eq!(reopened.results()[0].missing, missing);
        assert_eq!(reopened.results()[1].verdict, Verdict::Medium);
    }

    #[test]
    fn test_for_job() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ResultStore::open(&temp_dir.path().join("results.json")).unwrap();
        store.save_result("a", "X", 10.0, Verdict::Low, &[]).unwrap();
        store.save_result("b", "Y", 90.0, Verdict::High, &[]).unwrap();

        let for_x = store.for_job("X");
        assert_eq!(for_x.len(), 1);
        assert_eq!(for_x[0].resume_name, "a");
        assert!(store.for_job("Z").is_empty());
    }

    #[test]
    fn test_failed_write_keeps_previous_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("results.json");
        let mut store = ResultStore::open(&path).unwrap();
        store.save_result("a", "X", 10.0, Verdict::Low, &[]).unwrap();

        // Replace the data directory with a regular file so the next write fails
        std::fs::remove_dir_all(temp_dir.path().join("data")).unwrap();
        std::fs::write(temp_dir.path().join("data"), "").unwrap();

        assert!(store.save_result("b", "X", 90.0, Verdict::High, &[]).is_err());
        assert_eq!(store.results().len(), 1);
        assert_eq!(store.for_job("X").len(), 1);
        assert_eq!(store.results()[0].resume_name, "a");
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("results.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(ResultStore::open(&path), Err(RelevanceError::Storage(_))));
    }
}
