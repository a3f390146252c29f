//! Report assembled from one scoring run

use crate::processing::feedback::generate_feedback;
use crate::processing::scorer::MatchResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub resume_name: String,
    pub job_label: String,
    pub result: MatchResult,
    pub feedback: String,
    pub embedding_backend: String,
    pub generated_at: DateTime<Utc>,
}

impl ScoreReport {
    pub fn new(resume_name: &str, job_label: &str, result: MatchResult, embedding_backend: &str) -> Self {
        let feedback = generate_feedback(&result.missing);
        Self {
            resume_name: resume_name.to_string(),
            job_label: job_label.to_string(),
            result,
            feedback,
            embedding_backend: embedding_backend.to_string(),
            generated_at: Utc::now(),
        }
    }
}

/// File name shown for a path, falling back to the full path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
