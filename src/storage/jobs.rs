//! Registry of posted job descriptions

use crate::error::{RelevanceError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub role: String,
    pub job_id: String,
    pub location: String,
    pub source_name: String,
    pub jd_text: String,
}

impl JobPosting {
    /// Short label used in reports
    pub fn label(&self) -> String {
        format!("{} ({}, {})", self.role, self.job_id, self.location)
    }
}

/// Job postings persisted as a JSON array, keyed by job id
pub struct JobRegistry {
    path: PathBuf,
    jobs: Vec<JobPosting>,
}

impl JobRegistry {
    /// Open the registry at `path`; a missing file is an empty registry
    pub fn open(path: &Path) -> Result<Self> {
        let jobs = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    RelevanceError::Storage(format!("Corrupt job registry {}: {}", path.display(), e))
                })?
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            jobs,
        })
    }

    /// Insert or replace the posting with this job id
    pub fn save_job(
        &mut self,
        role: &str,
        job_id: &str,
        location: &str,
        source_name: &str,
        jd_text: &str,
    ) -> Result<()> {
        if job_id.trim().is_empty() {
            return Err(RelevanceError::InvalidInput("Job id must not be empty".to_string()));
        }

        let posting = JobPosting {
            role: role.to_string(),
            job_id: job_id.to_string(),
            location: location.to_string(),
            source_name: source_name.to_string(),
            jd_text: jd_text.to_string(),
        };

        // Write the updated list first; memory only changes once disk has it
        let mut updated = self.jobs.clone();
        let replaced = match updated.iter_mut().find(|j| j.job_id == job_id) {
            Some(existing) => {
                *existing = posting;
                true
            }
            None => {
                updated.push(posting);
                false
            }
        };

        write_jobs(&self.path, &updated)?;
        self.jobs = updated;

        if replaced {
            info!("Updated job posting {}", job_id);
        } else {
            info!("Added job posting {}", job_id);
        }
        Ok(())
    }

    pub fn get_jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    pub fn get_job(&self, job_id: &str) -> Result<&JobPosting> {
        self.jobs
            .iter()
            .find(|j| j.job_id == job_id)
            .ok_or_else(|| RelevanceError::NotFound(format!("Job posting '{}'", job_id)))
    }

    pub fn locations(&self) -> Vec<String> {
        self.jobs
            .iter()
            .map(|j| j.location.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Exact location match and case-insensitive job id substring match.
    /// `None` disables a filter.
    pub fn filter(&self, location: Option<&str>, job_id_query: Option<&str>) -> Vec<&JobPosting> {
        let query = job_id_query.map(str::to_lowercase);

        self.jobs
            .iter()
            .filter(|j| location.map_or(true, |loc| j.location == loc))
            .filter(|j| {
                query
                    .as_deref()
                    .map_or(true, |q| j.job_id.to_lowercase().contains(q))
            })
            .collect()
    }
}

fn write_jobs(path: &Path, jobs: &[JobPosting]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(jobs)?;
    std::fs::write(path, content)?;
    Ok(())
}
