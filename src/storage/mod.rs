//! JSON-file persistence for job postings and evaluation results

pub mod jobs;
pub mod results;

pub use jobs::{JobPosting, JobRegistry};
pub use results::{EvaluationRecord, ResultStore};
