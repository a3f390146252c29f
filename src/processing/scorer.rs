//! Relevance scoring: combines hard and semantic matching into a verdict

use crate::error::Result;
use crate::processing::embeddings::Embedder;
use crate::processing::hard_matcher::hard_match;
use crate::processing::missing::detect_missing;
use crate::processing::sections::Sectionizer;
use crate::processing::semantic_matcher::{semantic_match, SectionSemanticScores};
use crate::processing::text_processor::TextProcessor;
use crate::processing::weights::round2;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

const HARD_WEIGHT: f64 = 0.4;
const SEMANTIC_WEIGHT: f64 = 0.6;

const HIGH_THRESHOLD: f64 = 75.0;
const MEDIUM_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    High,
    Medium,
    Low,
}

impl Verdict {
    /// Thresholds are inclusive at their lower bound
    pub fn from_score(final_score: f64) -> Self {
        if final_score >= HIGH_THRESHOLD {
            Verdict::High
        } else if final_score >= MEDIUM_THRESHOLD {
            Verdict::Medium
        } else {
            Verdict::Low
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::High => write!(f, "High"),
            Verdict::Medium => write!(f, "Medium"),
            Verdict::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub final_score: f64,
    pub verdict: Verdict,
    pub missing: Vec<String>,
    pub hard_score: f64,
    pub semantic_score: f64,
    pub section_semantic_scores: Option<SectionSemanticScores>,
}

/// Final score from its two components, rounded to 2 decimals
pub fn combine_scores(hard_score: f64, semantic_score: f64) -> f64 {
    round2(HARD_WEIGHT * hard_score + SEMANTIC_WEIGHT * semantic_score)
}

/// Scores resumes against job descriptions.
///
/// Holds no per-request state; one scorer can serve any number of calls.
pub struct RelevanceScorer {
    sectionizer: Sectionizer,
    processor: TextProcessor,
    embedder: Arc<dyn Embedder>,
}

impl RelevanceScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Result<Self> {
        Ok(Self {
            sectionizer: Sectionizer::new()?,
            processor: TextProcessor::new()?,
            embedder,
        })
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// Score one resume against one job description.
    ///
    /// Either every stage succeeds or the first failure is returned; there
    /// is no partial result.
    pub fn calculate_relevance(&self, resume_text: &str, jd_text: &str) -> Result<MatchResult> {
        let start_time = Instant::now();

        let resume_sections = self.sectionizer.sectionize(resume_text);
        let jd_sections = self.sectionizer.sectionize(jd_text);

        let hard_score = hard_match(&self.processor, &resume_sections, &jd_sections);
        debug!("hard score: {:.2}", hard_score);

        let (semantic_score, section_scores) = semantic_match(
            &self.processor,
            self.embedder.as_ref(),
            &resume_sections,
            &jd_sections,
        )?;
        debug!("semantic score: {:.2}", semantic_score);

        let final_score = combine_scores(hard_score, semantic_score);
        let verdict = Verdict::from_score(final_score);

        let missing = detect_missing(&self.processor, &resume_sections, &jd_sections);

        info!(
            "Relevance {:.2} ({}) in {:.2?}",
            final_score,
            verdict,
            start_time.elapsed()
        );

        Ok(MatchResult {
            final_score,
            verdict,
            missing,
            hard_score,
            semantic_score,
            section_semantic_scores: Some(section_scores),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::embeddings::HashingEmbedder;

    #[test]
    fn test_verdict_boundaries() {
        assert_eq!(Verdict::from_score(75.0), Verdict::High);
        assert_eq!(Verdict::from_score(74.99), Verdict::Medium);
        assert_eq!(Verdict::from_score(50.0), Verdict::Medium);
        assert_eq!(Verdict::from_score(49.99), Verdict::Low);
        assert_eq!(Verdict::from_score(100.0), Verdict::High);
        assert_eq!(Verdict::from_score(0.0), Verdict::Low);
    }

    #[test]
    fn test_combine_scores() {
        assert_eq!(combine_scores(100.0, 100.0), 100.0);
        assert_eq!(combine_scores(0.0, 0.0), 0.0);
        assert_eq!(combine_scores(38.1, 50.0), 45.24);
        assert_eq!(combine_scores(12.345, 67.891), 45.67);
    }

    #[test]
    fn test_final_score_follows_components() {
        let scorer = RelevanceScorer::new(Arc::new(HashingEmbedder::new(256).unwrap())).unwrap();
        let result = scorer
            .calculate_relevance(
                "Skills\nRust, Tokio\nProjects\nBuilt a message broker",
                "Skills\nRust, Kafka\nProjects\nDesign streaming systems",
            )
            .unwrap();

        assert_eq!(result.final_score, combine_scores(result.hard_score, result.semantic_score));
        assert_eq!(result.verdict, Verdict::from_score(result.final_score));
        assert!(result.section_semantic_scores.is_some());
    }

    #[test]
    fn test_verdict_serializes_as_name() {
        assert_eq!(serde_json::to_string(&Verdict::Medium).unwrap(), "\"Medium\"");
    }
}
