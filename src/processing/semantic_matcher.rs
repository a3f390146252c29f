//! Sentence-level semantic similarity between resume and job description sections

use crate::error::{RelevanceError, Result};
use crate::processing::embeddings::Embedder;
use crate::processing::sections::{SectionLabel, SectionMap};
use crate::processing::text_processor::TextProcessor;
use crate::processing::weights::{round2, SECTION_WEIGHTS};
use log::debug;
use ndarray::{Array1, Array2, Axis};
use std::collections::BTreeMap;

/// Unweighted semantic score per section label
pub type SectionSemanticScores = BTreeMap<SectionLabel, f64>;

/// Stack embeddings into a row matrix with unit-length rows.
///
/// Zero vectors stay zero, so they score 0 against everything.
fn normalized_matrix(embeddings: Vec<Vec<f32>>) -> Result<Array2<f64>> {
    let rows = embeddings.len();
    let dim = embeddings.first().map(Vec::len).unwrap_or(0);

    if let Some(bad) = embeddings.iter().find(|e| e.len() != dim) {
        return Err(RelevanceError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            dim,
            bad.len()
        )));
    }

    let flat: Vec<f64> = embeddings.into_iter().flatten().map(f64::from).collect();
    let mut matrix = Array2::from_shape_vec((rows, dim), flat)
        .map_err(|e| RelevanceError::Embedding(format!("Failed to shape embeddings: {}", e)))?;

    for mut row in matrix.rows_mut() {
        let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|x| x / norm);
        }
    }

    Ok(matrix)
}

/// Cosine similarity of every resume row against every job row
pub fn cosine_similarity_matrix(resume: Vec<Vec<f32>>, job: Vec<Vec<f32>>) -> Result<Array2<f64>> {
    let resume = normalized_matrix(resume)?;
    let job = normalized_matrix(job)?;

    if resume.ncols() != job.ncols() {
        return Err(RelevanceError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            resume.ncols(),
            job.ncols()
        )));
    }

    Ok(resume.dot(&job.t()))
}

/// Mean over resume sentences of the best match among job sentences, 0..=100.
///
/// Either side having no sentences is a defined 0.0, not an error.
pub fn semantic_section_score(
    processor: &TextProcessor,
    embedder: &dyn Embedder,
    resume_text: &str,
    jd_text: &str,
) -> Result<f64> {
    let resume_sentences = processor.split_sentences(resume_text);
    let jd_sentences = processor.split_sentences(jd_text);

    if resume_sentences.is_empty() || jd_sentences.is_empty() {
        return Ok(0.0);
    }

    let resume_embs = embedder.embed_batch(&resume_sentences)?;
    let jd_embs = embedder.embed_batch(&jd_sentences)?;
    if resume_embs.len() != resume_sentences.len() || jd_embs.len() != jd_sentences.len() {
        return Err(RelevanceError::Embedding(
            "Embedder returned a different number of vectors than sentences".to_string(),
        ));
    }

    if let Some(expected) = embedder.dimension() {
        if let Some(bad) = resume_embs.iter().chain(&jd_embs).find(|e| e.len() != expected) {
            return Err(RelevanceError::Embedding(format!(
                "{} embedder declared dimension {} but returned {}",
                embedder.name(),
                expected,
                bad.len()
            )));
        }
    }

    let similarity = cosine_similarity_matrix(resume_embs, jd_embs)?;

    let best_per_sentence: Array1<f64> = similarity
        .map_axis(Axis(1), |row| row.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    let mean = best_per_sentence.mean().unwrap_or(0.0);

    Ok(round2((mean * 100.0).clamp(0.0, 100.0)))
}

/// Weighted semantic score in [0, 100] plus the unweighted score of each section
pub fn semantic_match(
    processor: &TextProcessor,
    embedder: &dyn Embedder,
    resume: &SectionMap,
    jd: &SectionMap,
) -> Result<(f64, SectionSemanticScores)> {
    let mut total = 0.0;
    let mut section_scores = SectionSemanticScores::new();

    for (label, weight) in SECTION_WEIGHTS.iter() {
        let score = semantic_section_score(processor, embedder, resume.get(label), jd.get(label))?;
        debug!("semantic match {}: {:.2} (weight {:.2})", label, score, weight);
        section_scores.insert(label, score);
        total += score * weight;
    }

    Ok((round2(total.min(100.0)), section_scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::embeddings::HashingEmbedder;
    use crate::processing::sections::Sectionizer;

    /// Returns vectors of varying length to exercise the dimension check
    struct RaggedEmbedder;

    impl Embedder for RaggedEmbedder {
        fn name(&self) -> &str {
            "ragged"
        }

        fn dimension(&self) -> Option<usize> {
            None
        }

        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0; text.len()])
        }
    }

    /// Declares 8 dimensions but hands back 4
    struct MisreportingEmbedder;

    impl Embedder for MisreportingEmbedder {
        fn name(&self) -> &str {
            "misreporting"
        }

        fn dimension(&self) -> Option<usize> {
            Some(8)
        }

        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.5; 4])
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn name(&self) -> &str {
            "failing"
        }

        fn dimension(&self) -> Option<usize> {
            None
        }

        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(RelevanceError::ModelError("model not loaded".to_string()))
        }
    }

    #[test]
    fn test_similarity_matrix_shape_and_values() {
        let resume = vec![vec![1.0, 0.0], vec![0.0, 2.0]];
        let job = vec![vec![3.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]];

        let sim = cosine_similarity_matrix(resume, job).unwrap();

        assert_eq!(sim.dim(), (2, 3));
        assert!((sim[[0, 0]] - 1.0).abs() < 1e-12);
        assert!((sim[[1, 1]] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert_eq!(sim[[1, 2]], 0.0);
    }

    #[test]
    fn test_empty_side_scores_zero() {
        let processor = TextProcessor::default();
        let embedder = HashingEmbedder::new(64).unwrap();

        assert_eq!(semantic_section_score(&processor, &embedder, "", "Python developer").unwrap(), 0.0);
        assert_eq!(semantic_section_score(&processor, &embedder, "Python developer", " . ").unwrap(), 0.0);
    }

    #[test]
    fn test_identical_text_scores_hundred() {
        let processor = TextProcessor::default();
        let embedder = HashingEmbedder::new(64).unwrap();
        let text = "Built ETL pipelines. Tuned Postgres queries";

        assert_eq!(semantic_section_score(&processor, &embedder, text, text).unwrap(), 100.0);
    }

    #[test]
    fn test_max_pooling_ignores_unrelated_job_sentences() {
        let processor = TextProcessor::default();
        let embedder = HashingEmbedder::new(512).unwrap();

        // The single resume sentence matches one job sentence exactly
        let score = semantic_section_score(
            &processor,
            &embedder,
            "Kubernetes operators",
            "Forklift license. Kubernetes operators. Night shifts",
        )
        .unwrap();
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_semantic_match_weights_sections() {
        let processor = TextProcessor::default();
        let embedder = HashingEmbedder::new(256).unwrap();
        let sectionizer = Sectionizer::default();

        let resume = sectionizer.sectionize("Skills\nRust");
        let jd = sectionizer.sectionize("Skills\nRust");
        let (total, per_section) = semantic_match(&processor, &embedder, &resume, &jd).unwrap();

        assert_eq!(per_section[&SectionLabel::Skills], 100.0);
        assert_eq!(per_section[&SectionLabel::Education], 0.0);
        assert_eq!(per_section.len(), 5);
        assert_eq!(total, 40.0);
    }

    #[test]
    fn test_dimension_mismatch_is_embedding_error() {
        let processor = TextProcessor::default();
        let result = semantic_section_score(&processor, &RaggedEmbedder, "ab. abc", "abcd");
        assert!(matches!(result, Err(RelevanceError::Embedding(_))));
    }

    #[test]
    fn test_declared_dimension_is_enforced() {
        let processor = TextProcessor::default();
        let result = semantic_section_score(&processor, &MisreportingEmbedder, "Rust", "Rust");
        assert!(matches!(result, Err(RelevanceError::Embedding(msg)) if msg.contains("declared dimension 8")));
    }

    #[test]
    fn test_embedder_failure_propagates() {
        let processor = TextProcessor::default();
        let result = semantic_section_score(&processor, &FailingEmbedder, "Rust", "Rust");
        assert!(matches!(result, Err(RelevanceError::ModelError(_))));
    }
}
