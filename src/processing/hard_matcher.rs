//! Weighted exact-keyword overlap between resume and job description sections

use crate::processing::sections::{SectionLabel, SectionMap};
use crate::processing::text_processor::TextProcessor;
use crate::processing::weights::{round2, SECTION_WEIGHTS};
use log::debug;

/// Points added per distinct impact verb in the resume's projects section
const IMPACT_VERB_BOOST: f64 = 2.0;

/// Unweighted score for one section pair, capped at 100
pub fn section_hard_score(
    processor: &TextProcessor,
    label: SectionLabel,
    resume_text: &str,
    jd_text: &str,
) -> f64 {
    let resume_tokens = processor.token_set(resume_text);
    let jd_tokens = processor.token_set(jd_text);

    let matches = resume_tokens.intersection(&jd_tokens).count();
    let base = matches as f64 / jd_tokens.len().max(1) as f64 * 100.0;

    let boost = if label == SectionLabel::Projects {
        IMPACT_VERB_BOOST * processor.impact_verb_count(&resume_tokens) as f64
    } else {
        0.0
    };

    (base + boost).min(100.0)
}

/// Weighted hard-match score in [0, 100], rounded to 2 decimals
pub fn hard_match(processor: &TextProcessor, resume: &SectionMap, jd: &SectionMap) -> f64 {
    let total: f64 = SECTION_WEIGHTS
        .iter()
        .map(|(label, weight)| {
            let score = section_hard_score(processor, label, resume.get(label), jd.get(label));
            debug!("hard match {}: {:.2} (weight {:.2})", label, score, weight);
            score * weight
        })
        .sum();

    round2(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::sections::Sectionizer;

    fn sections(text: &str) -> SectionMap {
        Sectionizer::default().sectionize(text)
    }

    #[test]
    fn test_scenario_skills_and_projects() {
        let processor = TextProcessor::default();
        let resume = sections("Skills\nPython, SQL\nProjects\nBuilt a data pipeline");
        let jd = sections("Skills\nPython, SQL, Java\nProjects\nDesign ETL systems");

        // skills: {skills, python, sql} of {skills, python, sql, java} = 75 * 0.40
        // projects: {projects} of 4 = 25, +2 for "built" = 27 * 0.30
        assert_eq!(hard_match(&processor, &resume, &jd), 38.1);
    }

    #[test]
    fn test_skills_section_overlap() {
        let processor = TextProcessor::default();
        let score = section_hard_score(&processor, SectionLabel::Skills, " Python, SQL", " Python, SQL, Java");
        assert!((score - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_impact_boost_only_in_projects() {
        let processor = TextProcessor::default();
        let resume = " Developed and optimized services";
        let jd = " Kubernetes";

        assert_eq!(section_hard_score(&processor, SectionLabel::Skills, resume, jd), 0.0);
        assert_eq!(section_hard_score(&processor, SectionLabel::Projects, resume, jd), 4.0);
    }

    #[test]
    fn test_section_score_is_capped() {
        let processor = TextProcessor::default();
        let resume = " built designed launched rust";
        let score = section_hard_score(&processor, SectionLabel::Projects, resume, " rust");
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_empty_documents_score_zero() {
        let processor = TextProcessor::default();
        assert_eq!(hard_match(&processor, &sections(""), &sections("")), 0.0);
    }

    #[test]
    fn test_identical_full_documents_score_hundred() {
        let processor = TextProcessor::default();
        let text = "Jane Doe\nSkills\nRust\nProjects\nShipped things\nEducation\nBSc\nCertifications\nAWS";
        let doc = sections(text);
        assert_eq!(hard_match(&processor, &doc, &doc), 100.0);
    }
}
