//! Job-description keywords absent from the resume, per section

use crate::processing::sections::SectionMap;
use crate::processing::text_processor::TextProcessor;

/// Tokens listed per section entry
pub const MAX_TOKENS_PER_SECTION: usize = 10;

/// One `"<Section>: tok, tok, ..."` entry per section with gaps, in
/// section-map order. Tokens within an entry are alphabetical.
pub fn detect_missing(processor: &TextProcessor, resume: &SectionMap, jd: &SectionMap) -> Vec<String> {
    jd.iter()
        .filter_map(|(label, jd_text)| {
            let resume_tokens = processor.token_set(resume.get(label));
            let jd_tokens = processor.token_set(jd_text);

            let missing: Vec<&str> = jd_tokens
                .difference(&resume_tokens)
                .take(MAX_TOKENS_PER_SECTION)
                .map(String::as_str)
                .collect();

            if missing.is_empty() {
                None
            } else {
                Some(format!("{}: {}", label, missing.join(", ")))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::sections::Sectionizer;

    fn sections(text: &str) -> SectionMap {
        Sectionizer::default().sectionize(text)
    }

    #[test]
    fn test_scenario_reports_java_and_project_terms() {
        let processor = TextProcessor::default();
        let resume = sections("Skills\nPython, SQL\nProjects\nBuilt a data pipeline");
        let jd = sections("Skills\nPython, SQL, Java\nProjects\nDesign ETL systems");

        let missing = detect_missing(&processor, &resume, &jd);
        assert_eq!(missing, vec!["Skills: java", "Projects: design, etl, systems"]);
    }

    #[test]
    fn test_entries_are_capped_at_ten_tokens() {
        let processor = TextProcessor::default();
        let jd = sections("Skills\nalpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu");
        let missing = detect_missing(&processor, &sections(""), &jd);

        assert_eq!(missing.len(), 1);
        let tokens: Vec<&str> = missing[0].trim_start_matches("Skills: ").split(", ").collect();
        assert_eq!(tokens.len(), MAX_TOKENS_PER_SECTION);
        let mut sorted = tokens.clone();
        sorted.sort();
        assert_eq!(tokens, sorted);
    }

    #[test]
    fn test_never_reports_tokens_present_in_resume() {
        let processor = TextProcessor::default();
        let resume = sections("Skills\nRust Go Kafka\nEducation\nMSc");
        let jd = sections("Skills\nRust Kafka Terraform\nEducation\nMSc or PhD");

        for entry in detect_missing(&processor, &resume, &jd) {
            let (section, tokens) = entry.split_once(": ").unwrap();
            let label = crate::processing::sections::SectionLabel::ALL
                .into_iter()
                .find(|label| label.to_string() == section)
                .unwrap();
            let present = processor.token_set(resume.get(label));
            for token in tokens.split(", ") {
                assert!(!present.contains(token), "{} reported missing but present", token);
            }
        }
    }

    #[test]
    fn test_complete_coverage_reports_nothing() {
        let processor = TextProcessor::default();
        let doc = sections("Skills\nRust\nProjects\nBuilt a compiler");
        assert!(detect_missing(&processor, &doc, &doc).is_empty());
    }

    #[test]
    fn test_filler_words_never_reported() {
        let processor = TextProcessor::default();
        let jd = sections("Responsible for the design and review of APIs");
        let missing = detect_missing(&processor, &sections(""), &jd);
        assert_eq!(missing, vec!["Other: apis, design, review"]);
    }
}
