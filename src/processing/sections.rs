//! Heading-driven document sectioning

use crate::error::{RelevanceError, Result};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLabel {
    Skills,
    Projects,
    Education,
    Certifications,
    Other,
}

impl SectionLabel {
    /// Section-map order
    pub const ALL: [SectionLabel; 5] = [
        SectionLabel::Skills,
        SectionLabel::Projects,
        SectionLabel::Education,
        SectionLabel::Certifications,
        SectionLabel::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionLabel::Skills => "skills",
            SectionLabel::Projects => "projects",
            SectionLabel::Education => "education",
            SectionLabel::Certifications => "certifications",
            SectionLabel::Other => "other",
        }
    }

    fn index(&self) -> usize {
        match self {
            SectionLabel::Skills => 0,
            SectionLabel::Projects => 1,
            SectionLabel::Education => 2,
            SectionLabel::Certifications => 3,
            SectionLabel::Other => 4,
        }
    }
}

impl std::fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionLabel::Skills => write!(f, "Skills"),
            SectionLabel::Projects => write!(f, "Projects"),
            SectionLabel::Education => write!(f, "Education"),
            SectionLabel::Certifications => write!(f, "Certifications"),
            SectionLabel::Other => write!(f, "Other"),
        }
    }
}

/// Accumulated text per section label. Every label is always present,
/// possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMap {
    texts: [String; 5],
}

impl SectionMap {
    pub fn get(&self, label: SectionLabel) -> &str {
        &self.texts[label.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionLabel, &str)> + '_ {
        SectionLabel::ALL
            .iter()
            .map(move |label| (*label, self.texts[label.index()].as_str()))
    }

    fn append_line(&mut self, label: SectionLabel, line: &str) {
        let text = &mut self.texts[label.index()];
        text.push(' ');
        text.push_str(line);
    }
}

/// Streaming line classifier. One state per section label; a heading line
/// moves to its label, any other line keeps the current one.
pub struct Sectionizer {
    headings: Vec<(SectionLabel, AhoCorasick)>,
}

impl Sectionizer {
    pub fn new() -> Result<Self> {
        // Checked in this order; the first group that matches wins
        let groups: [(SectionLabel, &[&str]); 4] = [
            (SectionLabel::Skills, &["skills", "technologies", "tech stack"]),
            (SectionLabel::Projects, &["project", "experience", "achievements", "work"]),
            (SectionLabel::Education, &["education", "degree", "university", "college"]),
            (SectionLabel::Certifications, &["certification", "certified", "course"]),
        ];

        let headings = groups
            .iter()
            .map(|(label, patterns)| {
                AhoCorasick::builder()
                    .ascii_case_insensitive(true)
                    .build(patterns.iter())
                    .map(|matcher| (*label, matcher))
                    .map_err(|e| {
                        RelevanceError::Processing(format!("Failed to build heading matcher: {}", e))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { headings })
    }

    /// Transition function: label after seeing `line` while in `current`
    pub fn classify_line(&self, current: SectionLabel, line: &str) -> SectionLabel {
        let lowered = line.trim().to_lowercase();
        self.headings
            .iter()
            .find(|(_, matcher)| matcher.is_match(&lowered))
            .map(|(label, _)| *label)
            .unwrap_or(current)
    }

    pub fn sectionize(&self, text: &str) -> SectionMap {
        let mut sections = SectionMap::default();
        let mut current = SectionLabel::Other;

        for line in text.split('\n') {
            current = self.classify_line(current, line);
            sections.append_line(current, line.trim());
        }

        sections
    }
}

impl Default for Sectionizer {
    fn default() -> Self {
        Self::new().expect("built-in heading patterns are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_open_sections_and_carry_over() {
        let sectionizer = Sectionizer::default();
        let text = "Jane Doe\nSkills\nPython, SQL\nProjects\nBuilt a data pipeline\nEducation\nBSc Physics";
        let sections = sectionizer.sectionize(text);

        assert_eq!(sections.get(SectionLabel::Other), " Jane Doe");
        assert_eq!(sections.get(SectionLabel::Skills), " Skills Python, SQL");
        assert_eq!(sections.get(SectionLabel::Projects), " Projects Built a data pipeline");
        assert_eq!(sections.get(SectionLabel::Education), " Education BSc Physics");
        assert_eq!(sections.get(SectionLabel::Certifications), "");
    }

    #[test]
    fn test_no_headings_goes_to_other() {
        let sectionizer = Sectionizer::default();
        let sections = sectionizer.sectionize("Line one\nLine two");

        assert_eq!(sections.get(SectionLabel::Other), " Line one Line two");
        for label in &SectionLabel::ALL[..4] {
            assert!(sections.get(*label).is_empty());
        }
    }

    #[test]
    fn test_priority_prefers_skills_group() {
        let sectionizer = Sectionizer::default();
        // Matches both the skills and the projects group
        assert_eq!(
            sectionizer.classify_line(SectionLabel::Other, "Technical Skills & Work History"),
            SectionLabel::Skills
        );
        assert_eq!(
            sectionizer.classify_line(SectionLabel::Skills, "Online course: Certified Kubernetes"),
            SectionLabel::Certifications
        );
    }

    #[test]
    fn test_heading_match_is_substring() {
        let sectionizer = Sectionizer::default();
        assert_eq!(
            sectionizer.classify_line(SectionLabel::Skills, "Rust, Actix framework"),
            SectionLabel::Projects
        );
    }

    #[test]
    fn test_every_line_lands_in_exactly_one_section() {
        let sectionizer = Sectionizer::default();
        let text = "Header\n  Skills  \nRust\n\nWork Experience\nShipped things\nCertifications\nAWS";
        let sections = sectionizer.sectionize(text);

        let mut recovered: Vec<String> = sections
            .iter()
            .flat_map(|(_, body)| body.split(' ').skip(1).map(str::to_string).collect::<Vec<_>>())
            .collect();
        let mut original: Vec<String> = text
            .split('\n')
            .flat_map(|line| line.trim().split(' ').map(str::to_string).collect::<Vec<_>>())
            .collect();
        recovered.sort();
        original.sort();
        assert_eq!(recovered, original);
    }

    #[test]
    fn test_empty_text_is_single_blank_other_line() {
        let sectionizer = Sectionizer::default();
        let sections = sectionizer.sectionize("");
        assert_eq!(sections.get(SectionLabel::Other), " ");
    }
}
