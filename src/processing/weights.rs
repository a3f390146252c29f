//! Fixed section weights shared by hard and semantic matching

use crate::processing::sections::SectionLabel;

/// Importance of each section in both the hard and the semantic score
pub const SECTION_WEIGHTS: SectionWeights = SectionWeights {
    skills: 0.40,
    projects: 0.30,
    certifications: 0.15,
    education: 0.10,
    other: 0.05,
};

#[derive(Debug, Clone, Copy)]
pub struct SectionWeights {
    pub skills: f64,
    pub projects: f64,
    pub certifications: f64,
    pub education: f64,
    pub other: f64,
}

impl SectionWeights {
    pub fn weight(&self, label: SectionLabel) -> f64 {
        match label {
            SectionLabel::Skills => self.skills,
            SectionLabel::Projects => self.projects,
            SectionLabel::Certifications => self.certifications,
            SectionLabel::Education => self.education,
            SectionLabel::Other => self.other,
        }
    }

    /// Labels paired with their weights, heaviest first
    pub fn iter(&self) -> impl Iterator<Item = (SectionLabel, f64)> + '_ {
        [
            SectionLabel::Skills,
            SectionLabel::Projects,
            SectionLabel::Certifications,
            SectionLabel::Education,
            SectionLabel::Other,
        ]
        .into_iter()
        .map(move |label| (label, self.weight(label)))
    }
}

/// Round to two decimals, ties to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = SECTION_WEIGHTS.iter().map(|(_, weight)| weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn every_label_is_weighted_once() {
        let labels: Vec<SectionLabel> = SECTION_WEIGHTS.iter().map(|(label, _)| label).collect();
        assert_eq!(labels.len(), SectionLabel::ALL.len());
        for label in SectionLabel::ALL {
            assert!(labels.contains(&label));
        }
    }

    #[test]
    fn round2_rounds_to_cents() {
        assert_eq!(round2(38.104), 38.1);
        assert_eq!(round2(74.987), 74.99);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn round2_ties_go_to_even() {
        // 0.125 and 0.375 are exact in binary, so these are true ties
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
    }
}
