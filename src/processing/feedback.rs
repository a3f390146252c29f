//! Turns missing-element entries into advice for the applicant

const NO_GAPS: &str = "No gaps found. Your resume covers the keywords in this job description.";

/// Advisory text for the entries produced by missing-element detection
pub fn generate_feedback(missing: &[String]) -> String {
    if missing.is_empty() {
        return NO_GAPS.to_string();
    }

    let mut lines = Vec::with_capacity(missing.len() + 1);
    lines.push("Consider addressing these gaps before applying:".to_string());

    for entry in missing {
        let line = match entry.split_once(": ") {
            Some((section, tokens)) => format!(
                "- {}: mention {} where it reflects real experience.",
                section, tokens
            ),
            None => format!("- {}", entry),
        };
        lines.push(line);
    }

    lines.join("\n")
}
