//! Output formatters for score reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::ScoreReport;
use crate::processing::scorer::Verdict;
use colored::{Color, Colorize};
use std::path::Path;

const BAR_WIDTH: usize = 40;

/// Trait for rendering score reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String>;
}

/// Colored terminal output with a text bar chart
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks the formatter for a requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::High => Color::Green,
        Verdict::Medium => Color::Yellow,
        Verdict::Low => Color::Red,
    }
}

/// Horizontal bar for a score in 0..=100
fn score_bar(score: f64) -> String {
    let filled = ((score.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "▓".blue().bold(), title.blue().bold())
        } else {
            format!("\n▓ {}\n", title)
        }
    }

    fn format_bar_row(&self, label: &str, score: f64, color: Color) -> String {
        format!(
            "  {:<10} {} {:>6.2}\n",
            label,
            self.colorize(&score_bar(score), color),
            score
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME RELEVANCE"));
        output.push_str(&format!("Resume: {}\n", report.resume_name));
        output.push_str(&format!("Job:    {}\n", report.job_label));

        output.push_str(&self.format_header("Score"));
        let verdict = format!("{}", result.verdict);
        let verdict = if self.use_colors {
            verdict.color(verdict_color(result.verdict)).bold().to_string()
        } else {
            verdict
        };
        output.push_str(&format!("Relevance: {:.2} / 100  [{}]\n\n", result.final_score, verdict));

        output.push_str(&self.format_bar_row("Hard", result.hard_score, Color::Cyan));
        output.push_str(&self.format_bar_row("Semantic", result.semantic_score, Color::Magenta));
        output.push_str(&self.format_bar_row("Final", result.final_score, verdict_color(result.verdict)));

        if self.detailed {
            if let Some(section_scores) = &result.section_semantic_scores {
                output.push_str(&self.format_header("Semantic score by section"));
                for (label, score) in section_scores {
                    output.push_str(&self.format_bar_row(&label.to_string(), *score, Color::BrightBlack));
                }
            }
        }

        output.push_str(&self.format_header("Missing elements"));
        if result.missing.is_empty() {
            output.push_str(&format!("  {}\n", self.colorize("None", Color::Green)));
        } else {
            for entry in &result.missing {
                output.push_str(&format!("  • {}\n", self.colorize(entry, Color::Yellow)));
            }
        }

        output.push_str(&self.format_header("Suggestions"));
        output.push_str(&report.feedback);
        output.push('\n');

        output.push_str(&format!(
            "\n{}\n",
            self.colorize(
                &format!(
                    "Embeddings: {} | {}",
                    report.embedding_backend,
                    report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
                ),
                Color::BrightBlack
            )
        ));

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str("# Resume Relevance Report\n\n");
        output.push_str(&format!("**Resume:** `{}` | **Job:** {}\n\n", report.resume_name, report.job_label));

        output.push_str("## Score\n\n");
        output.push_str(&format!(
            "**Relevance:** {:.2} / 100 | **Verdict:** {}\n\n",
            result.final_score, result.verdict
        ));
        output.push_str("| Component | Score |\n");
        output.push_str("|-----------|-------|\n");
        output.push_str(&format!("| Hard match | {:.2} |\n", result.hard_score));
        output.push_str(&format!("| Semantic match | {:.2} |\n", result.semantic_score));

        if let Some(section_scores) = &result.section_semantic_scores {
            for (label, score) in section_scores {
                output.push_str(&format!("| Semantic: {} | {:.2} |\n", label, score));
            }
        }
        output.push('\n');

        output.push_str("## Missing Elements\n\n");
        if result.missing.is_empty() {
            output.push_str("None\n\n");
        } else {
            for entry in &result.missing {
                output.push_str(&format!("- {}\n", entry));
            }
            output.push('\n');
        }

        output.push_str("## Suggestions\n\n");
        output.push_str(&report.feedback);
        output.push_str("\n\n");

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated {} using {} embeddings*\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.embedding_backend
            ));
        }

        Ok(output)
    }
}

impl ReportGenerator {
    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &ScoreReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}
