//! CLI interface for the resume relevance checker

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Extensions accepted for resumes and job descriptions
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md", "markdown"];

#[derive(Parser)]
#[command(name = "resume-relevance")]
#[command(about = "Score how well a resume matches a job description")]
#[command(long_about = "Score resumes against job descriptions using section-weighted keyword overlap and sentence embeddings, and report what is missing")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Score(ScoreArgs),

    /// Job posting management
    Jobs {
        #[command(subcommand)]
        action: JobAction,
    },

    /// Stored evaluation results
    Results {
        #[command(subcommand)]
        action: ResultAction,
    },

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args)]
pub struct ScoreArgs {
    /// Path to resume file (PDF, DOCX, TXT, MD)
    #[arg(short, long)]
    pub resume: PathBuf,

    /// Id of a posted job to score against
    #[arg(long, conflicts_with = "job", required_unless_present = "job")]
    pub job_id: Option<String>,

    /// Path to a job description file
    #[arg(short, long)]
    pub job: Option<PathBuf>,

    /// Output format: console, json, markdown
    #[arg(short, long)]
    pub output: Option<String>,

    /// Show per-section semantic scores
    #[arg(short, long)]
    pub detailed: bool,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Don't record the result when scoring against a posted job
    #[arg(long)]
    pub no_save: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub save: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum JobAction {
    /// Post (or replace) a job description
    Post {
        /// Role title
        #[arg(long)]
        role: String,

        /// Unique job id
        #[arg(long)]
        job_id: String,

        /// Job location
        #[arg(long)]
        location: String,

        /// Path to the job description file
        #[arg(long)]
        jd: PathBuf,
    },

    /// List posted jobs
    List {
        /// Only jobs at this location
        #[arg(long)]
        location: Option<String>,

        /// Case-insensitive job id search
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ResultAction {
    /// List stored results
    List {
        /// Only results for this job id
        #[arg(long)]
        job_id: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available embedding models
    List,

    /// Download an embedding model
    Download {
        /// Model id, HuggingFace repo ID, or display name
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("md").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), DOCUMENT_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.markdown"), DOCUMENT_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.odt"), DOCUMENT_EXTENSIONS).is_err());
        assert!(validate_file_extension(Path::new("cv"), DOCUMENT_EXTENSIONS).is_err());
    }

    #[test]
    fn test_score_requires_a_job() {
        assert!(Cli::try_parse_from(["resume-relevance", "score", "--resume", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from([
            "resume-relevance", "score", "--resume", "cv.pdf", "--job-id", "A", "--job", "jd.txt"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["resume-relevance", "score", "--resume", "cv.pdf", "--job-id", "DE-1"]).unwrap();
        match cli.command {
            Commands::Score(args) => {
                assert_eq!(args.job_id.as_deref(), Some("DE-1"));
                assert!(!args.no_save);
            }
            _ => panic!("expected score command"),
        }
    }
}
