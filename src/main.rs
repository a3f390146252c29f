//! Resume relevance: score resumes against job descriptions from the command line

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_relevance::cli::{
    self, Cli, Commands, ConfigAction, JobAction, ModelAction, ResultAction, ScoreArgs,
};
use resume_relevance::config::{Config, OutputFormat};
use resume_relevance::input::InputManager;
use resume_relevance::output::formatter::save_report_to_file;
use resume_relevance::output::report::display_name;
use resume_relevance::output::{ReportGenerator, ScoreReport};
use resume_relevance::processing::embedding_manager::EmbeddingModelManager;
use resume_relevance::processing::embeddings::shared_embedder;
use resume_relevance::storage::{JobRegistry, ResultStore};
use resume_relevance::{RelevanceError, RelevanceScorer, Result};
use std::path::Path;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Score(args) => score(args, &config).await,
        Commands::Jobs { action } => jobs(action, &config).await,
        Commands::Results { action } => results(action, &config),
        Commands::Models { action } => models(action, &config).await,
        Commands::Config { action } => config_command(action, config, config_path),
    }
}

async fn score(args: ScoreArgs, config: &Config) -> Result<()> {
    cli::validate_file_extension(&args.resume, cli::DOCUMENT_EXTENSIONS)
        .map_err(|e| RelevanceError::InvalidInput(format!("Resume file: {}", e)))?;

    let output_format = match &args.output {
        Some(output) => cli::parse_output_format(output).map_err(RelevanceError::InvalidInput)?,
        None => config.output.format,
    };

    let mut input_manager = InputManager::new();
    let resume_text = input_manager.extract_text(&args.resume).await?;

    // A posted job is looked up by id; otherwise the job file is read directly
    let (job_id, job_label, jd_text) = match (&args.job_id, &args.job) {
        (Some(job_id), _) => {
            let registry = JobRegistry::open(&config.jobs_path())?;
            let job = registry.get_job(job_id)?;
            (Some(job.job_id.clone()), job.label(), job.jd_text.clone())
        }
        (None, Some(job_path)) => {
            cli::validate_file_extension(job_path, cli::DOCUMENT_EXTENSIONS)
                .map_err(|e| RelevanceError::InvalidInput(format!("Job description file: {}", e)))?;
            let jd_text = input_manager.extract_text(job_path).await?;
            (None, display_name(job_path), jd_text)
        }
        (None, None) => {
            return Err(RelevanceError::InvalidInput(
                "Either --job-id or --job is required".to_string(),
            ))
        }
    };

    let spinner = analysis_spinner(output_format == OutputFormat::Console);

    let embedder = shared_embedder(config)?;
    let scorer = RelevanceScorer::new(embedder)?;
    let scored = scorer.calculate_relevance(&resume_text, &jd_text);
    spinner.finish_and_clear();
    let result = scored?;

    let resume_name = display_name(&args.resume);

    if let Some(job_id) = &job_id {
        if args.no_save {
            info!("Not saving result (--no-save)");
        } else {
            let mut store = ResultStore::open(&config.results_path())?;
            store.save_result(&resume_name, job_id, result.final_score, result.verdict, &result.missing)?;
            info!("Saved result for {} against {}", resume_name, job_id);
        }
    }

    let report = ScoreReport::new(&resume_name, &job_label, result, scorer.embedder_name());
    let generator = ReportGenerator::with_options(
        config.output.color_output && args.save.is_none(),
        args.detailed || config.output.detailed,
        !args.compact,
    );
    let rendered = generator.generate_report(&report, &output_format)?;

    match &args.save {
        Some(path) => {
            save_report_to_file(&rendered, path)?;
            println!("Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn analysis_spinner(visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    match ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        Ok(style) => spinner.set_style(style),
        Err(e) => warn!("Invalid spinner template: {}", e),
    }
    spinner.set_message("Analyzing resume...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

async fn jobs(action: JobAction, config: &Config) -> Result<()> {
    let mut registry = JobRegistry::open(&config.jobs_path())?;

    match action {
        JobAction::Post { role, job_id, location, jd } => {
            cli::validate_file_extension(&jd, cli::DOCUMENT_EXTENSIONS)
                .map_err(|e| RelevanceError::InvalidInput(format!("Job description file: {}", e)))?;

            let jd_text = InputManager::new().extract_text(&jd).await?;
            registry.save_job(&role, &job_id, &location, &display_name(&jd), &jd_text)?;
            println!("Saved job {} ({}, {})", job_id, role, location);
        }
        JobAction::List { location, search } => {
            let postings = registry.filter(location.as_deref(), search.as_deref());
            if postings.is_empty() {
                println!("No job postings found.");
                return Ok(());
            }

            println!("{:<14} {:<28} {:<16} {}", "JOB ID", "ROLE", "LOCATION", "SOURCE");
            for job in postings {
                println!("{:<14} {:<28} {:<16} {}", job.job_id, job.role, job.location, job.source_name);
            }
            println!("\nLocations: {}", registry.locations().join(", "));
        }
    }

    Ok(())
}

fn results(action: ResultAction, config: &Config) -> Result<()> {
    let store = ResultStore::open(&config.results_path())?;

    match action {
        ResultAction::List { job_id } => {
            let records: Vec<_> = match &job_id {
                Some(job_id) => store.for_job(job_id),
                None => store.results().iter().collect(),
            };

            if records.is_empty() {
                println!("No results found.");
                return Ok(());
            }

            println!("{:<20} {:<14} {:>7}  {:<7} {}", "TIMESTAMP", "JOB ID", "SCORE", "VERDICT", "RESUME");
            for record in records {
                println!(
                    "{:<20} {:<14} {:>7.2}  {:<7} {}",
                    record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    record.job_id,
                    record.score,
                    record.verdict.to_string(),
                    record.resume_name
                );
                if !record.missing.is_empty() {
                    println!("    missing: {}", record.missing.join(" | "));
                }
            }
        }
    }

    Ok(())
}

async fn models(action: ModelAction, config: &Config) -> Result<()> {
    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

    match action {
        ModelAction::List => {
            println!("Embedding models:");
            for (id, model) in manager.list_available_models() {
                let local_path = manager.get_model_path(id);
                let status = if local_path.is_some() { "downloaded" } else { "available" };
                let active = if *id == config.models.embedding_model { " (configured)" } else { "" };
                println!(
                    "  {} [{}]{} - {} ({} dims, {} MB)",
                    id, status, active, model.repo_id, model.dimensions, model.size_mb
                );
                println!("    {}", model.description);
                if let Some(path) = local_path {
                    println!("    path: {}", path.display());
                }
            }
            println!("\nModels directory: {}", config.models_dir().display());
        }
        ModelAction::Download { model } => {
            let model_id = manager
                .resolve_model_id(&model)
                .ok_or_else(|| RelevanceError::NotFound(format!("Unknown embedding model: {}", model)))?;

            let path = manager.download_model(&model_id).await?;
            println!("Model {} available at {}", model_id, path.display());
        }
    }

    Ok(())
}

fn config_command(action: Option<ConfigAction>, config: Config, config_path: &Path) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(&config)
                .map_err(|e| RelevanceError::Configuration(format!("Failed to serialize config: {}", e)))?;
            println!("# {}", config_path.display());
            println!("{}", content);
        }
        ConfigAction::Reset => {
            Config::default().save_to(config_path)?;
            println!("Configuration reset to defaults: {}", config_path.display());
        }
    }

    Ok(())
}
