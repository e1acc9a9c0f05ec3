//! ats-tailor: score a resume against a job description the way an ATS would

use ats_tailor::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use ats_tailor::config::{Config, SimilarityBackendKind};
use ats_tailor::error::{AtsTailorError, Result};
use ats_tailor::input::InputManager;
use ats_tailor::llm::PromptTemplates;
use ats_tailor::output::{save_report_to_file, ReportGenerator, ReportMetadata, ScoreReport};
use ats_tailor::processing::embedding_manager::EmbeddingModelManager;
use ats_tailor::processing::embeddings::Model2VecSimilarity;
use ats_tailor::processing::similarity::{backend_or_unavailable, LexicalSimilarity, SimilarityBackend};
use ats_tailor::scoring::Scorer;
use ats_tailor::taxonomy::{ActionVerbs, SkillTaxonomy};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

const INPUT_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            job,
            output,
            save,
            backend,
            prompts,
            detailed,
        } => {
            cli::validate_file_extension(&resume, INPUT_EXTENSIONS)
                .map_err(|e| AtsTailorError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, INPUT_EXTENSIONS)
                .map_err(|e| AtsTailorError::InvalidInput(format!("Job description file: {}", e)))?;

            if let Some(format) = output {
                config.output.format =
                    cli::parse_output_format(&format).map_err(AtsTailorError::InvalidInput)?;
            }
            if let Some(name) = backend {
                config.similarity.backend =
                    cli::parse_backend(&name).map_err(AtsTailorError::InvalidInput)?;
            }
            config.output.detailed |= detailed;

            score_command(&config, &resume, &job, save.as_deref(), prompts).await
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.models_dir().to_path_buf()).await?;
            match action {
                ModelAction::List => {
                    println!("Embedding models:\n");
                    for model in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(model.id) {
                            "downloaded".green()
                        } else {
                            "available".normal()
                        };
                        println!(
                            "  • {} ({}) - {} MB, {} dims [{}]",
                            model.id, model.repo_id, model.size_mb, model.dimensions, status
                        );
                        println!("    {}", model.description);
                    }
                    if manager.list_downloaded_models().is_empty() {
                        println!("\nNo models downloaded yet. Get started with:");
                        println!("  ats-tailor models download {}", config.similarity.model);
                    }
                }
                ModelAction::Download { model } => {
                    let spinner = spinner(&format!("Downloading {}", model));
                    let result = manager.download_model(&model).await;
                    spinner.finish_and_clear();

                    let path = result?;
                    println!("{} {} -> {}", "✓".green(), model, path.display());
                }
            }
            Ok(())
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => {
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        AtsTailorError::Config(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("# {}\n{}", path.display(), content);
                }
                ConfigAction::Reset => {
                    Config::default().save_to(&path)?;
                    println!("Configuration reset to defaults: {}", path.display());
                }
                ConfigAction::Path => println!("{}", path.display()),
            }
            Ok(())
        }
    }
}

async fn score_command(
    config: &Config,
    resume_path: &Path,
    job_path: &Path,
    save: Option<&Path>,
    with_prompts: bool,
) -> Result<()> {
    let start_time = Instant::now();

    let mut input_manager = InputManager::new();
    let resume_text = input_manager.extract_text(resume_path).await?;
    let job_text = input_manager.extract_text(job_path).await?;

    let custom_taxonomy;
    let taxonomy = match &config.taxonomy.path {
        Some(path) => {
            custom_taxonomy = SkillTaxonomy::from_json_file(path)?;
            info!("Loaded {} skills from {}", custom_taxonomy.len(), path.display());
            &custom_taxonomy
        }
        None => SkillTaxonomy::builtin(),
    };

    let backend = backend_or_unavailable(load_backend(config).await, config.similarity.on_failure)?;
    let scorer = Scorer::new(config, taxonomy, backend.as_ref())?;
    let breakdown = scorer.score(&resume_text, &job_text)?;

    let metadata = ReportMetadata::new(
        &resume_path.display().to_string(),
        &job_path.display().to_string(),
        scorer.backend_name(),
        start_time.elapsed().as_millis() as u64,
    );
    let templates = PromptTemplates::default();
    let (prompts, summary_prompt) = if with_prompts {
        (
            templates.render_all(&breakdown, ActionVerbs::builtin(), config.output.max_suggestions),
            breakdown.summary_update.as_ref().map(|u| templates.render_summary(u)),
        )
    } else {
        (Vec::new(), None)
    };
    let report = ScoreReport::new(breakdown, metadata)
        .with_prompts(prompts)
        .with_summary_prompt(summary_prompt);

    let rendered = ReportGenerator::new(&config.output).generate_report(&report, config.output.format)?;
    match save {
        Some(path) => {
            save_report_to_file(&rendered, path)?;
            println!("Report saved to {} (score {}/100)", path.display(), report.total());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

async fn load_backend(config: &Config) -> Result<Box<dyn SimilarityBackend>> {
    match config.similarity.backend {
        SimilarityBackendKind::Lexical => Ok(Box::new(LexicalSimilarity::new())),
        SimilarityBackendKind::Model2Vec => {
            let mut manager = EmbeddingModelManager::new(config.models_dir().to_path_buf()).await?;
            let model_id = manager
                .resolve_model_id(&config.similarity.model)
                .unwrap_or(config.similarity.model.as_str())
                .to_string();

            let path = match manager.get_model_path(&model_id) {
                Some(path) => path,
                None => {
                    let spinner = spinner(&format!("Downloading embedding model {}", model_id));
                    let result = manager.ensure_model_available(&model_id).await;
                    spinner.finish_and_clear();
                    result.map_err(|e| {
                        AtsTailorError::MatchingUnavailable(format!(
                            "{} (use --backend lexical to score offline)",
                            e
                        ))
                    })?
                }
            };

            Ok(Box::new(Model2VecSimilarity::load(&path)?))
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
