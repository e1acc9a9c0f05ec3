//! CLI interface for the ATS tailor

use crate::config::{OutputFormat, SimilarityBackendKind};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ats-tailor")]
#[command(version)]
#[command(about = "Score a resume against a job description the way an ATS would")]
#[command(long_about = "Extract required skills from a job description, find evidence for each in the resume, \
and report a 0-100 match score with ranked suggestions for closing the gaps")]
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
    Score {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Similarity backend: model2vec or lexical
        #[arg(short, long)]
        backend: Option<String>,

        /// Include rewrite prompts for the top suggestions
        #[arg(short, long)]
        prompts: bool,

        /// Show per-requirement matches and component details
        #[arg(short, long)]
        detailed: bool,
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

#[derive(Subcommand)]
pub enum ModelAction {
    /// List available and downloaded embedding models
    List,

    /// Download an embedding model from the Hugging Face Hub
    Download {
        /// Model id, display name or Hub repo id
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

pub fn parse_backend(name: &str) -> Result<SimilarityBackendKind, String> {
    match name.to_lowercase().as_str() {
        "model2vec" | "embedding" | "embeddings" => Ok(SimilarityBackendKind::Model2Vec),
        "lexical" => Ok(SimilarityBackendKind::Lexical),
        _ => Err(format!(
            "Invalid similarity backend: {}. Supported: model2vec, lexical",
            name
        )),
    }
}

pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if allowed_extensions.contains(&ext.to_lowercase().as_str()) => Ok(()),
        Some(ext) => Err(format!(
            "Unsupported file extension: .{}. Allowed: {}",
            ext,
            allowed_extensions.join(", ")
        )),
        None => Err(format!("File has no extension: {}", path.display())),
    }
}
