//! Configuration management for the ATS tailor

use crate::error::{AtsTailorError, Result};
use crate::scoring::components::ScoreComponent;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Allowed drift of the weight sum from 1.0
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Similarity at or above this is Present
    pub tau_high: f64,
    /// Similarity at or above this (and below `tau_high`) is Weak
    pub tau_low: f64,
    pub weights: ScoringWeights,
}

/// Per-component weights. All five are required and must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub coverage: f64,
    pub explicitness: f64,
    pub role_alignment: f64,
    pub keywords: f64,
    pub writing_quality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    pub backend: SimilarityBackendKind,
    pub model: String,
    pub models_dir: PathBuf,
    #[serde(default)]
    pub on_failure: FailurePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityBackendKind {
    Model2Vec,
    Lexical,
}

/// What the matcher does when the similarity backend fails mid-request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Propagate `MatchingUnavailable` to the caller
    #[default]
    Fail,
    /// Classify from verbatim mentions only and flag the breakdown as degraded
    ExplicitOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Custom taxonomy JSON; the builtin taxonomy is used when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            coverage: 0.35,
            explicitness: 0.25,
            role_alignment: 0.15,
            keywords: 0.15,
            writing_quality: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        ScoreComponent::ALL.iter().map(|c| self.get(*c)).sum()
    }

    pub fn get(&self, component: ScoreComponent) -> f64 {
        match component {
            ScoreComponent::Coverage => self.coverage,
            ScoreComponent::Explicitness => self.explicitness,
            ScoreComponent::RoleAlignment => self.role_alignment,
            ScoreComponent::Keywords => self.keywords,
            ScoreComponent::WritingQuality => self.writing_quality,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for component in ScoreComponent::ALL {
            let weight = self.get(component);
            if !weight.is_finite() || weight < 0.0 {
                return Err(AtsTailorError::Config(format!(
                    "Weight for {} must be a non-negative number, got {}",
                    component.key(),
                    weight
                )));
            }
        }

        let total = self.sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(AtsTailorError::Config(format!(
                "Scoring weights must sum to 1.0, got {:.6}",
                total
            )));
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tau_high: 0.75,
            tau_low: 0.50,
            weights: ScoringWeights::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, tau) in [("tau_high", self.tau_high), ("tau_low", self.tau_low)] {
            if !(0.0..=1.0).contains(&tau) {
                return Err(AtsTailorError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, tau
                )));
            }
        }
        if self.tau_low > self.tau_high {
            return Err(AtsTailorError::Config(format!(
                "tau_low ({}) must not exceed tau_high ({})",
                self.tau_low, self.tau_high
            )));
        }
        self.weights.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ats-tailor")
            .join("models");

        Self {
            scoring: ScoringConfig::default(),
            similarity: SimilarityConfig {
                backend: SimilarityBackendKind::Model2Vec,
                model: "potion-base-8M".to_string(),
                models_dir,
                on_failure: FailurePolicy::Fail,
            },
            taxonomy: TaxonomyConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                max_suggestions: 20,
            },
        }
    }
}

impl Config {
    /// Load from the user config directory, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load and validate an explicit config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsTailorError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-tailor")
            .join("config.toml")
    }

    pub fn models_dir(&self) -> &Path {
        &self.similarity.models_dir
    }
}
