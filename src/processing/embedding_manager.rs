//! Embedding model catalog and Hugging Face Hub downloads

use crate::error::{AtsTailorError, Result};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingModelInfo {
    /// Local directory name and CLI identifier
    pub id: &'static str,
    pub name: &'static str,
    pub repo_id: &'static str,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: &'static str,
}

const CATALOG: &[EmbeddingModelInfo] = &[
    EmbeddingModelInfo {
        id: "potion-base-8M",
        name: "Potion Base 8M",
        repo_id: "minishlab/potion-base-8M",
        size_mb: 33,
        dimensions: 256,
        description: "Default. Good quality for skill-to-bullet similarity at a small size",
    },
    EmbeddingModelInfo {
        id: "potion-base-4M",
        name: "Potion Base 4M",
        repo_id: "minishlab/potion-base-4M",
        size_mb: 16,
        dimensions: 128,
        description: "Smaller and faster, slightly lower quality",
    },
    EmbeddingModelInfo {
        id: "potion-base-32M",
        name: "Potion Base 32M",
        repo_id: "minishlab/potion-base-32M",
        size_mb: 130,
        dimensions: 512,
        description: "Highest quality of the potion family",
    },
];

/// Files a Model2Vec directory needs before `StaticModel` can load it
const REQUIRED_FILES: &[&str] = &["tokenizer.json", "model.safetensors"];
const OPTIONAL_FILES: &[&str] = &["config.json", "README.md"];

pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    downloaded: BTreeSet<String>,
}

impl EmbeddingModelManager {
    /// Create the models directory if needed and scan it for complete models
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&models_dir).await.map_err(|e| {
            AtsTailorError::ModelError(format!("Failed to create models directory: {}", e))
        })?;

        let mut manager = Self {
            models_dir,
            downloaded: BTreeSet::new(),
        };
        manager.scan_downloaded_models().await?;
        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && is_model_dir(&entry.path()) {
                self.downloaded
                    .insert(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(())
    }

    /// Download a catalog model into `<models_dir>/<id>`
    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let id = self.resolve_model_id(model_id).ok_or_else(|| {
            AtsTailorError::ModelError(format!("Unknown embedding model: {}", model_id))
        })?;
        let info = Self::model_info(id).ok_or_else(|| {
            AtsTailorError::ModelError(format!("Unknown embedding model: {}", model_id))
        })?;

        let model_dir = self.models_dir.join(info.id);
        if self.downloaded.contains(info.id) {
            return Ok(model_dir);
        }

        info!(
            "Downloading embedding model {} ({} MB) from {}",
            info.name, info.size_mb, info.repo_id
        );
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| AtsTailorError::ModelError(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(info.repo_id.to_string());

        for file in REQUIRED_FILES.iter().chain(OPTIONAL_FILES.iter()) {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                        AtsTailorError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    info!("Downloaded {}", file);
                }
                Err(e) if OPTIONAL_FILES.contains(file) => {
                    warn!("Optional file {} not available: {}", file, e);
                }
                Err(e) => {
                    return Err(AtsTailorError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded.insert(info.id.to_string());
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        match self.get_model_path(model_id) {
            Some(path) => Ok(path),
            None => self.download_model(model_id).await,
        }
    }

    pub fn list_available_models(&self) -> &'static [EmbeddingModelInfo] {
        CATALOG
    }

    /// Downloaded model directories, sorted by name
    pub fn list_downloaded_models(&self) -> Vec<String> {
        self.downloaded.iter().cloned().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded.contains(model_id)
    }

    pub fn model_info(model_id: &str) -> Option<&'static EmbeddingModelInfo> {
        CATALOG.iter().find(|m| m.id == model_id)
    }

    /// Accept a catalog id, a Hub repo id or a display name
    pub fn resolve_model_id(&self, input: &str) -> Option<&'static str> {
        CATALOG
            .iter()
            .find(|m| {
                m.id == input || m.repo_id == input || m.name.eq_ignore_ascii_case(input)
            })
            .map(|m| m.id)
    }
}

/// A directory holding every file `StaticModel::from_pretrained` needs
pub fn is_model_dir(path: &Path) -> bool {
    REQUIRED_FILES.iter().all(|file| path.join(file).is_file())
}
