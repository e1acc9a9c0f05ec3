//! Embedding similarity backend using Model2Vec

use crate::error::{AtsTailorError, Result};
use crate::processing::similarity::{cosine_similarity, SimilarityBackend};
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

pub struct Model2VecSimilarity {
    model: StaticModel,
    model_name: String,
}

impl Model2VecSimilarity {
    /// Load a static embedding model from a local directory
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            return Err(AtsTailorError::MatchingUnavailable(format!(
                "Embedding model not found at {} (run `ats-tailor models download`)",
                model_path.display()
            )));
        }

        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(model_path, None, None, None).map_err(|e| {
            AtsTailorError::MatchingUnavailable(format!("Failed to load model: {}", e))
        })?;

        debug!("Model loaded in {:.2?}", start_time.elapsed());

        let model_name = model_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| model_path.display().to_string());

        Ok(Self { model, model_name })
    }

    pub fn embed(&self, texts: &[String]) -> Vec<Vec<f32>> {
        self.model.encode(texts)
    }
}

impl SimilarityBackend for Model2VecSimilarity {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        let embeddings = self.embed(&[a.to_string(), b.to_string()]);
        match embeddings.as_slice() {
            [ea, eb] => cosine_similarity(ea, eb),
            _ => Err(AtsTailorError::MatchingUnavailable(format!(
                "Expected 2 embeddings, got {}",
                embeddings.len()
            ))),
        }
    }

    /// Embeds every distinct text exactly once, in a single batch
    fn similarity_matrix(&self, queries: &[String], candidates: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut unique: Vec<String> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for text in queries.iter().chain(candidates.iter()) {
            if !index.contains_key(text.as_str()) {
                index.insert(text.as_str(), unique.len());
                unique.push(text.clone());
            }
        }

        if unique.is_empty() {
            return Ok(vec![Vec::new(); queries.len()]);
        }

        let start_time = Instant::now();
        let embeddings = self.embed(&unique);
        if embeddings.len() != unique.len() {
            return Err(AtsTailorError::MatchingUnavailable(format!(
                "Model returned {} embeddings for {} texts",
                embeddings.len(),
                unique.len()
            )));
        }
        debug!(
            "Embedded {} texts in {:.2?}",
            unique.len(),
            start_time.elapsed()
        );

        queries
            .iter()
            .map(|query| {
                let q = &embeddings[index[query.as_str()]];
                candidates
                    .iter()
                    .map(|candidate| cosine_similarity(q, &embeddings[index[candidate.as_str()]]))
                    .collect()
            })
            .collect()
    }
}
