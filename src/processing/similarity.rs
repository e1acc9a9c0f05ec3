//! Similarity primitive used by the matcher, plus an offline lexical backend

use crate::config::FailurePolicy;
use crate::error::{AtsTailorError, Result};
use crate::processing::text_processor::{contains_phrase, tokens};
use log::warn;

/// "Given two texts, return a similarity in [0, 1]."
///
/// Backends must be shareable across concurrent scoring requests.
pub trait SimilarityBackend: Send + Sync {
    fn name(&self) -> &str;

    fn similarity(&self, a: &str, b: &str) -> Result<f32>;

    /// Score every query against every candidate, `result[q][c]`.
    /// Embedding backends override this to embed each text once.
    fn similarity_matrix(&self, queries: &[String], candidates: &[String]) -> Result<Vec<Vec<f32>>> {
        queries
            .iter()
            .map(|query| {
                candidates
                    .iter()
                    .map(|candidate| self.similarity(query, candidate).and_then(checked_score))
                    .collect()
            })
            .collect()
    }
}

/// Clamp a raw score into [0, 1]. NaN means the backend produced nothing usable.
pub fn checked_score(score: f32) -> Result<f32> {
    if score.is_nan() {
        return Err(AtsTailorError::MatchingUnavailable(
            "similarity backend returned NaN".to_string(),
        ));
    }
    Ok(score.clamp(0.0, 1.0))
}

/// Cosine similarity with negative values floored at 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(AtsTailorError::MatchingUnavailable(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    checked_score(dot / (norm_a * norm_b))
}

/// Stands in for a backend that could not be loaded. Every call fails, so the
/// matcher applies its failure policy.
#[derive(Debug, Clone)]
pub struct UnavailableSimilarity {
    reason: String,
}

impl UnavailableSimilarity {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SimilarityBackend for UnavailableSimilarity {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn similarity(&self, _a: &str, _b: &str) -> Result<f32> {
        Err(AtsTailorError::MatchingUnavailable(self.reason.clone()))
    }
}

/// Apply the failure policy to a backend that failed to load.
///
/// `Fail` keeps the error. `ExplicitOnly` swaps in [`UnavailableSimilarity`]
/// so scoring still runs and the breakdown comes back degraded.
pub fn backend_or_unavailable(
    loaded: Result<Box<dyn SimilarityBackend>>,
    policy: FailurePolicy,
) -> Result<Box<dyn SimilarityBackend>> {
    match (loaded, policy) {
        (Ok(backend), _) => Ok(backend),
        (Err(e), FailurePolicy::Fail) => Err(e),
        (Err(e), FailurePolicy::ExplicitOnly) => {
            warn!("Similarity backend could not be loaded ({}); falling back to explicit mentions", e);
            Ok(Box::new(UnavailableSimilarity::new(e.to_string())))
        }
    }
}

/// Shortest candidate window that may earn a fuzzy score
pub const MIN_FUZZY_CHARS: usize = 5;

/// Fuzzy hits are scaled so they never reach the Present band on their own
pub const FUZZY_SCALE: f64 = 0.7;

/// Deterministic offline backend: exact phrase hits score 1.0, otherwise the
/// best normalized Levenshtein similarity against same-length token windows,
/// scaled by [`FUZZY_SCALE`]. Windows shorter than [`MIN_FUZZY_CHARS`] or not
/// sharing the query's first character score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalSimilarity;

impl LexicalSimilarity {
    pub fn new() -> Self {
        Self
    }
}

impl SimilarityBackend for LexicalSimilarity {
    fn name(&self) -> &str {
        "lexical"
    }

    fn similarity(&self, query: &str, candidate: &str) -> Result<f32> {
        let query_tokens = tokens(query);
        let candidate_tokens = tokens(candidate);
        if query_tokens.is_empty() || candidate_tokens.is_empty() {
            return Ok(0.0);
        }

        if contains_phrase(candidate, query) {
            return Ok(1.0);
        }

        let needle = query_tokens.join(" ");
        let first = needle.chars().next();
        let width = query_tokens.len().min(candidate_tokens.len());

        let best = candidate_tokens
            .windows(width)
            .map(|window| window.join(" "))
            .filter(|window| window.chars().count() >= MIN_FUZZY_CHARS && window.chars().next() == first)
            .map(|window| strsim::normalized_levenshtein(&needle, &window))
            .fold(0.0_f64, f64::max);

        checked_score((best * FUZZY_SCALE) as f32)
    }
}
