//! ATS-style resume scoring: requirement extraction, evidence matching,
//! weighted component scores and ranked gap suggestions.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod processing;
pub mod scoring;
pub mod taxonomy;

pub use config::Config;
pub use error::{AtsTailorError, Result};
pub use processing::similarity::{LexicalSimilarity, SimilarityBackend};
pub use scoring::{score, ScoreBreakdown, Scorer};
