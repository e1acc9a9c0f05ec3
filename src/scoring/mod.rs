//! Component scoring, aggregation and suggestion ranking

pub mod aggregator;
pub mod components;
pub mod pipeline;
pub mod suggestions;

pub use aggregator::{ComponentScore, Components, ScoreBreakdown};
pub use components::ScoreComponent;
pub use pipeline::{score, Scorer};
pub use suggestions::{SkillInsertion, Suggestion, SummaryUpdate};
