//! Report structure wrapping a score breakdown with a verdict and notes

use crate::llm::prompts::RewritePrompt;
use crate::scoring::aggregator::ScoreBreakdown;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Strong,
    Good,
    Gaps,
}

impl Verdict {
    pub fn from_total(total: u8) -> Self {
        match total {
            80..=100 => Verdict::Strong,
            60..=79 => Verdict::Good,
            _ => Verdict::Gaps,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Verdict::Strong => "Strong match for this role.",
            Verdict::Good => "Good match with room for improvement.",
            Verdict::Gaps => "Significant gaps to address.",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub verdict: Verdict,
    /// Short explanation lines, the verdict message first
    pub notes: Vec<String>,
    pub breakdown: ScoreBreakdown,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<RewritePrompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_prompt: Option<String>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub resume_file: String,
    pub job_file: String,
    /// Similarity backend that produced the matches
    pub backend: String,
    pub processing_time_ms: u64,
}

impl ReportMetadata {
    pub fn new(resume_file: &str, job_file: &str, backend: &str, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.to_string(),
            job_file: job_file.to_string(),
            backend: backend.to_string(),
            processing_time_ms,
        }
    }
}

impl ScoreReport {
    pub fn new(breakdown: ScoreBreakdown, metadata: ReportMetadata) -> Self {
        let verdict = Verdict::from_total(breakdown.total);
        let notes = explain(&breakdown, verdict);
        Self {
            verdict,
            notes,
            breakdown,
            prompts: Vec::new(),
            summary_prompt: None,
            metadata,
        }
    }

    pub fn with_prompts(mut self, prompts: Vec<RewritePrompt>) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_summary_prompt(mut self, prompt: Option<String>) -> Self {
        self.summary_prompt = prompt;
        self
    }

    pub fn total(&self) -> u8 {
        self.breakdown.total
    }
}

fn percent(score: f64) -> String {
    format!("{:.0}%", score * 100.0)
}

fn explain(breakdown: &ScoreBreakdown, verdict: Verdict) -> Vec<String> {
    let c = &breakdown.components;
    let mut notes = vec![verdict.message().to_string()];

    let coverage = c.coverage.score;
    let coverage_note = if coverage < 0.7 {
        "Missing key required skills."
    } else if coverage < 0.9 {
        "Most requirements covered."
    } else {
        "Excellent coverage."
    };
    notes.push(format!("Coverage: {} - {}", percent(coverage), coverage_note));

    if c.explicitness.score < 0.6 {
        notes.push(format!(
            "Explicitness: {} - Name required skills verbatim.",
            percent(c.explicitness.score)
        ));
    }
    if c.role_alignment.score < 0.5 {
        notes.push(format!(
            "Role alignment: {} - Title does not match the target role.",
            percent(c.role_alignment.score)
        ));
    }
    if c.keywords.score < 0.6 {
        notes.push(format!(
            "Keywords: {} - Missing important technical keywords.",
            percent(c.keywords.score)
        ));
    }
    if c.writing_quality.score < 0.7 {
        notes.push(format!(
            "Writing: {} - Improve bullet length, action verbs and metrics.",
            percent(c.writing_quality.score)
        ));
    }
    if breakdown.degraded {
        notes.push(
            "Similarity matching was unavailable; only verbatim skill mentions were counted."
                .to_string(),
        );
    }

    notes
}
