//! Requirement-to-evidence matching and Present/Weak/Missing classification

use crate::config::{FailurePolicy, ScoringConfig};
use crate::error::{AtsTailorError, Result};
use crate::processing::job::{Requirement, RequirementSet};
use crate::processing::resume::ResumeProfile;
use crate::processing::similarity::{checked_score, SimilarityBackend};
use crate::taxonomy::SkillTaxonomy;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    Present,
    Weak,
    Missing,
}

impl MatchStatus {
    /// Present and Weak both count toward coverage
    pub fn is_covered(self) -> bool {
        !matches!(self, MatchStatus::Missing)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Present => write!(f, "Present"),
            MatchStatus::Weak => write!(f, "Weak"),
            MatchStatus::Missing => write!(f, "Missing"),
        }
    }
}

/// Where the best evidence for a skill was found. Indexes into the
/// `ResumeProfile`, which owns the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceRef {
    Bullet(usize),
    SkillsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub skill: String,
    pub status: MatchStatus,
    pub similarity: f32,
    pub evidence_bullet_index: Option<usize>,
    /// Best evidence was the skills section rather than a bullet
    #[serde(default)]
    pub evidence_in_skills: bool,
    pub explicit: bool,
    pub must_have: bool,
}

impl MatchResult {
    pub fn evidence(&self) -> Option<EvidenceRef> {
        match (self.evidence_bullet_index, self.evidence_in_skills) {
            (Some(index), _) => Some(EvidenceRef::Bullet(index)),
            (None, true) => Some(EvidenceRef::SkillsSection),
            (None, false) => None,
        }
    }

    fn new(
        requirement: &Requirement,
        status: MatchStatus,
        similarity: f32,
        evidence: Option<EvidenceRef>,
        explicit: bool,
    ) -> Self {
        Self {
            skill: requirement.skill.canonical.clone(),
            status,
            similarity,
            evidence_bullet_index: match evidence {
                Some(EvidenceRef::Bullet(index)) => Some(index),
                _ => None,
            },
            evidence_in_skills: evidence == Some(EvidenceRef::SkillsSection),
            explicit,
            must_have: requirement.is_must_have,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// One entry per requirement, in requirement order
    pub matches: Vec<MatchResult>,
    /// Similarity was unavailable and only verbatim mentions were used
    pub degraded: bool,
}

pub struct EvidenceMatcher<'a> {
    backend: &'a dyn SimilarityBackend,
    taxonomy: &'a SkillTaxonomy,
    tau_high: f32,
    tau_low: f32,
    on_failure: FailurePolicy,
}

impl<'a> EvidenceMatcher<'a> {
    pub fn new(
        backend: &'a dyn SimilarityBackend,
        taxonomy: &'a SkillTaxonomy,
        scoring: &ScoringConfig,
        on_failure: FailurePolicy,
    ) -> Self {
        Self {
            backend,
            taxonomy,
            tau_high: scoring.tau_high as f32,
            tau_low: scoring.tau_low as f32,
            on_failure,
        }
    }

    pub fn classify(&self, similarity: f32) -> MatchStatus {
        if similarity >= self.tau_high {
            MatchStatus::Present
        } else if similarity >= self.tau_low {
            MatchStatus::Weak
        } else {
            MatchStatus::Missing
        }
    }

    pub fn match_requirements(
        &self,
        requirements: &RequirementSet,
        resume: &ResumeProfile,
    ) -> Result<MatchOutcome> {
        match self.semantic_matches(requirements, resume) {
            Ok(matches) => Ok(MatchOutcome {
                matches,
                degraded: false,
            }),
            Err(e) => match self.on_failure {
                FailurePolicy::Fail => Err(e),
                FailurePolicy::ExplicitOnly => {
                    warn!(
                        "Similarity backend '{}' unavailable ({}); scoring from explicit mentions only",
                        self.backend.name(),
                        e
                    );
                    Ok(MatchOutcome {
                        matches: self.explicit_matches(requirements, resume),
                        degraded: true,
                    })
                }
            },
        }
    }

    fn semantic_matches(
        &self,
        requirements: &RequirementSet,
        resume: &ResumeProfile,
    ) -> Result<Vec<MatchResult>> {
        let mut candidates: Vec<String> = resume.bullets.iter().map(|b| b.text.clone()).collect();
        if !resume.skills_text.trim().is_empty() {
            candidates.push(resume.skills_text.clone());
        }

        if candidates.is_empty() || requirements.is_empty() {
            return Ok(requirements
                .iter()
                .map(|r| {
                    let explicit = resume.is_explicit(&r.skill.canonical);
                    MatchResult::new(r, MatchStatus::Missing, 0.0, None, explicit)
                })
                .collect());
        }

        // Query rows for requirement i live at ranges[i]
        let mut queries: Vec<String> = Vec::new();
        let mut ranges = Vec::with_capacity(requirements.len());
        for requirement in requirements.iter() {
            let start = queries.len();
            let mut seen = HashSet::new();
            for name in requirement.skill.names() {
                if seen.insert(name.to_lowercase()) {
                    queries.push(name.to_string());
                }
            }
            ranges.push(start..queries.len());
        }

        let matrix = self
            .backend
            .similarity_matrix(&queries, &candidates)
            .map_err(into_matching_unavailable)?;

        if matrix.len() != queries.len() || matrix.iter().any(|row| row.len() != candidates.len()) {
            return Err(AtsTailorError::MatchingUnavailable(format!(
                "Similarity matrix has the wrong shape for {} queries x {} candidates",
                queries.len(),
                candidates.len()
            )));
        }

        debug!(
            "Scored {} queries against {} candidates",
            queries.len(),
            candidates.len()
        );

        let bullet_count = resume.bullets.len();
        let mut results = Vec::with_capacity(requirements.len());

        for (requirement, range) in requirements.iter().zip(ranges) {
            let mut best: Option<(f32, usize)> = None;
            for candidate in 0..candidates.len() {
                let mut score = 0.0_f32;
                for row in &matrix[range.clone()] {
                    score = score.max(checked_score(row[candidate])?);
                }
                // Strict comparison keeps the earliest candidate on ties
                if best.map_or(true, |(top, _)| score > top) {
                    best = Some((score, candidate));
                }
            }

            let (similarity, candidate) = best.unwrap_or((0.0, 0));
            let evidence = if candidate < bullet_count {
                EvidenceRef::Bullet(candidate)
            } else {
                EvidenceRef::SkillsSection
            };
            let explicit = resume.is_explicit(&requirement.skill.canonical);

            results.push(MatchResult::new(
                requirement,
                self.classify(similarity),
                similarity,
                Some(evidence),
                explicit,
            ));
        }

        Ok(results)
    }

    /// Degraded classification: verbatim mentions are Present, everything else Missing
    fn explicit_matches(
        &self,
        requirements: &RequirementSet,
        resume: &ResumeProfile,
    ) -> Vec<MatchResult> {
        requirements
            .iter()
            .map(|requirement| {
                let skill = &requirement.skill;
                if !resume.is_explicit(&skill.canonical) {
                    return MatchResult::new(requirement, MatchStatus::Missing, 0.0, None, false);
                }

                let evidence = resume
                    .bullets
                    .iter()
                    .find(|b| self.taxonomy.mentions(skill, &b.text))
                    .map(|b| EvidenceRef::Bullet(b.index))
                    .or_else(|| {
                        self.taxonomy
                            .mentions(skill, &resume.skills_text)
                            .then_some(EvidenceRef::SkillsSection)
                    });

                MatchResult::new(requirement, MatchStatus::Present, 1.0, evidence, true)
            })
            .collect()
    }
}

fn into_matching_unavailable(err: AtsTailorError) -> AtsTailorError {
    match err {
        AtsTailorError::MatchingUnavailable(_) => err,
        other => AtsTailorError::MatchingUnavailable(other.to_string()),
    }
}
