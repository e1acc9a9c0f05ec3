//! Weighted aggregation of component scores into the final 0-100 score

use crate::config::ScoringWeights;
use crate::processing::matcher::MatchResult;
use crate::scoring::components::{ComponentResult, ScoreComponent, ScoreDetail};
use crate::scoring::suggestions::{SkillInsertion, Suggestion, SummaryUpdate};
use serde::{Deserialize, Serialize};

/// Absorbs binary rounding error so that e.g. 65.5 rounds up
const ROUNDING_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub score: f64,
    pub weight: f64,
    /// score x weight x 100
    pub contribution: f64,
    pub detail: ScoreDetail,
}

impl ComponentScore {
    pub fn new(result: ComponentResult, weight: f64) -> Self {
        Self {
            score: result.score,
            weight,
            contribution: result.score * weight * 100.0,
            detail: result.detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Components {
    pub coverage: ComponentScore,
    pub explicitness: ComponentScore,
    pub role_alignment: ComponentScore,
    pub keywords: ComponentScore,
    pub writing_quality: ComponentScore,
}

impl Components {
    pub fn get(&self, component: ScoreComponent) -> &ComponentScore {
        match component {
            ScoreComponent::Coverage => &self.coverage,
            ScoreComponent::Explicitness => &self.explicitness,
            ScoreComponent::RoleAlignment => &self.role_alignment,
            ScoreComponent::Keywords => &self.keywords,
            ScoreComponent::WritingQuality => &self.writing_quality,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreComponent, &ComponentScore)> {
        ScoreComponent::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Sum of weighted sub-scores, in [0, 1] for valid weights
    pub fn weighted_sum(&self) -> f64 {
        self.iter().map(|(_, c)| c.score * c.weight).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub total: u8,
    pub components: Components,
    /// One entry per requirement, in requirement order
    pub matches: Vec<MatchResult>,
    /// Ranked by estimated impact
    pub suggestions: Vec<Suggestion>,
    /// Must-have skills to add to the Skills section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_insertion: Option<SkillInsertion>,
    /// Present only when the resume has a summary to rewrite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_update: Option<SummaryUpdate>,
    /// Matching fell back to explicit mentions only
    pub degraded: bool,
    pub job_title: String,
    pub resume_title: String,
}

/// `round(100 x sum)`, clamped to [0, 100]
pub fn final_score(weighted_sum: f64) -> u8 {
    let scaled = (100.0 * weighted_sum + ROUNDING_EPSILON).round();
    scaled.clamp(0.0, 100.0) as u8
}

/// Attach weights to each component result
pub fn combine(
    weights: &ScoringWeights,
    mut score_of: impl FnMut(ScoreComponent) -> ComponentResult,
) -> Components {
    let mut build = |c: ScoreComponent| ComponentScore::new(score_of(c), weights.get(c));
    Components {
        coverage: build(ScoreComponent::Coverage),
        explicitness: build(ScoreComponent::Explicitness),
        role_alignment: build(ScoreComponent::RoleAlignment),
        keywords: build(ScoreComponent::Keywords),
        writing_quality: build(ScoreComponent::WritingQuality),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(scores: [f64; 5]) -> impl FnMut(ScoreComponent) -> ComponentResult {
        move |c| ComponentResult {
            score: scores[ScoreComponent::ALL.iter().position(|x| *x == c).unwrap()],
            detail: ScoreDetail::default(),
        }
    }

    #[test]
    fn test_worked_example_rounds_to_66() {
        let components = combine(&ScoringWeights::default(), fixed([0.80, 0.60, 0.50, 0.50, 0.75]));
        assert_eq!(final_score(components.weighted_sum()), 66);
        assert!((components.coverage.contribution - 28.0).abs() < 1e-9);
        assert!((components.writing_quality.contribution - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_and_zero_scores() {
        let weights = ScoringWeights::default();
        assert_eq!(final_score(combine(&weights, fixed([1.0; 5])).weighted_sum()), 100);
        assert_eq!(final_score(combine(&weights, fixed([0.0; 5])).weighted_sum()), 0);
    }

    #[test]
    fn test_final_score_is_clamped() {
        assert_eq!(final_score(1.7), 100);
        assert_eq!(final_score(-0.2), 0);
    }

    #[test]
    fn test_components_serialize_with_snake_case_keys() {
        let components = combine(&ScoringWeights::default(), fixed([1.0; 5]));
        let json = serde_json::to_value(&components).unwrap();

        for component in ScoreComponent::ALL {
            let entry = &json[component.key()];
            assert!(entry["score"].is_number());
            assert!(entry["weight"].is_number());
            assert!(entry["contribution"].is_number());
        }
    }
}
