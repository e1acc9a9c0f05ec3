//! The five component scorers. Each is a pure function of the shared context.

use crate::processing::job::JobProfile;
use crate::processing::matcher::{MatchResult, MatchStatus};
use crate::processing::resume::{ResumeProfile, MAX_BULLET_WORDS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

const LENGTH_SHARE: f64 = 0.33;
const ACTION_VERB_SHARE: f64 = 0.33;
const METRIC_SHARE: f64 = 0.34;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreComponent {
    Coverage,
    Explicitness,
    RoleAlignment,
    Keywords,
    WritingQuality,
}

/// Read-only inputs shared by every scorer
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub job: &'a JobProfile,
    pub resume: &'a ResumeProfile,
    pub matches: &'a [MatchResult],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetail {
    pub summary: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub matched: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub unmatched: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentResult {
    /// Always within [0, 1]
    pub score: f64,
    pub detail: ScoreDetail,
}

impl ScoreComponent {
    pub const ALL: [ScoreComponent; 5] = [
        ScoreComponent::Coverage,
        ScoreComponent::Explicitness,
        ScoreComponent::RoleAlignment,
        ScoreComponent::Keywords,
        ScoreComponent::WritingQuality,
    ];

    /// Config and JSON key
    pub fn key(self) -> &'static str {
        match self {
            ScoreComponent::Coverage => "coverage",
            ScoreComponent::Explicitness => "explicitness",
            ScoreComponent::RoleAlignment => "role_alignment",
            ScoreComponent::Keywords => "keywords",
            ScoreComponent::WritingQuality => "writing_quality",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreComponent::Coverage => "Skill Coverage",
            ScoreComponent::Explicitness => "Explicit Mentions",
            ScoreComponent::RoleAlignment => "Role Alignment",
            ScoreComponent::Keywords => "Keywords",
            ScoreComponent::WritingQuality => "Writing Quality",
        }
    }

    pub fn score(self, ctx: &ScoringContext<'_>) -> ComponentResult {
        let result = match self {
            ScoreComponent::Coverage => coverage(ctx),
            ScoreComponent::Explicitness => explicitness(ctx),
            ScoreComponent::RoleAlignment => role_alignment(ctx),
            ScoreComponent::Keywords => keywords(ctx),
            ScoreComponent::WritingQuality => writing_quality(ctx),
        };
        ComponentResult {
            score: result.score.clamp(0.0, 1.0),
            ..result
        }
    }
}

impl fmt::Display for ScoreComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn ratio(hits: usize, total: usize) -> f64 {
    hits as f64 / total as f64
}

fn must_haves<'a>(ctx: &ScoringContext<'a>) -> Vec<&'a MatchResult> {
    ctx.matches.iter().filter(|m| m.must_have).collect()
}

/// (Present + Weak) / must-have count
pub fn coverage(ctx: &ScoringContext<'_>) -> ComponentResult {
    let required = must_haves(ctx);
    if required.is_empty() {
        return ComponentResult {
            score: 1.0,
            detail: ScoreDetail {
                summary: "No must-have skills in the job description".to_string(),
                ..Default::default()
            },
        };
    }

    let total = required.len();
    let (covered, missing): (Vec<&MatchResult>, Vec<&MatchResult>) =
        required.into_iter().partition(|m| m.status.is_covered());
    let weak = covered.iter().filter(|m| m.status == MatchStatus::Weak).count();

    ComponentResult {
        score: ratio(covered.len(), total),
        detail: ScoreDetail {
            summary: format!(
                "{} of {} must-have skills supported ({} weakly)",
                covered.len(),
                total,
                weak
            ),
            matched: covered.iter().map(|m| m.skill.clone()).collect(),
            unmatched: missing.iter().map(|m| m.skill.clone()).collect(),
        },
    }
}

/// Must-have skills named verbatim / must-have count
pub fn explicitness(ctx: &ScoringContext<'_>) -> ComponentResult {
    let required = must_haves(ctx);
    if required.is_empty() {
        return ComponentResult {
            score: 1.0,
            detail: ScoreDetail {
                summary: "No must-have skills in the job description".to_string(),
                ..Default::default()
            },
        };
    }

    let total = required.len();
    let (named, unnamed): (Vec<&MatchResult>, Vec<&MatchResult>) =
        required.into_iter().partition(|m| m.explicit);

    ComponentResult {
        score: ratio(named.len(), total),
        detail: ScoreDetail {
            summary: format!(
                "{} of {} must-have skills named explicitly",
                named.len(),
                total
            ),
            matched: named.iter().map(|m| m.skill.clone()).collect(),
            unmatched: unnamed.iter().map(|m| m.skill.clone()).collect(),
        },
    }
}

/// Share of the job title's role keywords found in the resume title
pub fn role_alignment(ctx: &ScoringContext<'_>) -> ComponentResult {
    let wanted = ctx.job.role_keywords();
    if wanted.is_empty() {
        return ComponentResult {
            score: 1.0,
            detail: ScoreDetail {
                summary: "No role keywords in the job title".to_string(),
                ..Default::default()
            },
        };
    }

    let have: HashSet<String> = ctx.resume.role_keywords().into_iter().collect();
    let (shared, absent): (Vec<String>, Vec<String>) =
        wanted.iter().cloned().partition(|k| have.contains(k));

    ComponentResult {
        score: ratio(shared.len(), wanted.len()),
        detail: ScoreDetail {
            summary: format!(
                "\"{}\" vs \"{}\": {} of {} role keywords shared",
                ctx.resume.title,
                ctx.job.title,
                shared.len(),
                wanted.len()
            ),
            matched: shared,
            unmatched: absent,
        },
    }
}

/// Share of the job's technical keywords that appear anywhere in the resume
pub fn keywords(ctx: &ScoringContext<'_>) -> ComponentResult {
    let terms = &ctx.job.keywords;
    if terms.is_empty() {
        return ComponentResult {
            score: 1.0,
            detail: ScoreDetail {
                summary: "No additional keywords in the job description".to_string(),
                ..Default::default()
            },
        };
    }

    let (found, absent): (Vec<_>, Vec<_>) = terms
        .iter()
        .partition(|k| k.found_in(&ctx.resume.full_text));

    ComponentResult {
        score: ratio(found.len(), terms.len()),
        detail: ScoreDetail {
            summary: format!("{} of {} keywords found", found.len(), terms.len()),
            matched: found.iter().map(|k| k.term.clone()).collect(),
            unmatched: absent.iter().map(|k| k.term.clone()).collect(),
        },
    }
}

/// Mean bullet quality: length, action-verb start and a metric
pub fn writing_quality(ctx: &ScoringContext<'_>) -> ComponentResult {
    let bullets = &ctx.resume.bullets;
    if bullets.is_empty() {
        return ComponentResult {
            score: 0.0,
            detail: ScoreDetail {
                summary: "No bullets found to assess".to_string(),
                ..Default::default()
            },
        };
    }

    let mut total = 0.0;
    let mut issues = Vec::new();
    for bullet in bullets {
        let mut quality = 0.0;
        let mut problems = Vec::new();

        if bullet.is_concise() {
            quality += LENGTH_SHARE;
        } else {
            problems.push(format!("over {} words", MAX_BULLET_WORDS));
        }
        if bullet.has_action_verb_start {
            quality += ACTION_VERB_SHARE;
        } else {
            problems.push("no action verb".to_string());
        }
        if bullet.has_numeric_metric {
            quality += METRIC_SHARE;
        } else {
            problems.push("no metric".to_string());
        }

        total += quality;
        if !problems.is_empty() {
            issues.push(format!("Bullet {}: {}", bullet.index + 1, problems.join(", ")));
        }
    }

    let strong = bullets.iter().filter(|b| b.is_well_formed()).count();
    ComponentResult {
        score: total / bullets.len() as f64,
        detail: ScoreDetail {
            summary: format!("{} of {} bullets fully well-formed", strong, bullets.len()),
            matched: Vec::new(),
            unmatched: issues,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::job::{JobProfile, Keyword, RequirementSet};
    use crate::processing::resume::Bullet;
    use crate::processing::sections::SectionType;
    use crate::taxonomy::ActionVerbs;

    fn job(title: &str, keywords: &[&str]) -> JobProfile {
        JobProfile {
            title: title.to_string(),
            requirements: RequirementSet::new(),
            keywords: keywords
                .iter()
                .map(|k| Keyword {
                    term: k.to_string(),
                    aliases: Vec::new(),
                })
                .collect(),
            years_required: None,
            full_text: String::new(),
        }
    }

    fn resume(title: &str, bullets: &[&str], full_text: &str) -> ResumeProfile {
        let verbs = ActionVerbs::builtin();
        ResumeProfile {
            title: title.to_string(),
            bullets: bullets
                .iter()
                .enumerate()
                .map(|(i, b)| Bullet::new(i, b, SectionType::Experience, verbs))
                .collect(),
            skills_text: String::new(),
            summary_text: String::new(),
            explicit_skills: Vec::new(),
            full_text: full_text.to_string(),
        }
    }

    fn result(skill: &str, status: MatchStatus, explicit: bool, must_have: bool) -> MatchResult {
        MatchResult {
            skill: skill.to_string(),
            status,
            similarity: 0.0,
            evidence_bullet_index: None,
            evidence_in_skills: false,
            explicit,
            must_have,
        }
    }

    #[test]
    fn test_coverage_and_explicitness() {
        let job = job("", &[]);
        let resume = resume("", &[], "");
        let matches = vec![
            result("Python", MatchStatus::Present, true, true),
            result("AWS", MatchStatus::Weak, false, true),
            result("A/B Testing", MatchStatus::Missing, false, true),
            result("Spark", MatchStatus::Missing, false, false),
        ];
        let ctx = ScoringContext {
            job: &job,
            resume: &resume,
            matches: &matches,
        };

        let cov = coverage(&ctx);
        assert!((cov.score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(cov.detail.unmatched, vec!["A/B Testing"]);

        let exp = explicitness(&ctx);
        assert!((exp.score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_denominators() {
        let job = job("", &[]);
        let resume = resume("", &[], "");
        let ctx = ScoringContext {
            job: &job,
            resume: &resume,
            matches: &[],
        };

        assert_eq!(ScoreComponent::Coverage.score(&ctx).score, 1.0);
        assert_eq!(ScoreComponent::Explicitness.score(&ctx).score, 1.0);
        assert_eq!(ScoreComponent::RoleAlignment.score(&ctx).score, 1.0);
        assert_eq!(ScoreComponent::Keywords.score(&ctx).score, 1.0);
        assert_eq!(ScoreComponent::WritingQuality.score(&ctx).score, 0.0);
    }

    #[test]
    fn test_role_alignment() {
        let job = job("Senior Data Scientist", &[]);
        let resume = resume("Data Analyst", &[], "");
        let ctx = ScoringContext {
            job: &job,
            resume: &resume,
            matches: &[],
        };

        let role = role_alignment(&ctx);
        assert!((role.score - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(role.detail.matched, vec!["data"]);
    }

    #[test]
    fn test_keywords_are_boundary_matched() {
        let job = job("", &["Jupyter", "Hive", "Ray"]);
        let resume = resume("", &[], "Notebooks in jupyter; array of hive tables");
        let ctx = ScoringContext {
            job: &job,
            resume: &resume,
            matches: &[],
        };

        let kw = keywords(&ctx);
        assert!((kw.score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(kw.detail.unmatched, vec!["Ray"]);
    }

    #[test]
    fn test_writing_quality_mean() {
        let job = job("", &[]);
        let resume = resume(
            "",
            &[
                "Built a pricing model that lifted margin by 4%",
                "Helped with reporting",
            ],
            "",
        );
        let ctx = ScoringContext {
            job: &job,
            resume: &resume,
            matches: &[],
        };

        let wq = writing_quality(&ctx);
        // (1.0 + 0.33) / 2
        assert!((wq.score - 0.665).abs() < 1e-9);
        assert_eq!(wq.detail.unmatched, vec!["Bullet 2: no action verb, no metric"]);
    }

    #[test]
    fn test_keys_and_labels() {
        let keys: Vec<&str> = ScoreComponent::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(
            keys,
            vec!["coverage", "explicitness", "role_alignment", "keywords", "writing_quality"]
        );
        assert_eq!(ScoreComponent::Keywords.to_string(), "Keywords");
    }
}
