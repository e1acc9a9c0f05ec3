//! Gap ranking by estimated score impact

use crate::config::ScoringWeights;
use crate::processing::job::JobProfile;
use crate::processing::matcher::{MatchResult, MatchStatus};
use crate::processing::resume::ResumeProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub skill: String,
    pub status: MatchStatus,
    /// Points gained on the 0-100 scale if the skill became Present and explicit
    pub estimated_delta: f64,
    pub evidence_bullet_index: Option<usize>,
    /// Text of the nearby bullet, for the rewrite prompt
    pub evidence_text: Option<String>,
    pub must_have: bool,
    /// Job description line that asked for the skill
    pub requirement: String,
}

/// Estimate the score gain of fixing one gap without re-running the pipeline
pub fn estimated_delta(
    result: &MatchResult,
    job: &JobProfile,
    resume: &ResumeProfile,
    weights: &ScoringWeights,
) -> f64 {
    let mut delta = 0.0;

    let must_have_count = job.requirements.must_have_count();
    if result.must_have && must_have_count > 0 {
        let share = must_have_count as f64;
        if result.status == MatchStatus::Missing {
            delta += weights.coverage / share;
        }
        if !result.explicit {
            delta += weights.explicitness / share;
        }
    }

    let keyword = job
        .keywords
        .iter()
        .find(|k| k.term.eq_ignore_ascii_case(&result.skill));
    if let Some(keyword) = keyword {
        if !keyword.found_in(&resume.full_text) {
            delta += weights.keywords / job.keywords.len() as f64;
        }
    }

    delta * 100.0
}

/// One suggestion per Missing or Weak match, highest impact first.
/// The sort is stable, so equal deltas keep requirement order.
pub fn rank_suggestions(
    matches: &[MatchResult],
    job: &JobProfile,
    resume: &ResumeProfile,
    weights: &ScoringWeights,
) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = matches
        .iter()
        .filter(|m| m.status != MatchStatus::Present)
        .map(|m| Suggestion {
            skill: m.skill.clone(),
            status: m.status,
            estimated_delta: estimated_delta(m, job, resume, weights),
            evidence_bullet_index: m.evidence_bullet_index,
            evidence_text: m
                .evidence_bullet_index
                .and_then(|i| resume.bullet(i))
                .map(|b| b.text.clone()),
            must_have: m.must_have,
            requirement: job
                .requirements
                .get(&m.skill)
                .map(|r| r.source_line.clone())
                .unwrap_or_else(|| m.skill.clone()),
        })
        .collect();

    suggestions.sort_by(|a, b| b.estimated_delta.total_cmp(&a.estimated_delta));
    suggestions
}

/// At most this many skills are proposed for the Skills section
pub const MAX_SKILL_INSERTIONS: usize = 10;

/// Must-have skills a summary rewrite should highlight
pub const SUMMARY_KEY_SKILLS: usize = 5;

/// Must-have skills the resume never names, appended to its Skills text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInsertion {
    pub skills: Vec<String>,
    pub current: String,
    pub updated: String,
}

pub fn skill_insertion(matches: &[MatchResult], resume: &ResumeProfile) -> Option<SkillInsertion> {
    let skills: Vec<String> = matches
        .iter()
        .filter(|m| m.must_have && !m.explicit)
        .take(MAX_SKILL_INSERTIONS)
        .map(|m| m.skill.clone())
        .collect();
    if skills.is_empty() {
        return None;
    }

    let current = resume.skills_text.trim().to_string();
    let mut updated = current.clone();
    if !updated.is_empty() {
        if !updated.ends_with(',') {
            updated.push(',');
        }
        updated.push(' ');
    }
    updated.push_str(&skills.join(", "));

    Some(SkillInsertion {
        skills,
        current,
        updated,
    })
}

/// What a summary rewrite for the target role should cover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryUpdate {
    pub current: String,
    pub job_title: String,
    pub key_skills: Vec<String>,
    pub years_required: Option<u32>,
}

/// None when the resume has no summary to rewrite
pub fn summary_update(job: &JobProfile, resume: &ResumeProfile) -> Option<SummaryUpdate> {
    let current = resume.summary_text.trim();
    if current.is_empty() {
        return None;
    }

    Some(SummaryUpdate {
        current: current.to_string(),
        job_title: job.title.clone(),
        key_skills: job
            .requirements
            .must_haves()
            .take(SUMMARY_KEY_SKILLS)
            .map(|r| r.skill.canonical.clone())
            .collect(),
        years_required: job.years_required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::matcher::EvidenceMatcher;
    use crate::processing::similarity::SimilarityBackend;
    use crate::config::{FailurePolicy, ScoringConfig};
    use crate::error::Result;
    use crate::taxonomy::{ActionVerbs, SkillTaxonomy};

    struct ByQuery(&'static [(&'static str, f32)]);

    impl SimilarityBackend for ByQuery {
        fn name(&self) -> &str {
            "by-query"
        }

        fn similarity(&self, query: &str, _candidate: &str) -> Result<f32> {
            Ok(self
                .0
                .iter()
                .find(|(q, _)| q.eq_ignore_ascii_case(query))
                .map_or(0.0, |(_, s)| *s))
        }
    }

    const JOB: &str = "Requirements:\n- Python\n- AWS\n- Kubernetes\n- Docker\n- Tickets tracked in Jira\nNice to have:\n- Spark";
    const RESUME: &str = "Experience\n- Built ETL jobs in Python for 3 teams\n- Deployed services to the cloud\nSkills\nPython";

    fn profiles(job: &str, resume: &str) -> (JobProfile, ResumeProfile, Vec<MatchResult>) {
        let taxonomy = SkillTaxonomy::builtin();
        let job = JobProfile::extract(job, taxonomy);
        let resume = ResumeProfile::extract(resume, taxonomy, ActionVerbs::builtin());
        let backend = ByQuery(&[("python", 0.9), ("aws", 0.6)]);

        let outcome = EvidenceMatcher::new(&backend, taxonomy, &ScoringConfig::default(), FailurePolicy::Fail)
            .match_requirements(&job.requirements, &resume)
            .unwrap();
        (job, resume, outcome.matches)
    }

    fn ranked() -> Vec<Suggestion> {
        let (job, resume, matches) = profiles(JOB, RESUME);
        rank_suggestions(&matches, &job, &resume, &ScoringConfig::default().weights)
    }

    #[test]
    fn test_only_gaps_are_suggested() {
        let skills: Vec<String> = ranked().into_iter().map(|s| s.skill).collect();
        assert!(!skills.contains(&"Python".to_string()));
        assert_eq!(skills.len(), 4);
    }

    #[test]
    fn test_ordering_by_delta_then_requirement_order() {
        let ranked = ranked();
        let skills: Vec<&str> = ranked.iter().map(|s| s.skill.as_str()).collect();

        // Missing must-haves keep JD order on a tie
        assert_eq!(skills, vec!["Kubernetes", "Docker", "Spark", "AWS"]);

        // 100 x (0.35/4 + 0.25/4)
        assert!((ranked[0].estimated_delta - 15.0).abs() < 1e-9);
        assert_eq!(ranked[0].estimated_delta, ranked[1].estimated_delta);
        // Optional: one of two keywords (Jira, Spark)
        assert!((ranked[2].estimated_delta - 7.5).abs() < 1e-9);
        assert!(!ranked[2].must_have);
        // Weak: only the explicitness share
        assert!((ranked[3].estimated_delta - 6.25).abs() < 1e-9);
    }

    #[test]
    fn test_evidence_text_and_requirement_line() {
        let ranked = ranked();
        let aws = ranked.iter().find(|s| s.skill == "AWS").unwrap();
        assert_eq!(aws.status, MatchStatus::Weak);
        assert_eq!(aws.evidence_text.as_deref(), Some("Built ETL jobs in Python for 3 teams"));
        assert_eq!(aws.requirement, "AWS");
    }

    #[test]
    fn test_skill_insertion_appends_unnamed_must_haves() {
        let (_, resume, matches) = profiles(JOB, RESUME);
        let insertion = skill_insertion(&matches, &resume).unwrap();

        // Spark is optional, Python is already named
        assert_eq!(insertion.skills, vec!["AWS", "Kubernetes", "Docker"]);
        assert_eq!(insertion.current, "Python");
        assert_eq!(insertion.updated, "Python, AWS, Kubernetes, Docker");
    }

    #[test]
    fn test_skill_insertion_without_skills_section() {
        let (_, resume, matches) = profiles(JOB, "Experience\n- Built ETL jobs in Python for 3 teams");
        let insertion = skill_insertion(&matches, &resume).unwrap();
        assert_eq!(insertion.updated, "AWS, Kubernetes, Docker");

        let (_, resume, matches) = profiles("Requirements:\n- Python", RESUME);
        assert!(skill_insertion(&matches, &resume).is_none());
    }

    #[test]
    fn test_summary_update_targets_role() {
        let job = "Job Title: Platform Engineer\nRequirements:\n- 5+ years with Python\n- AWS\n- Kubernetes\n- Docker\n- SQL\n- Spark";
        let resume = "Summary\nBackend engineer who ships reliable services.\nExperience\n- Built ETL jobs in Python for 3 teams";
        let (job, resume, _) = profiles(job, resume);

        let update = summary_update(&job, &resume).unwrap();
        assert_eq!(update.current, "Backend engineer who ships reliable services.");
        assert_eq!(update.job_title, "Platform Engineer");
        assert_eq!(update.key_skills, vec!["Python", "AWS", "Kubernetes", "Docker", "SQL"]);
        assert_eq!(update.years_required, Some(5));

        let (job, resume, _) = profiles(JOB, RESUME);
        assert!(summary_update(&job, &resume).is_none());
    }
}
