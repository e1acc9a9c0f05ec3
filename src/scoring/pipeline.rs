//! End-to-end scoring: extract, match, score, aggregate, rank

use crate::config::Config;
use crate::error::Result;
use crate::processing::job::JobProfile;
use crate::processing::matcher::EvidenceMatcher;
use crate::processing::resume::ResumeProfile;
use crate::processing::similarity::SimilarityBackend;
use crate::scoring::aggregator::{combine, final_score, ScoreBreakdown};
use crate::scoring::components::ScoringContext;
use crate::scoring::suggestions::{rank_suggestions, skill_insertion, summary_update};
use crate::taxonomy::{ActionVerbs, SkillTaxonomy};
use log::{debug, info};
use std::time::Instant;

/// Scores resumes against job descriptions with a fixed configuration.
///
/// A `Scorer` holds only shared references, so one instance can serve any
/// number of requests; each call builds its own profiles and matches.
pub struct Scorer<'a> {
    config: &'a Config,
    taxonomy: &'a SkillTaxonomy,
    verbs: &'a ActionVerbs,
    backend: &'a dyn SimilarityBackend,
}

impl<'a> Scorer<'a> {
    pub fn new(
        config: &'a Config,
        taxonomy: &'a SkillTaxonomy,
        backend: &'a dyn SimilarityBackend,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            taxonomy,
            verbs: ActionVerbs::builtin(),
            backend,
        })
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn score(&self, resume_text: &str, jd_text: &str) -> Result<ScoreBreakdown> {
        self.config.validate()?;
        let start_time = Instant::now();

        let job = JobProfile::extract(jd_text, self.taxonomy);
        let resume = ResumeProfile::extract(resume_text, self.taxonomy, self.verbs);
        debug!(
            "Extracted {} requirements ({} must-have), {} keywords, {} bullets",
            job.requirements.len(),
            job.requirements.must_have_count(),
            job.keywords.len(),
            resume.bullets.len()
        );

        let breakdown = self.score_profiles(&job, &resume)?;
        info!(
            "Scored resume against '{}' in {:.2?}: {}/100",
            if job.title.is_empty() { "untitled job" } else { &job.title },
            start_time.elapsed(),
            breakdown.total
        );
        Ok(breakdown)
    }

    /// Score already-extracted profiles
    pub fn score_profiles(
        &self,
        job: &JobProfile,
        resume: &ResumeProfile,
    ) -> Result<ScoreBreakdown> {
        let scoring = &self.config.scoring;

        let outcome = EvidenceMatcher::new(
            self.backend,
            self.taxonomy,
            scoring,
            self.config.similarity.on_failure,
        )
        .match_requirements(&job.requirements, resume)?;

        let ctx = ScoringContext {
            job,
            resume,
            matches: &outcome.matches,
        };
        let components = combine(&scoring.weights, |component| component.score(&ctx));
        let total = final_score(components.weighted_sum());
        let suggestions = rank_suggestions(&outcome.matches, job, resume, &scoring.weights);
        let skill_insertion = skill_insertion(&outcome.matches, resume);
        let summary_update = summary_update(job, resume);

        Ok(ScoreBreakdown {
            total,
            components,
            matches: outcome.matches,
            suggestions,
            skill_insertion,
            summary_update,
            degraded: outcome.degraded,
            job_title: job.title.clone(),
            resume_title: resume.title.clone(),
        })
    }
}

/// Score with the builtin taxonomy
pub fn score(
    resume_text: &str,
    jd_text: &str,
    config: &Config,
    backend: &dyn SimilarityBackend,
) -> Result<ScoreBreakdown> {
    Scorer::new(config, SkillTaxonomy::builtin(), backend)?.score(resume_text, jd_text)
}
