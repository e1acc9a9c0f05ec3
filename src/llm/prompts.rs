//! Bullet rewrite prompts for an external text generator

use crate::scoring::aggregator::ScoreBreakdown;
use crate::scoring::suggestions::{Suggestion, SummaryUpdate};
use crate::taxonomy::ActionVerbs;
use serde::Serialize;

/// Number of action verbs offered in each prompt
const VERB_HINTS: usize = 5;

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub rewrite_bullet: String,
    pub new_bullet: String,
    pub summary: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            rewrite_bullet: REWRITE_BULLET_TEMPLATE.to_string(),
            new_bullet: NEW_BULLET_TEMPLATE.to_string(),
            summary: SUMMARY_TEMPLATE.to_string(),
        }
    }
}

/// A rendered prompt for one ranked suggestion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewritePrompt {
    pub skill: String,
    pub estimated_delta: f64,
    pub prompt: String,
}

impl PromptTemplates {
    /// Rewrite the nearby bullet when there is one, otherwise ask for a new bullet
    pub fn render(&self, suggestion: &Suggestion, verbs: &ActionVerbs) -> String {
        let hints = verbs
            .suggest_for(&suggestion.requirement)
            .iter()
            .take(VERB_HINTS)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");

        let template = match suggestion.evidence_text {
            Some(_) => &self.rewrite_bullet,
            None => &self.new_bullet,
        };

        template
            .replace("{requirement}", &suggestion.requirement)
            .replace("{skill}", &suggestion.skill)
            .replace("{bullet}", suggestion.evidence_text.as_deref().unwrap_or(""))
            .replace("{verbs}", &hints)
    }

    /// Summary rewrite aimed at the target role
    pub fn render_summary(&self, update: &SummaryUpdate) -> String {
        let role = if update.job_title.is_empty() {
            "the target"
        } else {
            update.job_title.as_str()
        };
        let years = update
            .years_required
            .map(|n| format!("\n- Mention {}+ years of experience if that is accurate", n))
            .unwrap_or_default();

        self.summary
            .replace("{role}", role)
            .replace("{summary}", &update.current)
            .replace("{skills}", &update.key_skills.join(", "))
            .replace("{years}", &years)
    }

    /// Prompts for the top `limit` suggestions, in ranked order
    pub fn render_all(
        &self,
        breakdown: &ScoreBreakdown,
        verbs: &ActionVerbs,
        limit: usize,
    ) -> Vec<RewritePrompt> {
        breakdown
            .suggestions
            .iter()
            .take(limit)
            .map(|s| RewritePrompt {
                skill: s.skill.clone(),
                estimated_delta: s.estimated_delta,
                prompt: self.render(s, verbs),
            })
            .collect()
    }
}

const REWRITE_BULLET_TEMPLATE: &str = r#"You are a resume optimization expert. Rewrite the following resume bullet to better match a job requirement.

Job requirement: "{requirement}"
Skill to make explicit: {skill}

Current bullet: "{bullet}"

Guidelines:
1. Keep it to ONE line (max 28 words)
2. Start with a strong action verb (suggestions: {verbs})
3. Name {skill} verbatim only if the candidate actually used it
4. Add quantified impact if possible (%, $, time saved, etc.)
5. DO NOT invent facts, only enhance what is already there

Rewritten bullet (one line only):"#;

const NEW_BULLET_TEMPLATE: &str = r#"You are a resume optimization expert. The resume has no evidence for a job requirement. Draft one new resume bullet the candidate can adapt if it is true for them.

Job requirement: "{requirement}"
Skill to demonstrate: {skill}

Guidelines:
1. Keep it to ONE line (max 28 words)
2. Start with a strong action verb (suggestions: {verbs})
3. Name {skill} verbatim
4. Leave placeholders like [X%] for metrics instead of inventing numbers
5. DO NOT invent employers, projects or results

New bullet (one line only):"#;

const SUMMARY_TEMPLATE: &str = r#"You are a resume optimization expert. Rewrite this professional summary to align with a {role} role.

Current summary: "{summary}"

Guidelines:
- Highlight these key skills where the candidate has them: {skills}{years}
- Keep it to 2-3 sentences
- Be specific and quantified where possible
- Stay truthful to the original content

Rewritten summary:"#;
