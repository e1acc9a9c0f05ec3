//! Resume evidence extraction: bullets, title, skills text and explicit skills

use crate::processing::sections::{sectionize, Section, SectionType};
use crate::processing::text_processor::{
    first_token, has_numeric_metric, normalize_text, strip_bullet_marker, word_count,
};
use crate::taxonomy::vocabulary::{is_title_like, role_keywords};
use crate::taxonomy::{ActionVerbs, SkillTaxonomy};
use log::debug;
use serde::{Deserialize, Serialize};

/// Bullets longer than this fail the length check
pub const MAX_BULLET_WORDS: usize = 28;

/// Unmarked lines need at least this many words to stand in for bullets
const MIN_SENTENCE_WORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bullet {
    /// Position in `ResumeProfile::bullets`
    pub index: usize,
    pub text: String,
    pub section: SectionType,
    pub word_count: usize,
    pub has_action_verb_start: bool,
    pub has_numeric_metric: bool,
}

impl Bullet {
    pub fn new(index: usize, text: &str, section: SectionType, verbs: &ActionVerbs) -> Self {
        let text = text.trim().to_string();
        let has_action_verb_start = first_token(&text).is_some_and(|t| verbs.contains(&t));

        Self {
            index,
            word_count: word_count(&text),
            has_numeric_metric: has_numeric_metric(&text),
            has_action_verb_start,
            text,
            section,
        }
    }

    pub fn is_concise(&self) -> bool {
        self.word_count <= MAX_BULLET_WORDS
    }

    /// Length, action verb and metric checks all pass
    pub fn is_well_formed(&self) -> bool {
        self.is_concise() && self.has_action_verb_start && self.has_numeric_metric
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeProfile {
    /// Most recent job title, empty when none is found
    pub title: String,
    pub bullets: Vec<Bullet>,
    /// Flat text of every Skills section
    pub skills_text: String,
    /// Flat text of every Summary section
    #[serde(default)]
    pub summary_text: String,
    /// Canonical names of skills named verbatim anywhere in the resume
    pub explicit_skills: Vec<String>,
    pub full_text: String,
}

impl ResumeProfile {
    pub fn extract(text: &str, taxonomy: &SkillTaxonomy, verbs: &ActionVerbs) -> Self {
        let full_text = normalize_text(text);
        let sections = sectionize(&full_text);

        let bullets = extract_bullets(&sections, verbs);
        let title = extract_title(&sections);

        let skills_text = section_text(&sections, SectionType::Skills);
        let summary_text = section_text(&sections, SectionType::Summary);

        let explicit_skills = taxonomy
            .find_skills(&full_text)
            .into_iter()
            .map(|s| s.canonical.clone())
            .collect::<Vec<_>>();

        debug!(
            "Resume: {} sections, {} bullets, {} explicit skills, title {:?}",
            sections.len(),
            bullets.len(),
            explicit_skills.len(),
            title
        );

        Self {
            title,
            bullets,
            skills_text,
            summary_text,
            explicit_skills,
            full_text,
        }
    }

    pub fn is_explicit(&self, canonical: &str) -> bool {
        self.explicit_skills
            .iter()
            .any(|s| s.eq_ignore_ascii_case(canonical))
    }

    pub fn role_keywords(&self) -> Vec<String> {
        role_keywords(&self.title)
    }

    pub fn bullet(&self, index: usize) -> Option<&Bullet> {
        self.bullets.get(index)
    }
}

fn section_text(sections: &[Section], section_type: SectionType) -> String {
    sections
        .iter()
        .filter(|s| s.section_type == section_type)
        .map(|s| s.text())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sections whose lines can hold evidence bullets. A resume without any
/// recognised header is read as one body section.
fn body_sections(sections: &[Section]) -> impl Iterator<Item = &Section> {
    let headerless = sections.len() == 1;
    sections.iter().filter(move |s| match s.section_type {
        SectionType::Skills => false,
        SectionType::Header => headerless,
        _ => true,
    })
}

fn extract_bullets(sections: &[Section], verbs: &ActionVerbs) -> Vec<Bullet> {
    let mut bodies: Vec<(&str, SectionType)> = Vec::new();

    for section in body_sections(sections) {
        for line in &section.lines {
            if let Some(body) = strip_bullet_marker(line) {
                bodies.push((body, section.section_type));
            }
        }
    }

    if bodies.is_empty() {
        let headerless = sections.len() == 1;
        for section in body_sections(sections) {
            let prose = matches!(
                section.section_type,
                SectionType::Experience | SectionType::Projects | SectionType::Summary
            ) || headerless;
            if !prose {
                continue;
            }
            for line in &section.lines {
                if word_count(line) >= MIN_SENTENCE_WORDS && !is_title_like(line) {
                    bodies.push((line.as_str(), section.section_type));
                }
            }
        }
        if !bodies.is_empty() {
            debug!("No marked bullets; using {} sentence lines", bodies.len());
        }
    }

    bodies
        .into_iter()
        .enumerate()
        .map(|(index, (text, section))| Bullet::new(index, text, section, verbs))
        .collect()
}

fn extract_title(sections: &[Section]) -> String {
    let rank = |section: &Section| match section.section_type {
        SectionType::Experience => 0,
        SectionType::Header => 1,
        _ => 2,
    };
    let mut ordered: Vec<&Section> = sections.iter().collect();
    ordered.sort_by_key(|s| rank(s));

    ordered
        .into_iter()
        .flat_map(|s| s.lines.iter())
        .find(|line| strip_bullet_marker(line).is_none() && is_title_like(line))
        .map(|line| clean_title(line))
        .unwrap_or_default()
}

/// Drop trailing company/date segments from `Title | Company | 2020 - Present`
fn clean_title(line: &str) -> String {
    line.split(['|', '•', '\t'])
        .map(str::trim)
        .find(|part| is_title_like(part))
        .unwrap_or(line.trim())
        .trim_end_matches([',', ':'])
        .to_string()
}
