//! Job description extraction: title, requirement set and keyword set

use crate::processing::text_processor::{contains_phrase, normalize_text, strip_bullet_marker};
use crate::taxonomy::vocabulary::{find_tool_keywords, is_title_like, role_keywords};
use crate::taxonomy::{Skill, SkillTaxonomy};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Title labels and plain title lines are only looked for near the top
const TITLE_SCAN_LINES: usize = 10;

/// Longer lines are content, not section headers
const MAX_JD_HEADER_WORDS: usize = 6;

const MUST_HAVE_MARKERS: &[&str] = &[
    "requirements",
    "qualifications",
    "must have",
    "must-have",
    "required",
    "you have",
    "you bring",
];

const PREFERRED_MARKERS: &[&str] = &["preferred", "nice to have", "nice-to-have", "bonus", "plus"];

const RESPONSIBILITY_MARKERS: &[&str] = &[
    "responsibilities",
    "what you'll do",
    "what you will do",
    "about the role",
];

const TITLE_LABELS: &[&str] = &["job title", "title", "position", "role"];

static YEARS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b").expect("Invalid years regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JdSection {
    General,
    MustHave,
    Preferred,
    Responsibilities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub skill: Skill,
    pub is_must_have: bool,
    /// JD line where the skill first appears
    pub source_line: String,
}

/// Requirements in order of first appearance, one entry per canonical skill
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    requirements: Vec<Requirement>,
}

impl RequirementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a requirement, collapsing onto an existing entry with the same
    /// canonical name. The first position is kept and must-have flags are OR-ed.
    pub fn push(&mut self, requirement: Requirement) {
        let existing = self
            .requirements
            .iter_mut()
            .find(|r| r.skill.canonical.eq_ignore_ascii_case(&requirement.skill.canonical));

        match existing {
            Some(entry) => entry.is_must_have |= requirement.is_must_have,
            None => self.requirements.push(requirement),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter()
    }

    pub fn as_slice(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn must_haves(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().filter(|r| r.is_must_have)
    }

    pub fn must_have_count(&self) -> usize {
        self.must_haves().count()
    }

    pub fn optional(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().filter(|r| !r.is_must_have)
    }

    pub fn get(&self, canonical: &str) -> Option<&Requirement> {
        self.requirements
            .iter()
            .find(|r| r.skill.canonical.eq_ignore_ascii_case(canonical))
    }

    fn mark_all_must_have(&mut self) {
        for requirement in &mut self.requirements {
            requirement.is_must_have = true;
        }
    }
}

impl FromIterator<Requirement> for RequirementSet {
    fn from_iter<T: IntoIterator<Item = Requirement>>(iter: T) -> Self {
        let mut set = RequirementSet::new();
        for requirement in iter {
            set.push(requirement);
        }
        set
    }
}

/// A keyword the resume is checked for, with the alternate spellings that also count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub aliases: Vec<String>,
}

impl Keyword {
    pub fn found_in(&self, text: &str) -> bool {
        std::iter::once(&self.term)
            .chain(self.aliases.iter())
            .any(|name| contains_phrase(text, name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProfile {
    /// Empty when no title is found
    pub title: String,
    pub requirements: RequirementSet,
    /// Technical terms beyond the must-have skills
    pub keywords: Vec<Keyword>,
    /// Largest "N+ years" figure in the posting
    pub years_required: Option<u32>,
    pub full_text: String,
}

impl JobProfile {
    pub fn extract(text: &str, taxonomy: &SkillTaxonomy) -> Self {
        let full_text = normalize_text(text);
        let lines: Vec<&str> = full_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let title = extract_title(&lines);
        let requirements = extract_requirements(&lines, taxonomy);
        let keywords = extract_keywords(&full_text, &requirements, taxonomy);
        let years_required = YEARS_REGEX
            .captures_iter(&full_text)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
            .max();

        debug!(
            "Job: {} requirements ({} must-have), {} keywords, title {:?}",
            requirements.len(),
            requirements.must_have_count(),
            keywords.len(),
            title
        );

        Self {
            title,
            requirements,
            keywords,
            years_required,
            full_text,
        }
    }

    pub fn role_keywords(&self) -> Vec<String> {
        role_keywords(&self.title)
    }
}

/// Classify a line as a section header, if it looks like one
pub fn identify_jd_section(line: &str) -> Option<JdSection> {
    if strip_bullet_marker(line).is_some() {
        return None;
    }
    let header = line.trim().trim_start_matches('#').trim();
    if header.split_whitespace().count() > MAX_JD_HEADER_WORDS || header.ends_with('.') {
        return None;
    }

    let has_marker = |markers: &[&str]| markers.iter().any(|m| contains_phrase(header, m));

    if has_marker(MUST_HAVE_MARKERS) {
        Some(JdSection::MustHave)
    } else if has_marker(PREFERRED_MARKERS) {
        Some(JdSection::Preferred)
    } else if has_marker(RESPONSIBILITY_MARKERS) {
        Some(JdSection::Responsibilities)
    } else {
        None
    }
}

fn extract_title(lines: &[&str]) -> String {
    let head = &lines[..lines.len().min(TITLE_SCAN_LINES)];

    let labelled = head.iter().copied().find_map(|line| {
        let (label, value) = line.split_once(':')?;
        let label = label.trim().trim_start_matches('#').trim().to_lowercase();
        let value = value.trim();
        (TITLE_LABELS.contains(&label.as_str()) && !value.is_empty()).then_some(value)
    });

    labelled
        .or_else(|| {
            head.iter()
                .copied()
                .find(|line| strip_bullet_marker(line).is_none() && is_title_like(line))
        })
        .map(|title| title.trim_start_matches('#').trim().to_string())
        .unwrap_or_default()
}

fn extract_requirements(lines: &[&str], taxonomy: &SkillTaxonomy) -> RequirementSet {
    let mut requirements = RequirementSet::new();
    let mut current = JdSection::General;
    let mut saw_must_have_section = false;

    for &line in lines {
        if let Some(section) = identify_jd_section(line) {
            current = section;
            saw_must_have_section |= section == JdSection::MustHave;
        }

        let source_line = strip_bullet_marker(line).unwrap_or(line);
        for skill in taxonomy.find_skills(line) {
            requirements.push(Requirement {
                skill: skill.clone(),
                is_must_have: current == JdSection::MustHave,
                source_line: source_line.to_string(),
            });
        }
    }

    if !saw_must_have_section {
        requirements.mark_all_must_have();
    }

    requirements
}

/// Tool vocabulary hits plus optional skills, in first-occurrence order.
/// Terms naming any required skill are left to the skill-based scorers.
fn extract_keywords(
    text: &str,
    requirements: &RequirementSet,
    taxonomy: &SkillTaxonomy,
) -> Vec<Keyword> {
    let mut located: Vec<(usize, Keyword)> = Vec::new();

    for (term, offset) in find_tool_keywords(text) {
        if requirements.iter().any(|r| r.skill.is_named(term)) {
            continue;
        }
        located.push((
            offset,
            Keyword {
                term: term.to_string(),
                aliases: Vec::new(),
            },
        ));
    }

    for (skill, offset) in taxonomy.find_in(text) {
        let optional = requirements
            .optional()
            .any(|r| r.skill.canonical.eq_ignore_ascii_case(&skill.canonical));
        if optional {
            located.push((
                offset,
                Keyword {
                    term: skill.canonical.clone(),
                    aliases: skill.aliases.clone(),
                },
            ));
        }
    }

    located.sort_by_key(|(offset, _)| *offset);

    let mut seen = HashSet::new();
    located
        .into_iter()
        .map(|(_, keyword)| keyword)
        .filter(|k| seen.insert(k.term.to_lowercase()))
        .collect()
}
