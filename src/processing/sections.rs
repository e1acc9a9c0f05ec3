//! Resume section detection

use serde::{Deserialize, Serialize};

/// Headers longer than this are treated as content
const MAX_HEADER_WORDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    /// Lines before the first recognised header (name, contact details)
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Publications,
    Awards,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub section_type: SectionType,
    pub lines: Vec<String>,
}

const SECTION_PATTERNS: &[(SectionType, &[&str])] = &[
    (
        SectionType::Summary,
        &["professional summary", "summary", "profile", "objective", "about"],
    ),
    (
        SectionType::Experience,
        &[
            "work experience",
            "professional experience",
            "experience",
            "employment",
            "career history",
            "work history",
        ],
    ),
    (SectionType::Education, &["education", "academic background"]),
    (
        SectionType::Skills,
        &["technical skills", "skills", "core competencies", "competencies", "expertise", "technologies"],
    ),
    (SectionType::Projects, &["projects", "selected projects"]),
    (SectionType::Certifications, &["certifications", "certificates", "licenses"]),
    (SectionType::Publications, &["publications"]),
    (SectionType::Awards, &["awards", "honors", "honours", "achievements"]),
];

impl Section {
    pub fn new(section_type: SectionType) -> Self {
        Self {
            section_type,
            lines: Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Recognise a header line. Returns the section type and any content that
/// follows an inline colon, as in `Skills: Python, SQL`.
pub fn identify_section(line: &str) -> Option<(SectionType, Option<&str>)> {
    let trimmed = line.trim().trim_start_matches('#').trim();
    let (head, rest) = match trimmed.split_once(':') {
        Some((head, rest)) => (head, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (trimmed, None),
    };

    let head = head.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace());
    if head.is_empty() || head.split_whitespace().count() > MAX_HEADER_WORDS {
        return None;
    }

    let lower = head.to_lowercase();
    SECTION_PATTERNS
        .iter()
        .find(|(_, patterns)| {
            patterns.iter().any(|p| {
                lower
                    .strip_prefix(p)
                    .is_some_and(|tail| tail.is_empty() || tail.starts_with([' ', '&', '/', ',']))
            })
        })
        .map(|(section_type, _)| (*section_type, rest))
}

/// Split text into sections. Blank lines are dropped; the leading Header
/// section is always present, even when empty.
pub fn sectionize(text: &str) -> Vec<Section> {
    let mut sections = vec![Section::new(SectionType::Header)];

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some((section_type, inline)) = identify_section(trimmed) {
            let mut section = Section::new(section_type);
            if let Some(content) = inline {
                section.lines.push(content.to_string());
            }
            sections.push(section);
            continue;
        }

        if let Some(current) = sections.last_mut() {
            current.lines.push(trimmed.to_string());
        }
    }

    sections
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionType::Header => write!(f, "Header"),
            SectionType::Summary => write!(f, "Summary"),
            SectionType::Experience => write!(f, "Experience"),
            SectionType::Education => write!(f, "Education"),
            SectionType::Skills => write!(f, "Skills"),
            SectionType::Projects => write!(f, "Projects"),
            SectionType::Certifications => write!(f, "Certifications"),
            SectionType::Publications => write!(f, "Publications"),
            SectionType::Awards => write!(f, "Awards"),
        }
    }
}
