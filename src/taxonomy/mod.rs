//! Static reference data: skills taxonomy, action verbs and keyword vocabularies
//!
//! Everything here is built once and never mutated afterwards, so it can be
//! shared across concurrent scoring requests without locking.

pub mod action_verbs;
pub mod skills;
pub mod vocabulary;

pub use action_verbs::ActionVerbs;
pub use skills::{Skill, SkillTaxonomy};

use crate::error::{AtsTailorError, Result};
use crate::processing::text_processor::on_word_boundary;
use aho_corasick::AhoCorasick;

/// Case-insensitive multi-phrase matcher that only accepts hits on word boundaries
pub struct PhraseMatcher {
    automaton: AhoCorasick,
    pattern_count: usize,
}

/// One phrase occurrence: pattern id and byte offset of its start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseHit {
    pub pattern: usize,
    pub start: usize,
}

impl PhraseMatcher {
    pub fn new<I, P>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .collect();

        if let Some(idx) = patterns.iter().position(|p| p.is_empty()) {
            return Err(AtsTailorError::Taxonomy(format!(
                "Empty phrase at pattern {}",
                idx
            )));
        }

        // Standard match kind so overlapping search reports every phrase
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| AtsTailorError::Taxonomy(format!("Failed to build phrase matcher: {}", e)))?;

        Ok(Self {
            automaton,
            pattern_count: patterns.len(),
        })
    }

    /// All boundary-respecting hits, in order of start position
    pub fn find_all(&self, text: &str) -> Vec<PhraseHit> {
        let mut hits: Vec<PhraseHit> = self
            .automaton
            .find_overlapping_iter(text)
            .filter(|m| on_word_boundary(text, m.start(), m.end()))
            .map(|m| PhraseHit {
                pattern: m.pattern().as_usize(),
                start: m.start(),
            })
            .collect();

        hits.sort_by_key(|h| (h.start, h.pattern));
        hits
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_matcher_respects_word_boundaries() {
        let matcher = PhraseMatcher::new(["go", "sql", "machine learning"]).unwrap();

        let hits = matcher.find_all("Google uses SQL and Machine Learning; go figure");
        let patterns: Vec<usize> = hits.iter().map(|h| h.pattern).collect();

        assert_eq!(patterns, vec![1, 2, 0]);
    }

    #[test]
    fn test_phrase_matcher_reports_overlaps() {
        let matcher = PhraseMatcher::new(["deep learning", "learning"]).unwrap();
        let hits = matcher.find_all("deep learning");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_empty_phrase_rejected() {
        assert!(PhraseMatcher::new(["python", "  "]).is_err());
    }
}
