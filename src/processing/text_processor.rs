//! Text normalization and line-level helpers shared by the extractors

use regex::Regex;
use std::sync::LazyLock;
use unicode_segmentation::UnicodeSegmentation;

/// Leading bullet marker followed by the bullet body.
/// Symbol markers may touch the text; numbered and lettered ones need a space.
static BULLET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[•\-*+▪–·◦●]\s*|\d{1,2}[.)]\s+|[a-zA-Z]\)\s+)(\S.*)$")
        .expect("Invalid bullet regex")
});

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}]+").expect("Invalid whitespace regex"));

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹'];

/// Fold typographic punctuation to ASCII and collapse runs of spaces per line.
/// Line boundaries are preserved.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2014}' => '-',
            '\u{2026}' => '.',
            _ => c,
        })
        .collect();

    folded
        .lines()
        .map(|line| WHITESPACE_REGEX.replace_all(line, " ").trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Body of a bulleted line with its marker removed, or `None` if the line has no marker
pub fn strip_bullet_marker(line: &str) -> Option<&str> {
    BULLET_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|body| body.chars().any(|c| c.is_alphanumeric()))
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Digits, percentages and currency amounts all count as a metric
pub fn has_numeric_metric(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_ascii_digit() || c == '%' || CURRENCY_SYMBOLS.contains(&c))
}

/// First whitespace token, stripped of surrounding punctuation and lowercased
pub fn first_token(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()))
        .find(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// Lowercased Unicode words
pub fn tokens(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

/// True when `text[start..end]` is not glued to an alphanumeric character on either side
pub fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text.get(..start).and_then(|s| s.chars().next_back());
    let after = text.get(end..).and_then(|s| s.chars().next());

    let clear = |c: Option<char>| c.map_or(true, |c| !c.is_alphanumeric());
    clear(before) && clear(after)
}

/// Case-insensitive whole-phrase containment
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let phrase = phrase.trim().to_lowercase();
    if phrase.is_empty() {
        return false;
    }
    let haystack = text.to_lowercase();
    haystack
        .match_indices(&phrase)
        .any(|(start, m)| on_word_boundary(&haystack, start, start + m.len()))
}
