//! Per-message text features
//!
//! Length, emoji, question marks and lexicon matching used by the text-based signals.

use regex::{Regex, RegexBuilder};

const ZERO_WIDTH_JOINER: char = '\u{200D}';

/// Message length in characters (not bytes)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Whether the message contains a question mark (ASCII or full-width)
pub fn has_question_mark(text: &str) -> bool {
    text.contains('?') || text.contains('？')
}

/// Number of exclamation marks, capped at `cap`
pub fn count_exclamations(text: &str, cap: usize) -> usize {
    text.chars().filter(|c| *c == '!' || *c == '！').count().min(cap)
}

/// Extract emoji from text.
///
/// Variation selectors, skin-tone modifiers and zero-width-joiner sequences are
/// folded into the emoji they modify, and regional indicator pairs (flags) count
/// as one emoji.
pub fn extract_emoji(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if !is_emoji_base(c) {
            continue;
        }

        let mut cluster = String::from(c);

        if is_regional_indicator(c) {
            if let Some(&next) = chars.peek() {
                if is_regional_indicator(next) {
                    cluster.push(next);
                    chars.next();
                }
            }
            found.push(cluster);
            continue;
        }

        while let Some(&next) = chars.peek() {
            if is_emoji_modifier(next) {
                cluster.push(next);
                chars.next();
            } else if next == ZERO_WIDTH_JOINER {
                chars.next();
                match chars.peek() {
                    Some(&joined) if is_emoji_base(joined) => {
                        cluster.push(ZERO_WIDTH_JOINER);
                        cluster.push(joined);
                        chars.next();
                    }
                    _ => break,
                }
            } else {
                break;
            }
        }

        found.push(cluster);
    }

    found
}

/// Strip variation selectors so "❤️" and "❤" compare equal
pub fn normalize_emoji(emoji: &str) -> String {
    emoji
        .chars()
        .filter(|c| !matches!(*c, '\u{FE0E}' | '\u{FE0F}'))
        .collect()
}

fn is_emoji_base(c: char) -> bool {
    let cp = c as u32;
    if is_skin_tone(cp) {
        return false;
    }
    matches!(
        cp,
        0x1F000..=0x1F02F
            | 0x1F0CF
            | 0x1F1E6..=0x1F1FF
            | 0x1F300..=0x1F64F
            | 0x1F680..=0x1F6FF
            | 0x1F900..=0x1F9FF
            | 0x1FA70..=0x1FAFF
            | 0x2600..=0x27BF
            | 0x2B05..=0x2B07
            | 0x2B1B..=0x2B1C
            | 0x2B50
            | 0x2B55
            | 0x3030
            | 0x303D
    )
}

fn is_regional_indicator(c: char) -> bool {
    matches!(c as u32, 0x1F1E6..=0x1F1FF)
}

fn is_skin_tone(cp: u32) -> bool {
    (0x1F3FB..=0x1F3FF).contains(&cp)
}

fn is_emoji_modifier(c: char) -> bool {
    let cp = c as u32;
    is_skin_tone(cp) || matches!(cp, 0xFE0E | 0xFE0F | 0x20E3)
}

/// Case-insensitive whole-word matcher over a list of words or phrases
#[derive(Debug, Clone)]
pub struct LexiconMatcher {
    regex: Option<Regex>,
}

impl LexiconMatcher {
    /// Build a matcher from literal terms
    pub fn new(terms: &[String]) -> Result<Self, regex::Error> {
        Self::with_patterns(terms, &[])
    }

    /// Build a matcher from literal terms plus raw regex alternatives
    pub fn with_patterns(terms: &[String], patterns: &[&str]) -> Result<Self, regex::Error> {
        // Longest first, so a phrase wins over a word it starts with
        let mut literals: Vec<&str> = terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        literals.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        literals.dedup();

        let mut alternatives: Vec<String> = literals
            .iter()
            .map(|t| literal_pattern(t))
            .collect();
        alternatives.extend(patterns.iter().map(|p| p.to_string()));

        if alternatives.is_empty() {
            return Ok(Self { regex: None });
        }

        let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
        let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        Ok(Self { regex: Some(regex) })
    }

    /// Whether any term occurs in the text
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(&fold_apostrophes(text)))
    }

    /// Number of non-overlapping term occurrences in the text
    pub fn count(&self, text: &str) -> usize {
        match &self.regex {
            Some(r) => r.find_iter(&fold_apostrophes(text)).count(),
            None => 0,
        }
    }
}

/// Escape a term, letting any run of whitespace inside a phrase match any whitespace
fn literal_pattern(term: &str) -> String {
    term.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

fn fold_apostrophes(text: &str) -> String {
    text.replace(['\u{2019}', '\u{2018}'], "'")
}
