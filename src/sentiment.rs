//! Sentiment polarity
//!
//! The enthusiasm signal only needs a pure `text -> polarity` function. Any
//! implementation of [`SentimentAnalyzer`] works; [`LexiconSentiment`] is the
//! built-in word-list scorer.

use crate::text::{extract_emoji, normalize_emoji};
use std::collections::HashMap;

/// Pure text-to-polarity function. Implementations must return a value in -1 to 1.
pub trait SentimentAnalyzer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

impl<F> SentimentAnalyzer for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn polarity(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Words that flip the polarity of the next scored word
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "don't", "dont", "didn't", "didnt", "isn't", "isnt", "wasn't",
    "wasnt", "can't", "cant", "won't", "wont", "nothing", "hardly",
];

/// Words that scale the next scored word
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.2),
    ("super", 1.4),
    ("extremely", 1.5),
    ("totally", 1.3),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("kinda", 0.7),
    ("slightly", 0.6),
];

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("nice", 0.6),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("like", 0.2),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("perfect", 1.0),
    ("best", 1.0),
    ("happy", 0.8),
    ("glad", 0.5),
    ("fun", 0.3),
    ("funny", 0.25),
    ("cute", 0.5),
    ("sweet", 0.35),
    ("beautiful", 0.85),
    ("excited", 0.4),
    ("exciting", 0.3),
    ("cool", 0.35),
    ("yay", 0.6),
    ("thanks", 0.2),
    ("thank", 0.2),
    ("enjoy", 0.4),
    ("enjoyed", 0.5),
    ("incredible", 0.9),
    ("miss", 0.2),
    ("missing", 0.2),
    ("hope", 0.3),
    ("haha", 0.3),
    ("lol", 0.3),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("hate", -0.8),
    ("sad", -0.5),
    ("angry", -0.5),
    ("annoying", -0.8),
    ("annoyed", -0.6),
    ("boring", -1.0),
    ("bored", -0.5),
    ("tired", -0.4),
    ("busy", -0.1),
    ("sorry", -0.5),
    ("ugh", -0.5),
    ("meh", -0.3),
    ("whatever", -0.2),
    ("worst", -1.0),
    ("upset", -0.5),
    ("sick", -0.7),
    ("stupid", -0.8),
    ("wrong", -0.5),
    ("fine", 0.1),
];

/// Polarity contributed by a positive emoji
const EMOJI_VALENCE: f64 = 0.5;

/// Emoji treated as positive by the default scorer
const POSITIVE_EMOJI: &[&str] = &[
    "❤", "💕", "💖", "😊", "😍", "🥰", "😘", "💗", "💓", "💝", "😄", "😁", "🙂", "😉", "✨",
    "😂", "🤣", "😆", "☺", "🤗", "👍", "🎉",
];

/// Emoji treated as negative by the default scorer
const NEGATIVE_EMOJI: &[&str] = &["😢", "😭", "😞", "😠", "😡", "🙄", "😒", "💔", "😩", "😫"];

/// Word-list polarity scorer.
///
/// Each scored word (or emoji) contributes its valence; a preceding negation flips
/// and dampens it, a preceding intensifier scales it. Polarity is the mean valence
/// of the scored tokens, or 0 when nothing scores.
#[derive(Debug, Clone)]
pub struct LexiconSentiment {
    valences: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        let mut valences: HashMap<String, f64> = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS.iter())
            .map(|(w, v)| (w.to_string(), *v))
            .collect();
        for emoji in POSITIVE_EMOJI {
            valences.insert(emoji.to_string(), EMOJI_VALENCE);
        }
        for emoji in NEGATIVE_EMOJI {
            valences.insert(emoji.to_string(), -EMOJI_VALENCE);
        }
        let intensifiers = INTENSIFIERS
            .iter()
            .map(|(w, f)| (w.to_string(), *f))
            .collect();
        Self {
            valences,
            intensifiers,
        }
    }
}

impl LexiconSentiment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the valence of a word or emoji
    pub fn with_word(mut self, word: &str, valence: f64) -> Self {
        self.valences
            .insert(normalize_emoji(&word.to_lowercase()), valence.clamp(-1.0, 1.0));
        self
    }
}

impl SentimentAnalyzer for LexiconSentiment {
    fn polarity(&self, text: &str) -> f64 {
        let mut scored: Vec<f64> = Vec::new();
        let mut negate = false;
        let mut scale = 1.0;

        for token in tokenize(text) {
            if NEGATIONS.contains(&token.as_str()) {
                negate = true;
                continue;
            }
            if let Some(factor) = self.intensifiers.get(&token) {
                scale *= factor;
                continue;
            }
            if let Some(valence) = self.valences.get(&token) {
                let mut value = valence * scale;
                if negate {
                    value *= -0.5;
                }
                scored.push(value.clamp(-1.0, 1.0));
            }
            negate = false;
            scale = 1.0;
        }

        for emoji in extract_emoji(text) {
            if let Some(valence) = self.valences.get(&normalize_emoji(&emoji)) {
                scored.push(*valence);
            }
        }

        if scored.is_empty() {
            return 0.0;
        }
        let mean = scored.iter().sum::<f64>() / scored.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

/// Lowercase word tokens; apostrophes stay inside words
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace(['\u{2019}', '\u{2018}'], "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
