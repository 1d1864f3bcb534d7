//! Text analytics seam plus a small built-in analyzer.

use std::collections::HashMap;

use super::types::{KeywordFrequency, TextAnalysis};

/// Number of keywords kept by [`BasicTextAnalyzer`].
pub const TOP_KEYWORDS: usize = 10;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "don", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "s", "same", "she",
    "should", "so", "some", "such", "t", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Produces word, sentence, readability and keyword statistics for plain text.
pub trait TextAnalyzer: Send + Sync {
    fn analyze(&self, content: &str) -> TextAnalysis;
}

#[derive(Debug, Clone, Copy, Default)]
/// Whitespace/punctuation tokenizer with an English stop-word list and Flesch reading ease.
pub struct BasicTextAnalyzer;

impl BasicTextAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn words(content: &str) -> Vec<String> {
        content
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|w| w.trim_matches('\'').to_lowercase())
            .filter(|w| !w.is_empty())
            .collect()
    }

    fn sentence_count(content: &str) -> u64 {
        content
            .split(['.', '!', '?'])
            .filter(|s| s.chars().any(char::is_alphanumeric))
            .count() as u64
    }

    fn top_keywords(words: &[String]) -> Vec<KeywordFrequency> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for word in words {
            if word.chars().all(char::is_alphanumeric) && !STOP_WORDS.contains(&word.as_str()) {
                *counts.entry(word.as_str()).or_default() += 1;
            }
        }

        let mut ranked: Vec<KeywordFrequency> = counts
            .into_iter()
            .map(|(word, count)| KeywordFrequency {
                word: word.to_string(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        ranked.truncate(TOP_KEYWORDS);
        ranked
    }
}

impl TextAnalyzer for BasicTextAnalyzer {
    fn analyze(&self, content: &str) -> TextAnalysis {
        let words = Self::words(content);
        if words.is_empty() {
            return TextAnalysis::default();
        }

        let word_count = words.len() as u64;
        let sentence_count = Self::sentence_count(content).max(1);
        let syllables: u64 = words.iter().map(|w| count_syllables(w)).sum();

        TextAnalysis {
            word_count,
            sentence_count,
            avg_sentence_length: word_count as f64 / sentence_count as f64,
            readability_score: flesch_reading_ease(word_count, sentence_count, syllables),
            keywords: Self::top_keywords(&words),
        }
    }
}

/// Flesch reading ease clamped to `[0, 100]`; `0` when there are no words or sentences.
pub fn flesch_reading_ease(word_count: u64, sentence_count: u64, syllable_count: u64) -> f64 {
    if word_count == 0 || sentence_count == 0 {
        return 0.0;
    }

    let words = word_count as f64;
    let score = 206.835
        - 1.015 * (words / sentence_count as f64)
        - 84.6 * (syllable_count as f64 / words);
    score.clamp(0.0, 100.0)
}

/// Vowel-group syllable heuristic: silent trailing `e` dropped, at least one per word.
pub fn count_syllables(word: &str) -> u64 {
    const VOWELS: &str = "aeiouy";
    let lower = word.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let Some(&first) = chars.first() else {
        return 0;
    };

    let mut count: i64 = i64::from(VOWELS.contains(first));
    for pair in chars.windows(2) {
        if VOWELS.contains(pair[1]) && !VOWELS.contains(pair[0]) {
            count += 1;
        }
    }
    if lower.ends_with('e') {
        count -= 1;
    }

    count.max(1) as u64
}
