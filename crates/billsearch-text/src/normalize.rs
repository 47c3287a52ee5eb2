//! Tokenization, stopword removal and stemming

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

static TOKENIZE_RE: OnceLock<Regex> = OnceLock::new();

// NLTK English stopword list
static STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Stopword filter and English stemmer, read-only once built
pub struct Normalizer {
    stop_words: HashSet<&'static str>,
    stemmer: Stemmer,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token.to_lowercase().as_str())
    }

    /// Word tokens minus stopwords, original casing kept
    pub fn remove_stopwords(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .filter(|t| !self.is_stop_word(t))
            .map(str::to_string)
            .collect()
    }

    /// Word tokens minus stopwords, lowercased and stemmed
    pub fn remove_stopwords_and_stem(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .filter(|t| !self.is_stop_word(t))
            .map(|t| self.stemmer.stem(&t.to_lowercase()).into_owned())
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("stop_words", &self.stop_words.len())
            .finish_non_exhaustive()
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    let re = TOKENIZE_RE.get_or_init(|| Regex::new(r"\w+").unwrap());
    re.find_iter(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_stopwords_keeps_case() {
        let normalizer = Normalizer::new();
        let tokens = normalizer.remove_stopwords("The Farm Bill and the subsidies");
        assert_eq!(tokens, vec!["Farm", "Bill", "subsidies"]);
    }

    #[test]
    fn test_stemmed_variant() {
        let normalizer = Normalizer::new();
        let tokens = normalizer.remove_stopwords_and_stem("Climate changes, regulating emissions.");
        assert_eq!(tokens, vec!["climat", "chang", "regul", "emiss"]);
    }

    #[test]
    fn test_punctuation_dropped() {
        let normalizer = Normalizer::new();
        let tokens = normalizer.remove_stopwords_and_stem("veterans' health+care, reform.");
        assert_eq!(tokens, vec!["veteran", "health", "care", "reform"]);
    }

    #[test]
    fn test_only_stopwords() {
        let normalizer = Normalizer::new();
        assert!(normalizer.remove_stopwords_and_stem("what is the").is_empty());
        assert!(normalizer.remove_stopwords("").is_empty());
    }

    #[test]
    fn test_deterministic() {
        let normalizer = Normalizer::new();
        let text = "Appropriations for the Department of Defense for fiscal year 2024";
        assert_eq!(
            normalizer.remove_stopwords_and_stem(text),
            normalizer.remove_stopwords_and_stem(text)
        );
    }
}
