//! Query text normalization.
//!
//! Every extractor works on the same `NormalizedQuery`: the trimmed
//! original text plus lowercase tokens. Hyphens split words
//! ("gluten-free" -> "gluten", "free"); `.`, `+`, `'` and currency
//! symbols stay inside a token so "4.5", "4+" and "£20" survive.

/// Trimmed query text plus its lowercase tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
    original: String,
    tokens: Vec<String>,
}

impl NormalizedQuery {
    pub fn new(text: &str) -> Self {
        let original = text.trim().to_string();
        let tokens = tokenize(&original);
        Self { original, tokens }
    }

    /// The trimmed text as the user typed it
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Does the token sequence of `phrase` start at `index`?
    pub fn matches_at(&self, index: usize, phrase: &str) -> bool {
        let words: Vec<String> = tokenize(phrase);
        if words.is_empty() || index + words.len() > self.tokens.len() {
            return false;
        }
        words
            .iter()
            .zip(&self.tokens[index..])
            .all(|(word, token)| word == token)
    }

    /// Index of the first occurrence of `phrase`, matched on whole tokens
    pub fn find_phrase(&self, phrase: &str) -> Option<usize> {
        (0..self.tokens.len()).find(|&i| self.matches_at(i, phrase))
    }

    pub fn contains_phrase(&self, phrase: &str) -> bool {
        self.find_phrase(phrase).is_some()
    }

    /// Number of tokens `phrase` occupies
    pub fn phrase_len(phrase: &str) -> usize {
        tokenize(phrase).len()
    }
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '+' | '\'' | '£' | '$' | '€')
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_token_char(c))
        .map(|token| token.trim_matches(|c| c == '.' || c == '\''))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an amount such as "20", "£20", "$12.50", "4+" or "25pp".
pub fn parse_amount(token: &str) -> Option<f64> {
    let trimmed = token
        .trim_start_matches(['£', '$', '€'])
        .trim_end_matches('+')
        .trim_end_matches("pp");
    if trimmed.is_empty() || !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
