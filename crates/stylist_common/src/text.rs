//! Small text helpers shared by the keyword heuristics.

/// Lowercase word tokens. Hyphens stay inside words ("t-shirt", "sci-fi").
pub fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|t| t.trim_matches('-'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whole-word match that also accepts a trailing plural "s"
pub fn word_matches(word: &str, keyword: &str) -> bool {
    word == keyword || word.strip_suffix('s') == Some(keyword)
}

pub fn contains_word(tokens: &[String], keyword: &str) -> bool {
    tokens.iter().any(|t| word_matches(t, keyword))
}

pub fn contains_any(tokens: &[String], keywords: &[&str]) -> bool {
    keywords.iter().any(|k| contains_word(tokens, k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_strip_punctuation() {
        assert_eq!(tokens("Hi, there!"), vec!["hi", "there"]);
        assert_eq!(tokens("a sci-fi T-Shirt."), vec!["a", "sci-fi", "t-shirt"]);
        assert_eq!(tokens(" -- "), Vec::<String>::new());
    }

    #[test]
    fn test_plural_match() {
        assert!(word_matches("hats", "hat"));
        assert!(word_matches("hat", "hat"));
        assert!(!word_matches("hatter", "hat"));
    }
}
