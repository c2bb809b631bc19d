//! Text layout helpers for card captions

/// Capitalize the first character of a word, lowercasing the rest.
///
/// ```
/// use cardsmith::text::capitalize;
///
/// assert_eq!(capitalize("fIRE"), "Fire");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split flavor text into the two description lines of a card.
///
/// The text is wrapped in quotation marks and split by word count: the first
/// line gets the first `ceil(n / 2)` words. Returns `None` for blank text.
/// Long words are never broken, so a line may be wider than the card.
pub fn description_lines(text: &str) -> Option<[String; 2]> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let quoted = format!("\"{}\"", trimmed);
    let words: Vec<&str> = quoted.split_whitespace().collect();
    let mid = words.len().div_ceil(2);
    Some([words[..mid].join(" "), words[mid..].join(" ")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_word_count_splits_in_half() {
        let lines = description_lines("It stores electricity in its cheeks").unwrap();
        assert_eq!(lines[0], "\"It stores electricity");
        assert_eq!(lines[1], "in its cheeks\"");
    }

    #[test]
    fn test_odd_word_count_first_line_longer() {
        let lines = description_lines("one two three").unwrap();
        assert_eq!(lines, ["\"one two".to_string(), "three\"".to_string()]);
    }

    #[test]
    fn test_single_word() {
        let lines = description_lines("Pika").unwrap();
        assert_eq!(lines, ["\"Pika\"".to_string(), String::new()]);
    }

    #[test]
    fn test_blank_text_has_no_description() {
        assert_eq!(description_lines(""), None);
        assert_eq!(description_lines("   \n"), None);
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let lines = description_lines("  a   b\tc  d ").unwrap();
        assert_eq!(lines, ["\"a b".to_string(), "c d\"".to_string()]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("electric"), "Electric");
        assert_eq!(capitalize("Water"), "Water");
    }
}
