//! Headline heuristics: money mentions and search-phrase counts.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

static MONEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\$\d+(?:,\d+)*(?:\.\d+)?(?:\s*(?i:dollars|usd))?\b|\b\d+\s*(?i:dollars|usd)\b",
    )
    .unwrap()
});

/// Characters removed before a headline is split into words.
const STRIPPED_PUNCTUATION: &[char] = &['.', ',', ';', '?', '!', '\u{2018}', '\u{2019}'];

/// True if `text` mentions an amount of money: `$11.1`, `$111,111.11`,
/// `$5 USD`, `20 dollars`.
pub fn has_money(text: &str) -> bool {
    MONEY_RE.is_match(text)
}

/// Count how many word blocks of the headline equal the phrase.
///
/// The headline is cut into consecutive, non-overlapping blocks of as many
/// words as the phrase has, so an occurrence that straddles a block border
/// is not counted.
pub fn count_phrase(headline: &str, phrase: &str) -> usize {
    let phrase = phrase.split_whitespace().join(" ").to_lowercase();
    let width = phrase.split(' ').filter(|w| !w.is_empty()).count();
    if width == 0 {
        return 0;
    }

    let cleaned: String = headline
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    words
        .chunks(width)
        .filter(|block| block.join(" ") == phrase)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formats() {
        assert!(has_money("Company posts $1,200.50 in profit"));
        assert!(has_money("$11.1"));
        assert!(has_money("$5 USD fine"));
        assert!(has_money("Judge awards 100 dollars"));
        assert!(has_money("a 20 USD surcharge"));
        assert!(has_money("a 20 usd surcharge"));
        assert!(has_money("Up to 300 Dollars"));
    }

    #[test]
    fn test_money_negatives() {
        assert!(!has_money("Report2024"));
        assert!(!has_money("Oil rises 3% on supply fears"));
        assert!(!has_money("100 dollarstore chains close"));
        assert!(!has_money("costs are in USD terms"));
    }

    #[test]
    fn test_phrase_count_is_chunked() {
        assert_eq!(
            count_phrase("breaking news today breaking news", "breaking news"),
            1
        );
        assert_eq!(
            count_phrase("breaking news breaking news", "breaking news"),
            2
        );
    }

    #[test]
    fn test_phrase_count_strips_punctuation() {
        assert_eq!(count_phrase("Oil, oil? OIL! gas", "oil"), 3);
        assert_eq!(count_phrase("\u{2018}Oil\u{2019} prices", "Oil"), 1);
    }

    #[test]
    fn test_phrase_count_empty_phrase() {
        assert_eq!(count_phrase("anything here", "   "), 0);
        assert_eq!(count_phrase("", "oil"), 0);
    }
}
