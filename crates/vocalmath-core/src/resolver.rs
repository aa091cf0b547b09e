//! Spoken-answer resolution.
//!
//! Turns recognizer output such as `"minus forty two"` into a signed integer.
//! Anything that cannot be read as a number is `None`; the resolver never
//! fails loudly because the host's answer to noise is to ask again.

use std::collections::HashMap;

/// Words that negate the phrase that follows them.
const NEGATION_WORDS: &[&str] = &["minus", "negative"];

/// Words that mark a decimal answer, which is never a valid integer.
const DECIMAL_WORDS: &[&str] = &["point"];

const UNITS: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [(&str, i64); 8] = [
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

const SCALES: [(&str, i64); 3] = [
    ("thousand", 1_000),
    ("million", 1_000_000),
    ("billion", 1_000_000_000),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberWord {
    Unit(i64),
    Tens(i64),
    Hundred,
    Scale(i64),
}

/// Converts recognized natural-language text into an integer answer.
///
/// Owns its number-word lexicon; build one and reuse it for every answer.
#[derive(Debug, Clone)]
pub struct AnswerResolver {
    lexicon: HashMap<&'static str, NumberWord>,
}

impl Default for AnswerResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerResolver {
    pub fn new() -> Self {
        let mut lexicon = HashMap::new();
        for (value, word) in UNITS.iter().enumerate() {
            lexicon.insert(*word, NumberWord::Unit(value as i64));
        }
        for (word, value) in TENS {
            lexicon.insert(word, NumberWord::Tens(value));
        }
        lexicon.insert("hundred", NumberWord::Hundred);
        for (word, value) in SCALES {
            lexicon.insert(word, NumberWord::Scale(value));
        }
        Self { lexicon }
    }

    /// Resolve raw recognized text into a signed integer.
    ///
    /// A leading `minus` followed by a number phrase negates it. Returns
    /// `None` for empty input, unparseable phrases, or a bare `minus`.
    pub fn resolve(&self, raw: &str) -> Option<i64> {
        let normalized = normalize(raw);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        let resolved = match tokens.split_first() {
            None => None,
            Some((first, rest)) if NEGATION_WORDS.contains(first) => {
                // "minus -5" is ambiguous.
                if rest.is_empty() || rest[0].starts_with('-') {
                    None
                } else {
                    self.cardinal(rest).and_then(i64::checked_neg)
                }
            }
            Some(_) => self.cardinal(&tokens),
        };

        tracing::debug!(raw, ?resolved, "resolved spoken answer");
        resolved
    }

    /// Parse a cardinal-number phrase such as `one hundred and three`.
    ///
    /// Words outside the number vocabulary are ignored as filler.
    fn cardinal(&self, tokens: &[&str]) -> Option<i64> {
        if let [single] = tokens {
            if let Some(n) = parse_digits(single) {
                return Some(n);
            }
        }
        if tokens.iter().any(|t| DECIMAL_WORDS.contains(t)) {
            return None;
        }

        let words: Vec<NumberWord> = tokens
            .iter()
            .filter_map(|t| self.lexicon.get(t).copied())
            .collect();

        match words.as_slice() {
            [] => None,
            [NumberWord::Unit(0)] => Some(0),
            _ if words.contains(&NumberWord::Unit(0)) => None,
            _ => accumulate(&words),
        }
    }
}

/// Running state for the group below the next scale word.
#[derive(Debug, Default)]
struct Group {
    hundreds: Option<i64>,
    tens: Option<i64>,
    units: Option<i64>,
}

impl Group {
    fn is_empty(&self) -> bool {
        self.hundreds.is_none() && self.tens.is_none() && self.units.is_none()
    }

    fn value(&self) -> i64 {
        self.hundreds.unwrap_or(0) * 100 + self.tens.unwrap_or(0) + self.units.unwrap_or(0)
    }
}

fn accumulate(words: &[NumberWord]) -> Option<i64> {
    let mut total = 0_i64;
    let mut group = Group::default();
    let mut last_scale: Option<i64> = None;

    for word in words {
        match *word {
            NumberWord::Unit(n) => {
                if group.units.is_some() || (group.tens.is_some() && n >= 10) {
                    return None;
                }
                group.units = Some(n);
            }
            NumberWord::Tens(n) => {
                if group.tens.is_some() || group.units.is_some() {
                    return None;
                }
                group.tens = Some(n);
            }
            NumberWord::Hundred => {
                if group.hundreds.is_some() || group.tens.is_some() {
                    return None;
                }
                group.hundreds = Some(group.units.take().unwrap_or(1));
            }
            NumberWord::Scale(scale) => {
                if last_scale.is_some_and(|prev| scale >= prev) {
                    return None;
                }
                let multiplier = if group.is_empty() { 1 } else { group.value() };
                total = total.checked_add(multiplier.checked_mul(scale)?)?;
                group = Group::default();
                last_scale = Some(scale);
            }
        }
    }

    total.checked_add(group.value())
}

/// Lower-case the text and split hyphenated or punctuated words apart,
/// keeping signed digit tokens such as `-42` intact.
fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for token in raw.to_lowercase().split_whitespace() {
        let token = token.trim_end_matches(|c: char| !c.is_alphanumeric());
        if parse_digits(token).is_some() {
            out.push_str(token);
        } else {
            out.extend(
                token
                    .chars()
                    .map(|c| if c.is_alphanumeric() { c } else { ' ' }),
            );
        }
        out.push(' ');
    }
    out
}

fn parse_digits(token: &str) -> Option<i64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> Option<i64> {
        AnswerResolver::new().resolve(text)
    }

    #[test]
    fn curated_answers() {
        assert_eq!(resolve("forty two"), Some(42));
        assert_eq!(resolve("minus seventeen"), Some(-17));
        assert_eq!(resolve("one hundred"), Some(100));
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("banana"), None);
    }

    #[test]
    fn minus_zero_is_zero() {
        assert_eq!(resolve("minus zero"), Some(0));
        assert_eq!(resolve("zero"), Some(0));
    }

    #[test]
    fn bare_negation_is_unresolved() {
        assert_eq!(resolve("minus"), None);
        assert_eq!(resolve("  minus  "), None);
        assert_eq!(resolve("minus banana"), None);
    }

    #[test]
    fn negative_is_a_negation_synonym() {
        assert_eq!(resolve("negative eight"), Some(-8));
    }

    #[test]
    fn compound_phrases() {
        assert_eq!(resolve("one hundred and three"), Some(103));
        assert_eq!(resolve("a hundred"), Some(100));
        assert_eq!(resolve("twelve hundred"), Some(1200));
        assert_eq!(resolve("nine hundred ninety nine"), Some(999));
        assert_eq!(resolve("two thousand and twenty four"), Some(2024));
        assert_eq!(resolve("thousand"), Some(1000));
        assert_eq!(
            resolve("one million two hundred thousand three hundred forty five"),
            Some(1_200_345)
        );
        assert_eq!(resolve("minus three billion"), Some(-3_000_000_000));
    }

    #[test]
    fn casing_hyphens_and_filler() {
        assert_eq!(resolve("  Forty   TWO "), Some(42));
        assert_eq!(resolve("forty-two"), Some(42));
        assert_eq!(resolve("the answer is twenty one"), Some(21));
        assert_eq!(resolve("eighty one."), Some(81));
    }

    #[test]
    fn digit_transcripts() {
        assert_eq!(resolve("42"), Some(42));
        assert_eq!(resolve("-42"), Some(-42));
        assert_eq!(resolve("minus 17"), Some(-17));
        assert_eq!(resolve("minus -5"), None);
    }

    #[test]
    fn malformed_phrases_are_unresolved() {
        assert_eq!(resolve("twenty twelve"), None);
        assert_eq!(resolve("five six"), None);
        assert_eq!(resolve("thousand thousand"), None);
        assert_eq!(resolve("two thousand one million"), None);
        assert_eq!(resolve("three point five"), None);
        assert_eq!(resolve("zero five"), None);
        assert_eq!(resolve("one hundred hundred"), None);
    }

    #[test]
    fn resolving_twice_gives_same_answer() {
        let resolver = AnswerResolver::new();
        assert_eq!(resolver.resolve("sixty four"), resolver.resolve("sixty four"));
    }
}
