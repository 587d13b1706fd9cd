//! Duration estimates for recipe steps.
//!
//! An explicit time mention in the step text always wins. Otherwise the first
//! action keyword from [`ACTION_MINUTES`] (in table order, not text order)
//! decides, and [`DEFAULT_MINUTES`] covers everything else.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fallback when neither a time mention nor a keyword is present
pub const DEFAULT_MINUTES: u32 = 5;

/// Action keyword to default minutes, evaluated first-match-wins
pub const ACTION_MINUTES: &[(&str, u32)] = &[
    ("prep", 5),
    ("chop", 3),
    ("dice", 3),
    ("slice", 2),
    ("heat", 5),
    ("boil", 10),
    ("simmer", 15),
    ("bake", 25),
    ("fry", 8),
    ("cook", 10),
    ("mix", 2),
    ("stir", 1),
];

static TIME_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(minute|min|hour|hr)").expect("valid time regex"));

/// Estimate how many minutes a step takes. Always returns at least 1.
pub fn estimate_minutes(step_text: &str) -> u32 {
    if let Some(minutes) = explicit_minutes(step_text) {
        return minutes.max(1);
    }

    let lower = step_text.to_lowercase();
    ACTION_MINUTES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, minutes)| *minutes)
        .unwrap_or(DEFAULT_MINUTES)
}

/// Minutes stated in the text, converting hours. `None` when nothing is stated.
pub fn explicit_minutes(text: &str) -> Option<u32> {
    let caps = TIME_MENTION.captures(text)?;
    // Absurdly long digit runs saturate rather than fail
    let value: u32 = caps[1].parse().unwrap_or(u32::MAX);
    let unit = caps[2].to_lowercase();

    if unit.starts_with("hour") || unit.starts_with("hr") {
        Some(value.saturating_mul(60))
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_mention_beats_keyword() {
        assert_eq!(estimate_minutes("Bake for 20 minutes"), 20);
        assert_eq!(estimate_minutes("Simmer 3 min"), 3);
    }

    #[test]
    fn test_hour_conversion() {
        assert_eq!(estimate_minutes("Let it rest for 1 hour"), 60);
        assert_eq!(estimate_minutes("Braise 2 hr"), 120);
        assert_eq!(estimate_minutes("Roast 2 HOURS"), 120);
    }

    #[test]
    fn test_range_uses_number_next_to_unit() {
        assert_eq!(estimate_minutes("Cook pasta for 8-10 minutes"), 10);
    }

    #[test]
    fn test_keyword_table_order_wins_over_text_order() {
        // "stir" appears first in the text, but "cook" is earlier in the table
        assert_eq!(estimate_minutes("Stir and cook gently"), 10);
        assert_eq!(estimate_minutes("Preheat the oven"), 5);
        assert_eq!(estimate_minutes("Dice then boil"), 3);
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        assert_eq!(estimate_minutes("BAKE until golden"), 25);
    }

    #[test]
    fn test_default_when_nothing_matches() {
        assert_eq!(estimate_minutes("Serve with a smile"), DEFAULT_MINUTES);
        assert_eq!(estimate_minutes(""), DEFAULT_MINUTES);
    }

    #[test]
    fn test_zero_mention_is_clamped() {
        assert_eq!(estimate_minutes("Rest 0 minutes"), 1);
    }

    #[test]
    fn test_explicit_minutes_none_without_unit() {
        assert_eq!(explicit_minutes("Add 2 eggs"), None);
    }
}
