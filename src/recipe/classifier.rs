//! Line classification for raw recipe text.
//!
//! Ingredients and steps are detected by independent tests, so one line can
//! be both. Titles and tips come from ordered rule tables.

use once_cell::sync::Lazy;
use regex::Regex;

/// Words that mark a line as a cooking action
pub const ACTION_WORDS: &[&str] = &[
    "heat", "add", "mix", "stir", "cook", "bake", "fry", "boil", "simmer", "chop", "dice", "slice",
];

/// Measurement units recognised on ingredient lines
pub const UNITS: &[&str] = &["cup", "tbsp", "tsp", "oz", "lb", "g", "ml", "l"];

/// Action word to step title, first match wins
pub const STEP_TITLES: &[(&str, &str)] = &[
    ("heat", "Heat ingredients"),
    ("add", "Add ingredients"),
    ("mix", "Mix ingredients"),
    ("stir", "Stir mixture"),
    ("cook", "Cook ingredients"),
    ("bake", "Bake in oven"),
    ("fry", "Fry ingredients"),
    ("boil", "Boil ingredients"),
    ("simmer", "Simmer mixture"),
    ("chop", "Prepare ingredients"),
    ("dice", "Prepare ingredients"),
    ("slice", "Prepare ingredients"),
];

/// Title used when no action word matches
pub const DEFAULT_STEP_TITLE: &str = "Cooking step";

/// A tip fires when any of its triggers appears in the step text
pub struct TipRule {
    pub triggers: &'static [&'static str],
    pub tip: &'static str,
}

pub const TIP_RULES: &[TipRule] = &[
    TipRule {
        triggers: &["heat", "oil"],
        tip: "💡 Heat oil until it shimmers but doesn't smoke",
    },
    TipRule {
        triggers: &["onion"],
        tip: "🧅 Cook onions until translucent for best flavor",
    },
    TipRule {
        triggers: &["garlic"],
        tip: "🧄 Add garlic last to prevent burning",
    },
    TipRule {
        triggers: &["salt"],
        tip: "🧂 Taste and adjust seasoning as needed",
    },
    TipRule {
        triggers: &["bake", "oven"],
        tip: "🔥 Preheat oven for even cooking",
    },
];

static ORDINAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s*").expect("valid ordinal regex"));

// Units must stand alone: "2 cups", "200g" and "1 l" match, "Boil" does not.
static UNIT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    let alternatives = UNITS
        .iter()
        .map(|u| format!("{}s?", regex::escape(u)))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?:^|[^A-Za-z])(?:{})\b", alternatives)).expect("valid unit regex")
});

/// How a single line of recipe text was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Ingredient,
    ActionStep,
    /// Carries a measurement and an action, e.g. "Add 2 cups stock"
    IngredientAndStep,
    Neither,
}

impl LineKind {
    pub fn is_ingredient(self) -> bool {
        matches!(self, LineKind::Ingredient | LineKind::IngredientAndStep)
    }

    pub fn is_step(self) -> bool {
        matches!(self, LineKind::ActionStep | LineKind::IngredientAndStep)
    }
}

pub fn classify(line: &str) -> LineKind {
    match (is_ingredient_line(line), is_action_step(line)) {
        (true, true) => LineKind::IngredientAndStep,
        (true, false) => LineKind::Ingredient,
        (false, true) => LineKind::ActionStep,
        (false, false) => LineKind::Neither,
    }
}

/// A digit plus a standalone unit token. Case-sensitive.
pub fn is_ingredient_line(line: &str) -> bool {
    line.chars().any(|c| c.is_ascii_digit()) && UNIT_TOKEN.is_match(line)
}

/// Leading `N.` ordinal, or any action word anywhere (case-insensitive)
pub fn is_action_step(line: &str) -> bool {
    if has_ordinal_prefix(line) {
        return true;
    }
    let lower = line.to_lowercase();
    ACTION_WORDS.iter().any(|word| lower.contains(word))
}

pub fn has_ordinal_prefix(line: &str) -> bool {
    ORDINAL_PREFIX.is_match(line)
}

/// Strip a leading `N.` marker and the whitespace after it
pub fn strip_ordinal(line: &str) -> &str {
    match ORDINAL_PREFIX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

pub fn title_for(step_text: &str) -> String {
    let lower = step_text.to_lowercase();
    STEP_TITLES
        .iter()
        .find(|(word, _)| lower.contains(word))
        .map(|(_, title)| (*title).to_string())
        .unwrap_or_else(|| DEFAULT_STEP_TITLE.to_string())
}

/// Every matching tip, in rule order
pub fn tips_for(step_text: &str) -> Vec<String> {
    let lower = step_text.to_lowercase();
    TIP_RULES
        .iter()
        .filter(|rule| rule.triggers.iter().any(|t| lower.contains(t)))
        .map(|rule| rule.tip.to_string())
        .collect()
}
