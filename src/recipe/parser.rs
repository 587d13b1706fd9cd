//! Raw text to [`Recipe`].
//!
//! Parsing never fails. Text with no recognisable steps gets the built-in
//! three-step outline so a session always has something to walk through.

use std::collections::BTreeSet;

use tracing::debug;

use super::classifier::{is_action_step, is_ingredient_line, strip_ordinal, tips_for, title_for};
use super::estimator::estimate_minutes;
use super::{Recipe, SkillLevel, Step};

/// Title used when the text has no non-blank lines
pub const FALLBACK_TITLE: &str = "Delicious Recipe";

pub const DEFAULT_SERVINGS: u32 = 4;

/// Metadata attached to every parsed recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub servings: u32,
    pub skill_level: SkillLevel,
    pub dietary_restrictions: BTreeSet<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            servings: DEFAULT_SERVINGS,
            skill_level: SkillLevel::default(),
            dietary_restrictions: BTreeSet::new(),
        }
    }
}

impl ParseOptions {
    pub fn from_config(config: &crate::config::RecipeConfig) -> Self {
        Self {
            servings: config.servings,
            skill_level: config.skill_level,
            dietary_restrictions: config.dietary_restrictions.iter().cloned().collect(),
        }
    }
}

pub fn parse(raw_text: &str, options: &ParseOptions) -> Recipe {
    let lines: Vec<&str> = raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let title = lines
        .first()
        .map(|line| (*line).to_string())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    let ingredients: Vec<String> = lines
        .iter()
        .filter(|line| is_ingredient_line(line))
        .map(|line| (*line).to_string())
        .collect();

    let mut steps: Vec<Step> = lines
        .iter()
        .filter(|line| is_action_step(line))
        .enumerate()
        .map(|(index, line)| build_step(index as u32 + 1, line))
        .collect();

    if steps.is_empty() {
        debug!(lines = lines.len(), "No step lines recognised, using default outline");
        steps = default_steps();
    }

    let total_time_minutes = steps
        .iter()
        .map(|s| s.estimated_time_minutes)
        .fold(0, u32::saturating_add);
    let servings = if options.servings == 0 {
        DEFAULT_SERVINGS
    } else {
        options.servings
    };

    debug!(
        title = %title,
        ingredients = ingredients.len(),
        steps = steps.len(),
        total_time_minutes,
        "Parsed recipe"
    );

    Recipe {
        title,
        ingredients,
        steps,
        total_time_minutes,
        servings,
        skill_level: options.skill_level,
        dietary_restrictions: options.dietary_restrictions.clone(),
    }
}

fn build_step(id: u32, line: &str) -> Step {
    Step {
        id,
        title: title_for(line),
        instructions: strip_ordinal(line).to_string(),
        estimated_time_minutes: estimate_minutes(line),
        tips: tips_for(line),
    }
}

/// The outline installed when no step lines are found
pub fn default_steps() -> Vec<Step> {
    let outline: [(&str, &str, u32, [&str; 2]); 3] = [
        (
            "Prepare ingredients",
            "Gather and prepare all ingredients according to the recipe.",
            10,
            [
                "📋 Read through the entire recipe first",
                "🔪 Prep all ingredients before cooking",
            ],
        ),
        (
            "Start cooking",
            "Begin cooking according to the recipe instructions.",
            20,
            [
                "🔥 Maintain proper heat levels",
                "⏰ Set timers for important steps",
            ],
        ),
        (
            "Finish and serve",
            "Complete the cooking process and serve the dish.",
            5,
            [
                "🍽️ Let hot dishes cool slightly before serving",
                "🌿 Garnish for presentation",
            ],
        ),
    ];

    outline
        .iter()
        .zip(1..)
        .map(|((title, instructions, minutes, tips), id)| Step {
            id,
            title: (*title).to_string(),
            instructions: (*instructions).to_string(),
            estimated_time_minutes: *minutes,
            tips: tips.iter().map(|t| (*t).to_string()).collect(),
        })
        .collect()
}
