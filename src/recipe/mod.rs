//! Recipe model and the text-to-recipe pipeline.
//!
//! Raw text goes through [`parser::parse`], which leans on the
//! [`classifier`] and [`estimator`] rule tables. [`processor`] wraps parsing
//! with input validation, URL fetching and the processing delay.

pub mod classifier;
pub mod estimator;
pub mod parser;
pub mod processor;
pub mod source;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use parser::{parse, ParseOptions};
pub use processor::{ProcessError, RecipeProcessor};
pub use source::{HttpRecipeFetcher, RecipeFetcher, RecipeInput, StaticRecipeFetcher, Transcript};

/// Cook's experience level, carried as recipe metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }

    pub fn all() -> &'static [SkillLevel] {
        &[
            SkillLevel::Beginner,
            SkillLevel::Intermediate,
            SkillLevel::Advanced,
        ]
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            other => Err(format!(
                "unknown skill level '{}' (expected beginner, intermediate or advanced)",
                other
            )),
        }
    }
}

/// One timed instruction. Ids are 1-based and sequential within a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: u32,
    pub title: String,
    pub instructions: String,
    pub estimated_time_minutes: u32,
    pub tips: Vec<String>,
}

/// A parsed recipe. Never mutated after parsing; a new parse replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub ingredients: Vec<String>,
    /// Never empty
    pub steps: Vec<Step>,
    pub total_time_minutes: u32,
    pub servings: u32,
    pub skill_level: SkillLevel,
    pub dietary_restrictions: BTreeSet<String>,
}

impl Recipe {
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Minutes left from `index` through the final step, inclusive
    pub fn remaining_minutes_from(&self, index: usize) -> u32 {
        self.steps
            .iter()
            .skip(index)
            .map(|s| s.estimated_time_minutes)
            .fold(0, u32::saturating_add)
    }

    /// Plain-text rendering for terminal output
    pub fn format_summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.title));
        out.push_str(&format!(
            "{} min | {} servings | {}",
            self.total_time_minutes, self.servings, self.skill_level
        ));
        if !self.dietary_restrictions.is_empty() {
            let tags: Vec<&str> = self
                .dietary_restrictions
                .iter()
                .map(String::as_str)
                .collect();
            out.push_str(&format!(" | {}", tags.join(", ")));
        }
        out.push('\n');

        if !self.ingredients.is_empty() {
            out.push_str("\nIngredients:\n");
            for ingredient in &self.ingredients {
                out.push_str(&format!("  - {}\n", ingredient));
            }
        }

        out.push_str("\nSteps:\n");
        for step in &self.steps {
            out.push_str(&format!(
                "  {}. {} (~{} min)\n     {}\n",
                step.id, step.title, step.estimated_time_minutes, step.instructions
            ));
            for tip in &step.tips {
                out.push_str(&format!("     {}\n", tip));
            }
        }
        out
    }
}

/// Format seconds as `MM:SS`. Minutes grow past 99 rather than wrapping.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
