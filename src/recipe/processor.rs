//! Input validation, fetching and parsing as one user-facing operation.
//!
//! Failures never leave a half-built recipe behind: the caller either gets a
//! complete [`Recipe`] or a [`ProcessError`] and keeps whatever it had before.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use super::parser::{parse, ParseOptions};
use super::source::{RecipeFetcher, RecipeInput};
use super::Recipe;

/// Shown when parsing blows up for reasons the user can't act on
pub const PROCESSING_FAILED_MESSAGE: &str = "Error processing recipe. Please try again.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Please provide a recipe to process.")]
    EmptyInput,

    #[error("Error processing recipe. Please try again.")]
    Processing(String),
}

pub struct RecipeProcessor {
    fetcher: Arc<dyn RecipeFetcher>,
    options: ParseOptions,
    delay: Duration,
}

impl RecipeProcessor {
    pub fn new(fetcher: Arc<dyn RecipeFetcher>, options: ParseOptions, delay: Duration) -> Self {
        Self {
            fetcher,
            options,
            delay,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Resolve the input to raw text. Fetch failures come back as empty text.
    pub async fn resolve_text(&self, input: &RecipeInput) -> String {
        match input {
            RecipeInput::Text(text) => text.trim().to_string(),
            RecipeInput::Transcript(transcript) => transcript.final_text().trim().to_string(),
            RecipeInput::Url(url) => {
                let url = url.trim();
                if url.is_empty() {
                    return String::new();
                }
                match self.fetcher.fetch(url).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(
                            fetcher = %self.fetcher.name(),
                            url = %url,
                            error = %e,
                            "Recipe fetch failed"
                        );
                        String::new()
                    }
                }
            }
        }
    }

    /// Produce a recipe from user input, waiting out the processing delay.
    ///
    /// The delay is a plain `tokio::time::sleep`, so other tasks (timer
    /// ticks, UI redraws) keep running while this is pending.
    pub async fn process(&self, input: RecipeInput) -> Result<Recipe, ProcessError> {
        let text = self.resolve_text(&input).await;
        if text.trim().is_empty() {
            info!("Rejected empty recipe input");
            return Err(ProcessError::EmptyInput);
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let options = self.options.clone();
        let recipe = tokio::task::spawn_blocking(move || parse(&text, &options))
            .await
            .map_err(|e| {
                error!(error = %e, "Recipe processing failed");
                ProcessError::Processing(e.to_string())
            })?;

        info!(
            title = %recipe.title,
            steps = recipe.steps.len(),
            total_time_minutes = recipe.total_time_minutes,
            "Recipe processed"
        );
        Ok(recipe)
    }
}
