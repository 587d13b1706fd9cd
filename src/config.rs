use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::recipe::SkillLevel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub voice: VoiceConfig,
    pub timers: TimersConfig,
    pub recipe: RecipeConfig,
    pub notifications: NotificationsConfig,
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Speak announcements (step changes, timer confirmations)
    pub enabled: bool,
    /// BCP 47 language tag passed to the speech command as `{lang}`
    pub language: String,
    /// External text-to-speech command, e.g. "espeak -v {lang}" or "say".
    /// The utterance is appended as the final argument. Unset = log only.
    #[serde(default)]
    pub tts_command: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersConfig {
    /// 0-100; 0 silences the completion bell
    pub volume: u8,
    pub sound: String,
    /// Seconds a finished timer stays listed before it is removed
    #[serde(default = "default_grace_period")]
    pub grace_period_secs: u32,
    /// Steps longer than this many minutes get a timer automatically
    #[serde(default = "default_auto_suggest_threshold")]
    pub auto_suggest_threshold_minutes: u32,
}

fn default_grace_period() -> u32 {
    10
}

fn default_auto_suggest_threshold() -> u32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeConfig {
    pub servings: u32,
    pub skill_level: SkillLevel,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Artificial delay before a parsed recipe is shown (default: 2000)
    #[serde(default = "default_processing_delay")]
    pub processing_delay_ms: u64,
}

fn default_processing_delay() -> u64 {
    2000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub enabled: bool,
    pub sound: bool,
    pub on_timer_suggested: bool,
    pub on_timer_complete: bool,
    pub on_recipe_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,

    /// Directory for log files; defaults to the platform state directory
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
            dir: None,
        }
    }
}

/// Recipe page fetching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_fetch_retries")]
    pub max_retries: usize,
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_fetch_retries() -> usize {
    3
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            max_retries: default_fetch_retries(),
        }
    }
}

impl Config {
    /// Project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("sous.toml")
    }

    /// Per-user config file in the platform config directory
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sous").join("config.toml"))
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so sous works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with SOUS_ prefix, e.g. SOUS__VOICE__ENABLED=false
        builder = builder.add_source(
            config::Environment::with_prefix("SOUS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save settings to the per-user config file
    pub fn save(&self) -> Result<PathBuf> {
        let config_path =
            Self::user_config_path().context("No config directory on this platform")?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str = self.to_toml()?;
        std::fs::write(config_path, toml_str).context("Failed to write config file")?;
        tracing::info!(path = %config_path.display(), "Configuration saved");

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Directory holding log files
    pub fn logs_path(&self) -> PathBuf {
        if let Some(dir) = &self.logging.dir {
            return PathBuf::from(dir);
        }
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("sous")
            .join("logs")
    }

    /// Add or drop a dietary restriction tag. Returns true when the tag is now set.
    pub fn toggle_dietary_restriction(&mut self, tag: &str) -> bool {
        let restrictions = &mut self.recipe.dietary_restrictions;
        if let Some(pos) = restrictions.iter().position(|t| t == tag) {
            restrictions.remove(pos);
            false
        } else {
            restrictions.push(tag.to_string());
            true
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            voice: VoiceConfig {
                enabled: true,
                language: "en-US".to_string(),
                tts_command: None,
            },
            timers: TimersConfig {
                volume: 80,
                sound: "bell".to_string(),
                grace_period_secs: default_grace_period(),
                auto_suggest_threshold_minutes: default_auto_suggest_threshold(),
            },
            recipe: RecipeConfig {
                servings: 4,
                skill_level: SkillLevel::Intermediate,
                dietary_restrictions: Vec::new(),
                processing_delay_ms: default_processing_delay(),
            },
            notifications: NotificationsConfig {
                enabled: true,
                sound: true,
                on_timer_suggested: true,
                on_timer_complete: true,
                on_recipe_complete: true,
            },
            ui: UiConfig {
                refresh_rate_ms: 250,
            },
            logging: LoggingConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}
