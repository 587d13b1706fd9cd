use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sous::app::App;
use sous::config::Config;
use sous::events::EventBus;
use sous::logging;
use sous::notifications::NotificationService;
use sous::recipe::{
    parse, HttpRecipeFetcher, ParseOptions, Recipe, RecipeFetcher, RecipeProcessor, SkillLevel,
    StaticRecipeFetcher,
};
use sous::speech::Speaker;

#[derive(Parser)]
#[command(name = "sous")]
#[command(about = "Cooking companion that turns free-text recipes into timed steps")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Serve the built-in sample recipe for every URL instead of fetching
    #[arg(long, global = true)]
    demo: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a recipe file (or `-` for stdin) and print the result
    Parse {
        input: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        meta: MetaArgs,
    },

    /// Fetch a recipe page and print the parsed result
    Fetch {
        url: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        meta: MetaArgs,
    },

    /// Start cooking a recipe file straight away
    Cook {
        file: String,

        #[command(flatten)]
        meta: MetaArgs,
    },

    /// Show or change the persisted configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ConfigAction {
    /// Print the effective configuration as TOML (default)
    Show,

    /// Set a dietary restriction tag, or clear it if already set, and save
    Diet { tag: String },
}

/// Recipe metadata overrides; unset values come from `[recipe]` config
#[derive(clap::Args, Debug, Default)]
struct MetaArgs {
    #[arg(long)]
    servings: Option<u32>,

    /// beginner, intermediate or advanced
    #[arg(long)]
    skill: Option<SkillLevel>,

    /// Dietary restriction tag (repeatable)
    #[arg(long = "diet")]
    diet: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl MetaArgs {
    fn parse_options(&self, config: &Config) -> ParseOptions {
        let mut options = ParseOptions::from_config(&config.recipe);
        if let Some(servings) = self.servings {
            options.servings = servings;
        }
        if let Some(skill) = self.skill {
            options.skill_level = skill;
        }
        options.dietary_restrictions.extend(self.diet.iter().cloned());
        options
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration first; logging depends on it
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = matches!(cli.command, None | Some(Commands::Cook { .. }));
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Parse {
            input,
            format,
            meta,
        }) => {
            cmd_parse(&config, &input, format, &meta)?;
        }
        Some(Commands::Fetch { url, format, meta }) => {
            cmd_fetch(&config, &url, format, &meta, cli.demo).await?;
        }
        Some(Commands::Cook { file, meta }) => {
            let text = read_input(&file)?;
            let recipe = parse(&text, &meta.parse_options(&config));
            run_tui(config, Some(recipe), cli.demo, logging_handle.log_file_path).await?;
        }
        Some(Commands::Config { action }) => {
            let mut config = config;
            cmd_config(&mut config, action, cli.config.as_deref())?;
        }
        None => {
            run_tui(config, None, cli.demo, logging_handle.log_file_path).await?;
        }
    }

    Ok(())
}

fn fetcher_for(config: &Config, demo: bool) -> Result<Arc<dyn RecipeFetcher>> {
    if demo {
        return Ok(Arc::new(StaticRecipeFetcher));
    }
    let fetcher = HttpRecipeFetcher::new(&config.fetch).context("Failed to build HTTP client")?;
    Ok(Arc::new(fetcher))
}

async fn run_tui(
    config: Config,
    recipe: Option<Recipe>,
    demo: bool,
    log_file_path: Option<PathBuf>,
) -> Result<()> {
    let events = EventBus::new();
    let notifications = NotificationService::from_config(&config);
    tracing::debug!(
        enabled = notifications.is_enabled(),
        integrations = notifications.integration_count(),
        "Notification service ready"
    );
    events.subscribe(Arc::new(notifications));
    events.subscribe(Arc::new(Speaker::from_config(&config.voice)));

    let processor = RecipeProcessor::new(
        fetcher_for(&config, demo)?,
        ParseOptions::from_config(&config.recipe),
        Duration::from_millis(config.recipe.processing_delay_ms),
    );

    let mut app = App::new(config, processor, events);
    if let Some(recipe) = recipe {
        app.start_cooking(recipe);
    }
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read recipe from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read recipe file {}", path))
}

fn cmd_parse(config: &Config, input: &str, format: OutputFormat, meta: &MetaArgs) -> Result<()> {
    let text = read_input(input)?;
    let recipe = parse(&text, &meta.parse_options(config));
    print_recipe(&recipe, format)
}

async fn cmd_fetch(
    config: &Config,
    url: &str,
    format: OutputFormat,
    meta: &MetaArgs,
    demo: bool,
) -> Result<()> {
    let fetcher = fetcher_for(config, demo)?;
    let text = fetcher
        .fetch(url)
        .await
        .with_context(|| format!("Failed to fetch recipe from {}", url))?;

    let recipe = parse(&text, &meta.parse_options(config));
    print_recipe(&recipe, format)
}

fn cmd_config(
    config: &mut Config,
    action: Option<ConfigAction>,
    config_path: Option<&str>,
) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => print!("{}", config.to_toml()?),
        ConfigAction::Diet { tag } => {
            let set = config.toggle_dietary_restriction(&tag);
            let path = save_config(config, config_path)?;
            let verb = if set { "Added" } else { "Removed" };
            println!(
                "{} dietary restriction '{}' ({})",
                verb,
                tag,
                path.display()
            );
        }
    }
    Ok(())
}

/// Write to the `--config` file when one was given, else the per-user file
fn save_config(config: &Config, config_path: Option<&str>) -> Result<PathBuf> {
    match config_path {
        Some(path) => {
            let path = PathBuf::from(path);
            config.save_to(&path)?;
            Ok(path)
        }
        None => config.save(),
    }
}

fn print_recipe(recipe: &Recipe, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", recipe.format_summary()),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(recipe).context("Failed to serialize recipe")?;
            println!("{}", json);
        }
    }
    Ok(())
}
