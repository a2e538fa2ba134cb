//! Command-line interface for motori.
//!
//! Provides commands for generating an article, validating the content
//! tree, previewing slugs and showing the resolved configuration.
//!
//! `generate` reads the same environment variables as the CI workflow
//! (CATEGORY, USER_PROMPT, IMAGE_QUERY, OPENAI_API_KEY, UNSPLASH_ACCESS_KEY)
//! so it can run unattended.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{self, ConfigOverrides, GeneratorConfig};
use crate::core::{CollisionStrategy, Orchestrator, Slug};
use crate::domain::{check_tree, Category, GenerationRequest, DEFAULT_BRIEF};

/// motori - LLM-assisted article drafting
#[derive(Parser, Debug)]
#[command(name = "motori")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one article (and its cover, if possible)
    Generate(GenerateArgs),

    /// Validate the front-matter of every document
    Check {
        /// Content root (defaults to the configured one)
        #[arg(long, env = "MOTORI_CONTENT_ROOT")]
        content_root: Option<PathBuf>,
    },

    /// Print the slug a title would get
    Slug {
        /// Article title
        title: String,
    },

    /// Show resolved configuration (debug)
    Config(KeyArgs),
}

/// API keys, read from flags or the environment
#[derive(Args, Debug, Default)]
pub struct KeyArgs {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Unsplash access key (covers are skipped without it)
    #[arg(long, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    pub unsplash_access_key: Option<String>,
}

impl KeyArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            openai_api_key: self.openai_api_key.clone(),
            unsplash_access_key: self.unsplash_access_key.clone(),
            ..Default::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Category: news, tests or guides (unknown values fall back to news)
    #[arg(short, long, env = "CATEGORY", default_value = "news")]
    pub category: String,

    /// Topic handed to the model
    #[arg(short, long, env = "USER_PROMPT", default_value = DEFAULT_BRIEF)]
    pub brief: String,

    /// Cover photo search query (defaults to the brief)
    #[arg(long, env = "IMAGE_QUERY")]
    pub image_query: Option<String>,

    /// What to do when a document with the same slug exists
    #[arg(long, value_enum, env = "MOTORI_COLLISION")]
    pub collision: Option<CollisionMode>,

    /// Content root (collections live in <root>/<category>/)
    #[arg(long, env = "MOTORI_CONTENT_ROOT")]
    pub content_root: Option<PathBuf>,

    /// Directory for downloaded covers
    #[arg(long, env = "MOTORI_IMAGE_ROOT")]
    pub image_root: Option<PathBuf>,

    #[command(flatten)]
    pub keys: KeyArgs,
}

/// Collision strategy for CLI (maps to CollisionStrategy)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CollisionMode {
    /// Replace an existing <slug>.md
    Overwrite,

    /// Write <slug>-<unix millis>.md
    Timestamp,
}

impl From<CollisionMode> for CollisionStrategy {
    fn from(mode: CollisionMode) -> Self {
        match mode {
            CollisionMode::Overwrite => CollisionStrategy::Overwrite,
            CollisionMode::Timestamp => CollisionStrategy::Timestamp,
        }
    }
}

impl GenerateArgs {
    /// Build the generation request from the arguments
    pub fn request(&self) -> GenerationRequest {
        let category = Category::parse_lenient(&self.category);
        let brief = match self.brief.trim() {
            "" => DEFAULT_BRIEF,
            brief => brief,
        };

        let request = GenerationRequest::new(category, brief);
        match self.image_query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => request.with_image_query(query),
            _ => request,
        }
    }

    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            content_root: self.content_root.clone(),
            image_root: self.image_root.clone(),
            collision: self.collision.map(Into::into),
            ..self.keys.overrides()
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Generate(args) => generate(args).await,
            Commands::Check { content_root } => check(content_root),
            Commands::Slug { title } => {
                println!("{}", Slug::from_title(&title));
                Ok(())
            }
            Commands::Config(keys) => show_config(keys),
        }
    }
}

/// Generate one article
async fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = config::load_from_current_dir()?;
    config.apply(args.overrides());

    // Fails before any network call when OPENAI_API_KEY is missing
    let orchestrator = Orchestrator::from_config(&config)?;
    let request = args.request();

    eprintln!(
        "→ Generazione: {} | brief=\"{}\"",
        request.category, request.brief
    );

    let outcome = orchestrator
        .run(&request)
        .await
        .context("Article generation failed")?;

    println!("{}", outcome.document_path.display());
    match outcome.cover_path {
        Some(path) => eprintln!("✔ Cover: {}", path.display()),
        None => eprintln!("⚠ Cover: placeholder ({})", config.writer.placeholder_image),
    }

    Ok(())
}

/// Validate every document under the content root
fn check(content_root: Option<PathBuf>) -> Result<()> {
    let mut config = config::load_from_current_dir()?;
    config.apply(ConfigOverrides {
        content_root,
        ..Default::default()
    });

    let root = &config.writer.content_root;
    let checks = check_tree(root)?;

    if checks.is_empty() {
        println!("No documents found under {}", root.display());
        return Ok(());
    }

    let mut invalid = 0usize;
    for check in &checks {
        match &check.outcome {
            Ok(front_matter) => println!(
                "ok       {:<8} {}  ({})",
                check.category,
                check.path.display(),
                front_matter.pub_date
            ),
            Err(problem) => {
                invalid += 1;
                println!(
                    "INVALID  {:<8} {}: {}",
                    check.category,
                    check.path.display(),
                    problem
                );
            }
        }
    }

    println!("\n{} documents, {} invalid", checks.len(), invalid);

    if invalid > 0 {
        anyhow::bail!("{} document(s) failed validation", invalid);
    }

    Ok(())
}

/// Show resolved configuration
fn show_config(keys: KeyArgs) -> Result<()> {
    let mut config = config::load_from_current_dir()?;
    config.apply(keys.overrides());

    for line in config_lines(&config) {
        println!("{}", line);
    }
    Ok(())
}

/// Resolved settings as printed by `motori config`; keys are only reported as set or not
fn config_lines(config: &GeneratorConfig) -> Vec<String> {
    let set_or_unset = |key: &Option<String>| if key.is_some() { "set" } else { "not set" };

    vec![
        format!(
            "Config file:     {}",
            match &config.config_file {
                Some(path) => path.display().to_string(),
                None => "(none, using defaults)".to_string(),
            }
        ),
        format!("Content root:    {}", config.writer.content_root.display()),
        format!("Image root:      {}", config.writer.image_root.display()),
        format!("Placeholder:     {}", config.writer.placeholder_image),
        format!("Collision:       {}", config.writer.collision),
        format!("Author:          {}", config.writer.author),
        format!("Tags:            {}", config.writer.tags.join(", ")),
        format!("Model:           {} (temperature {})", config.model, config.temperature),
        format!("OPENAI_API_KEY:  {}", set_or_unset(&config.openai_api_key)),
        format!("UNSPLASH_ACCESS_KEY: {}", set_or_unset(&config.unsplash_access_key)),
    ]
}
