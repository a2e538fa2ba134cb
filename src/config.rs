//! Configuration for motori.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags and environment variables (OPENAI_API_KEY,
//!    UNSPLASH_ACCESS_KEY, MOTORI_COLLISION, ...), applied by the CLI
//! 2. Config file (.motori/config.yaml, then the user config dir)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches the start directory and parents for .motori/config.yaml
//! - Falls back to <user config dir>/motori/config.yaml
//! - Paths in a project config file are relative to the directory that
//!   holds `.motori/`
//!
//! API keys are never read from the config file.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::openai::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::core::error::GenerationError;
use crate::core::writer::{CollisionStrategy, WriterSettings};

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub model: Option<ModelConfig>,
    #[serde(default)]
    pub images: Option<ImagesConfig>,
    #[serde(default)]
    pub front_matter: Option<FrontMatterConfig>,
    #[serde(default)]
    pub collision: Option<CollisionStrategy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Markdown collections root (relative to the project root)
    pub content_root: Option<String>,
    /// Cover images directory (relative to the project root)
    pub image_root: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub name: Option<String>,
    pub temperature: Option<f32>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    pub placeholder: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrontMatterConfig {
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Fully resolved configuration handed to the orchestrator
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Required for generation; checked before any request
    pub openai_api_key: Option<String>,
    /// Optional; covers are skipped without it
    pub unsplash_access_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub openai_base_url: Option<String>,
    pub unsplash_base_url: Option<String>,
    /// Per-request HTTP timeout (none by default)
    pub timeout_seconds: Option<u64>,
    pub writer: WriterSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |k: &Option<String>| k.as_ref().map(|_| "<redacted>");
        f.debug_struct("GeneratorConfig")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("unsplash_access_key", &redact(&self.unsplash_access_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("openai_base_url", &self.openai_base_url)
            .field("unsplash_base_url", &self.unsplash_base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("writer", &self.writer)
            .field("config_file", &self.config_file)
            .finish()
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl GeneratorConfig {
    /// Built-in defaults, no keys
    pub fn defaults() -> Self {
        Self {
            openai_api_key: None,
            unsplash_access_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            openai_base_url: None,
            unsplash_base_url: None,
            timeout_seconds: None,
            writer: WriterSettings::default(),
            config_file: None,
        }
    }

    /// The OpenAI key, or a configuration error when unset
    pub fn require_openai_key(&self) -> std::result::Result<&str, GenerationError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| GenerationError::Configuration("OPENAI_API_KEY is not set".to_string()))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Apply command-line / environment overrides
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(key) = non_empty(overrides.openai_api_key) {
            self.openai_api_key = Some(key);
        }
        if let Some(key) = non_empty(overrides.unsplash_access_key) {
            self.unsplash_access_key = Some(key);
        }
        if let Some(root) = overrides.content_root {
            self.writer.content_root = root;
        }
        if let Some(root) = overrides.image_root {
            self.writer.image_root = root;
        }
        if let Some(collision) = overrides.collision {
            self.writer.collision = collision;
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub openai_api_key: Option<String>,
    pub unsplash_access_key: Option<String>,
    pub content_root: Option<PathBuf>,
    pub image_root: Option<PathBuf>,
    pub collision: Option<CollisionStrategy>,
}

/// CI secrets that are not configured arrive as empty strings
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".motori").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let user_config = dirs::config_dir()?.join("motori").join("config.yaml");
    user_config.exists().then_some(user_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Merge a parsed config file over the defaults
fn merge_file(config_path: &Path, file: ConfigFile) -> GeneratorConfig {
    let mut config = GeneratorConfig::defaults();

    // Project root is the parent of .motori/; a user-level file keeps
    // paths relative to the working directory.
    let base_dir = match config_path.parent() {
        Some(dir) if dir.file_name() == Some(OsStr::new(".motori")) => {
            dir.parent().unwrap_or(Path::new(""))
        }
        _ => Path::new(""),
    };

    if let Some(ref root) = file.paths.content_root {
        config.writer.content_root = resolve_path(base_dir, root);
    } else {
        config.writer.content_root = base_dir.join(&config.writer.content_root);
    }
    if let Some(ref root) = file.paths.image_root {
        config.writer.image_root = resolve_path(base_dir, root);
    } else {
        config.writer.image_root = base_dir.join(&config.writer.image_root);
    }

    if let Some(model) = file.model {
        if let Some(name) = model.name {
            config.model = name;
        }
        config.temperature = model.temperature.unwrap_or(config.temperature);
        config.openai_base_url = model.base_url;
        config.timeout_seconds = model.timeout_seconds;
    }

    if let Some(images) = file.images {
        if let Some(placeholder) = images.placeholder {
            config.writer.placeholder_image = placeholder;
        }
        config.unsplash_base_url = images.base_url;
    }

    if let Some(front_matter) = file.front_matter {
        if let Some(author) = front_matter.author {
            config.writer.author = author;
        }
        if let Some(tags) = front_matter.tags {
            config.writer.tags = tags;
        }
    }

    if let Some(collision) = file.collision {
        config.writer.collision = collision;
    }

    config.config_file = Some(config_path.to_path_buf());
    config
}

/// Load configuration, searching for a config file from `start`
pub fn load_config(start: &Path) -> Result<GeneratorConfig> {
    match find_config_file(start) {
        Some(path) => {
            let file = load_config_file(&path)?;
            Ok(merge_file(&path, file))
        }
        None => Ok(GeneratorConfig::defaults()),
    }
}

/// Load configuration from the current directory
pub fn load_from_current_dir() -> Result<GeneratorConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config(&cwd)
}
