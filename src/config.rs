//! Build configuration
//!
//! Where definitions live, where output goes, and the fallbacks used when a
//! definition's `meta` section leaves fields out. Values come from defaults,
//! an optional TOML file, and finally CLI overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::template::TemplateConfig;

/// Directory searched for definitions when nothing else is configured
pub const DEFAULT_AGENTS_DIR: &str = ".claude/agents";

/// Errors that can occur when loading a build configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Fallback values for missing `meta` fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaDefaults {
    pub name: String,
    pub model: String,
}

impl Default for MetaDefaults {
    fn default() -> Self {
        Self {
            name: "agent".to_string(),
            model: "sonnet".to_string(),
        }
    }
}

/// Configuration for building agent definitions
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding definition files
    pub agents_dir: PathBuf,
    /// Directory for generated files; defaults to `agents_dir`
    pub output_dir: Option<PathBuf>,
    /// Root for include directives; defaults to `agents_dir`
    pub template_root: Option<PathBuf>,
    /// Definition file extension, without the dot
    pub extension: String,
    /// Template rendering options
    pub template: TemplateConfig,
    /// Fallbacks for missing metadata
    pub defaults: MetaDefaults,
    /// Render without writing output files
    pub dry_run: bool,
}

/// TOML structure for deserializing build configuration
#[derive(Deserialize, Default)]
struct TomlBuildConfig {
    paths: Option<TomlPaths>,
    render: Option<TomlRender>,
    defaults: Option<TomlDefaults>,
}

#[derive(Deserialize)]
struct TomlPaths {
    agents_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    template_root: Option<PathBuf>,
    extension: Option<String>,
}

#[derive(Deserialize)]
struct TomlRender {
    max_include_depth: Option<usize>,
    keep_trailing_newline: Option<bool>,
}

#[derive(Deserialize)]
struct TomlDefaults {
    name: Option<String>,
    model: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            agents_dir: PathBuf::from(DEFAULT_AGENTS_DIR),
            output_dir: None,
            template_root: None,
            extension: "j2".to_string(),
            template: TemplateConfig::default().with_keep_trailing_newline(false),
            defaults: MetaDefaults::default(),
            dry_run: false,
        }
    }
}

impl BuildConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    ///
    /// Every table and key is optional; anything left out keeps its default.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlBuildConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(paths) = parsed.paths {
            if let Some(dir) = paths.agents_dir {
                config.agents_dir = dir;
            }
            config.output_dir = paths.output_dir.or(config.output_dir);
            config.template_root = paths.template_root.or(config.template_root);
            if let Some(ext) = paths.extension {
                config.extension = ext.trim_start_matches('.').to_string();
            }
        }

        if let Some(render) = parsed.render {
            if let Some(depth) = render.max_include_depth {
                config.template.max_include_depth = depth;
            }
            if let Some(keep) = render.keep_trailing_newline {
                config.template.keep_trailing_newline = keep;
            }
        }

        if let Some(defaults) = parsed.defaults {
            if let Some(name) = defaults.name {
                config.defaults.name = name;
            }
            if let Some(model) = defaults.model {
                config.defaults.model = model;
            }
        }

        Ok(config)
    }

    /// Set the definitions directory
    pub fn with_agents_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.agents_dir = dir.into();
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the include root
    pub fn with_template_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_root = Some(dir.into());
        self
    }

    /// Set the template configuration
    pub fn with_template(mut self, config: TemplateConfig) -> Self {
        self.template = config;
        self
    }

    /// Set the metadata fallbacks
    pub fn with_defaults(mut self, defaults: MetaDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Directory generated files are written to
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.agents_dir)
    }

    /// Directory include paths are resolved against
    pub fn template_root(&self) -> &Path {
        self.template_root.as_deref().unwrap_or(&self.agents_dir)
    }

    /// Path of the definition file for an agent name
    pub fn definition_path(&self, name: &str) -> PathBuf {
        self.agents_dir.join(format!("{}.{}", name, self.extension))
    }
}
