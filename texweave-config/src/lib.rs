//! Shared configuration loader for the texweave toolchain.
//!
//! `defaults/texweave.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`TexweaveConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use texweave::{ConvertOptions, Traversal};

const DEFAULT_TOML: &str = include_str!("../defaults/texweave.default.toml");

/// Name of the optional per-project file picked up from the working directory.
pub const PROJECT_FILE: &str = "texweave.toml";

/// Top-level configuration consumed by texweave applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TexweaveConfig {
    pub convert: ConvertConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub html: HtmlConfig,
    pub packages: PackagesConfig,
    pub traversal: TraversalConfig,
}

/// Page-level settings of the HTML output.
#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub title: String,
    pub mathjax_url: String,
    #[serde(default)]
    pub custom_css: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackagesConfig {
    pub enabled: Vec<String>,
    #[serde(default)]
    pub preload: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraversalConfig {
    pub strategy: Traversal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub report_unknown: bool,
}

impl From<&TexweaveConfig> for ConvertOptions {
    fn from(config: &TexweaveConfig) -> Self {
        let convert = &config.convert;
        ConvertOptions {
            title: convert.html.title.clone(),
            mathjax_url: convert.html.mathjax_url.clone(),
            custom_css: convert.html.custom_css.clone(),
            enabled_packages: convert.packages.enabled.clone(),
            preload_packages: convert.packages.preload.clone(),
            traversal: convert.traversal.strategy,
            report_unknown: config.diagnostics.report_unknown,
        }
    }
}

impl From<TexweaveConfig> for ConvertOptions {
    fn from(config: TexweaveConfig) -> Self {
        ConvertOptions::from(&config)
    }
}

/// Builds a [`TexweaveConfig`] from layered sources.
///
/// Later layers win. The CLI stacks them in this order:
///
/// 1. the embedded `texweave.default.toml`
/// 2. `texweave.toml` in the project directory, when present ([`Loader::with_project_file`])
/// 3. the file named by `--config`, which must exist ([`Loader::with_config_file`])
/// 4. single keys set from command-line flags ([`Loader::set_override`])
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer [`PROJECT_FILE`] from `dir`. A project without one keeps the defaults.
    pub fn with_project_file(self, dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(PROJECT_FILE);
        self.layer(&path, false)
    }

    /// Layer an explicitly named file; building fails if it does not exist.
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set one dotted key, e.g. `convert.html.title`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<TexweaveConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<TexweaveConfig, ConfigError> {
    Loader::new().build()
}
