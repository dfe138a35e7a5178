//! Layered configuration for marginalia.
//!
//! Sources, later overriding earlier:
//! - Bundled defaults (include_str! from marginalia.toml)
//! - `~/.config/marginalia/marginalia.toml`
//! - `./marginalia.toml`
//! - `MARGINALIA__<SECTION>__<KEY>` environment variables

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use marginalia_error::{ConfigError, MarginaliaError, MarginaliaResult};
use marginalia_lookup::LookupConfig;
use marginalia_markers::{CatalogConfig, EngineConfig};
use marginalia_models::GeneratorConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../marginalia.toml");

/// Top-level marginalia configuration.
///
/// # Example
///
/// ```no_run
/// use marginalia::MarginaliaConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MarginaliaConfig::load()?;
/// println!("Iteration cap: {}", config.engine.max_iterations());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarginaliaConfig {
    /// Resolution loop settings
    #[serde(default)]
    pub engine: EngineConfig,
    /// Reference lookup client settings
    #[serde(default)]
    pub lookup: LookupConfig,
    /// Generative backend settings
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Handler catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl MarginaliaConfig {
    /// Load configuration with precedence: environment > current dir >
    /// home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the merged
    /// configuration is invalid.
    #[instrument]
    pub fn load() -> MarginaliaResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/marginalia/marginalia.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("marginalia").required(false))
            .add_source(
                Environment::with_prefix("MARGINALIA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    /// Load a single file over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, cannot be parsed, or the
    /// merged configuration is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MarginaliaResult<Self> {
        debug!("Loading configuration from file");
        Self::finish(Self::defaults().add_source(File::from(path.as_ref())))
    }

    /// Parse configuration from a TOML string over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or the merged
    /// configuration is invalid.
    pub fn from_toml_str(toml: &str) -> MarginaliaResult<Self> {
        Self::finish(Self::defaults().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> MarginaliaResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                MarginaliaError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MarginaliaError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for values the system cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.catalog.validate()?;

        if *self.lookup.timeout_secs() == 0 {
            return Err(ConfigError::new("lookup.timeout_secs must be at least 1"));
        }
        if self.lookup.summary_url().trim().is_empty() {
            return Err(ConfigError::new("lookup.summary_url must not be empty"));
        }
        if *self.generator.enabled() {
            if self.generator.base_url().trim().is_empty() {
                return Err(ConfigError::new("generator.base_url must not be empty"));
            }
            if self.generator.model().trim().is_empty() {
                return Err(ConfigError::new("generator.model must not be empty"));
            }
        }
        Ok(())
    }
}
