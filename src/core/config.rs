//! Configuration loading and layered resolution.
//!
//! The config file lives at `~/.config/msq/config.toml` on Linux/macOS and
//! `%APPDATA%/msq/config.toml` on Windows. Every setting resolves through
//! the same layers, highest priority first: CLI flag, environment variable,
//! config file, built-in default. [`ConfigSources`] records which layer won
//! for each setting.
//!
//! ## Environment Variables
//!
//! - `MSQ_API_KEY`: Credential forwarded to the upstream probes
//! - `MSQ_ENDPOINT`: Upstream chat-completions URL
//! - `MSQ_TIMEOUT_SECS`: Per-attempt timeout in seconds
//! - `MSQ_MAX_RETRIES`: Additional attempts after the first
//! - `MSQ_HOST` / `MSQ_PORT`: Bind address for `msq serve`
//! - `MSQ_FORMAT`: Output format (human, json, md)
//! - `MSQ_NO_COLOR` or `NO_COLOR`: Disable colors (1, true, yes)
//! - `MSQ_PRETTY`: Pretty-print JSON output (1, true, yes)
//! - `MSQ_CONFIG`: Override config file path

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::args::{Cli, OutputFormat, ProbeArgs, ServeArgs};
use crate::core::probe::{DEFAULT_BACKOFF_UNIT, DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES};
use crate::error::{MsqError, Result};

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable for the upstream API key.
pub const ENV_API_KEY: &str = "MSQ_API_KEY";
/// Environment variable for the upstream endpoint URL.
pub const ENV_ENDPOINT: &str = "MSQ_ENDPOINT";
/// Environment variable for the per-attempt timeout in seconds.
pub const ENV_TIMEOUT: &str = "MSQ_TIMEOUT_SECS";
/// Environment variable for the retry budget.
pub const ENV_MAX_RETRIES: &str = "MSQ_MAX_RETRIES";
/// Environment variable for the serve bind host.
pub const ENV_HOST: &str = "MSQ_HOST";
/// Environment variable for the serve bind port.
pub const ENV_PORT: &str = "MSQ_PORT";
/// Environment variable for output format.
pub const ENV_FORMAT: &str = "MSQ_FORMAT";
/// Environment variable to disable colors.
pub const ENV_NO_COLOR: &str = "MSQ_NO_COLOR";
/// Standard environment variable to disable colors.
pub const ENV_NO_COLOR_STD: &str = "NO_COLOR";
/// Environment variable for pretty JSON output.
pub const ENV_PRETTY: &str = "MSQ_PRETTY";
/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "MSQ_CONFIG";

// =============================================================================
// Resolved Configuration
// =============================================================================

/// The final configuration after walking every layer.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Upstream endpoint probed by the batch.
    pub endpoint: String,
    /// Credential, when any layer provided one.
    pub api_key: Option<String>,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Additional attempts after the first.
    pub max_retries: u32,
    /// Linear backoff multiplicand.
    pub backoff_unit: Duration,
    /// Bind host for `msq serve`.
    pub host: String,
    /// Bind port for `msq serve`.
    pub port: u16,
    /// Output format.
    pub format: OutputFormat,
    /// Suppress colored output.
    pub no_color: bool,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

/// Which layer supplied each setting, kept for debug logging.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub endpoint: ConfigSource,
    pub api_key: ConfigSource,
    pub timeout: ConfigSource,
    pub max_retries: ConfigSource,
    pub host: ConfigSource,
    pub port: ConfigSource,
    pub format: ConfigSource,
    pub no_color: ConfigSource,
    pub pretty: ConfigSource,
}

/// The layer a setting resolved from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    Env,
    ConfigFile,
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Walk one setting's layers: CLI flag, then environment, then the given
/// fallback layer (config file or default), recording which one won.
fn pick<T>(
    source: &mut ConfigSource,
    cli: Option<T>,
    env: Option<T>,
    fallback: (ConfigSource, T),
) -> T {
    if let Some(value) = cli {
        *source = ConfigSource::Cli;
        value
    } else if let Some(value) = env {
        *source = ConfigSource::Env;
        value
    } else {
        *source = fallback.0;
        fallback.1
    }
}

/// A non-blank environment variable value.
fn env_string(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// An environment variable parsed as `T`; unset, blank, and unparseable
/// all fall through to the next layer.
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_string(name).and_then(|value| value.parse().ok())
}

/// Whether an environment variable holds a truthy value.
fn env_truthy(name: &str) -> bool {
    env_string(name)
        .is_some_and(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl ResolvedConfig {
    /// Walk every layer and assemble the final configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if any of its values fail validation.
    pub fn resolve(
        cli: &Cli,
        probe_args: Option<&ProbeArgs>,
        serve_args: Option<&ServeArgs>,
    ) -> Result<Self> {
        let config = Self::load_config(cli)?;
        config.validate()?;

        let mut sources = ConfigSources::default();

        let endpoint = pick(
            &mut sources.endpoint,
            None,
            env_string(ENV_ENDPOINT),
            if config.probe.endpoint == DEFAULT_ENDPOINT {
                (ConfigSource::Default, DEFAULT_ENDPOINT.to_string())
            } else {
                (ConfigSource::ConfigFile, config.probe.endpoint.clone())
            },
        );

        let api_key = Self::resolve_api_key(probe_args, &config, &mut sources.api_key);

        let timeout = Duration::from_secs(pick(
            &mut sources.timeout,
            probe_args.and_then(|args| args.timeout),
            env_parse::<u64>(ENV_TIMEOUT),
            (ConfigSource::ConfigFile, config.general.timeout_secs),
        ));

        let max_retries = pick(
            &mut sources.max_retries,
            probe_args.and_then(|args| args.max_retries),
            env_parse::<u32>(ENV_MAX_RETRIES),
            (ConfigSource::ConfigFile, config.general.max_retries),
        );

        let backoff_unit = Duration::from_millis(config.general.backoff_unit_ms);

        let host = pick(
            &mut sources.host,
            serve_args.and_then(|args| args.host.clone()),
            env_string(ENV_HOST),
            (ConfigSource::ConfigFile, config.serve.host.clone()),
        );

        let port = pick(
            &mut sources.port,
            serve_args.and_then(|args| args.port),
            env_parse::<u16>(ENV_PORT),
            (ConfigSource::ConfigFile, config.serve.port),
        );

        let format = Self::resolve_format(cli, &config, &mut sources.format)?;

        // NO_COLOR follows the informal standard: presence alone disables
        // color, whatever the value.
        let no_color = pick(
            &mut sources.no_color,
            cli.no_color.then_some(true),
            (env_truthy(ENV_NO_COLOR) || std::env::var_os(ENV_NO_COLOR_STD).is_some())
                .then_some(true),
            if config.output.color {
                (ConfigSource::Default, false)
            } else {
                (ConfigSource::ConfigFile, true)
            },
        );

        let pretty = pick(
            &mut sources.pretty,
            cli.pretty.then_some(true),
            env_truthy(ENV_PRETTY).then_some(true),
            if config.output.pretty {
                (ConfigSource::ConfigFile, true)
            } else {
                (ConfigSource::Default, false)
            },
        );

        Ok(Self {
            endpoint,
            api_key,
            timeout,
            max_retries,
            backoff_unit,
            host,
            port,
            format,
            no_color,
            pretty,
            sources,
        })
    }

    /// The probe knobs this configuration resolves to.
    #[must_use]
    pub fn probe_settings(&self) -> crate::core::probe::ProbeSettings {
        crate::core::probe::ProbeSettings {
            endpoint: self.endpoint.clone(),
            timeout: self.timeout,
            max_retries: self.max_retries,
            backoff_unit: self.backoff_unit,
        }
    }

    /// The resolved credential, rejecting absence and blank values.
    ///
    /// # Errors
    ///
    /// Returns [`MsqError::CredentialMissing`] when no layer provided a key,
    /// [`MsqError::BlankCredential`] when the provided key is whitespace.
    pub fn require_api_key(&self) -> Result<&str> {
        let key = self.api_key.as_deref().ok_or(MsqError::CredentialMissing)?;
        if key.trim().is_empty() {
            return Err(MsqError::BlankCredential);
        }
        Ok(key)
    }

    /// Load config file, respecting --config and MSQ_CONFIG overrides.
    fn load_config(cli: &Cli) -> Result<Config> {
        if let Some(path) = &cli.config {
            return Config::load_from(path);
        }
        if let Ok(path) = std::env::var(ENV_CONFIG) {
            return Config::load_from(Path::new(&path));
        }
        Config::load()
    }

    fn resolve_api_key(
        probe_args: Option<&ProbeArgs>,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Option<String> {
        let layers = [
            (
                ConfigSource::Cli,
                probe_args.and_then(|args| args.api_key.clone()),
            ),
            (ConfigSource::Env, env_string(ENV_API_KEY)),
            (ConfigSource::ConfigFile, config.probe.api_key.clone()),
        ];
        for (layer, key) in layers {
            if let Some(key) = key {
                *source = layer;
                return Some(key);
            }
        }
        *source = ConfigSource::Default;
        None
    }

    /// Format resolution is the one setting where a CLI layer can be
    /// implicit: clap gives `--format` a default, so only a non-default
    /// value counts as a CLI choice, and `--json` is a shorthand that
    /// always does.
    fn resolve_format(
        cli: &Cli,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Result<OutputFormat> {
        if cli.json {
            *source = ConfigSource::Cli;
            return Ok(OutputFormat::Json);
        }
        if cli.format != OutputFormat::Human {
            *source = ConfigSource::Cli;
            return Ok(cli.format);
        }
        if let Some(value) = env_string(ENV_FORMAT) {
            *source = ConfigSource::Env;
            return Self::parse_format(&value);
        }
        if let Some(value) = &config.output.format {
            *source = ConfigSource::ConfigFile;
            return Self::parse_format(value);
        }
        *source = ConfigSource::Default;
        Ok(OutputFormat::Human)
    }

    fn parse_format(s: &str) -> Result<OutputFormat> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Md),
            _ => Err(MsqError::Config(format!(
                "Invalid format '{s}'. Valid formats: human, json, md"
            ))),
        }
    }

}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Probe settings.
    pub probe: ProbeConfig,
    /// HTTP service settings.
    pub serve: ServeConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Per-attempt timeout for probe requests in seconds.
    pub timeout_secs: u64,
    /// Additional attempts after the first for transient failures.
    pub max_retries: u32,
    /// Linear backoff multiplicand in milliseconds.
    pub backoff_unit_ms: u64,
}

/// Probe-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Upstream chat-completions endpoint.
    pub endpoint: String,
    /// Credential, when stored in the config file.
    pub api_key: Option<String>,
}

/// Bind address for `msq serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (human, json, md).
    pub format: Option<String>,
    /// Whether to use colors in output.
    pub color: bool,
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            probe: ProbeConfig::default(),
            serve: ServeConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_unit_ms: DEFAULT_BACKOFF_UNIT.as_millis() as u64,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            pretty: false,
        }
    }
}

impl Config {
    /// Load the config file from its platform default location.
    ///
    /// A missing file yields the defaults; only a file that exists but
    /// fails to parse is an error.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load the config file at `path`, with the same missing-file
    /// semantics as [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "loading config file");
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| MsqError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Write the config as pretty TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MsqError::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)?;
        tracing::debug!(?path, "config file saved");
        Ok(())
    }

    /// The platform default config file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "msq").map_or_else(
            || PathBuf::from(".msq/config.toml"),
            |dirs| dirs.config_dir().join("config.toml"),
        )
    }

    /// Reject out-of-range values before they reach the probe layer: the
    /// timeout must fall in 1-300 seconds, the retry budget in 0-10, the
    /// backoff unit must be nonzero, the endpoint non-blank, and the
    /// format one of human, json, md.
    pub fn validate(&self) -> Result<()> {
        if self.general.timeout_secs == 0 || self.general.timeout_secs > 300 {
            return Err(MsqError::ConfigInvalid {
                key: "general.timeout_secs".to_string(),
                message: "must be between 1 and 300 seconds".to_string(),
            });
        }

        if self.general.max_retries > 10 {
            return Err(MsqError::ConfigInvalid {
                key: "general.max_retries".to_string(),
                message: "must be between 0 and 10".to_string(),
            });
        }

        if self.general.backoff_unit_ms == 0 {
            return Err(MsqError::ConfigInvalid {
                key: "general.backoff_unit_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        if self.probe.endpoint.trim().is_empty() {
            return Err(MsqError::ConfigInvalid {
                key: "probe.endpoint".to_string(),
                message: "must not be blank".to_string(),
            });
        }

        if let Some(format) = &self.output.format
            && !["human", "json", "md"].contains(&format.as_str())
        {
            return Err(MsqError::ConfigInvalid {
                key: "output.format".to_string(),
                message: format!("invalid format \"{format}\". Valid formats: human, json, md"),
            });
        }

        Ok(())
    }
}
