/*
[INPUT]:  Optional YAML configuration file and SAPI_* environment variables
[OUTPUT]: Resolved CLI configuration, client config, credentials
[POS]:    Configuration layer - client setup
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

use sapi_adapter::{ClientConfig, Credentials, Environment as ApiEnvironment, RequestOption};

/// Prefix for environment overrides (`SAPI_API_KEY`, `SAPI_RECV_WINDOW`, ...)
pub const ENV_PREFIX: &str = "SAPI";

/// Top-level configuration for the CLI
#[derive(Clone, Deserialize)]
pub struct CliConfig {
    /// "production" or "testnet"
    #[serde(default)]
    pub environment: ApiEnvironment,
    /// Overrides the environment's base URL
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub secret_key: String,
    /// Receive window applied to every request, in milliseconds
    #[serde(default)]
    pub recv_window: Option<u64>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Log built requests and raw responses
    #[serde(default)]
    pub debug: bool,
    /// Milliseconds subtracted from local time for signed requests
    #[serde(default)]
    pub time_offset: i64,
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .field("recv_window", &self.recv_window)
            .field("timeout_ms", &self.timeout_ms)
            .field("debug", &self.debug)
            .field("time_offset", &self.time_offset)
            .finish()
    }
}

impl CliConfig {
    /// Load configuration from an optional YAML file, then `SAPI_*` overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
        }
        Self::build(builder.add_source(env_source()))
            .with_context(|| match path {
                Some(path) => format!("load config from {}", path.display()),
                None => "load config from environment".to_string(),
            })
    }

    /// Load configuration from YAML text, with environment overrides from `env`
    pub fn from_yaml_str(content: &str, env: Environment) -> Result<Self> {
        Self::build(
            Config::builder()
                .add_source(File::from_str(content, FileFormat::Yaml))
                .add_source(env),
        )
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: Self = builder
            .build()
            .context("build config")?
            .try_deserialize()
            .context("deserialize config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.recv_window == Some(0) {
            bail!("recv_window must be positive");
        }
        if self.timeout_ms == 0 {
            bail!("timeout_ms must be positive");
        }
        if self.api_key.is_empty() && !self.secret_key.is_empty() {
            bail!("secret_key is set but api_key is missing");
        }
        Ok(())
    }

    /// True when signed endpoints can be called
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            environment: self.environment,
            base_url: self.base_url.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            debug: self.debug,
            time_offset: self.time_offset,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.api_key.clone(), self.secret_key.clone())
    }

    /// Options applied to every request issued by the CLI
    pub fn request_options(&self) -> Vec<RequestOption> {
        self.recv_window
            .map(RequestOption::recv_window)
            .into_iter()
            .collect()
    }
}

/// `SAPI_*` environment source
pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}
