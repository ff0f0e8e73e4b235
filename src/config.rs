//! # Settings
//!
//! Layered service configuration.
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. `.env` file (loaded into the process environment)
//! 2. `config/default.{toml,yaml,json}` (optional)
//! 3. `config/{RUN_MODE}.{toml,yaml,json}` (optional, `RUN_MODE` defaults to `development`)
//! 4. `SHIPPING__*` environment variables, `__` separating sections
//!
//! ```text
//! SHIPPING__SERVER__PORT=8080
//! SHIPPING__PROVIDERS__GE__API_KEY=...
//! SHIPPING__MARGINS__DEFAULT_VALUE=10
//! ```
//!
//! Provider credentials are optional here. An adapter with missing settings
//! reports a configuration error per request instead of failing startup.

use crate::domain::entities::ProfitMargin;
use crate::domain::value_objects::{Environment as DeploymentEnvironment, MarginType};
use crate::infrastructure::providers::{GeConfig, ManuableConfig, PakkeConfig, ToneConfig};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SHIPPING";

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Returns the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` if host and port do not form an address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Message(format!("invalid server address: {e}")))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Deployment environment settings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EnvironmentSettings {
    /// Selects production provider tokens.
    #[serde(default)]
    pub production: bool,
}

impl EnvironmentSettings {
    /// Returns the token environment.
    #[must_use]
    pub fn environment(&self) -> DeploymentEnvironment {
        DeploymentEnvironment::from_is_prod(self.production)
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout for provider calls.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

/// Per-provider credentials and endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSettings {
    /// GE.
    #[serde(default)]
    pub ge: GeConfig,
    /// T1.
    #[serde(default)]
    pub tone: ToneConfig,
    /// Pakke.
    #[serde(default)]
    pub pakke: PakkeConfig,
    /// Manuable.
    #[serde(default)]
    pub manuable: ManuableConfig,
}

/// Margin seed for the in-memory margin store.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MarginSettings {
    /// Global margin value.
    #[serde(default)]
    pub default_value: f64,
    /// Global margin type.
    #[serde(default = "default_margin_type")]
    pub default_type: MarginType,
}

impl Default for MarginSettings {
    fn default() -> Self {
        Self {
            default_value: 0.0,
            default_type: default_margin_type(),
        }
    }
}

impl MarginSettings {
    /// Returns the seeded global margin.
    #[must_use]
    pub fn global_margin(&self) -> ProfitMargin {
        ProfitMargin::new(self.default_value, self.default_type)
    }
}

fn default_margin_type() -> MarginType {
    MarginType::Percentage
}

/// Complete service settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerSettings,
    /// Logging.
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Deployment environment.
    #[serde(default)]
    pub environment: EnvironmentSettings,
    /// Outbound HTTP.
    #[serde(default)]
    pub http: HttpSettings,
    /// Provider integrations.
    #[serde(default)]
    pub providers: ProviderSettings,
    /// Margin seed.
    #[serde(default)]
    pub margins: MarginSettings,
}

impl Settings {
    /// Loads settings from files and the environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a source is malformed or a value has the
    /// wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::from_builder(builder)
    }

    /// Builds settings from an explicit source stack.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the sources cannot be merged or deserialized.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(source: &str) -> Result<Settings, ConfigError> {
        Settings::from_builder(
            Config::builder().add_source(File::from_str(source, FileFormat::Toml)),
        )
    }

    #[test]
    fn empty_source_uses_defaults() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert_eq!(settings.http.timeout_ms, 30_000);
        assert_eq!(
            settings.environment.environment(),
            DeploymentEnvironment::Development
        );
        assert_eq!(settings.margins.global_margin(), ProfitMargin::percentage(0.0));
        assert_eq!(settings.providers.ge, GeConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let settings = from_toml(
            r#"
            [server]
            port = 8080

            [logging]
            format = "json"

            [environment]
            production = true

            [margins]
            default_value = 25
            default_type = "absolute"

            [providers.ge]
            api_key = "ge-key"
            uri = "https://ge.test"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.socket_addr().unwrap().port(), 8080);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert!(settings.environment.environment().is_prod());
        assert_eq!(settings.margins.global_margin(), ProfitMargin::absolute(25.0));
        assert_eq!(
            settings.providers.ge,
            GeConfig::new()
                .with_api_key("ge-key")
                .with_uri("https://ge.test")
        );
        assert_eq!(settings.providers.manuable, ManuableConfig::default());
    }

    #[test]
    fn invalid_margin_type_is_rejected() {
        let result = from_toml(
            r#"
            [margins]
            default_type = "ratio"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn invalid_host_is_reported() {
        let server = ServerSettings {
            host: "not a host".to_string(),
            port: 80,
        };
        assert!(server.socket_addr().is_err());
    }
}
