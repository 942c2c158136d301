//! Server configuration.
//!
//! Layered via the `config` crate: an optional `config/default.toml`
//! file under `FIELDOPS__`-prefixed environment variables, e.g.
//! `FIELDOPS__HTTP__PORT=9090` or `FIELDOPS__DB__URL=mem://`.

use fieldops_auth::AuthConfig;
use fieldops_db::DbConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http: HttpConfig,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("FIELDOPS").separator("__"))
            .build()?
            .try_deserialize()
    }
}
