//! SurrealDB connection management.

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;

/// Configuration for connecting to SurrealDB.
///
/// The URL selects the engine: `ws://host:port` for a remote server,
/// `mem://` for the in-memory engine used in tests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root username; only used for remote engines.
    pub username: String,
    /// Root password; only used for remote engines.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8000".into(),
            namespace: "fieldops".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

/// Connect to SurrealDB using the provided configuration.
///
/// For remote engines this authenticates as root; it then selects the
/// configured namespace and database and returns a ready-to-use
/// client.
pub async fn connect(config: &DbConfig) -> Result<Surreal<Any>, DbError> {
    info!(
        url = %config.url,
        namespace = %config.namespace,
        database = %config.database,
        "Connecting to SurrealDB"
    );

    let db = surrealdb::engine::any::connect(&config.url).await?;

    if config.url.starts_with("ws") {
        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;
    }

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await?;

    info!("Successfully connected to SurrealDB");

    Ok(db)
}
