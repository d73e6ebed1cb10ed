//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod database;
pub mod identity;
pub mod inbox;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::identity::IdentityConfig;
pub use self::inbox::InboxConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration (base file + environment overlay + `MSGCENTER__*`
/// environment variables).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Secondary identity (user service) settings.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Inbox query settings.
    #[serde(default)]
    pub inbox: InboxConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// `config_path` is the base file (extension optional). When
    /// `MSGCENTER_ENV` is set, `config/<env>.toml` is layered on top.
    /// Environment variables such as `MSGCENTER__DATABASE__URL` win last.
    pub fn load(config_path: &str) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false));

        if let Ok(env) = std::env::var("MSGCENTER_ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{env}")).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("MSGCENTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
