//! Environment-sourced service configuration.
//!
//! Read once at startup. Variables set in the process environment win over
//! those listed in an optional `.env` file in the working directory. Remote
//! store settings are present only when both `COSMOS_ENDPOINT` and
//! `COSMOS_KEY` are set to non-empty values.

use crate::submission::adapters::cosmos::{
    CosmosSettings, DEFAULT_CONTAINER_ID, DEFAULT_DATABASE_ID,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Optional file of `KEY=value` lines read at startup.
pub const ENV_FILE: &str = ".env";

/// Listening port variable.
pub const PORT_VAR: &str = "PORT";
/// Listening address variable.
pub const BIND_ADDR_VAR: &str = "CONTACT_BIND_ADDR";
/// Application root variable.
pub const APP_ROOT_VAR: &str = "CONTACT_APP_ROOT";
/// Request body limit variable.
pub const MAX_BODY_BYTES_VAR: &str = "CONTACT_MAX_BODY_BYTES";
/// Remote store endpoint variable.
pub const COSMOS_ENDPOINT_VAR: &str = "COSMOS_ENDPOINT";
/// Remote store key variable.
pub const COSMOS_KEY_VAR: &str = "COSMOS_KEY";
/// Remote database name variable.
pub const COSMOS_DATABASE_VAR: &str = "COSMOS_DATABASE_ID";
/// Remote container name variable.
pub const COSMOS_CONTAINER_VAR: &str = "COSMOS_CONTAINER_ID";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default request body limit (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that cannot be parsed.
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value as found in the environment.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// The environment file exists but could not be read or parsed.
    #[error("failed to load {path}: {reason}")]
    EnvFile {
        /// Location of the file.
        path: Utf8PathBuf,
        /// Loader message.
        reason: String,
    },
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address to listen on.
    pub bind_addr: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding the static site, `uploads/` and `data/`.
    pub app_root: Utf8PathBuf,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
    /// Remote store settings, when configured.
    pub cosmos: Option<CosmosSettings>,
}

impl AppConfig {
    /// Reads configuration from the process environment, falling back to
    /// [`ENV_FILE`] for variables the environment does not set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFile`] when the file exists but is
    /// malformed, and [`ConfigError::InvalidValue`] when a numeric or
    /// address variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup_with_file(|key| std::env::var(key).ok(), Utf8Path::new(ENV_FILE))
    }

    /// Reads configuration through `lookup`, consulting the variables in
    /// `env_file` only for keys the lookup does not resolve.
    ///
    /// The file is optional; a missing file is logged and skipped. The
    /// process environment is never modified.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFile`] when the file exists but is
    /// malformed, and [`ConfigError::InvalidValue`] when a numeric or
    /// address variable cannot be parsed.
    pub fn from_lookup_with_file(
        lookup: impl Fn(&str) -> Option<String>,
        env_file: &Utf8Path,
    ) -> Result<Self, ConfigError> {
        let file_vars = read_env_file(env_file)?;
        Self::from_lookup(|key| lookup(key).or_else(|| file_vars.get(key).cloned()))
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric or address
    /// variable cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = parse_or(&lookup, BIND_ADDR_VAR, IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = parse_or(&lookup, PORT_VAR, DEFAULT_PORT)?;
        let max_body_bytes = parse_or(&lookup, MAX_BODY_BYTES_VAR, DEFAULT_MAX_BODY_BYTES)?;
        let app_root = non_empty(&lookup, APP_ROOT_VAR)
            .map_or_else(|| Utf8PathBuf::from("."), Utf8PathBuf::from);

        Ok(Self {
            bind_addr,
            port,
            app_root,
            max_body_bytes,
            cosmos: cosmos_settings(&lookup),
        })
    }

    /// Returns the socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn read_env_file(path: &Utf8Path) -> Result<HashMap<String, String>, ConfigError> {
    let env_file_error = |err: dotenvy::Error| ConfigError::EnvFile {
        path: path.to_owned(),
        reason: err.to_string(),
    };

    match dotenvy::from_path_iter(path) {
        Ok(lines) => {
            let vars = lines
                .collect::<Result<HashMap<_, _>, _>>()
                .map_err(env_file_error)?;
            info!(path = %path, count = vars.len(), "loaded environment file");
            Ok(vars)
        }
        Err(err) if err.not_found() => {
            debug!(path = %path, "no environment file found");
            Ok(HashMap::new())
        }
        Err(err) => Err(env_file_error(err)),
    }
}

fn cosmos_settings(lookup: &impl Fn(&str) -> Option<String>) -> Option<CosmosSettings> {
    let endpoint = non_empty(lookup, COSMOS_ENDPOINT_VAR);
    let key = non_empty(lookup, COSMOS_KEY_VAR);
    let (Some(endpoint), Some(key)) = (endpoint, key) else {
        warn!(
            "{COSMOS_ENDPOINT_VAR} or {COSMOS_KEY_VAR} not set; remote store operations will be skipped"
        );
        return None;
    };

    let database_id =
        non_empty(lookup, COSMOS_DATABASE_VAR).unwrap_or_else(|| DEFAULT_DATABASE_ID.to_owned());
    let container_id =
        non_empty(lookup, COSMOS_CONTAINER_VAR).unwrap_or_else(|| DEFAULT_CONTAINER_ID.to_owned());

    Some(
        CosmosSettings::new(endpoint, key)
            .with_database_id(database_id)
            .with_container_id(container_id),
    )
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    let Some(raw) = non_empty(lookup, key) else {
        debug!("{key} not set, using default: {default}");
        return Ok(default);
    };

    raw.trim()
        .parse()
        .map_err(|err: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: err.to_string(),
        })
}
